#[derive(Debug)]
pub enum ParserError {
    /// The parser executable itself could not be started. Nothing else in
    /// the run can succeed either, so this aborts the pass.
    Spawn(std::io::Error),
    /// The parser ran and gave up on this particular replay.
    Failed {
        code: Option<i32>,
        stderr: String,
    },
    Decode(serde_json::Error),
}

impl ParserError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Spawn(_))
    }
}

/// The opaque replay parser. Implementations turn one local replay file
/// into match metadata, player records and a parse status.
#[async_trait::async_trait]
pub trait ReplayParser: Send + Sync {
    async fn parse(&self, replay: &std::path::Path) -> Result<common::ParsedReplay, ParserError>;
}

/// Runs the external parser executable and decodes the JSON it prints.
/// Replays from game builds the parser does not know yet are still decoded
/// thanks to the override flag; their status tells us whether the result
/// is trustworthy.
pub struct CommandParser {
    program: std::path::PathBuf,
}

impl CommandParser {
    pub fn new<P>(program: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReplayParser for CommandParser {
    #[tracing::instrument(skip(self))]
    async fn parse(&self, replay: &std::path::Path) -> Result<common::ParsedReplay, ParserError> {
        let output = tokio::process::Command::new(&self.program)
            .arg(replay)
            .arg("--override-verified-build")
            .output()
            .await
            .map_err(ParserError::Spawn)?;

        if !output.status.success() {
            return Err(ParserError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(ParserError::Decode)
    }
}
