#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        name: &'static str,
        message: String,
    },
    Conflicting(&'static str, &'static str),
    Credentials(String),
}

/// Where replay bytes come from. Exactly one variant is configured.
#[derive(Debug)]
pub enum ReplaySource {
    /// `REPLAY_BUCKET`: authenticated object storage.
    Bucket { name: String },
    /// `REPLAY_BASE_URL`: public HTTP downloads.
    BaseUrl { url: String },
    /// `REPLAY_CACHE_DIR`: a pre-populated local directory.
    CacheDir { dir: std::path::PathBuf },
}

/// Where the store lives between runs.
#[derive(Debug)]
pub enum StorageVariant {
    /// `STATS_BUCKET` (+ `STATS_FOLDER`): the store lives in a scratch
    /// directory and round-trips through an archive in durable storage.
    Archived {
        stats_bucket: String,
        stats_folder: String,
    },
    /// `DB_PATH`: the store is a persistent local directory; no archive.
    Local { db_path: std::path::PathBuf },
}

#[derive(Debug)]
pub struct Config {
    pub season: u32,
    pub api_url: String,
    pub parser_command: std::path::PathBuf,
    pub replay_source: ReplaySource,
    pub storage: StorageVariant,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let season = require("SEASON")?
            .parse::<u32>()
            .map_err(|e| ConfigError::Invalid {
                name: "SEASON",
                message: format!("{}", e),
            })?;
        let api_url = require("LEAGUE_API_URL")?;
        let parser_command = require("REPLAY_PARSER")?.into();

        let replay_source = match (
            opt("REPLAY_BUCKET"),
            opt("REPLAY_BASE_URL"),
            opt("REPLAY_CACHE_DIR"),
        ) {
            (Some(name), None, None) => ReplaySource::Bucket { name },
            (None, Some(url), None) => ReplaySource::BaseUrl { url },
            (None, None, Some(dir)) => ReplaySource::CacheDir { dir: dir.into() },
            (None, None, None) => {
                return Err(ConfigError::Missing(
                    "REPLAY_BUCKET, REPLAY_BASE_URL or REPLAY_CACHE_DIR",
                ));
            }
            _ => {
                return Err(ConfigError::Conflicting(
                    "REPLAY_BUCKET",
                    "REPLAY_BASE_URL / REPLAY_CACHE_DIR",
                ));
            }
        };

        let storage = match (opt("STATS_BUCKET"), opt("DB_PATH")) {
            (Some(stats_bucket), None) => StorageVariant::Archived {
                stats_bucket,
                stats_folder: opt("STATS_FOLDER").unwrap_or_else(|| "stats".to_string()),
            },
            (None, Some(db_path)) => StorageVariant::Local {
                db_path: db_path.into(),
            },
            (None, None) => return Err(ConfigError::Missing("STATS_BUCKET or DB_PATH")),
            (Some(_), Some(_)) => return Err(ConfigError::Conflicting("STATS_BUCKET", "DB_PATH")),
        };

        Ok(Self {
            season,
            api_url,
            parser_command,
            replay_source,
            storage,
        })
    }

    pub fn s3_region(&self) -> Result<s3::region::Region, ConfigError> {
        let region = opt("S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        match opt("S3_ENDPOINT") {
            Some(endpoint) => Ok(s3::region::Region::Custom { region, endpoint }),
            None => region
                .parse::<s3::region::Region>()
                .map_err(|e| ConfigError::Invalid {
                    name: "S3_REGION",
                    message: format!("{:?}", e),
                }),
        }
    }

    pub fn s3_credentials(&self) -> Result<s3::creds::Credentials, ConfigError> {
        s3::creds::Credentials::default().map_err(|e| ConfigError::Credentials(format!("{:?}", e)))
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    opt(name).ok_or(ConfigError::Missing(name))
}

fn opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
