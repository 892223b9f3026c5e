/// Only this parser status means "fully supported, safe to persist".
pub const STATUS_SUPPORTED: i32 = 1;

/// Normalized output of the replay parser for a single file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedReplay {
    #[serde(rename = "match")]
    pub match_info: MatchMetadata,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    pub status: i32,
}

impl ParsedReplay {
    pub fn is_supported(&self) -> bool {
        self.status == STATUS_SUPPORTED
    }
}

/// Match metadata as reported by the parser. (map, date, type) is the
/// natural key a match is stored under; everything else the parser emits
/// is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchMetadata {
    pub map: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One in-game player of a replay, in parser output order. `handle` is the
/// stable account identifier, distinct from the `name#tag` display
/// identity used for roster matching. Per-hero stats and other parser
/// fields ride along in `extra` and end up in the stored stat row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "ToonHandle")]
    pub handle: String,
    pub name: String,
    pub tag: u32,
    pub team: u8,
    pub uuid: String,
    pub region: i64,
    pub realm: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PlayerRecord {
    pub fn battle_tag(&self) -> String {
        format!("{}#{}", self.name, self.tag)
    }
}
