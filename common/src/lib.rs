pub mod replay;
pub use replay::{MatchMetadata, ParsedReplay, PlayerRecord};

/// One reported match from the season schedule feed. The feed is the
/// authoritative source for which replay files exist.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMatch {
    pub home: ScheduledTeam,
    pub away: ScheduledTeam,
    pub division_concat: String,
    #[serde(default)]
    pub replays: Vec<ReplayRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTeam {
    pub team_name: String,
}

/// A reference to one replay file of a match. Entries without a url exist
/// in the feed when a game was reported but its file never arrived.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplayRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTeamEntry {
    pub team_name: String,
    pub division_display_name: String,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub display_name: String,
}
