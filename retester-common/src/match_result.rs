//! Wire model of an engine response.

use serde::Deserialize;

/// Response envelope from the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matches: Vec<MatchResult>,
}

/// One match reported by the engine.
///
/// Produced only by the engine; never constructed locally outside tests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchResult {
    /// Engine-assigned match name, if the engine names matches.
    pub name: Option<String>,
    pub index: u32,
    pub length: u32,
    pub value: String,
    #[serde(default)]
    pub groups: Vec<GroupResult>,
}

/// One capture group inside a match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupResult {
    pub name: Option<String>,
    pub index: u32,
    pub length: u32,
    pub value: String,
}
