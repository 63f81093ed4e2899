//! Sleeper API payloads and the league views built from them
//!
//! Wire types are lenient: Sleeper omits or nulls many fields depending on
//! league settings and season state, so almost everything defaults.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_rosters: Option<u32>,
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub scoring_settings: HashMap<String, f64>,
    #[serde(default)]
    pub roster_positions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub fpts: f64,
    #[serde(default)]
    pub fpts_decimal: f64,
    #[serde(default)]
    pub fpts_against: f64,
    #[serde(default)]
    pub fpts_against_decimal: f64,
}

impl RosterSettings {
    /// Points scored, with the hundredths Sleeper reports separately
    pub fn points_for(&self) -> f64 {
        self.fpts + self.fpts_decimal / 100.0
    }

    pub fn points_against(&self) -> f64 {
        self.fpts_against + self.fpts_against_decimal / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
    #[serde(default)]
    pub settings: RosterSettings,
}

impl Roster {
    pub fn player_ids(&self) -> &[String] {
        self.players.as_deref().unwrap_or_default()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl LeagueUser {
    pub fn team_name(&self) -> Option<String> {
        self.metadata
            .as_ref()?
            .get("team_name")?
            .as_str()
            .map(ToString::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default, rename = "type")]
    pub draft_type: Option<String>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub round: u32,
    pub pick_no: u32,
    pub player_id: String,
    #[serde(default)]
    pub picked_by: Option<String>,
    #[serde(default)]
    pub roster_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradedPick {
    pub season: String,
    pub round: u32,
    /// Roster the pick originally belonged to
    pub roster_id: u32,
    #[serde(default)]
    pub previous_owner_id: Option<u32>,
    pub owner_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueMatchup {
    pub roster_id: u32,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub starters: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub roster_ids: Vec<u32>,
    #[serde(default)]
    pub adds: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub drops: Option<HashMap<String, u32>>,
}

/// Entry of the `players/nfl` catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
}

impl Player {
    /// Full name, or first and last name (team defenses have no full name)
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.full_name {
            return Some(name.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingPlayer {
    pub player_id: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendKind {
    Add,
    Drop,
}

impl TrendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Drop => "drop",
        }
    }
}

// ====== Views ======

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInfo {
    pub round: u32,
    pub pick: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: String,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub status: Option<String>,
    pub injury_status: Option<String>,
    pub draft_info: Option<DraftInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeeperOption {
    pub player: RosterPlayer,
    pub original_round: u32,
    pub keeper_round: u32,
    pub value_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub roster_id: u32,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub season: String,
    pub league_name: String,
    pub league_id: String,
    pub total_rosters: usize,
    pub scoring_settings: HashMap<String, f64>,
    pub roster_positions: Vec<String>,
    pub user_roster: Roster,
    /// Picks the user made in this league's draft
    pub draft_picks: Vec<DraftPick>,
    pub draft: Option<Draft>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLeagues {
    pub username: String,
    pub user_id: String,
    pub leagues: Vec<LeagueSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingEntry {
    pub player_id: String,
    pub full_name: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trending {
    pub adds: Vec<TrendingEntry>,
    pub drops: Vec<TrendingEntry>,
}
