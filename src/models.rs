//! Player ranking records stored alongside the vector index

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::RagfantError;

/// Roster position of a ranked player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::DST,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QB => "QB",
            Self::RB => "RB",
            Self::WR => "WR",
            Self::TE => "TE",
            Self::K => "K",
            Self::DST => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = RagfantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Self::QB),
            "RB" => Ok(Self::RB),
            "WR" => Ok(Self::WR),
            "TE" => Ok(Self::TE),
            "K" | "PK" => Ok(Self::K),
            "DST" | "DEF" | "D/ST" => Ok(Self::DST),
            other => Err(RagfantError::InvalidInput(format!(
                "unknown position '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = RagfantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.as_str().to_string()
    }
}

/// Start/sit letter grade, ordered from F (lowest) to A+ (highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Grade {
    F,
    DMinus,
    D,
    DPlus,
    CMinus,
    C,
    CPlus,
    BMinus,
    B,
    BPlus,
    AMinus,
    A,
    APlus,
}

impl Grade {
    /// Numeric value used for comparisons: A+ = 12 down to F = 0
    pub const fn ordinal(self) -> i32 {
        match self {
            Self::F => 0,
            Self::DMinus => 1,
            Self::D => 2,
            Self::DPlus => 3,
            Self::CMinus => 4,
            Self::C => 5,
            Self::CPlus => 6,
            Self::BMinus => 7,
            Self::B => 8,
            Self::BPlus => 9,
            Self::AMinus => 10,
            Self::A => 11,
            Self::APlus => 12,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::DMinus => "D-",
            Self::D => "D",
            Self::DPlus => "D+",
            Self::CMinus => "C-",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
            Self::APlus => "A+",
        }
    }
}

/// Ordinal of an optional grade; a missing grade sorts below F
pub fn grade_ordinal(grade: Option<Grade>) -> i32 {
    grade.map_or(-1, Grade::ordinal)
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = RagfantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let grade = match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Self::APlus,
            "A" => Self::A,
            "A-" => Self::AMinus,
            "B+" => Self::BPlus,
            "B" => Self::B,
            "B-" => Self::BMinus,
            "C+" => Self::CPlus,
            "C" => Self::C,
            "C-" => Self::CMinus,
            "D+" => Self::DPlus,
            "D" => Self::D,
            "D-" => Self::DMinus,
            "F" => Self::F,
            other => {
                return Err(RagfantError::InvalidInput(format!("unknown grade '{other}'")));
            }
        };
        Ok(grade)
    }
}

impl TryFrom<String> for Grade {
    type Error = RagfantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(value: Grade) -> Self {
        value.as_str().to_string()
    }
}

/// One upcoming game for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub week: u32,
    pub opponent: String,
    /// Opponent defense rank against the player's position
    pub defense_rank: u32,
    pub matchup_rating: f32,
}

impl MatchupEntry {
    /// Letter class of the matchup rating: A from 4 up, B from 3, C below
    pub fn rating_class(&self) -> char {
        if self.matchup_rating >= 4.0 {
            'A'
        } else if self.matchup_rating >= 3.0 {
            'B'
        } else {
            'C'
        }
    }
}

/// One player-week ranking entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub player_id: String,
    pub player_name: String,
    pub position: Position,
    pub team: String,
    #[serde(default)]
    pub opponent: Option<String>,
    pub ecr_rank: u32,
    #[serde(default)]
    pub pos_rank: Option<String>,
    #[serde(default)]
    pub start_sit_grade: Option<Grade>,
    #[serde(default)]
    pub matchups: Vec<MatchupEntry>,
    #[serde(default)]
    pub rookie: bool,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
}

const ROOKIE_NOTE_MARKERS: [&str; 3] = ["(R)", "2025 Draft", "Rookie"];

impl RankingRecord {
    /// Whether any rookie marker is present: the flag, the experience tag, or a note marker
    pub fn is_rookie(&self) -> bool {
        if self.rookie {
            return true;
        }
        if self
            .experience
            .as_deref()
            .is_some_and(|e| e.trim().eq_ignore_ascii_case("rookie"))
        {
            return true;
        }
        self.notes
            .as_deref()
            .is_some_and(|notes| ROOKIE_NOTE_MARKERS.iter().any(|m| notes.contains(m)))
    }

    pub fn grade_ordinal(&self) -> i32 {
        grade_ordinal(self.start_sit_grade)
    }
}
