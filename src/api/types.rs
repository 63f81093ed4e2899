//! API request and response types

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::RagfantError;
use crate::models::RankingRecord;
use crate::rag::context::format_result;
use crate::rag::IntentSet;
use crate::rag::RagOutcome;
use crate::rag::SearchFilters;
use crate::rag::SearchResult;
use crate::sleeper::models::RosterPlayer;
use crate::Result;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// False when the server started without index artifacts
    pub index_loaded: bool,
}

/// Filters shared by search and ask requests, as sent over the wire
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub min_grade: Option<String>,
}

impl FilterParams {
    pub fn to_filters(&self) -> Result<SearchFilters> {
        SearchFilters::parse(&self.positions, self.min_grade.as_deref())
    }
}

fn check_top_k(top_k: Option<usize>) -> Result<()> {
    match top_k {
        Some(0) => Err(RagfantError::InvalidInput(
            "top_k must be at least 1".to_string(),
        )),
        Some(k) if k > MAX_TOP_K => Err(RagfantError::InvalidInput(format!(
            "top_k must be at most {MAX_TOP_K}"
        ))),
        _ => Ok(()),
    }
}

pub const MAX_TOP_K: usize = 100;

/// Semantic search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(flatten)]
    pub filters: FilterParams,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<()> {
        check_top_k(self.top_k)
    }
}

/// RAG question request
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(flatten)]
    pub filters: FilterParams,
    /// With `league_id`, adds the user's roster to the context
    #[serde(default)]
    pub sleeper_username: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

impl AskRequest {
    pub fn validate(&self) -> Result<()> {
        check_top_k(self.top_k)?;
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RagfantError::InvalidInput(format!(
                    "temperature must be within [0, 2], got {t}"
                )));
            }
        }
        if self.sleeper_username.is_some() != self.league_id.is_some() {
            return Err(RagfantError::InvalidInput(
                "sleeper_username and league_id must be given together".to_string(),
            ));
        }
        Ok(())
    }
}

/// One retrieved player
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f32,
    pub record: RankingRecord,
    /// The block the model sees for this player
    pub text: String,
}

impl From<&SearchResult> for SearchHit {
    fn from(result: &SearchResult) -> Self {
        Self {
            index: result.index,
            score: result.score,
            record: result.record.clone(),
            text: format_result(result),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub intents: IntentSet,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    /// Absent when nothing relevant was retrieved
    pub id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub found: bool,
    pub intents: IntentSet,
    pub sources: Vec<SearchHit>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl From<RagOutcome> for AskResponse {
    fn from(outcome: RagOutcome) -> Self {
        match outcome {
            RagOutcome::Answered(response) => Self {
                id: Some(response.id),
                sources: response.sources.iter().map(SearchHit::from).collect(),
                question: response.question,
                answer: response.answer,
                found: true,
                intents: response.intents,
                generated_at: Some(response.generated_at),
            },
            RagOutcome::NoRelevantInformation { question, intents } => Self {
                id: None,
                question,
                answer: crate::rag::pipeline::NO_RELEVANT_INFORMATION.to_string(),
                found: false,
                intents,
                sources: Vec::new(),
                generated_at: None,
            },
        }
    }
}

/// Index statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStatsResponse {
    pub records: usize,
    pub dimension: usize,
    pub positions: BTreeMap<String, usize>,
    pub embedding_model: String,
}

/// Trending query parameters
#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default = "default_trending_hours")]
    pub hours: u32,
    #[serde(default = "default_trending_limit")]
    pub limit: u32,
}

const fn default_trending_hours() -> u32 {
    24
}

const fn default_trending_limit() -> u32 {
    25
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterResponse {
    pub players: Vec<RosterPlayer>,
    pub context: String,
}
