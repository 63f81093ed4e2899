/// API request handlers
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::config::AppConfig;
use crate::errors::RagfantError;
use crate::index::load_artifacts;
use crate::rag::RagService;
use crate::sleeper::LeagueManager;
use crate::sleeper::SleeperApi;
use crate::Result;

pub mod rag;
pub mod sleeper;
pub mod stats;

pub use rag::*;
pub use sleeper::*;
pub use stats::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when the index artifacts were missing at startup
    pub rag: Option<Arc<RagService>>,
    pub league: Arc<LeagueManager>,
    pub index_path: PathBuf,
}

impl AppState {
    pub fn new(rag: Option<Arc<RagService>>, league: Arc<LeagueManager>, index_path: PathBuf) -> Self {
        Self {
            rag,
            league,
            index_path,
        }
    }

    /// Load the index and wire up services. Missing artifacts leave the
    /// retrieval endpoints answering 503, a corrupted index is an error.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let index_path = config.index_path();
        let rag = match load_artifacts(&index_path, &config.metadata_path()) {
            Ok(index) => {
                info!("Loaded index with {} records", index.len());
                Some(Arc::new(RagService::new(config, Arc::new(index))?))
            }
            Err(err @ RagfantError::DataNotFound { .. }) => {
                warn!("{err}");
                None
            }
            Err(err) => return Err(err),
        };

        let source = Arc::new(SleeperApi::new(config)?);
        let league = Arc::new(LeagueManager::new(source, config.sleeper.seasons.clone()));
        Ok(Self::new(rag, league, index_path))
    }

    pub(crate) fn rag(&self) -> std::result::Result<&RagService, ApiError> {
        self.rag
            .as_deref()
            .ok_or_else(|| ApiError(RagfantError::data_not_found(&self.index_path)))
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        index_loaded: state.rag.is_some(),
    }))
}
