//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - ask: RAG questions and plain semantic search
//! - index: Embedding rankings and building the index
//! - sleeper: League data lookups
//! - serve: API server
//! - info: Configuration display

pub mod ask;
pub mod index;
pub mod info;
pub mod serve;
pub mod sleeper;

use std::sync::Arc;

// Re-export all public handlers
pub use ask::*;
pub use index::*;
pub use info::*;
pub use serve::*;
pub use sleeper::*;

use crate::index::load_artifacts;
use crate::index::PlayerIndex;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

/// Load the persisted index named by the configuration
pub(crate) fn load_index(config: &AppConfig) -> Result<Arc<PlayerIndex>> {
    let index = load_artifacts(&config.index_path(), &config.metadata_path())?;
    Ok(Arc::new(index))
}

pub(crate) fn load_rag_service(config: &AppConfig) -> Result<RagService> {
    RagService::new(config, load_index(config)?)
}
