//! RAG (Retrieval-Augmented Generation) module
//!
//! This module answers fantasy football questions:
//! - Semantic retrieval over the player index
//! - Position/grade filtering and intent-aware re-ranking
//! - Context assembly from retrieved records
//! - LLM-based answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ragfant::config::AppConfig;
//! use ragfant::index::load_artifacts;
//! use ragfant::rag::{RagQuery, RagService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let index = Arc::new(load_artifacts(&config.index_path(), &config.metadata_path())?);
//!     let service = RagService::new(&config, index)?;
//!
//!     let outcome = service.ask(RagQuery::new("Who should I start at flex?")).await?;
//!     println!("Answer: {}", outcome.answer());
//!     println!("Sources: {} players", outcome.sources().len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod filter;
pub mod intent;
pub mod pipeline;
pub mod retriever;

pub use context::ContextAssembler;
pub use filter::SearchFilters;
pub use intent::IntentClassifier;
pub use intent::IntentSet;
pub use intent::QueryIntent;
pub use pipeline::RagOutcome;
pub use pipeline::RagQuery;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use retriever::Retriever;
pub use retriever::SearchOutcome;
use serde::Serialize;

use crate::models::RankingRecord;

/// Search result with similarity score and index position
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub record: RankingRecord,
    pub score: f32,
    pub index: usize,
}
