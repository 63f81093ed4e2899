//! Fantasy football rankings retrieval and question answering
//!
//! Player rankings are embedded into a flat cosine index; questions retrieve
//! the closest players, filter and re-rank them by detected intent, and an
//! LLM answers from the assembled context. Sleeper league data can be added
//! to the context for roster-aware answers.

pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod retry;
pub mod sleeper;

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
