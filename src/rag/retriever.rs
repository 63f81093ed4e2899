//! Retrieval over the player index: embed, search, filter, rank

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::RetrievalConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::index::PlayerIndex;
use crate::rag::filter::rank_candidates;
use crate::rag::filter::Candidate;
use crate::rag::filter::SearchFilters;
use crate::rag::intent::IntentClassifier;
use crate::rag::intent::IntentSet;
use crate::rag::SearchResult;

/// Results of one retrieval plus what was detected about the query
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub intents: IntentSet,
    /// Neighbors fetched from the index before filtering
    pub candidates_considered: usize,
}

/// Retriever for semantic search over player rankings
pub struct Retriever {
    index: Arc<PlayerIndex>,
    embedding_service: Arc<EmbeddingService>,
    classifier: IntentClassifier,
    config: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        index: Arc<PlayerIndex>,
        embedding_service: Arc<EmbeddingService>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embedding_service,
            classifier: IntentClassifier::default(),
            config,
        }
    }

    pub fn index(&self) -> &PlayerIndex {
        &self.index
    }

    pub fn embedding_service(&self) -> &EmbeddingService {
        &self.embedding_service
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Number of neighbors requested from the index for `top_k` results
    pub fn overfetch(&self, top_k: usize) -> usize {
        self.config.overfetch_min.max(top_k.saturating_mul(2))
    }

    /// Embed `query` and return up to `top_k` filtered, ranked records
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome> {
        info!(
            "Searching for: {:?} (top_k={}, positions={:?}, min_grade={:?})",
            query, top_k, filters.positions, filters.min_grade
        );
        let query_vector = self.embedding_service.generate(query).await?;
        self.search_with_vector(query, &query_vector, top_k, filters)
    }

    /// Same as [`Retriever::search`] with a precomputed query vector
    pub fn search_with_vector(
        &self,
        query: &str,
        query_vector: &[f32],
        top_k: usize,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome> {
        let intents = self.classifier.classify(query);
        let neighbors = self.index.search(query_vector, self.overfetch(top_k))?;
        let candidates_considered = neighbors.len();
        let metadata = self.index.metadata();

        let mut candidates = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let Some(record) = metadata.try_get(neighbor.index) else {
                warn!("Skipping neighbor {} with no metadata record", neighbor.index);
                continue;
            };
            if filters.accepts(record) {
                candidates.push(Candidate {
                    index: neighbor.index,
                    score: neighbor.score,
                    record,
                });
            }
        }
        debug!(
            "{} of {} candidates passed filters (intents: {})",
            candidates.len(),
            candidates_considered,
            intents
        );

        let results: Vec<SearchResult> =
            rank_candidates(candidates, &intents, top_k, self.config.position_cap)
                .into_iter()
                .map(|c| SearchResult {
                    record: c.record.clone(),
                    score: c.score,
                    index: c.index,
                })
                .collect();

        info!("Found {} results (intents: {})", results.len(), intents);
        Ok(SearchOutcome {
            results,
            intents,
            candidates_considered,
        })
    }
}
