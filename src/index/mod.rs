//! Player vector index and its aligned metadata
//!
//! The vector index and the metadata store are only ever constructed
//! together through [`PlayerIndex`], which refuses pairs of different
//! length. Once built, both are read-only and can be shared behind an `Arc`
//! by any number of concurrent readers.

pub mod flat;
pub mod metadata;
pub mod store;

pub use flat::normalize_l2;
pub use flat::FlatIndex;
pub use metadata::MetadataStore;
pub use store::load_artifacts;
pub use store::save_artifacts;

use crate::errors::RagfantError;
use crate::models::RankingRecord;
use crate::Result;

/// A nearest-neighbor candidate: position in the index plus cosine similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub score: f32,
}

/// Vector index and metadata that are guaranteed to have the same length
#[derive(Debug, Clone)]
pub struct PlayerIndex {
    vectors: FlatIndex,
    metadata: MetadataStore,
}

impl PlayerIndex {
    pub fn new(vectors: FlatIndex, metadata: MetadataStore) -> Result<Self> {
        if vectors.len() != metadata.len() {
            return Err(RagfantError::IndexMismatch {
                vectors: vectors.len(),
                records: metadata.len(),
                detail: "index and metadata must be built together".to_string(),
            });
        }
        Ok(Self { vectors, metadata })
    }

    /// Build from raw vectors and their records in one step
    pub fn from_parts(
        dimension: usize,
        vectors: Vec<Vec<f32>>,
        records: Vec<RankingRecord>,
    ) -> Result<Self> {
        Self::new(
            FlatIndex::build(dimension, vectors)?,
            MetadataStore::new(records),
        )
    }

    pub fn vectors(&self) -> &FlatIndex {
        &self.vectors
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.vectors.search(query, k)
    }
}
