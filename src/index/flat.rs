//! Exact inner-product index over L2-normalized vectors

use crate::errors::RagfantError;
use crate::index::Neighbor;
use crate::Result;

/// Brute-force cosine index.
///
/// Vectors are normalized once at build time and stored row-major in a single
/// buffer; queries are normalized on the fly, so the inner product is the
/// cosine similarity.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Build an index from a batch of vectors, all of `dimension` length
    pub fn build(dimension: usize, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if dimension == 0 {
            return Err(RagfantError::InvalidInput(
                "index dimension must be positive".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for mut vector in vectors {
            if vector.len() != dimension {
                return Err(RagfantError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            normalize_l2(&mut vector);
            data.extend_from_slice(&vector);
        }

        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stored (normalized) vectors in index order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dimension)
    }

    /// Top-`k` neighbors by cosine similarity, best first.
    ///
    /// Returns `min(k, len)` neighbors; ties keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RagfantError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut query = query.to_vec();
        normalize_l2(&mut query);

        let mut scored: Vec<Neighbor> = self
            .rows()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                score: dot(&query, row),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.index.cmp(&b.index))
        });
        scored.truncate(k.min(scored.len()));

        Ok(scored)
    }
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn normalize_l2(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
