//! Embedding generation service with caching and batch processing

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use tracing::info;

use super::backend_from_config;
use super::EmbeddingBackend;
use super::MAX_BATCH_SIZE;
use crate::config::AppConfig;
use crate::errors::ProviderError;
use crate::errors::ProviderErrorKind;
use crate::errors::RagfantError;
use crate::retry::RetryPolicy;
use crate::Result;

/// Service for generating embeddings with retry, caching and dimension checks
pub struct EmbeddingService {
    backend: Arc<dyn EmbeddingBackend>,
    policy: RetryPolicy,
    dimension: usize,
    cache: DashMap<String, Vec<f32>>,
    cache_capacity: usize,
}

impl EmbeddingService {
    /// Create the service for the configured provider
    pub fn new(config: &AppConfig) -> Result<Self> {
        let backend = backend_from_config(&config.embeddings, config.request_timeout())?;
        info!(
            "Embedding service: provider={} model={} dimension={}",
            backend.provider(),
            backend.model(),
            config.embeddings.dimension
        );
        Ok(Self::with_backend(
            backend,
            config.embeddings.dimension,
            RetryPolicy::from(&config.http),
            config.embeddings.cache_capacity,
        ))
    }

    /// Create from an existing backend
    pub fn with_backend(
        backend: Arc<dyn EmbeddingBackend>,
        dimension: usize,
        policy: RetryPolicy,
        cache_capacity: usize,
    ) -> Self {
        Self {
            backend,
            policy,
            dimension,
            cache: DashMap::new(),
            cache_capacity,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn provider(&self) -> &'static str {
        self.backend.provider()
    }

    /// Generate embedding for a single text.
    ///
    /// Text is passed through unchanged; an empty string is a valid input.
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.get(text) {
            debug!("Embedding cache hit ({} chars)", text.len());
            return Ok(hit.value().clone());
        }

        let backend = &self.backend;
        let embedding = self
            .policy
            .run(backend.provider(), || backend.embed(text))
            .await?;
        self.check_dimension(&embedding)?;

        if self.cache_capacity > 0 && self.cache.len() < self.cache_capacity {
            self.cache.insert(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    /// Generate embeddings for multiple texts, in input order
    pub async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let backend = &self.backend;
        let mut all_embeddings = Vec::with_capacity(texts.len());
        for (i, chunk) in texts.chunks(MAX_BATCH_SIZE).enumerate() {
            debug!("Embedding batch {} ({} texts)", i + 1, chunk.len());
            let embeddings = self
                .policy
                .run(backend.provider(), || backend.embed_batch(chunk))
                .await?;
            if embeddings.len() != chunk.len() {
                return Err(ProviderError::new(
                    backend.provider(),
                    ProviderErrorKind::InvalidResponse,
                    format!(
                        "returned {} embeddings for {} texts",
                        embeddings.len(),
                        chunk.len()
                    ),
                )
                .into());
            }
            for embedding in &embeddings {
                self.check_dimension(embedding)?;
            }
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() == self.dimension {
            Ok(())
        } else {
            Err(RagfantError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            })
        }
    }

    /// Number of cached query embeddings
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
