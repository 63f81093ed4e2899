//! Embeddings generation module
//!
//! Text is turned into fixed-length vectors by a pluggable backend:
//! - OpenAI-compatible `/embeddings` API (text-embedding-ada-002 by default)
//! - Ollama local models (`/api/embeddings`)
//!
//! [`EmbeddingService`] wraps a backend with timeout/retry, a dimension check
//! and a small query cache.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ragfant::embeddings::EmbeddingService;
//! use ragfant::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Who should I start at flex?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

use std::sync::Arc;

use async_trait::async_trait;
pub use client::OllamaEmbeddings;
pub use client::OpenAiEmbeddings;
pub use generator::EmbeddingService;

use crate::config::EmbeddingsConfig;
use crate::config::ProviderKind;
use crate::errors::ProviderError;
use crate::Result;

/// Default embedding dimension for OpenAI text-embedding-ada-002
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// A text-to-vector model. Deterministic for a given model and input.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Short provider name used in errors and logs
    fn provider(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError>;

    /// Embed several texts, output order matches input order
    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Pick the backend named by configuration
pub fn backend_from_config(
    config: &EmbeddingsConfig,
    timeout: std::time::Duration,
) -> Result<Arc<dyn EmbeddingBackend>> {
    let backend: Arc<dyn EmbeddingBackend> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiEmbeddings::new(
            &config.endpoint,
            &config.model,
            &config.api_key,
            timeout,
        )?),
        ProviderKind::Ollama => Arc::new(OllamaEmbeddings::new(
            &config.endpoint,
            &config.model,
            timeout,
        )?),
    };
    Ok(backend)
}
