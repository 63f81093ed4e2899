//! Embedding API clients for the supported providers

use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use reqwest::Client;
use reqwest::Response;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::EmbeddingBackend;
use crate::errors::ProviderError;
use crate::errors::ProviderErrorKind;
use crate::errors::RagfantError;
use crate::Result;

/// Concurrent requests issued by an Ollama batch
const OLLAMA_CONCURRENCY: usize = 16;

/// HTTP client shared by the provider clients
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| RagfantError::Config(format!("failed to build HTTP client: {e}")))
}

/// Turn a non-success response into a [`ProviderError`] carrying the body text
pub(crate) async fn check_status(
    provider: &'static str,
    response: Response,
) -> std::result::Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ProviderError::new(
        provider,
        ProviderErrorKind::from_status(status.as_u16()),
        format!("API error ({status}): {error_text}"),
    ))
}

pub(crate) fn trim_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// OpenAI-compatible `/embeddings` client
pub struct OpenAiEmbeddings {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiEmbeddings {
    pub const PROVIDER: &'static str = "openai";

    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client: build_http_client(timeout)?,
        })
    }

    async fn request(&self, input: Vec<&str>) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::new(
                Self::PROVIDER,
                ProviderErrorKind::MissingCredentials,
                "OpenAI API key not provided (set llm.api_key or OPENAI_API_KEY)",
            ));
        }

        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: Vec<&'a str>,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            #[serde(default)]
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        let expected = input.len();
        debug!("Calling OpenAI embeddings API: {} ({} items)", url, expected);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&OpenAIRequest {
                input,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        let mut result: OpenAIResponse = check_status(Self::PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        if result.data.len() != expected {
            return Err(ProviderError::new(
                Self::PROVIDER,
                ProviderErrorKind::InvalidResponse,
                format!("expected {expected} embeddings, got {}", result.data.len()),
            ));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAiEmbeddings {
    fn provider(&self) -> &'static str {
        Self::PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
        let mut vectors = self.request(vec![text]).await?;
        vectors.pop().ok_or_else(|| {
            ProviderError::new(
                Self::PROVIDER,
                ProviderErrorKind::InvalidResponse,
                "No embedding in response",
            )
        })
    }

    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts.iter().map(String::as_str).collect()).await
    }
}

/// Ollama `/api/embeddings` client
pub struct OllamaEmbeddings {
    endpoint: String,
    model: String,
    client: Client,
}

impl OllamaEmbeddings {
    pub const PROVIDER: &'static str = "ollama";

    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            model: model.to_string(),
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl EmbeddingBackend for OllamaEmbeddings {
    fn provider(&self) -> &'static str {
        Self::PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&OllamaRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        let result: OllamaResponse = check_status(Self::PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        Ok(result.embedding)
    }

    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, ProviderError> {
        // No batch endpoint; issue requests concurrently, preserving order
        let concurrency = texts.len().clamp(1, OLLAMA_CONCURRENCY);
        let results: Vec<_> = stream::iter(texts.iter().cloned())
            .map(|text| async move { self.embed(&text).await })
            .buffered(concurrency)
            .collect()
            .await;

        results.into_iter().collect()
    }
}
