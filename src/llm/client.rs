//! Chat completion clients

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatBackend;
use super::ChatMessage;
use super::GenerationParams;
use crate::embeddings::client::build_http_client;
use crate::embeddings::client::check_status;
use crate::embeddings::client::trim_endpoint;
use crate::errors::ProviderError;
use crate::errors::ProviderErrorKind;
use crate::Result;

/// OpenAI-compatible `/chat/completions` client
pub struct OpenAiChat {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl OpenAiChat {
    pub const PROVIDER: &'static str = "openai";

    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            api_key: api_key.to_string(),
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChat {
    fn provider(&self) -> &'static str {
        Self::PROVIDER
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> std::result::Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::new(
                Self::PROVIDER,
                ProviderErrorKind::MissingCredentials,
                "OpenAI API key not provided (set llm.api_key or OPENAI_API_KEY)",
            ));
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} (model {})", url, params.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &params.model,
                messages,
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        let result: ChatResponse = check_status(Self::PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::new(
                    Self::PROVIDER,
                    ProviderErrorKind::InvalidResponse,
                    "No completion in response",
                )
            })
    }
}

/// Ollama `/api/chat` client, non-streaming
pub struct OllamaChat {
    endpoint: String,
    client: Client,
}

impl OllamaChat {
    pub const PROVIDER: &'static str = "ollama";

    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: trim_endpoint(endpoint),
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl ChatBackend for OllamaChat {
    fn provider(&self) -> &'static str {
        Self::PROVIDER
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> std::result::Result<String, ProviderError> {
        #[derive(Serialize)]
        struct OllamaOptions {
            temperature: f32,
            num_predict: usize,
        }

        #[derive(Serialize)]
        struct OllamaChatRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaChatResponse {
            message: OllamaMessage,
        }

        #[derive(Deserialize)]
        struct OllamaMessage {
            content: String,
        }

        let url = format!("{}/api/chat", self.endpoint);
        debug!("Calling Ollama chat API: {} (model {})", url, params.model);

        let response = self
            .client
            .post(&url)
            .json(&OllamaChatRequest {
                model: &params.model,
                messages,
                stream: false,
                options: OllamaOptions {
                    temperature: params.temperature,
                    num_predict: params.max_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        let result: OllamaChatResponse = check_status(Self::PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;

        Ok(result.message.content)
    }
}
