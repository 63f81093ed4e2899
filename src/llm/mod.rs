//! Text generation over chat-completion backends

pub mod client;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
pub use client::OllamaChat;
pub use client::OpenAiChat;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::config::LlmConfig;
use crate::config::ProviderKind;
use crate::errors::ProviderError;
use crate::retry::RetryPolicy;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl From<&LlmConfig> for GenerationParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A chat-completion endpoint
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> std::result::Result<String, ProviderError>;
}

/// Chat backend plus default parameters and retry policy
pub struct LlmService {
    backend: Arc<dyn ChatBackend>,
    defaults: GenerationParams,
    policy: RetryPolicy,
}

impl LlmService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let backend: Arc<dyn ChatBackend> = match config.llm.provider {
            ProviderKind::OpenAi => Arc::new(OpenAiChat::new(
                config.llm_endpoint(),
                &config.llm.api_key,
                timeout,
            )?),
            ProviderKind::Ollama => Arc::new(OllamaChat::new(config.llm_endpoint(), timeout)?),
        };
        info!(
            "LLM service: provider={} model={}",
            backend.provider(),
            config.llm_model()
        );
        Ok(Self::with_backend(
            backend,
            GenerationParams::from(&config.llm),
            RetryPolicy::from(&config.http),
        ))
    }

    pub fn with_backend(
        backend: Arc<dyn ChatBackend>,
        defaults: GenerationParams,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            defaults,
            policy,
        }
    }

    pub fn defaults(&self) -> &GenerationParams {
        &self.defaults
    }

    /// Complete with the configured model and sampling parameters
    pub async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        self.generate_with_params(messages, &self.defaults).await
    }

    /// Complete with explicit parameters. The completion text is returned as sent.
    pub async fn generate_with_params(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String> {
        let backend = &self.backend;
        let answer = self
            .policy
            .run(backend.provider(), || backend.complete(messages, params))
            .await?;
        Ok(answer)
    }
}
