use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::RagfantError;
use crate::Result;

/// Environment variable prefix for configuration overrides, e.g. `RAGFANT__LLM__MODEL`.
pub const ENV_PREFIX: &str = "RAGFANT";

/// Conventional key variable used when no key is configured explicitly.
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Backend family for embeddings and chat completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible HTTP API
    OpenAi,
    /// Ollama local model server
    Ollama,
}

impl ProviderKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_true")]
    pub file_output: bool,
}

fn default_log_dir() -> String {
    "logs".to_string()
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    pub dimension: usize,
    /// Number of query embeddings kept in memory, 0 disables the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "gpt-4".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub data_dir: String,
    pub index_file: String,
    pub metadata_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub overfetch_min: usize,
    pub position_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
    pub seasons: Vec<String>,
    pub current_season: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
    pub sleeper: SleeperConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file layered over defaults and environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RagfantError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file {} not found", path.display()),
            )));
        }
        Self::build(Some(path))
    }

    /// Load configuration from default config file path
    pub fn load() -> Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::build(Some(Path::new("config.toml")))
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::build(Some(Path::new("config.example.toml")))
        } else {
            tracing::warn!("No config file found, using defaults and environment overrides");
            Self::build(None)
        }
    }

    /// Load from an explicit path when given, otherwise from the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    fn build(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_key_fallback(std::env::var(OPENAI_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fill empty API keys from the conventional environment variable
    pub fn apply_key_fallback(&mut self, key: Option<String>) {
        let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
            return;
        };
        if self.llm.api_key.is_empty() {
            self.llm.api_key.clone_from(&key);
        }
        if self.embeddings.api_key.is_empty() {
            self.embeddings.api_key = key;
        }
    }

    /// Reject configurations that can never work at runtime
    pub fn validate(&self) -> Result<()> {
        for (name, endpoint) in [
            ("embeddings.endpoint", &self.embeddings.endpoint),
            ("llm.endpoint", &self.llm.endpoint),
            ("sleeper.base_url", &self.sleeper.base_url),
        ] {
            url::Url::parse(endpoint)
                .map_err(|e| RagfantError::Config(format!("{name} '{endpoint}' is invalid: {e}")))?;
        }
        if self.embeddings.dimension == 0 {
            return Err(RagfantError::Config(
                "embeddings.dimension must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(RagfantError::Config(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.http.max_attempts == 0 {
            return Err(RagfantError::Config(
                "http.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(RagfantError::Config(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the serialized vector index
    pub fn index_path(&self) -> PathBuf {
        Path::new(&self.index.data_dir).join(&self.index.index_file)
    }

    /// Path of the metadata records aligned with the index
    pub fn metadata_path(&self) -> PathBuf {
        Path::new(&self.index.data_dir).join(&self.index.metadata_file)
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Per-call timeout for outbound HTTP requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Copy with secrets masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.llm.api_key = redact(&copy.llm.api_key);
        copy.embeddings.api_key = redact(&copy.embeddings.api_key);
        copy
    }
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{prefix}****")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                log_dir: default_log_dir(),
                file_output: true,
            },
            embeddings: EmbeddingsConfig {
                provider: ProviderKind::OpenAi,
                endpoint: "https://api.openai.com/v1".to_string(),
                model: "text-embedding-ada-002".to_string(),
                api_key: String::new(),
                dimension: 1536,
                cache_capacity: default_cache_capacity(),
            },
            llm: LlmConfig {
                provider: ProviderKind::OpenAi,
                endpoint: "https://api.openai.com/v1".to_string(),
                model: default_llm_model(),
                api_key: String::new(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            index: IndexConfig {
                data_dir: "data".to_string(),
                index_file: "fantasy_index.json".to_string(),
                metadata_file: "fantasy_metadata.json".to_string(),
            },
            retrieval: RetrievalConfig {
                top_k: 5,
                overfetch_min: 100,
                position_cap: 5,
            },
            http: HttpConfig {
                timeout_secs: 30,
                max_attempts: 3,
                backoff_base_ms: 500,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
                enable_cors: false,
            },
            sleeper: SleeperConfig {
                base_url: "https://api.sleeper.app/v1".to_string(),
                seasons: vec!["2023".to_string(), "2024".to_string(), "2025".to_string()],
                current_season: "2025".to_string(),
            },
        }
    }
}
