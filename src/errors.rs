use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagfantError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Data not found at {}: {hint}", path.display())]
    DataNotFound { path: PathBuf, hint: String },

    #[error("Index mismatch: {vectors} vectors vs {records} metadata records ({detail})")]
    IndexMismatch {
        vectors: usize,
        records: usize,
        detail: String,
    },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sleeper API error: {0}")]
    Sleeper(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagfantError {
    /// Errors that indicate a corrupted build and must stop the process
    /// instead of being reported per request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IndexMismatch { .. })
    }

    pub fn data_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DataNotFound {
            path: path.into(),
            hint: "index artifacts are missing, run `ragfant index build` first".to_string(),
        }
    }
}

/// What went wrong while talking to an embedding or text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Timeout,
    Transport,
    Status(u16),
    Auth,
    InvalidResponse,
    MissingCredentials,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
            Self::Status(code) => write!(f, "status {code}"),
            Self::Auth => write!(f, "authentication"),
            Self::InvalidResponse => write!(f, "invalid response"),
            Self::MissingCredentials => write!(f, "missing credentials"),
        }
    }
}

#[derive(Error, Debug, Clone)]
#[error("{provider} {kind}: {message}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: &'static str, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    /// Classify a reqwest failure.
    pub fn from_reqwest(provider: &'static str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else if err.is_decode() {
            ProviderErrorKind::InvalidResponse
        } else if let Some(status) = err.status() {
            ProviderErrorKind::from_status(status.as_u16())
        } else {
            ProviderErrorKind::Transport
        };
        Self::new(provider, kind, err.to_string())
    }

    /// Timeouts, connection failures, rate limits and server errors are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            ProviderErrorKind::Timeout | ProviderErrorKind::Transport => true,
            ProviderErrorKind::Status(code) => code == 429 || (500..600).contains(&code),
            ProviderErrorKind::Auth
            | ProviderErrorKind::InvalidResponse
            | ProviderErrorKind::MissingCredentials => false,
        }
    }
}

impl ProviderErrorKind {
    pub fn from_status(code: u16) -> Self {
        match code {
            401 | 403 => Self::Auth,
            _ => Self::Status(code),
        }
    }
}

pub type Result<T> = std::result::Result<T, RagfantError>;
