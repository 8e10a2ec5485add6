//! Error types and handling for the capability engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the capability engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Discovery errors (schema retrieval, probing)
    #[error("Discovery error: {message}")]
    Discovery { message: String },

    /// Action resolution errors
    #[error("Resolution error: {message}")]
    Resolution { message: String },

    /// Request execution errors
    #[error("Execution error: {provider}: {message}")]
    Execution { provider: String, message: String },

    /// Transport errors (the connection broker itself is unreachable)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a discovery error
    pub fn discovery<S: Into<String>>(message: S) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Create a resolution error
    pub fn resolution<S: Into<String>>(message: S) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution<S: Into<String>>(provider: S, message: S) -> Self {
        Self::Execution {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a transport timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: format!("Timeout: {}", message.into()),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this error means the broker subsystem itself is down.
    /// Transport failures are the only class allowed to escape `invoke`;
    /// everything API-semantic is converted to advisory text instead.
    pub fn is_transport(&self) -> bool {
        matches!(self, EngineError::Transport { .. } | EngineError::Http(_))
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::Config { .. } => "config",
            EngineError::Discovery { .. } => "discovery",
            EngineError::Resolution { .. } => "resolution",
            EngineError::Execution { .. } => "execution",
            EngineError::Transport { .. } => "transport",
            EngineError::Validation { .. } => "validation",
            EngineError::Io(_) => "io",
            EngineError::Serde(_) => "serialization",
            EngineError::Yaml(_) => "yaml",
            EngineError::Http(_) => "http",
            EngineError::Internal(_) => "internal",
        }
    }
}
