use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the recommendation engine
///
/// The retrieval pipeline itself degrades instead of failing: extraction,
/// filtering, ranking, and index search absorb their own errors and fall back.
/// What remains here is configuration and catalog plumbing plus the
/// initialization paths.
#[derive(Error, Debug)]
pub enum RecoError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(#[from] crate::embedding::EmbeddingError),

    /// Vector index errors
    #[error("Index error: {0}")]
    Index(#[from] crate::index::IndexError),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, RecoError>;
