//! Configuration management
//!
//! TOML-backed configuration with environment overrides and validation.

use crate::error::{RecoError, Result};
use crate::index::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub storage: StorageConfig,
}

/// Request-cycle tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default number of results per request
    pub top_k: usize,
    /// The index is queried for search_multiplier * top_k candidates so the
    /// filter has room to narrow
    pub search_multiplier: usize,
    /// Minimum similarity for index candidates, in [0, 1]
    pub similarity_threshold: f32,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g. "all-MiniLM-L6-v2")
    pub model: String,
    /// Embedding dimension (384 for MiniLM)
    pub dimension: usize,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Preferred backend; the other one is used if this fails to initialize
    pub backend: BackendKind,
    pub hnsw_ef_construction: usize,
    pub hnsw_m: usize,
    pub hnsw_ef_search: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for session history files
    pub data_dir: PathBuf,
    /// Catalog JSON file; the built-in sample is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecoError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RecoError::Io {
            source: e,
            context: format!("Failed to read config file: {}", path.display()),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load from the given path, or defaults when no file exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::load(&default)
                } else {
                    let mut config = Config::default();
                    config.apply_env_overrides();
                    config.validate()?;
                    Ok(config)
                }
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RecoError::Io {
                source: e,
                context: format!("Failed to create config directory: {}", parent.display()),
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| RecoError::Io {
            source: e,
            context: format!("Failed to write config file: {}", path.display()),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides in the form RECO_SECTION__KEY
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("RECO_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "ENGINE__TOP_K" => {
                self.engine.top_k = value.parse().map_err(|_| RecoError::InvalidConfigValue {
                    path: path.to_string(),
                    message: format!("Cannot parse '{}' as integer", value),
                })?;
            }
            "ENGINE__SIMILARITY_THRESHOLD" => {
                self.engine.similarity_threshold =
                    value.parse().map_err(|_| RecoError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as number", value),
                    })?;
            }
            "EMBEDDING__MODEL" => {
                self.embedding.model = value.to_string();
            }
            "INDEX__BACKEND" => {
                self.index.backend = match value.to_lowercase().as_str() {
                    "flat" => BackendKind::Flat,
                    "hnsw" => BackendKind::Hnsw,
                    other => {
                        return Err(RecoError::InvalidConfigValue {
                            path: path.to_string(),
                            message: format!("Unknown backend '{}'", other),
                        });
                    }
                };
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Validate configured values
    pub fn validate(&self) -> Result<()> {
        if self.engine.top_k == 0 {
            return Err(RecoError::InvalidConfigValue {
                path: "engine.top_k".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.engine.search_multiplier == 0 {
            return Err(RecoError::InvalidConfigValue {
                path: "engine.search_multiplier".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.engine.similarity_threshold) {
            return Err(RecoError::InvalidConfigValue {
                path: "engine.similarity_threshold".to_string(),
                message: format!(
                    "{} is outside [0, 1]",
                    self.engine.similarity_threshold
                ),
            });
        }
        if self.embedding.dimension == 0 {
            return Err(RecoError::InvalidConfigValue {
                path: "embedding.dimension".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        if self.index.hnsw_m == 0 || self.index.hnsw_ef_construction == 0 {
            return Err(RecoError::InvalidConfigValue {
                path: "index".to_string(),
                message: "hnsw parameters must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RecoError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("reco").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reco");

        Self {
            engine: EngineConfig {
                top_k: 5,
                search_multiplier: 2,
                similarity_threshold: 0.3,
            },
            embedding: EmbeddingConfig {
                model: "all-MiniLM-L6-v2".to_string(),
                dimension: 384,
            },
            index: IndexConfig {
                backend: BackendKind::Flat,
                hnsw_ef_construction: 200,
                hnsw_m: 16,
                hnsw_ef_search: 50,
            },
            storage: StorageConfig {
                data_dir,
                catalog_file: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.engine.top_k, config.engine.top_k);
        assert_eq!(loaded.index.backend, BackendKind::Flat);
        assert_eq!(loaded.embedding.model, "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(RecoError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = Config::default();
        config.engine.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = Config::default();
        config.engine.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_env_override() {
        let mut config = Config::default();
        config.set_value_from_env("INDEX__BACKEND", "hnsw").unwrap();
        assert_eq!(config.index.backend, BackendKind::Hnsw);

        assert!(config.set_value_from_env("INDEX__BACKEND", "faiss").is_err());
    }
}
