//! Batch transformer configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a transformer configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Tunables for `BatchTransformer`. Every field has a default, so an empty
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Number of Rayon workers (0 = use the global pool)
    #[serde(default)]
    pub concurrency: usize,
    /// Batches smaller than this are decoded on the calling thread
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Max records per parallel pass (memory safety)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Log one sample `Ok` and one sample failed record per batch
    #[serde(default = "bool_true")]
    pub log_samples: bool,
}

fn default_parallel_threshold() -> usize { 64 }
fn default_chunk_size() -> usize { 10_000 }
fn bool_true() -> bool { true }

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            concurrency: 0,
            parallel_threshold: default_parallel_threshold(),
            chunk_size: default_chunk_size(),
            log_samples: true,
        }
    }
}

impl TransformerConfig {
    /// Decode every batch on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn parallel_threshold(mut self, n: usize) -> Self {
        self.parallel_threshold = n;
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                reason: "chunk_size must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = TransformerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, TransformerConfig::default());
        assert_eq!(cfg.chunk_size, 10_000);
        assert!(cfg.log_samples);
    }

    #[test]
    fn partial_document_overrides() {
        let cfg = TransformerConfig::from_yaml_str("concurrency: 4\nlog_samples: false\n").unwrap();
        assert_eq!(cfg.concurrency, 4);
        assert!(!cfg.log_samples);
        assert_eq!(cfg.parallel_threshold, 64);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = TransformerConfig::from_yaml_str("chunk_size: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TransformerConfig::load(Path::new("/nonexistent/ddbhistory.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ddbhistory.yaml"));
    }
}
