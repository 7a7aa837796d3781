//! CLI configuration file: transformer tunables plus logging.
//!
//! ```yaml
//! transformer:
//!   concurrency: 4
//!   parallel_threshold: 64
//! log:
//!   level: info
//!   json: true
//!   components:
//!     ddbhistory-batch: debug
//! ```

use anyhow::{Context, Result};
use ddbhistory_batch::TransformerConfig;
use ddbhistory_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub transformer: TransformerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config file '{}'", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse config file '{}'", path.display()))?;
        config.transformer.validate()?;
        Ok(config)
    }
}
