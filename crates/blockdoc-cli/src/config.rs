//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! default_taxonomy: v3
//! root: any
//! max_depth: 64
//! ```
//!
//! Every key is optional. Command-line flags override the file; built-in
//! defaults apply to anything neither sets.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use blockdoc_core::{TaxonomyVersion, ANY_UNION};
use blockdoc_schema::DEFAULT_MAX_DEPTH;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Taxonomy used when neither the input nor `--taxonomy` names one.
    pub default_taxonomy: TaxonomyVersion,
    /// Root schema name used when `--root` is absent.
    pub root: String,
    /// Nesting bound used when `--max-depth` is absent.
    pub max_depth: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_taxonomy: TaxonomyVersion::LATEST,
            root: ANY_UNION.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CliConfig {
    /// Read the configuration file, or return the defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            taxonomy = %config.default_taxonomy,
            root = %config.root,
            max_depth = config.max_depth,
            "loaded configuration"
        );
        Ok(config)
    }
}
