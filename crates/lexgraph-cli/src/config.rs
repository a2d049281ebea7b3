//! # Configuration
//!
//! One YAML file, passed with the global `--config` flag, configures the
//! builder, the engine and the annotation deadline:
//!
//! ```yaml
//! build:
//!   permissive_collections: false
//! annotate:
//!   article_policy: amended_by   # or: implicit
//! deadline_ms: 30000
//! ```
//!
//! Every key is optional. Without `--config` all defaults apply.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lexgraph_build::BuildOptions;
use lexgraph_engine::{AnnotateOptions, Deadline};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexgraphConfig {
    /// Graph builder options.
    pub build: BuildOptions,
    /// Effectiveness engine options.
    pub annotate: AnnotateOptions,
    /// Budget for build plus annotation, in milliseconds. No limit if absent.
    pub deadline_ms: Option<u64>,
}

impl LexgraphConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Parse YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// A deadline starting now, if one is configured.
    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline_ms.map(Deadline::after_millis)
    }
}
