//! Parser configuration.
//!
//! Controls the label used for the input in diagnostics and how deeply
//! blocks may nest.

use serde::Deserialize;

/// Parser configuration, usually read from the `[parser]` section of the
/// CLI configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Label used for the input in error messages
    source_name: String,

    /// Deepest block nesting accepted before parsing fails
    max_block_depth: usize,
}

impl ParseConfig {
    /// Default nesting limit for `alt`/`par`/`opt`/`loop`/`concurrent` blocks.
    pub const DEFAULT_MAX_BLOCK_DEPTH: usize = 64;

    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    pub fn with_max_block_depth(mut self, max_block_depth: usize) -> Self {
        self.max_block_depth = max_block_depth;
        self
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn max_block_depth(&self) -> usize {
        self.max_block_depth
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            source_name: "<input>".to_string(),
            max_block_depth: Self::DEFAULT_MAX_BLOCK_DEPTH,
        }
    }
}
