//! Error types for the seqscript CLI.

use std::io;

use thiserror::Error;

use seqscript_parser::error::ParseError;

use crate::config::ConfigError;

/// Everything that can stop a CLI run.
///
/// The `Parse` variant keeps the source text so the diagnostic can be
/// rendered with a snippet.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
