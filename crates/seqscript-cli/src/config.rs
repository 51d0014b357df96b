//! Configuration file loading for the CLI
//!
//! This module defines the TOML configuration layout and handles finding
//! and loading it from various locations (explicit path, local directory,
//! system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use seqscript_parser::ParseConfig;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How a parsed diagram is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Canonical seqscript text, one declaration per line
    #[default]
    Outline,
    /// The diagram model as pretty-printed JSON
    Json,
}

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section
    #[serde(default)]
    parser: ParseConfig,

    /// Output configuration section
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn parser(&self) -> &ParseConfig {
        &self.parser
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Output configuration section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    #[serde(default)]
    format: OutputFormat,
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (seqscript/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("seqscript/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "seqscript", "seqscript") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[parser]\nmax_block_depth = 8\n\n[output]\nformat = \"json\"\n",
        )
        .expect("Failed to write config");

        let config = load_config(Some(&path)).expect("Failed to load config");
        assert_eq!(config.parser().max_block_depth(), 8);
        assert_eq!(config.parser().source_name(), "<input>");
        assert_eq!(config.output().format(), OutputFormat::Json);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "").expect("Failed to write config");

        let config = load_config(Some(&path)).expect("Failed to load config");
        assert_eq!(config.parser(), &ParseConfig::default());
        assert_eq!(config.output().format(), OutputFormat::Outline);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).expect_err("Expected missing file error");
        assert!(matches!(err, ConfigError::MissingFile(p) if p == path));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\nformat = \"svg\"\n").expect("Failed to write config");

        let err = load_config(Some(&path)).expect_err("Expected parse error");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
