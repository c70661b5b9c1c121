//! Configuration file loading for analysis runs.
//!
//! Settings live in `analysis.toml`; every field has a default so a missing
//! or partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uci::GoOptions;

use crate::session::SessionOptions;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How to launch and talk to the analysis engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Path to the engine executable.
    /// Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub path: String,
    /// Extra command-line arguments for the engine.
    #[serde(default)]
    pub args: Vec<String>,
    /// Search threads, sent as `setoption name Threads`.
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Per-step handshake bound in milliseconds.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: Option<u64>,
    /// Bound on every other reply in milliseconds. Unset waits forever.
    #[serde(default)]
    pub wait_timeout_ms: Option<u64>,
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_threads() -> u32 {
    5
}

fn default_handshake_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            args: Vec::new(),
            threads: default_threads(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            wait_timeout_ms: None,
        }
    }
}

/// Top-level analysis configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Search depth per position. Defaults to 15.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Fixed search time per position; used instead of `depth` when set.
    #[serde(default)]
    pub movetime_ms: Option<u64>,
    /// Extra JSON opening book merged over the built-in one.
    #[serde(default)]
    pub book_path: Option<PathBuf>,
}

fn default_depth() -> u32 {
    15
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            depth: default_depth(),
            movetime_ms: None,
            book_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Default configuration file name.
    pub const FILE_NAME: &'static str = "analysis.toml";

    /// Loads configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Session settings derived from the engine section.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            threads: self.engine.threads,
            handshake_timeout: self.engine.handshake_timeout_ms.map(Duration::from_millis),
            wait_timeout: self.engine.wait_timeout_ms.map(Duration::from_millis),
        }
    }

    /// The `go` parameters for each position.
    pub fn go_options(&self) -> GoOptions {
        match self.movetime_ms {
            Some(ms) => GoOptions::movetime(ms),
            None => GoOptions::depth(self.depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.engine.path, "stockfish");
        assert_eq!(config.engine.threads, 5);
        assert_eq!(config.depth, 15);
        assert_eq!(config.go_options(), GoOptions::depth(15));
        assert_eq!(
            config.session_options().handshake_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.session_options().wait_timeout, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            movetime_ms = 250

            [engine]
            path = "/usr/local/bin/stockfish"
            threads = 2
            wait_timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.path, "/usr/local/bin/stockfish");
        assert_eq!(config.engine.threads, 2);
        assert_eq!(config.depth, 15);
        assert_eq!(config.go_options(), GoOptions::movetime(250));
        assert_eq!(
            config.session_options().wait_timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load(dir.path().join(AnalysisConfig::FILE_NAME)).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AnalysisConfig::FILE_NAME);
        std::fs::write(&path, "depth = \"deep\"").unwrap();
        assert!(matches!(
            AnalysisConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
