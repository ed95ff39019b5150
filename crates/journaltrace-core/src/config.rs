//! Configuration management.
//!
//! Configuration is stored in TOML format in a platform-appropriate
//! location and is entirely optional: every field has a default matching
//! the primary pipeline.
//!
//! ## Example Configuration File (journaltrace.toml)
//!
//! ```toml
//! [scan]
//! fast_mode = false
//! volumes = ["C", "D"]
//!
//! [export]
//! directory = "D:\\traces"
//!
//! [general]
//! log_level = "info"
//! ```

use crate::error::{Result, ScanError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub export: ExportConfig,
    pub general: GeneralConfig,
}

/// Scan behavior options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Skip path resolution and attribute decoding for a faster pass.
    pub fast_mode: bool,

    /// Drive letters to scan (empty = all NTFS volumes).
    pub volumes: Vec<char>,
}

/// Export options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for relative export paths (None = working directory).
    pub directory: Option<PathBuf>,
}

/// General options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents).map_err(|err| ScanError::Config {
            reason: err.to_string(),
        })?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// The default configuration file location for this platform.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "journaltrace")
            .map(|dirs| dirs.config_dir().join("journaltrace.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.scan.fast_mode);
        assert!(config.scan.volumes.is_empty());
        assert!(config.export.directory.is_none());
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journaltrace.toml");
        std::fs::write(
            &path,
            "[scan]\nfast_mode = true\nvolumes = [\"C\"]\n\n[general]\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.scan.fast_mode);
        assert_eq!(config.scan.volumes, vec!['C']);
        assert_eq!(config.general.log_level, "debug");
        // Untouched sections keep their defaults
        assert!(config.export.directory.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[scan\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ScanError::Config { .. }));
    }
}
