//! Global configuration for this application.
//!
//! Settings are read from an optional `config.toml` in the platform
//! configuration directory. A missing file means default settings; command
//! line flags are applied on top of whatever the file provides.

use crate::constants::{CONFIG_NAME, PKG_NAME};
use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported compression levels.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Fastest,
    Faster,
    #[default]
    Default,
    Better,
    Best,
}

impl Level {
    /// The deflate level this setting stands for.
    pub fn deflate_level(self) -> i64 {
        match self {
            Level::Fastest => 1,
            Level::Faster => 3,
            Level::Default => 6,
            Level::Better => 7,
            Level::Best => 9,
        }
    }
}

/// Persistent user settings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Archive entries whose names start with a dot.
    pub include_hidden: bool,
    /// Compression level used when none is given on the command line.
    pub level: Option<Level>,
    /// Extra file name suffixes to leave out, e.g. `.log`.
    pub exclude_suffixes: Vec<String>,
}

impl Settings {
    /// Loads settings from the default config file, or returns the defaults
    /// if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file())
    }

    /// Loads settings from `path`, or returns the defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let toml_str = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&toml_str).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the absolute path to the configuration file.
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_NAME)
}

/// Returns the configuration directory for the application, platform-specific.
/// Falls back to the current directory when no home directory is known.
#[cfg(not(target_os = "macos"))]
fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PKG_NAME)
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(target_os = "macos")]
fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(PKG_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::tempdir;

    #[test]
    fn test_config_file() {
        let file = platform_config_dir().join("dirzip").join("config.toml");
        assert_eq!(config_file(), file);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.include_hidden);
        assert!(settings.level.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "include_hidden = true\nlevel = \"best\"\nexclude_suffixes = [\".log\", \".orig\"]\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.include_hidden);
        assert_eq!(settings.level, Some(Level::Best));
        assert_eq!(settings.exclude_suffixes, vec![".log", ".orig"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "level = \"fastest\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(!settings.include_hidden);
        assert_eq!(settings.level, Some(Level::Fastest));
        assert!(settings.exclude_suffixes.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "include_hidden = \"maybe\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::ParseConfig { .. }));
        assert!(err.to_string().contains("Error parsing config file"));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings {
            include_hidden: true,
            level: Some(Level::Better),
            exclude_suffixes: vec![".log".to_string()],
        };
        let toml_str = toml::to_string(&settings).expect("Failed to serialize to TOML");
        assert!(toml_str.contains("include_hidden = true"));
        let deserialized: Settings =
            toml::from_str(&toml_str).expect("Failed to deserialize from TOML");
        assert_eq!(deserialized, settings);
    }

    #[test]
    fn test_deflate_levels_are_ordered() {
        let levels = [
            Level::Fastest,
            Level::Faster,
            Level::Default,
            Level::Better,
            Level::Best,
        ];
        assert!(levels.windows(2).all(|w| w[0].deflate_level() < w[1].deflate_level()));
        assert_eq!(Level::default().deflate_level(), 6);
    }

    /// Returns the configuration directory for testing, platform-specific.
    fn platform_config_dir() -> PathBuf {
        if cfg!(target_os = "macos") {
            let home = env::var("HOME").unwrap();
            PathBuf::from(home).join(".config")
        } else {
            dirs::config_dir().unwrap()
        }
    }
}
