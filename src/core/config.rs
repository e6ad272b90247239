//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = "dronemass.yaml";

/// Database file name used when no path is configured
pub const DEFAULT_DATABASE_FILE: &str = "drone_components.db";

/// Calculator configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the component catalog / history database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Directory where report files are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/dronemass/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Local config (./dronemass.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path()) {
            config.merge(local);
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        Config {
            database: std::env::var_os("DRONEMASS_DB").map(PathBuf::from),
            report_dir: std::env::var_os("DRONEMASS_REPORT_DIR").map(PathBuf::from),
            default_format: std::env::var("DRONEMASS_FORMAT").ok(),
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dronemass")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the local config file in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.report_dir.is_some() {
            self.report_dir = other.report_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Database path, falling back to the user data directory
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.database {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "dronemass")
            .map(|dirs| dirs.data_dir().join(DEFAULT_DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
    }

    /// Report directory, defaulting to the working directory
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            database: Some(PathBuf::from("a.db")),
            report_dir: Some(PathBuf::from("reports")),
            default_format: None,
        };
        base.merge(Config {
            database: Some(PathBuf::from("b.db")),
            report_dir: None,
            default_format: Some("json".to_string()),
        });

        assert_eq!(base.database, Some(PathBuf::from("b.db")));
        assert_eq!(base.report_dir, Some(PathBuf::from("reports")));
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.report_dir(), PathBuf::from("."));
        assert!(config
            .database_path()
            .to_string_lossy()
            .ends_with(DEFAULT_DATABASE_FILE));
    }

    #[test]
    fn test_parse_yaml() {
        let config: Config =
            serde_yml::from_str("database: /tmp/x.db\ndefault_format: yaml\n").unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/x.db"));
        assert!(config.report_dir.is_none());
    }
}
