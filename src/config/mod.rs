use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::paths::{app_data_dir, config_file_in, data_file_in};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration `{}`: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Configuration `{}` is invalid: {source}", .path.display())]
    Serde {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// User settings read from `config.json` in the application directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger document; relative paths resolve against the application directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Prefix printed in front of totals.
    pub currency_label: String,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Disables colours.
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            currency_label: "Rs.".into(),
            log_level: "warn".into(),
            plain_output: false,
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: config_file_in(&base),
            base,
        }
    }

    /// Missing configuration means defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&data).map_err(|source| ConfigError::Serde {
            path: self.path.clone(),
            source,
        })
    }

    /// Resolves where the ledger document lives for `config`.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => data_file_in(&self.base),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            manager.data_file(&config),
            temp.path().join("transactions.json")
        );
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(
            manager.path(),
            r#"{"currency_label": "$", "data_file": "books/2024.json"}"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_label, "$");
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            manager.data_file(&config),
            temp.path().join("books").join("2024.json")
        );
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(manager.path(), "[1, 2").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde { .. })));
    }
}
