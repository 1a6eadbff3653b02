//! Configuration management for the ccks application.
//!
//! Settings live in `config.json` inside the platform data directory and can be
//! overridden from the environment (a `.env` file in the working directory is
//! loaded first by `main`). Nothing about the database location or timeouts is
//! compiled into the binary.
//!
//! ## Environment overrides
//!
//! - `CCKS_DB_PATH`: database file path
//! - `CCKS_BUSY_TIMEOUT_MS`: how long a statement waits on a locked database
//! - `CCKS_PASSWORD_COST`: bcrypt cost used when hashing new passwords
//!
//! ```rust,no_run
//! use ccks::libs::config::Config;
//!
//! let config = Config::load()?;
//! let path = config.database.resolve_path()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "ccks.db";

pub const ENV_DB_PATH: &str = "CCKS_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "CCKS_BUSY_TIMEOUT_MS";
pub const ENV_PASSWORD_COST: &str = "CCKS_PASSWORD_COST";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PASSWORD_COST: u32 = 12;
const MIN_PASSWORD_COST: u32 = 4;
const MAX_PASSWORD_COST: u32 = 31;

/// Database connection settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// Database file. Falls back to `ccks.db` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Milliseconds a statement waits for a lock held by another connection
    /// before failing with a busy error.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

/// Password hashing settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SecurityConfig {
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

fn default_busy_timeout() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

fn default_password_cost() -> u32 {
    DEFAULT_PASSWORD_COST
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }
}

impl DatabaseConfig {
    /// Database settings pointing at an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        DatabaseConfig {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Ok(path.clone())
            }
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }
}

impl SecurityConfig {
    /// Cost clamped to the range bcrypt accepts.
    pub fn effective_cost(&self) -> u32 {
        self.password_cost.clamp(MIN_PASSWORD_COST, MAX_PASSWORD_COST)
    }
}

impl Config {
    /// Reads `config.json`, returning defaults when the file does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Reads the stored configuration and applies environment overrides.
    pub fn load() -> Result<Config> {
        Self::read()?.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies overrides from `lookup`, usually the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.database.busy_timeout_ms = parse_override(ENV_BUSY_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_PASSWORD_COST) {
            self.security.password_cost = parse_override(ENV_PASSWORD_COST, &value)?;
        }
        Ok(self)
    }

    /// Interactive setup wizard used by `ccks init`.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        msg_print!(Message::ConfigModuleDatabase);
        let current_path = match &config.database.path {
            Some(path) => path.display().to_string(),
            None => DataStorage::new().base_path().join(DB_FILE_NAME).display().to_string(),
        };
        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptDatabasePath.to_string())
            .default(current_path)
            .interact_text()?;
        config.database.path = Some(PathBuf::from(path));

        config.database.busy_timeout_ms = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptBusyTimeout.to_string())
            .default(config.database.busy_timeout_ms)
            .interact_text()?;

        config.security.password_cost = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPasswordCost.to_string())
            .default(config.security.password_cost)
            .validate_with(|cost: &u32| {
                if (MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(cost) {
                    Ok(())
                } else {
                    Err(Message::PasswordCostRange.to_string())
                }
            })
            .interact_text()?;

        Ok(config)
    }

    /// Removes `config.json`. Missing files are not an error.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }
}

fn parse_override<T: FromStr>(key: &str, value: &str) -> Result<T> {
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(_) => msg_bail_anyhow!(Message::InvalidEnvOverride(key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_stored_values() {
        let config = Config::default()
            .with_overrides(lookup(&[
                (ENV_DB_PATH, "/tmp/ccks-test.db"),
                (ENV_BUSY_TIMEOUT_MS, "250"),
                (ENV_PASSWORD_COST, "4"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/ccks-test.db")));
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.security.password_cost, 4);
    }

    #[test]
    fn missing_overrides_keep_defaults() {
        let config = Config::default().with_overrides(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_override_is_rejected() {
        let result = Config::default().with_overrides(lookup(&[(ENV_BUSY_TIMEOUT_MS, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn password_cost_is_clamped() {
        let security = SecurityConfig { password_cost: 1 };
        assert_eq!(security.effective_cost(), 4);
        let security = SecurityConfig { password_cost: 99 };
        assert_eq!(security.effective_cost(), 31);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"database":{"path":"x.db"}}"#).unwrap();
        assert_eq!(config.database.path, Some(PathBuf::from("x.db")));
        assert_eq!(config.database.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.security.password_cost, DEFAULT_PASSWORD_COST);
    }
}
