//! Runtime configuration.
//!
//! Precedence (highest to lowest): CLI flags > env vars > defaults.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_DATA_DIR: &str = "SPRINT_CAPACITY_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "SPRINT_CAPACITY_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the roster and sprint records.
    pub data_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment, then the given flags.
    pub fn resolve(data_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        let mut config = Config::default();
        config.apply_env_with(|key| env::var(key).ok());
        if let Some(data_dir) = data_dir {
            config.data_dir = data_dir;
        }
        if let Some(log_level) = log_level {
            config.log_level = log_level;
        }
        config
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = val;
        }
    }
}
