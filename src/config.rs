//! Startup configuration.
//!
//! The dashboard has a single runtime input: where the launch records live.

use std::path::PathBuf;

/// Environment variable naming the dataset file.
pub const DATA_PATH_ENV: &str = "LAUNCH_DASH_DATA";

/// Dataset file used when the environment does not name one.
pub const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// Resolved startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Launch records file (`.csv`, `.json` or `.parquet`).
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl Config {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(DATA_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => Self {
                data_path: PathBuf::from(path),
            },
            None => Self::default(),
        }
    }
}
