use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use score_store::DEFAULT_FILE_NAME;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "data";

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{raw}': {source}")]
    InvalidPort { raw: String, source: ParseIntError },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort {
                    raw: raw.clone(),
                    source,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: lookup("HIGH_SCORES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            file_name: lookup("HIGH_SCORES_FILE").unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}
