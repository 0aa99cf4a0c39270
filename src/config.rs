use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000/api/monitor";

/// Immutable session configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write default config file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads the config file, creating it with defaults when absent.
    /// Any failure degrades to the built-in default endpoint; startup
    /// never fails on configuration.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        match Self::try_load(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = %err, "using the default endpoint");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, writing default");
            fs::write(path, Self::example_ini()).map_err(|source| ConfigError::Write {
                path: path.display().to_string(),
                source,
            })?;
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// `key=value` lines; the only recognized key is `ServerUrl`.
    /// Anything unparseable is skipped, keeping the default.
    fn parse(text: &str) -> Self {
        let mut cfg = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() == "ServerUrl" && !value.trim().is_empty() {
                cfg.server_url = value.trim().to_string();
            }
        }
        cfg
    }

    pub fn example_ini() -> &'static str {
        include_str!("../config.ini.example")
    }
}
