//! Application configuration file support.
//!
//! Configuration is read from a TOML file (`ratings.toml`) and then
//! overridden by environment variables:
//!
//! - `RATINGS_CSV`: path of the ratings CSV (implies the CSV source)
//! - `SOURCE_TYPE`: `csv` or `local`
//! - `HOST`, `PORT`: server bind address
//! - `ALLOWED_ORIGINS`: comma-separated CORS origins (unset = any origin)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::factory::SourceType;
use crate::db::repository::SourceError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Rating source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: String,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
            csv_path: default_csv_path(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_source_type() -> String {
    "csv".to_string()
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/full_ratings.csv")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5055
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SourceError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SourceError> {
        toml::from_str(content).map_err(|e| {
            SourceError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the first `ratings.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when none exists.
    pub fn from_default_location() -> Result<Self, SourceError> {
        let search_paths = [
            PathBuf::from("ratings.toml"),
            PathBuf::from("backend/ratings.toml"),
            PathBuf::from("../ratings.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No ratings.toml found, using defaults");
        Ok(Self::default())
    }

    /// Default-location configuration with environment overrides applied.
    pub fn load() -> Result<Self, SourceError> {
        let mut config = Self::from_default_location()?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) -> Result<(), SourceError> {
        if let Ok(source_type) = env::var("SOURCE_TYPE") {
            self.source.source_type = source_type;
        }
        if let Ok(csv) = env::var("RATINGS_CSV") {
            if !csv.trim().is_empty() {
                self.source.source_type = "csv".to_string();
                self.source.csv_path = PathBuf::from(csv.trim());
            }
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| {
                SourceError::configuration(format!("PORT must be a valid port number, got '{}'", port))
            })?;
        }
        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Parsed source type.
    pub fn source_type(&self) -> Result<SourceType, SourceError> {
        self.source
            .source_type
            .parse()
            .map_err(|e: String| SourceError::configuration(e))
    }
}
