//! Rating source factory for dependency injection.
//!
//! Builds the configured `Arc<dyn RatingRecordSource>` that callers pass
//! into the HTTP state and chart sessions.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::{CsvSource, LocalSource};
use super::repository::{RatingRecordSource, SourceResult};
use crate::config::{AppConfig, SourceSettings};

/// Rating source type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Precomputed ratings CSV
    Csv,
    /// In-memory local source
    Local,
}

impl FromStr for SourceType {
    type Err = String;

    /// Parse source type from string ("csv", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "file" => Ok(Self::Csv),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

/// Factory for rating source instances.
///
/// # Example
/// ```ignore
/// use ratings_trends::config::AppConfig;
/// use ratings_trends::db::SourceFactory;
///
/// let config = AppConfig::load()?;
/// let source = SourceFactory::from_config(&config)?;
/// ```
pub struct SourceFactory;

impl SourceFactory {
    /// Create a source instance based on type and settings.
    pub fn create(
        source_type: SourceType,
        settings: &SourceSettings,
    ) -> Arc<dyn RatingRecordSource> {
        match source_type {
            SourceType::Csv => Self::create_csv(&settings.csv_path),
            SourceType::Local => Self::create_local(),
        }
    }

    pub fn create_csv(path: &Path) -> Arc<dyn RatingRecordSource> {
        log::info!("Using CSV rating source at {}", path.display());
        Arc::new(CsvSource::new(path))
    }

    /// Create an empty in-memory source.
    pub fn create_local() -> Arc<dyn RatingRecordSource> {
        log::info!("Using in-memory rating source");
        Arc::new(LocalSource::new())
    }

    /// Create the source described by an [`AppConfig`].
    pub fn from_config(config: &AppConfig) -> SourceResult<Arc<dyn RatingRecordSource>> {
        let source_type = config.source_type()?;
        Ok(Self::create(source_type, &config.source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_from_str() {
        assert_eq!("csv".parse::<SourceType>().unwrap(), SourceType::Csv);
        assert_eq!("CSV".parse::<SourceType>().unwrap(), SourceType::Csv);
        assert_eq!("local".parse::<SourceType>().unwrap(), SourceType::Local);
        assert!("postgres".parse::<SourceType>().is_err());
    }

    #[tokio::test]
    async fn test_create_local_is_healthy() {
        let source = SourceFactory::create_local();
        assert!(source.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_from_config_csv_missing_file_unhealthy() {
        let mut config = AppConfig::default();
        config.source.csv_path = "/no/such/ratings.csv".into();
        let source = SourceFactory::from_config(&config).unwrap();
        assert!(!source.health_check().await.unwrap());
    }
}
