//! Rating source backed by a precomputed ratings CSV.
//!
//! Expected columns: `GAME_DATE`, `TEAM`, `RATING`. Other columns are
//! ignored. The file is read once on first use and cached until
//! [`CsvSource::reload`] is called.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::db::payload::parse_date;
use crate::db::repository::*;
use crate::models::{RatingRecord, TeamId};

const DATE_COLUMN: &str = "GAME_DATE";
const TEAM_COLUMN: &str = "TEAM";
const RATING_COLUMN: &str = "RATING";

/// CSV-file rating source.
#[derive(Clone)]
pub struct CsvSource {
    path: PathBuf,
    cache: Arc<RwLock<Option<Arc<Vec<RatingRecord>>>>>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the CSV file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached records; the next call re-reads the file.
    pub fn reload(&self) {
        *self.cache.write() = None;
    }

    async fn records(&self) -> SourceResult<Arc<Vec<RatingRecord>>> {
        let cached = self.cache.read().clone();
        if let Some(records) = cached {
            return Ok(records);
        }

        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || load_ratings_csv(&path))
            .await
            .map_err(|e| SourceError::internal(format!("CSV load task failed: {}", e)))??;

        let records = Arc::new(records);
        *self.cache.write() = Some(Arc::clone(&records));
        Ok(records)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> SourceResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            SourceError::parse_with_context(
                format!("Column '{}' not found in ratings CSV", name),
                ErrorContext::new("load_ratings_csv").with_details(path.display().to_string()),
            )
        })
}

/// Read and parse a ratings CSV, sorted by date.
///
/// Rows with an unreadable date or empty team, or that cannot be decoded,
/// are skipped. Missing, unreadable or non-finite ratings are kept as absent
/// values.
pub fn load_ratings_csv(path: &Path) -> SourceResult<Vec<RatingRecord>> {
    if !path.exists() {
        return Err(SourceError::connection_with_context(
            format!(
                "Ratings CSV not found at {}. Place the file there or set RATINGS_CSV to an absolute path.",
                path.display()
            ),
            ErrorContext::new("load_ratings_csv"),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| SourceError::from(e).with_operation("load_ratings_csv"))?;

    let headers = reader.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN, path)?;
    let team_idx = column_index(&headers, TEAM_COLUMN, path)?;
    let rating_idx = column_index(&headers, RATING_COLUMN, path)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                return Err(SourceError::from(e).with_operation("load_ratings_csv"));
            }
            Err(e) => {
                log::debug!("Unreadable row in {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        let date = row.get(date_idx).and_then(parse_date);
        let team = row.get(team_idx).filter(|t| !t.is_empty());
        let (Some(date), Some(team)) = (date, team) else {
            skipped += 1;
            continue;
        };
        let rating = row
            .get(rating_idx)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        records.push(RatingRecord {
            date,
            team: TeamId::from(team),
            rating,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {} unreadable rows in {}", skipped, path.display());
    }
    records.sort_by_key(|r| r.date);
    log::info!("Loaded {} rating records from {}", records.len(), path.display());
    Ok(records)
}

#[async_trait]
impl RatingRecordSource for CsvSource {
    async fn health_check(&self) -> SourceResult<bool> {
        Ok(self.path.exists())
    }

    async fn list_teams(&self) -> SourceResult<Vec<TeamId>> {
        let records = self.records().await?;
        let teams: BTreeSet<TeamId> = records.iter().map(|r| r.team.clone()).collect();
        Ok(teams.into_iter().collect())
    }

    async fn fetch_records(&self, query: &RecordQuery) -> SourceResult<Vec<RatingRecord>> {
        let records = self.records().await?;
        Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
    }
}
