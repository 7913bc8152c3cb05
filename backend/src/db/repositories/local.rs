//! In-memory rating source.
//!
//! Holds records in a `Vec` behind a lock; suitable for unit tests and local
//! development where isolation and determinism matter more than persistence.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{RatingRecord, TeamId};

/// In-memory local rating source.
///
/// # Example
/// ```
/// use ratings_trends::db::repositories::LocalSource;
/// use ratings_trends::db::repository::RatingRecordSource;
///
/// # tokio_test_block(async {
/// let source = LocalSource::new();
/// source.add_record("2021-10-19", "Boston Celtics", 1500.0);
/// assert_eq!(source.list_teams().await.unwrap().len(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone, Default)]
pub struct LocalSource {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    records: Vec<RatingRecord>,
    // Simulated outage, for exercising degraded paths
    unavailable: bool,
}

impl LocalSource {
    /// Create a new empty local source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-populated with records.
    pub fn with_records(records: Vec<RatingRecord>) -> Self {
        let source = Self::new();
        source.data.write().records = records;
        source
    }

    /// Create a source from a series payload (`{"data": [...]}` or a bare
    /// array), as served by the series endpoint or an upstream producer.
    pub fn from_series_payload(raw: &str) -> SourceResult<Self> {
        let records = crate::db::payload::parse_series_payload(raw)?;
        log::debug!("Loaded {} records from series payload", records.len());
        Ok(Self::with_records(records))
    }

    /// Add a single record. Dates that do not parse as `YYYY-MM-DD` are ignored.
    pub fn add_record(&self, date: &str, team: &str, rating: f64) {
        match crate::db::payload::parse_date(date) {
            Some(date) => self.data.write().records.push(RatingRecord {
                date,
                team: TeamId::from(team),
                rating: Some(rating).filter(|r| r.is_finite()),
            }),
            None => log::warn!("Ignoring local record with unreadable date '{}'", date),
        }
    }

    pub fn add_records(&self, records: impl IntoIterator<Item = RatingRecord>) {
        self.data.write().records.extend(records);
    }

    /// Make every subsequent call fail (or succeed again) as if the backing
    /// store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.data.write().unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.data.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self, operation: &str) -> SourceResult<()> {
        if self.data.read().unavailable {
            return Err(SourceError::connection_with_context(
                "local source is unavailable",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RatingRecordSource for LocalSource {
    async fn health_check(&self) -> SourceResult<bool> {
        Ok(!self.data.read().unavailable)
    }

    async fn list_teams(&self) -> SourceResult<Vec<TeamId>> {
        self.ensure_available("list_teams")?;
        let teams: BTreeSet<TeamId> = self
            .data
            .read()
            .records
            .iter()
            .map(|r| r.team.clone())
            .collect();
        Ok(teams.into_iter().collect())
    }

    async fn fetch_records(&self, query: &RecordQuery) -> SourceResult<Vec<RatingRecord>> {
        self.ensure_available("fetch_records")?;
        let mut records: Vec<RatingRecord> = self
            .data
            .read()
            .records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateBounds;
    use chrono::NaiveDate;

    fn sample() -> LocalSource {
        let source = LocalSource::new();
        source.add_record("2022-12-01", "Boston Celtics", 1530.0);
        source.add_record("2021-10-19", "Boston Celtics", 1500.0);
        source.add_record("2022-04-10", "Los Angeles Lakers", 1512.0);
        source
    }

    #[tokio::test]
    async fn test_from_series_payload() {
        let raw = r#"{"data": [
            {"date": "2021-10-19", "team": "Boston Celtics", "rating": 1500.0},
            {"date": "2021-10-20", "team": "Phoenix Suns", "rating": NaN}
        ], "total": 2}"#;
        let source = LocalSource::from_series_payload(raw).unwrap();
        assert_eq!(source.len(), 2);

        let records = source
            .fetch_records(&RecordQuery::for_teams([TeamId::from("Phoenix Suns")]))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rating, None);

        assert!(LocalSource::from_series_payload("<html>").is_err());
    }

    #[tokio::test]
    async fn test_list_teams_sorted_unique() {
        let teams = sample().list_teams().await.unwrap();
        assert_eq!(
            teams,
            vec![TeamId::from("Boston Celtics"), TeamId::from("Los Angeles Lakers")]
        );
    }

    #[tokio::test]
    async fn test_fetch_records_sorted_and_filtered() {
        let source = sample();
        let records = source
            .fetch_records(&RecordQuery::for_teams(["Boston Celtics"]))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].date < records[1].date);

        let bounded = RecordQuery::default().with_bounds(DateBounds {
            start: NaiveDate::from_ymd_opt(2022, 1, 1),
            end: None,
        });
        assert_eq!(source.fetch_records(&bounded).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_maps_to_year_periods() {
        let source = sample();
        let teams: BTreeSet<TeamId> = [TeamId::from("Boston Celtics")].into_iter().collect();
        let observations = source.fetch(&teams, DateBounds::default()).await.unwrap();
        let periods: Vec<&str> = observations.iter().map(|o| o.period.label()).collect();
        assert_eq!(periods, vec!["2021", "2022"]);
    }

    #[tokio::test]
    async fn test_unavailable_source_fails() {
        let source = sample();
        source.set_unavailable(true);
        assert!(!source.health_check().await.unwrap());
        let err = source.list_teams().await.unwrap_err();
        assert!(matches!(err, SourceError::Connection { .. }));
    }

    #[test]
    fn test_bad_date_ignored() {
        let source = LocalSource::new();
        source.add_record("yesterday", "A", 1.0);
        assert!(source.is_empty());
    }
}
