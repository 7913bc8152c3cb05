//! High-level rating service layer.
//!
//! Source-agnostic operations that work with any [`RatingRecordSource`]
//! implementation. These hold the query logic (season lookups, pagination,
//! degraded fetches) so that it stays identical whichever backend is used.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, chart sessions)           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  RatingRecordSource trait (repository/)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!          ┌──────────┴──────────┐
//!   ┌──────▼──────┐       ┌──────▼──────┐
//!   │  CsvSource  │       │ LocalSource │
//!   └─────────────┘       └─────────────┘
//! ```

use std::collections::BTreeSet;

use chrono::Datelike;
use log::warn;
use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, RatingRecordSource, RecordQuery, SourceError, SourceResult};
use crate::models::{DateBounds, RatingObservation, RatingRecord, TeamId};

// ==================== Health & Teams ====================

/// Check if the source can serve data.
pub async fn health_check<S: RatingRecordSource + ?Sized>(source: &S) -> SourceResult<bool> {
    source.health_check().await
}

/// Unique team names, sorted alphabetically.
pub async fn list_teams<S: RatingRecordSource + ?Sized>(source: &S) -> SourceResult<Vec<TeamId>> {
    let mut teams = source.list_teams().await?;
    teams.sort();
    teams.dedup();
    Ok(teams)
}

// ==================== Seasons ====================

/// Seasons (years) with at least one record for `team`, newest first.
pub async fn seasons_for_team<S: RatingRecordSource + ?Sized>(
    source: &S,
    team: &TeamId,
) -> SourceResult<Vec<i32>> {
    let records = source
        .fetch_records(&RecordQuery::for_teams([team.clone()]))
        .await?;
    let years: BTreeSet<i32> = records.iter().map(RatingRecord::year).collect();
    Ok(years.into_iter().rev().collect())
}

/// Rating of the team's most recent record within `year`.
///
/// Returns `Ok(None)` when the team has no record in that season. A latest
/// record whose rating is absent also yields `None`.
pub async fn latest_rating_in_season<S: RatingRecordSource + ?Sized>(
    source: &S,
    team: &TeamId,
    year: i32,
) -> SourceResult<Option<f64>> {
    let bounds = DateBounds {
        start: chrono::NaiveDate::from_ymd_opt(year, 1, 1),
        end: chrono::NaiveDate::from_ymd_opt(year, 12, 31),
    };
    let records = source
        .fetch_records(&RecordQuery::for_teams([team.clone()]).with_bounds(bounds))
        .await?;
    Ok(records
        .iter()
        .filter(|r| r.date.year() == year)
        .max_by_key(|r| r.date)
        .and_then(|r| r.rating))
}

/// Like [`latest_rating_in_season`], but a missing rating is an error.
pub async fn require_rating_in_season<S: RatingRecordSource + ?Sized>(
    source: &S,
    team: &TeamId,
    year: i32,
) -> SourceResult<f64> {
    latest_rating_in_season(source, team, year)
        .await?
        .ok_or_else(|| {
            SourceError::not_found_with_context(
                format!("No rating found for {} in {}", team, year),
                ErrorContext::new("latest_rating_in_season")
                    .with_entity("team")
                    .with_entity_id(team),
            )
        })
}

// ==================== Series ====================

/// Series query with optional pagination.
#[derive(Debug, Clone, Default)]
pub struct SeriesQuery {
    pub records: RecordQuery,
    pub offset: i64,
    pub limit: Option<i64>,
}

/// One page of the rating series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPage {
    pub data: Vec<RatingRecord>,
    /// Number of matching records before pagination
    pub total: usize,
    pub offset: usize,
    /// Requested limit, echoed as given (negative means no limit)
    pub limit: Option<i64>,
}

/// Rating records sorted by date, filtered and paginated.
///
/// A negative offset is treated as zero. A negative limit means no limit and
/// is echoed back unchanged.
pub async fn get_series<S: RatingRecordSource + ?Sized>(
    source: &S,
    query: &SeriesQuery,
) -> SourceResult<SeriesPage> {
    let mut records = source.fetch_records(&query.records).await?;
    records.sort_by_key(|r| r.date);

    let total = records.len();
    let offset = usize::try_from(query.offset.max(0)).unwrap_or(0);
    let take = query
        .limit
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(usize::MAX);

    let data: Vec<RatingRecord> = records
        .into_iter()
        .skip(offset)
        .take(take)
        .collect();

    Ok(SeriesPage {
        data,
        total,
        offset,
        limit: query.limit,
    })
}

// ==================== Chart Inputs ====================

/// Fetch observations for a chart, degrading failures to empty data.
///
/// Returns the observations and, when the source failed, the message to show
/// the user in place of the chart.
pub async fn fetch_observations_or_empty<S: RatingRecordSource + ?Sized>(
    source: &S,
    teams: &BTreeSet<TeamId>,
    bounds: DateBounds,
) -> (Vec<RatingObservation>, Option<String>) {
    if teams.is_empty() {
        return (Vec::new(), None);
    }

    match source.fetch(teams, bounds).await {
        Ok(observations) => (observations, None),
        Err(e) => {
            warn!("Rating fetch failed for {} teams: {}", teams.len(), e);
            (Vec::new(), Some(format!("Failed to load ratings: {}", e.message())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalSource;

    fn sample() -> LocalSource {
        let source = LocalSource::new();
        source.add_record("2021-10-19", "Boston Celtics", 1500.0);
        source.add_record("2022-04-10", "Los Angeles Lakers", 1512.0);
        source.add_record("2022-12-01", "Boston Celtics", 1530.0);
        source.add_record("2022-03-01", "Boston Celtics", 1520.0);
        source
    }

    #[tokio::test]
    async fn test_seasons_newest_first() {
        let seasons = seasons_for_team(&sample(), &"Boston Celtics".into())
            .await
            .unwrap();
        assert_eq!(seasons, vec![2022, 2021]);

        let none = seasons_for_team(&sample(), &"Chicago Bulls".into())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_latest_rating_in_season() {
        let source = sample();
        let rating = latest_rating_in_season(&source, &"Boston Celtics".into(), 2022)
            .await
            .unwrap();
        assert_eq!(rating, Some(1530.0));

        let missing = latest_rating_in_season(&source, &"Chicago Bulls".into(), 2022)
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_require_rating_not_found() {
        let err = require_rating_in_season(&sample(), &"Boston Celtics".into(), 1999)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert!(err.message().contains("No rating found for Boston Celtics in 1999"));
    }

    #[tokio::test]
    async fn test_series_pagination() {
        let source = sample();
        let page = get_series(
            &source,
            &SeriesQuery {
                offset: 1,
                limit: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].team, TeamId::from("Boston Celtics"));
        assert_eq!(page.data[0].rating, Some(1520.0));

        let page = get_series(
            &source,
            &SeriesQuery {
                offset: -5,
                limit: None,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.offset, 0);
        assert_eq!(page.data.len(), 4);
    }

    #[tokio::test]
    async fn test_series_negative_limit_echoed() {
        let page = get_series(
            &sample(),
            &SeriesQuery {
                offset: 2,
                limit: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.limit, Some(-1));
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_fetch_degrades_to_empty() {
        let source = sample();
        source.set_unavailable(true);
        let teams: BTreeSet<TeamId> = [TeamId::from("Boston Celtics")].into_iter().collect();
        let (observations, error) = fetch_observations_or_empty(&source, &teams, DateBounds::default()).await;
        assert!(observations.is_empty());
        assert!(error.unwrap().contains("local source is unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_empty_selection_skips_source() {
        let source = sample();
        source.set_unavailable(true);
        let (observations, error) =
            fetch_observations_or_empty(&source, &BTreeSet::new(), DateBounds::default()).await;
        assert!(observations.is_empty());
        assert!(error.is_none());
    }
}
