//! Rating source trait for abstracting where rating records come from.
//!
//! Implementations (CSV file, in-memory, ...) are injected where needed as
//! `Arc<dyn RatingRecordSource>`; nothing in the crate holds a global
//! instance.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::models::{DateBounds, RatingObservation, RatingRecord, TeamId};

pub mod error;

pub use error::{ErrorContext, SourceError, SourceResult};

/// Filter for a record fetch.
///
/// An empty team set means every team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub teams: BTreeSet<TeamId>,
    pub bounds: DateBounds,
}

impl RecordQuery {
    pub fn for_teams<I, T>(teams: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeamId>,
    {
        Self {
            teams: teams.into_iter().map(Into::into).collect(),
            bounds: DateBounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: DateBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Whether a record passes the team and date filters.
    pub fn matches(&self, record: &RatingRecord) -> bool {
        (self.teams.is_empty() || self.teams.contains(&record.team)) && self.bounds.contains(record.date)
    }
}

/// Supplier of dated rating records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single source can be shared by
/// the HTTP handlers and chart sessions.
#[async_trait]
pub trait RatingRecordSource: Send + Sync {
    /// Check whether the source can currently serve data.
    async fn health_check(&self) -> SourceResult<bool>;

    /// All team names known to the source, sorted alphabetically.
    async fn list_teams(&self) -> SourceResult<Vec<TeamId>>;

    /// Records matching `query`, sorted by date (stable for equal dates).
    async fn fetch_records(&self, query: &RecordQuery) -> SourceResult<Vec<RatingRecord>>;

    /// Observations for `teams` within `bounds`, keyed by season year.
    async fn fetch(
        &self,
        teams: &BTreeSet<TeamId>,
        bounds: DateBounds,
    ) -> SourceResult<Vec<RatingObservation>> {
        let query = RecordQuery {
            teams: teams.clone(),
            bounds,
        };
        let records = self.fetch_records(&query).await?;
        Ok(records.iter().map(RatingRecord::to_observation).collect())
    }
}
