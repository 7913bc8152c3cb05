//! Rating data access.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services.rs) - Query logic              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  RatingRecordSource trait (repository/)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │  CsvSource / LocalSource      │
//!     └──────────────────────────────┘
//! ```
//!
//! - `services`: High-level query functions (use these in your application!)
//! - `repository`: Trait definition and error types
//! - `repositories`: CSV-file and in-memory implementations
//! - `payload`: Decoding of remote payloads with non-finite sentinels
//! - `factory`: Builds the configured source
//!
//! Sources are always passed explicitly as `Arc<dyn RatingRecordSource>`.

pub mod factory;
pub mod payload;
pub mod repositories;
pub mod repository;
pub mod services;

pub use factory::{SourceFactory, SourceType};
pub use repositories::{CsvSource, LocalSource};
pub use repository::{
    ErrorContext, RatingRecordSource, RecordQuery, SourceError, SourceResult,
};
pub use services::{
    fetch_observations_or_empty, get_series, health_check, latest_rating_in_season, list_teams,
    require_rating_in_season, seasons_for_team, SeriesPage, SeriesQuery,
};
