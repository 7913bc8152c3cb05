//! # Ratings Trends Backend
//!
//! Time-series aggregation and highlight-overlay engine for team ratings.
//!
//! Rating observations (period, team, rating) are pivoted into one row per
//! period, the period axis is extended with every period the viewer wants
//! highlighted, each highlight is anchored to the nearest known rating of
//! its team, and a padded y-axis domain is derived from the displayed data.
//! The result is a [`models::ChartData`] value that any chart renderer can
//! draw.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types (teams, period keys, pivot rows, selection, chart data)
//! - [`services`]: Pure pipeline stages, chart sessions, and predictions
//! - [`db`]: Rating sources (CSV file, in-memory) and source-agnostic queries
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use ratings_trends::models::{AxisDomain, RatingObservation, SelectionState};
//! use ratings_trends::services::compute_chart_data;
//!
//! let observations = vec![
//!     RatingObservation::new(2021, "A", 100.0),
//!     RatingObservation::new(2022, "A", 110.0),
//! ];
//! let selection = SelectionState::with_teams(["A"]).highlight("A", "2023");
//! let chart = compute_chart_data(&observations, &selection);
//!
//! assert_eq!(chart.rows.len(), 3);
//! assert_eq!(chart.overlays[0].value(), 110.0);
//! assert!(matches!(chart.domain, AxisDomain::Range { .. }));
//! ```

// SourceError carries an ErrorContext for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
