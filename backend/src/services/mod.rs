//! Chart computation and rating services.
//!
//! The pipeline stages are pure functions over in-memory data:
//!
//! ```text
//! observations ──► aggregation ──► reconcile ──► highlights ──► axis
//!                   (pivot rows)    (period keys)  (anchored overlays) (y domain)
//! ```
//!
//! [`trends::compute_chart_data`] runs them in order. [`session::ChartSession`]
//! wraps the pipeline with data fetching and stale-response gating, and
//! [`prediction`] estimates head-to-head outcomes from season ratings.

pub mod aggregation;
pub mod anchors;
pub mod axis;
pub mod highlights;
pub mod prediction;
pub mod reconcile;
pub mod session;
pub mod trends;

pub use aggregation::aggregate_rows;
pub use anchors::resolve_anchor;
pub use axis::{compute_axis_domain, DOMAIN_PADDING_RATIO, FLAT_DOMAIN_MIN_PADDING};
pub use highlights::build_overlays;
pub use prediction::{predict, predict_from_ratings, win_probability, Prediction, MODEL_VERSION};
pub use reconcile::reconcile_categories;
pub use session::{ChartRenderer, ChartSession, RefreshOutcome, RequestGate, RequestToken};
pub use trends::compute_chart_data;
