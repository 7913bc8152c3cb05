//! Ratings trend chart computation.
//!
//! Runs the full chart pipeline over a batch of observations:
//!
//! ```text
//! observations ─► aggregate_rows ─► reconcile_categories ─┬─► build_overlays
//!                                                         └─► compute_axis_domain
//! ```
//!
//! Every stage is a pure function, so identical inputs always give identical
//! [`ChartData`].

use crate::models::{ChartData, RatingObservation, SelectionState};

use super::aggregation::aggregate_rows;
use super::axis::compute_axis_domain;
use super::highlights::build_overlays;
use super::reconcile::reconcile_categories;

/// Compute chart rows, highlight overlays and the axis domain for a selection.
///
/// Observations of teams outside `selection.teams` are ignored. An empty team
/// selection yields [`ChartData::empty`].
pub fn compute_chart_data(
    observations: &[RatingObservation],
    selection: &SelectionState,
) -> ChartData {
    if selection.teams.is_empty() {
        return ChartData::empty();
    }

    let displayed: Vec<RatingObservation> = observations
        .iter()
        .filter(|obs| selection.teams.contains(&obs.team))
        .cloned()
        .collect();

    let rows = aggregate_rows(&displayed);
    let rows = reconcile_categories(rows, &selection.referenced_periods());
    let overlays = build_overlays(&rows, &selection.highlight_targets());
    let domain = compute_axis_domain(&rows, &selection.teams);

    log::debug!(
        "Chart computed: {} observations, {} rows, {} overlays",
        displayed.len(),
        rows.len(),
        overlays.len()
    );

    ChartData {
        rows,
        teams: selection.teams.iter().cloned().collect(),
        overlays,
        domain,
    }
}
