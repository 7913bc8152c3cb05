//! Value-axis domain for the displayed teams.

use std::collections::BTreeSet;

use crate::models::{AxisDomain, PivotRow, TeamId};

/// Fraction of the value span added above and below the data.
pub const DOMAIN_PADDING_RATIO: f64 = 0.08;

/// Minimum padding used when every value is the same.
pub const FLAT_DOMAIN_MIN_PADDING: f64 = 10.0;

/// Compute the padded axis range over the ratings of `teams`.
///
/// Returns [`AxisDomain::Auto`] when there is no finite value to scale to.
pub fn compute_axis_domain(rows: &[PivotRow], teams: &BTreeSet<TeamId>) -> AxisDomain {
    let values = rows.iter().flat_map(|row| {
        teams
            .iter()
            .filter_map(move |team| row.rating(team))
            .filter(|v| v.is_finite())
    });

    let Some((min, max)) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return AxisDomain::Auto;
    };

    let span = max - min;
    let pad = if span > 0.0 {
        span * DOMAIN_PADDING_RATIO
    } else {
        FLAT_DOMAIN_MIN_PADDING.max(max.abs() * DOMAIN_PADDING_RATIO)
    };

    AxisDomain::Range {
        min: min - pad,
        max: max + pad,
    }
}
