//! Nearest-neighbour anchoring of highlight points.

use crate::models::{Anchor, AnchorKind, PeriodKey, PivotRow, TeamId};

/// Resolve the value drawn for `team` at `period`.
///
/// An exact value at the period wins. Otherwise the nearest earlier row with
/// a value for the team is used, then the nearest later one. Returns `None`
/// when the team has no value anywhere. `rows` must be sorted ascending.
pub fn resolve_anchor(rows: &[PivotRow], team: &TeamId, period: &PeriodKey) -> Option<Anchor> {
    // Position of the period, or where it would be inserted.
    let (before, after) = match rows.binary_search_by(|row| row.period.cmp(period)) {
        Ok(idx) => {
            if let Some(value) = rows[idx].rating(team) {
                return Some(Anchor {
                    value,
                    source_period: period.clone(),
                    kind: AnchorKind::Exact,
                });
            }
            (idx, idx + 1)
        }
        Err(idx) => (idx, idx),
    };

    let backward = rows[..before]
        .iter()
        .rev()
        .find_map(|row| row.rating(team).map(|v| (v, row, AnchorKind::Backward)));

    let found = backward.or_else(|| {
        rows[after.min(rows.len())..]
            .iter()
            .find_map(|row| row.rating(team).map(|v| (v, row, AnchorKind::Forward)))
    });

    found.map(|(value, row, kind)| Anchor {
        value,
        source_period: row.period.clone(),
        kind,
    })
}
