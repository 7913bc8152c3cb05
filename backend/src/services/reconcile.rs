//! Make highlighted periods exist as chart categories.

use std::collections::BTreeSet;

use crate::models::{PeriodKey, PivotRow};

/// Insert an empty row for every referenced period missing from `rows`,
/// then return the rows sorted ascending by period.
pub fn reconcile_categories(
    mut rows: Vec<PivotRow>,
    referenced: &BTreeSet<PeriodKey>,
) -> Vec<PivotRow> {
    let present: BTreeSet<PeriodKey> = rows.iter().map(|r| r.period.clone()).collect();
    let missing: Vec<PivotRow> = referenced
        .difference(&present)
        .cloned()
        .map(PivotRow::empty)
        .collect();

    if !missing.is_empty() {
        log::debug!("Inserting {} empty period rows for highlights", missing.len());
        rows.extend(missing);
    }

    rows.sort_by(|a, b| a.period.cmp(&b.period));
    rows
}
