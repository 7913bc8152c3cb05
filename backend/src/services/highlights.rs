//! Sparse overlay series for highlighted (team, period) points.

use crate::models::{HighlightOverlay, OverlayPoint, PeriodKey, PivotRow, TeamId};

use super::anchors::resolve_anchor;

/// Build one overlay per highlight target, in target order.
///
/// Each overlay spans the period axis of `rows` and carries a value only at
/// its own period. Targets whose anchor cannot be resolved are skipped.
pub fn build_overlays(rows: &[PivotRow], targets: &[(TeamId, PeriodKey)]) -> Vec<HighlightOverlay> {
    targets
        .iter()
        .filter_map(|(team, period)| {
            let Some(anchor) = resolve_anchor(rows, team, period) else {
                log::debug!("No anchor for team={} period={}, skipping highlight", team, period);
                return None;
            };

            let points = rows
                .iter()
                .map(|row| OverlayPoint {
                    period: row.period.clone(),
                    value: (row.period == *period).then_some(anchor.value),
                })
                .collect();

            Some(HighlightOverlay {
                team: team.clone(),
                period: period.clone(),
                anchor,
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnchorKind;

    fn sample_rows() -> Vec<PivotRow> {
        let mut r1 = PivotRow::empty("2021".into());
        r1.ratings.insert("A".into(), 100.0);
        let mut r2 = PivotRow::empty("2022".into());
        r2.ratings.insert("A".into(), 110.0);
        r2.ratings.insert("B".into(), 90.0);
        let r3 = PivotRow::empty("2023".into());
        vec![r1, r2, r3]
    }

    #[test]
    fn test_overlay_isolates_single_point() {
        let rows = sample_rows();
        let overlays = build_overlays(&rows, &[("A".into(), "2023".into())]);
        assert_eq!(overlays.len(), 1);

        let overlay = &overlays[0];
        assert_eq!(overlay.anchor.kind, AnchorKind::Backward);
        let values: Vec<Option<f64>> = overlay.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![None, None, Some(110.0)]);
    }

    #[test]
    fn test_multiple_periods_stay_independent() {
        let rows = sample_rows();
        let overlays = build_overlays(
            &rows,
            &[("A".into(), "2021".into()), ("A".into(), "2022".into())],
        );
        assert_eq!(overlays.len(), 2);
        assert_eq!(overlays[0].points[0].value, Some(100.0));
        assert_eq!(overlays[0].points[1].value, None);
        assert_eq!(overlays[1].points[0].value, None);
        assert_eq!(overlays[1].points[1].value, Some(110.0));
    }

    #[test]
    fn test_unresolvable_target_yields_no_overlay() {
        let rows = sample_rows();
        let overlays = build_overlays(&rows, &[("C".into(), "2022".into())]);
        assert!(overlays.is_empty());
    }

    #[test]
    fn test_overlays_do_not_touch_rows() {
        let rows = sample_rows();
        let before = rows.clone();
        let _ = build_overlays(&rows, &[("B".into(), "2023".into())]);
        assert_eq!(rows, before);
    }
}
