//! Pivot raw rating observations into period-keyed rows.

use std::collections::BTreeMap;

use crate::models::{PeriodKey, PivotRow, RatingObservation};

/// Pivot observations into one row per distinct period, sorted ascending.
///
/// When several observations share a (period, team) pair the last one in
/// input order wins, including an absent rating, which clears the value.
pub fn aggregate_rows(observations: &[RatingObservation]) -> Vec<PivotRow> {
    let mut rows: BTreeMap<PeriodKey, PivotRow> = BTreeMap::new();

    for obs in observations {
        let row = rows
            .entry(obs.period.clone())
            .or_insert_with(|| PivotRow::empty(obs.period.clone()));
        match obs.rating {
            Some(rating) => {
                row.ratings.insert(obs.team.clone(), rating);
            }
            None => {
                row.ratings.remove(&obs.team);
            }
        }
    }

    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamId;

    fn obs(period: &str, team: &str, rating: f64) -> RatingObservation {
        RatingObservation::new(period, team, rating)
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_rows(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_sorts_periods_numerically() {
        let rows = aggregate_rows(&[
            obs("2022", "A", 110.0),
            obs("999", "A", 90.0),
            obs("2021", "B", 100.0),
        ]);
        let periods: Vec<&str> = rows.iter().map(|r| r.period.label()).collect();
        assert_eq!(periods, vec!["999", "2021", "2022"]);
    }

    #[test]
    fn test_last_observation_wins() {
        let rows = aggregate_rows(&[
            obs("2021", "A", 100.0),
            obs("2021", "B", 80.0),
            obs("2021", "A", 105.0),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rating(&TeamId::from("A")), Some(105.0));
        assert_eq!(rows[0].rating(&TeamId::from("B")), Some(80.0));
    }

    #[test]
    fn test_absent_observation_clears_earlier_value() {
        let rows = aggregate_rows(&[
            obs("2021", "A", 100.0),
            RatingObservation {
                period: "2021".into(),
                team: "A".into(),
                rating: None,
            },
        ]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ratings.is_empty());
    }
}
