//! Head-to-head outcome estimate from season ratings.

use serde::{Deserialize, Serialize};

use crate::db::repository::{RatingRecordSource, SourceResult};
use crate::db::services::require_rating_in_season;
use crate::models::TeamId;

/// Identifier reported with every prediction.
pub const MODEL_VERSION: &str = "glicko_csv_v1";

/// Rating points per unit of logistic scale.
const ELO_SCALE: f64 = 400.0;

/// Rating points per point of predicted margin.
const MARGIN_DIVISOR: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_rating: f64,
    pub away_rating: f64,
    pub rating_diff: f64,
    pub home_win_prob: f64,
    pub predicted_margin: f64,
    pub model_version: String,
}

/// Probability that a side rated `diff` points higher wins.
pub fn win_probability(diff: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-diff / ELO_SCALE))
}

pub fn predict_from_ratings(home_rating: f64, away_rating: f64) -> Prediction {
    let diff = home_rating - away_rating;
    Prediction {
        home_rating,
        away_rating,
        rating_diff: diff,
        home_win_prob: win_probability(diff),
        predicted_margin: diff / MARGIN_DIVISOR,
        model_version: MODEL_VERSION.to_string(),
    }
}

/// Predict a game between two team seasons using each side's latest rating
/// in its season. Fails with `NotFound` when either rating is missing.
pub async fn predict<S: RatingRecordSource + ?Sized>(
    source: &S,
    home_team: &TeamId,
    home_season: i32,
    away_team: &TeamId,
    away_season: i32,
) -> SourceResult<Prediction> {
    let home = require_rating_in_season(source, home_team, home_season).await?;
    let away = require_rating_in_season(source, away_team, away_season).await?;
    Ok(predict_from_ratings(home, away))
}
