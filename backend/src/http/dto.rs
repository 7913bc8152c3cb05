//! Data Transfer Objects for the HTTP API.
//!
//! Chart and series payloads reuse the model types directly since they
//! already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::db::services::SeriesPage;
pub use crate::models::{ChartData, SelectionState, TeamId};
pub use crate::services::prediction::Prediction;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Rating source status ("connected", "disconnected" or "error: ...")
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<TeamId>,
}

/// Query parameters for the seasons endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeasonsQuery {
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonsResponse {
    pub team: TeamId,
    /// Seasons with data, newest first
    pub seasons: Vec<i32>,
}

/// A season given either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeasonParam {
    Number(i64),
    Text(String),
}

impl SeasonParam {
    pub fn year(&self) -> Option<i32> {
        match self {
            SeasonParam::Number(n) => i32::try_from(*n).ok(),
            SeasonParam::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Request body for the prediction endpoint.
///
/// Every field is optional at the wire level so that missing fields produce
/// a validation message instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PredictRequest {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub home_season: Option<SeasonParam>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub away_season: Option<SeasonParam>,
}

/// Validated prediction inputs, echoed back in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictInputs {
    pub home_team: TeamId,
    pub home_season: i32,
    pub away_team: TeamId,
    pub away_season: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub inputs: PredictInputs,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// Query parameters for the series endpoint.
///
/// `offset` and `limit` stay strings here so malformed values can be
/// reported with a specific message.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeriesParams {
    /// Comma-separated team names
    #[serde(default)]
    pub teams: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Request body for the chart endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartRequest {
    #[serde(default)]
    pub selection: SelectionState,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Chart data plus the message shown when the source failed.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    #[serde(flatten)]
    pub chart: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
