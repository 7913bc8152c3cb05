//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;

use super::dto::{
    ChartRequest, ChartResponse, HealthResponse, PredictInputs, PredictRequest, PredictResponse,
    SeasonsQuery, SeasonsResponse, SeriesPage, SeriesParams, TeamsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::payload::parse_date_param;
use crate::db::repository::RecordQuery;
use crate::db::services::{self as db_services, SeriesQuery};
use crate::models::{DateBounds, TeamId};
use crate::services::{compute_chart_data, prediction};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the source is readable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let source_status = match db_services::health_check(state.source.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        source: source_status,
    }))
}

// =============================================================================
// Teams & Seasons
// =============================================================================

/// GET /api/teams
pub async fn list_teams(State(state): State<AppState>) -> HandlerResult<TeamsResponse> {
    let teams = db_services::list_teams(state.source.as_ref()).await?;
    Ok(Json(TeamsResponse { teams }))
}

/// GET /api/seasons?team=
///
/// Seasons with data for one team, newest first.
pub async fn list_seasons(
    State(state): State<AppState>,
    Query(query): Query<SeasonsQuery>,
) -> HandlerResult<SeasonsResponse> {
    let team = query
        .team
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TeamId::from)
        .ok_or_else(|| AppError::BadRequest("team query param required".to_string()))?;

    let seasons = db_services::seasons_for_team(state.source.as_ref(), &team).await?;
    Ok(Json(SeasonsResponse { team, seasons }))
}

// =============================================================================
// Prediction
// =============================================================================

/// POST /api/predict
///
/// Head-to-head estimate between two team seasons.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> HandlerResult<PredictResponse> {
    let inputs = validate_predict_request(&request)?;

    let prediction = prediction::predict(
        state.source.as_ref(),
        &inputs.home_team,
        inputs.home_season,
        &inputs.away_team,
        inputs.away_season,
    )
    .await?;

    Ok(Json(PredictResponse { inputs, prediction }))
}

fn validate_predict_request(request: &PredictRequest) -> Result<PredictInputs, AppError> {
    let missing =
        || AppError::BadRequest("home_team, away_team, home_season, away_season are required".to_string());

    let home_team = non_empty(request.home_team.as_deref()).ok_or_else(missing)?;
    let away_team = non_empty(request.away_team.as_deref()).ok_or_else(missing)?;
    let home_season = request.home_season.as_ref().ok_or_else(missing)?;
    let away_season = request.away_season.as_ref().ok_or_else(missing)?;

    let (home_season, away_season) = match (home_season.year(), away_season.year()) {
        (Some(home), Some(away)) => (home, away),
        _ => return Err(AppError::BadRequest("home_season and away_season must be integers".to_string())),
    };

    if home_team == away_team && home_season == away_season {
        return Err(AppError::BadRequest(
            "If the same team is chosen the seasons must differ".to_string(),
        ));
    }

    Ok(PredictInputs {
        home_team: TeamId::from(home_team),
        home_season,
        away_team: TeamId::from(away_team),
        away_season,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Ratings
// =============================================================================

/// GET /api/ratings/series?teams=A,B&start=&end=&offset=&limit=
///
/// Dated rating records, sorted by date and paginated.
pub async fn get_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> HandlerResult<SeriesPage> {
    let teams: BTreeSet<TeamId> = params
        .teams
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TeamId::from)
        .collect();

    let bounds = parse_bounds(params.start.as_deref(), params.end.as_deref())?;

    let offset = match non_empty(params.offset.as_deref()) {
        Some(raw) => parse_integer(raw)?,
        None => 0,
    };
    let limit = non_empty(params.limit.as_deref())
        .map(parse_integer)
        .transpose()?;

    let query = SeriesQuery {
        records: RecordQuery::for_teams(teams).with_bounds(bounds),
        offset,
        limit,
    };

    let page = db_services::get_series(state.source.as_ref(), &query).await?;
    Ok(Json(page))
}

/// POST /api/ratings/chart
///
/// Chart data for a selection. A failing source degrades to an empty chart
/// with an `error` message rather than an error status.
pub async fn get_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> HandlerResult<ChartResponse> {
    let bounds = parse_bounds(request.start.as_deref(), request.end.as_deref())?;
    let selection = request.selection;

    let (observations, error) =
        db_services::fetch_observations_or_empty(state.source.as_ref(), &selection.teams, bounds)
            .await;

    let chart = tokio::task::spawn_blocking(move || compute_chart_data(&observations, &selection))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(ChartResponse { chart, error }))
}

fn parse_bounds(start: Option<&str>, end: Option<&str>) -> Result<DateBounds, AppError> {
    Ok(DateBounds {
        start: parse_optional_date("start", start)?,
        end: parse_optional_date("end", end)?,
    })
}

fn parse_optional_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    non_empty(raw)
        .map(|value| parse_date_param(name, value))
        .transpose()
        .map_err(|e| AppError::BadRequest(e.message().to_string()))
}

fn parse_integer(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("offset and limit must be integers".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::dto::SeasonParam;

    fn request(home: &str, hs: SeasonParam, away: &str, aws: SeasonParam) -> PredictRequest {
        PredictRequest {
            home_team: Some(home.to_string()),
            home_season: Some(hs),
            away_team: Some(away.to_string()),
            away_season: Some(aws),
        }
    }

    #[test]
    fn test_validate_accepts_string_seasons() {
        let inputs = validate_predict_request(&request(
            "Boston Celtics",
            SeasonParam::Text("2022".to_string()),
            "Boston Celtics",
            SeasonParam::Number(2021),
        ))
        .unwrap();
        assert_eq!(inputs.home_season, 2022);
        assert_eq!(inputs.away_season, 2021);
    }

    #[test]
    fn test_validate_rejects_same_team_season() {
        let err = validate_predict_request(&request(
            "Boston Celtics",
            SeasonParam::Number(2022),
            "Boston Celtics",
            SeasonParam::Number(2022),
        ))
        .unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "If the same team is chosen the seasons must differ")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_all_fields() {
        let err = validate_predict_request(&PredictRequest {
            home_team: Some("Boston Celtics".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "home_team, away_team, home_season, away_season are required")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_non_integer_season() {
        let err = validate_predict_request(&request(
            "Boston Celtics",
            SeasonParam::Text("last year".to_string()),
            "Phoenix Suns",
            SeasonParam::Number(2022),
        ))
        .unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "home_season and away_season must be integers")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_bounds() {
        let bounds = parse_bounds(Some("2021-01-01"), None).unwrap();
        assert_eq!(bounds.start, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert!(bounds.end.is_none());
        assert!(parse_bounds(Some("yesterday"), None).is_err());
    }
}
