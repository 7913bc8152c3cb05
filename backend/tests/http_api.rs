//! REST API tests driven through the router.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ratings_trends::db::repositories::LocalSource;
use ratings_trends::http::{create_router, AppState};

fn sample_source() -> LocalSource {
    let source = LocalSource::new();
    source.add_record("2021-05-01", "A", 100.0);
    source.add_record("2022-05-01", "A", 110.0);
    source.add_record("2022-05-01", "B", 90.0);
    source
}

fn app(source: LocalSource) -> Router {
    create_router(AppState::new(Arc::new(source)), &[])
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn teams_and_seasons() {
    let (status, body) = get(app(sample_source()), "/api/teams").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teams"], json!(["A", "B"]));

    let (status, body) = get(app(sample_source()), "/api/seasons?team=A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seasons"], json!([2022, 2021]));

    let (status, body) = get(app(sample_source()), "/api/seasons").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "team query param required");
}

#[tokio::test]
async fn chart_endpoint_returns_rows_overlays_and_domain() {
    let request = json!({
        "selection": {
            "teams": ["A", "B"],
            "per_team_highlight_periods": {"A": [2023]}
        }
    });
    let (status, body) = post(app(sample_source()), "/api/ratings/chart", request).await;
    assert_eq!(status, StatusCode::OK);

    let periods: Vec<&str> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["period"].as_str().unwrap())
        .collect();
    assert_eq!(periods, vec!["2021", "2022", "2023"]);
    assert_eq!(body["overlays"].as_array().unwrap().len(), 1);
    assert_eq!(body["overlays"][0]["anchor"]["value"], 110.0);
    assert!(body["domain"]["min"].is_number());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn chart_endpoint_degrades_when_source_fails() {
    let source = sample_source();
    source.set_unavailable(true);
    let request = json!({"selection": {"teams": ["A"]}});
    let (status, body) = post(app(source), "/api/ratings/chart", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"], json!([]));
    assert_eq!(body["domain"], "auto");
    assert!(body["error"].as_str().unwrap().starts_with("Failed to load ratings"));
}

#[tokio::test]
async fn series_pagination_and_validation() {
    let (status, body) = get(app(sample_source()), "/api/ratings/series?teams=A&offset=1&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["rating"], 110.0);

    let (status, body) = get(app(sample_source()), "/api/ratings/series?limit=-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], -1);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = get(app(sample_source()), "/api/ratings/series?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "offset and limit must be integers");

    let (status, _) = get(app(sample_source()), "/api/ratings/series?start=2021-13-40").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_endpoint() {
    let request = json!({
        "home_team": "A",
        "home_season": "2022",
        "away_team": "B",
        "away_season": 2022
    });
    let (status, body) = post(app(sample_source()), "/api/predict", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["home_season"], 2022);
    assert_eq!(body["rating_diff"], 20.0);
    assert_eq!(body["model_version"], "glicko_csv_v1");
    assert!(body["home_win_prob"].as_f64().unwrap() > 0.5);

    let same = json!({
        "home_team": "A", "home_season": 2022,
        "away_team": "A", "away_season": 2022
    });
    let (status, body) = post(app(sample_source()), "/api/predict", same).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "If the same team is chosen the seasons must differ");

    let missing = json!({
        "home_team": "A", "home_season": 2019,
        "away_team": "B", "away_season": 2022
    });
    let (status, body) = post(app(sample_source()), "/api/predict", missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
