use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use shared::{Alert, ForecastPoint, NewAlert, NewPoll, PollSummary, PollVote, RateSample};

use crate::error::ApiError;
use crate::state::AppState;

// ── Query params ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    days: i64,
}

fn default_history_days() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_forecast_days")]
    days: i64,
}

fn default_forecast_days() -> i64 {
    7
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/rate/current", get(current_rate))
        .route("/api/rate/history", get(rate_history))
        .route("/api/forecast", get(forecast))
        .route("/api/suggestion", get(suggestion))
        .route("/api/alert", post(create_alert))
        .route("/api/alerts", get(alerts))
        .route("/api/poll", post(submit_poll))
        .route("/api/poll/summary", get(poll_summary))
        .route("/health", get(health))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn current_rate(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let rate = state
        .store
        .current_rate()
        .await
        .map_err(|e| ApiError::internal("Error fetching current exchange rate", e))?;
    Ok(Json(json!({ "rate": rate, "timestamp": Utc::now() })))
}

async fn rate_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<RateSample>> {
    Json(state.store.rate_history(q.days).await)
}

async fn forecast(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ForecastQuery>,
) -> Result<Json<Vec<ForecastPoint>>, ApiError> {
    let points = state
        .store
        .forecast(q.days)
        .await
        .map_err(|e| ApiError::internal("Error fetching exchange rate forecast", e))?;
    Ok(Json(points))
}

async fn suggestion(State(state): State<Arc<AppState>>) -> Json<Value> {
    let suggestion = state.store.suggestion().await;
    Json(json!({ "suggestion": suggestion }))
}

async fn create_alert(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewAlert>,
) -> (StatusCode, Json<Alert>) {
    let alert = state.store.create_alert(new).await;
    (StatusCode::CREATED, Json(alert))
}

async fn alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.store.alerts().await)
}

async fn submit_poll(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewPoll>,
) -> (StatusCode, Json<PollVote>) {
    let vote = state.store.create_poll(new).await;
    (StatusCode::CREATED, Json(vote))
}

async fn poll_summary(State(state): State<Arc<AppState>>) -> Json<PollSummary> {
    Json(state.store.poll_summary().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use shared::MemStore;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppState {
            store: MemStore::with_seed(7),
        }))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn current_rate_returns_rate_and_timestamp() {
        let (status, body) = get_json(test_app(), "/api/rate/current").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["rate"].as_f64().unwrap() > 0.0);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn history_honours_days_param() {
        let app = test_app();

        let (status, body) = get_json(app.clone(), "/api/rate/history?days=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 7);

        let (_, body) = get_json(app, "/api/rate/history").await;
        assert_eq!(body.as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn forecast_defaults_to_seven_days() {
        let (status, body) = get_json(test_app(), "/api/forecast").await;
        assert_eq!(status, StatusCode::OK);

        let points = body.as_array().unwrap();
        assert_eq!(points.len(), 7);
        for point in points {
            assert!(point["date"].is_string());
            assert!(point["rate"].is_number());
            assert_eq!(point["confidence"].as_array().unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn suggestion_is_a_known_value() {
        let (status, body) = get_json(test_app(), "/api/suggestion").await;
        assert_eq!(status, StatusCode::OK);
        let suggestion = body["suggestion"].as_str().unwrap();
        assert!(matches!(suggestion, "good" | "bad" | "neutral"));
    }

    #[tokio::test]
    async fn alert_is_created_and_listed() {
        let app = test_app();

        let (status, created) = post_json(
            app.clone(),
            "/api/alert",
            json!({ "rate": 171.5, "email": "user@example.com", "type": "buy" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], "1");
        assert_eq!(created["rate"], 171.5);
        assert_eq!(created["email"], "user@example.com");
        assert_eq!(created["type"], "buy");
        assert_eq!(created["triggered"], false);

        let (status, listed) = get_json(app, "/api/alerts").await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], "1");
    }

    #[tokio::test]
    async fn poll_vote_moves_the_summary() {
        let app = test_app();

        let (_, before) = get_json(app.clone(), "/api/poll/summary").await;
        let (status, vote) = post_json(app.clone(), "/api/poll", json!({ "vote": "buy" })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(vote["vote"], "buy");
        let (_, after) = get_json(app, "/api/poll/summary").await;

        assert_eq!(
            after["total"].as_u64().unwrap(),
            before["total"].as_u64().unwrap() + 1
        );
        assert_eq!(
            after["yes"]["count"].as_u64().unwrap(),
            before["yes"]["count"].as_u64().unwrap() + 1
        );
        assert_eq!(after["neutral"]["count"], before["neutral"]["count"]);
        assert_eq!(after["no"]["count"], before["no"]["count"]);
    }

    #[tokio::test]
    async fn unknown_vote_value_is_rejected() {
        let (status, _) = post_json(test_app(), "/api/poll", json!({ "vote": "maybe" })).await;
        assert!(status.is_client_error());
    }
}
