use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::UserId;
use super::notify::ResultNotifier;
use super::service::{AnalysisService, AnalysisServiceError};
use super::store::AnalyticsStore;

/// Router builder exposing the analytics HTTP endpoints.
pub fn analytics_router<S, N>(service: Arc<AnalysisService<S, N>>) -> Router
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    Router::new()
        .route("/api/v1/analyze", get(analyze_handler::<S, N>))
        .route("/api/v1/results/:user_id", get(results_handler::<S, N>))
        .route("/api/v1/webhook", post(webhook_handler::<S, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeQuery {
    pub(crate) account_no: String,
    pub(crate) ifsc: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookTrigger {
    pub(crate) user_id: String,
    pub(crate) webhook_url: String,
}

fn envelope(data: serde_json::Value, message: String) -> serde_json::Value {
    json!({
        "success": true,
        "data": data,
        "message": message,
        "timestamp": Utc::now(),
    })
}

fn error_response(status: StatusCode, error: &AnalysisServiceError) -> Response {
    let payload = json!({
        "success": false,
        "error": error.to_string(),
        "timestamp": Utc::now(),
    });
    (status, axum::Json(payload)).into_response()
}

fn status_for(error: &AnalysisServiceError) -> StatusCode {
    match error {
        AnalysisServiceError::UserNotFound { .. } | AnalysisServiceError::NoResults(_) => {
            StatusCode::NOT_FOUND
        }
        AnalysisServiceError::Store(_) | AnalysisServiceError::Notify(_) => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) async fn analyze_handler<S, N>(
    State(service): State<Arc<AnalysisService<S, N>>>,
    Query(query): Query<AnalyzeQuery>,
) -> Response
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    match service.analyze_account(&query.account_no, &query.ifsc).await {
        Ok(report) => {
            let message = format!("Analysis completed successfully for user {}", report.user.name);
            let data = json!({
                "user": report.user,
                "result": report.result,
            });
            (StatusCode::OK, axum::Json(envelope(data, message))).into_response()
        }
        Err(err) => error_response(status_for(&err), &err),
    }
}

pub(crate) async fn results_handler<S, N>(
    State(service): State<Arc<AnalysisService<S, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    let id = UserId(user_id);
    match service.latest(&id) {
        Ok(stored) => {
            let message = "Latest analysis results retrieved successfully".to_string();
            let data = serde_json::to_value(&stored).unwrap_or_default();
            (StatusCode::OK, axum::Json(envelope(data, message))).into_response()
        }
        Err(err) => error_response(status_for(&err), &err),
    }
}

pub(crate) async fn webhook_handler<S, N>(
    State(service): State<Arc<AnalysisService<S, N>>>,
    axum::Json(trigger): axum::Json<WebhookTrigger>,
) -> Response
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    let id = UserId(trigger.user_id);
    match service.resend_latest(&id, &trigger.webhook_url).await {
        Ok(()) => {
            let data = json!({
                "user_id": id,
                "webhook_url": trigger.webhook_url,
            });
            let message = "Webhook sent successfully".to_string();
            (StatusCode::OK, axum::Json(envelope(data, message))).into_response()
        }
        Err(err) => error_response(status_for(&err), &err),
    }
}
