use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use transaction_risk::analytics::{
    analytics_router, AnalysisService, AnalyticsStore, ResultNotifier,
};

pub(crate) fn with_analytics_routes<S, N>(service: Arc<AnalysisService<S, N>>) -> axum::Router
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    analytics_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::RecordingNotifier;
    use crate::infra::{demo_user, InMemoryAnalyticsStore};
    use tower::ServiceExt;

    fn demo_router() -> (axum::Router, RecordingNotifier) {
        let store = Arc::new(InMemoryAnalyticsStore::with_demo_fixtures());
        let notifier = RecordingNotifier::default();
        let service = Arc::new(AnalysisService::new(
            store,
            Arc::new(notifier.clone()),
            180,
            None,
        ));
        (with_analytics_routes(service), notifier)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn analyze_endpoint_scores_the_demo_account() {
        let (router, _notifier) = demo_router();
        let user = demo_user();

        let uri = format!(
            "/api/v1/analyze?account_no={}&ifsc={}",
            user.account_no, user.ifsc_code
        );
        let response = router
            .oneshot(
                axum::http::Request::get(uri.as_str())
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["success"], json!(true));
        let score = payload
            .pointer("/data/result/risk_score")
            .and_then(|v| v.as_f64())
            .expect("risk score present");
        assert!((0.0..=100.0).contains(&score));
    }

    #[tokio::test]
    async fn analyze_endpoint_rejects_unknown_accounts() {
        let (router, _notifier) = demo_router();

        let response = router
            .oneshot(
                axum::http::Request::get("/api/v1/analyze?account_no=0&ifsc=NONE")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
