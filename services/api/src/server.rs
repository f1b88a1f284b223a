use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAnalyticsStore};
use crate::routes::with_analytics_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use transaction_risk::analytics::{AnalysisService, AnalysisServiceError, WebhookNotifier};
use transaction_risk::config::AppConfig;
use transaction_risk::error::AppError;
use transaction_risk::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryAnalyticsStore::with_demo_fixtures());
    let notifier = Arc::new(
        WebhookNotifier::new(config.analytics.webhook_secret.clone())
            .map_err(AnalysisServiceError::from)?,
    );
    let analysis_service = Arc::new(AnalysisService::new(
        store,
        notifier,
        config.analytics.window_days,
        config.analytics.webhook_url.clone(),
    ));

    let app = with_analytics_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "transaction risk analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
