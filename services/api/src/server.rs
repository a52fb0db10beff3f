use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_decision_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_decision::config::{AppConfig, ConfigError};
use loan_decision::error::AppError;
use loan_decision::telemetry;
use loan_decision::DecisionEngine;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let bounds = config.policy.bounds;
    let segments = config.policy.segments.segments.len();
    let engine = DecisionEngine::try_new(Arc::new(config.policy)).map_err(ConfigError::from)?;
    let engine = Arc::new(engine);

    let app = with_decision_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_amount = bounds.min_amount,
        max_amount = bounds.max_amount,
        min_period = bounds.min_period,
        max_period = bounds.max_period,
        segments,
        "loan decision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
