use crate::cli::ServeArgs;
use crate::infra::{build_service, AppState};
use crate::routes::with_treasury_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use treasury_desk::config::AppConfig;
use treasury_desk::error::AppError;
use treasury_desk::telemetry;
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

    let service = build_service(&config.engine);
    // surface a corrupt state file before accepting traffic
    let metrics = service.metrics()?;
    info!(
        years = metrics.yearly.len(),
        months = metrics.cash_flow.len(),
        "portal state loaded"
    );

    let app = with_treasury_routes(service.clone())
        .layer(Extension(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        horizon_days = config.engine.forecast_horizon_days,
        "treasury desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
