use crate::infra::{ApiService, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use treasury_desk::error::AppError;
use treasury_desk::workflows::portal::{treasury_router, PortalStore, TreasuryService};
use treasury_desk::workflows::statement_import::CashFlowStatementImporter;

#[derive(Debug, Deserialize)]
pub(crate) struct StatementImportRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatementImportResponse {
    pub(crate) months: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) first_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_month: Option<String>,
}

pub(crate) fn with_treasury_routes<S>(service: Arc<TreasuryService<S>>) -> axum::Router
where
    S: PortalStore + 'static,
{
    treasury_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/cash-flow/import",
            axum::routing::post(statement_import_endpoint),
        )
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

/// Replaces the cash-flow history with a bank statement export.
pub(crate) async fn statement_import_endpoint(
    Extension(service): Extension<Arc<ApiService>>,
    Json(payload): Json<StatementImportRequest>,
) -> Result<Json<StatementImportResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let entries = CashFlowStatementImporter::from_reader(reader)?;

    let first_month = entries.first().map(|entry| entry.month.clone());
    let last_month = entries.last().map(|entry| entry.month.clone());
    let months = service.replace_cash_flow(entries)?;

    Ok(Json(StatementImportResponse {
        months,
        first_month,
        last_month,
    }))
}
