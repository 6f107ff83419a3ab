use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::documents::DocumentUpload;
use super::service::{TreasuryService, TreasuryServiceError};
use super::store::PortalStore;
use crate::workflows::financials::{CashFlowEntry, YearlyFinancials};

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub horizon_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CashFlowReplacement {
    pub entries: Vec<CashFlowEntry>,
}

/// Router builder exposing the rule engine and portal state over HTTP.
pub fn treasury_router<S>(service: Arc<TreasuryService<S>>) -> Router
where
    S: PortalStore + 'static,
{
    Router::new()
        .route("/api/v1/approvals/tiers", get(tiers_handler::<S>))
        .route("/api/v1/approvals/resolve", post(resolve_handler::<S>))
        .route("/api/v1/financials", post(submit_financials_handler::<S>))
        .route("/api/v1/financials/:year/ratios", get(ratios_handler::<S>))
        .route("/api/v1/cash-flow", put(cash_flow_handler::<S>))
        .route("/api/v1/health-score", get(health_handler::<S>))
        .route("/api/v1/credit-score", get(credit_handler::<S>))
        .route("/api/v1/forecast", post(forecast_handler::<S>))
        .route("/api/v1/documents", post(upload_handler::<S>))
        .route("/api/v1/documents/checklist", get(checklist_handler::<S>))
        .with_state(service)
}

pub(crate) async fn tiers_handler<S>(State(service): State<Arc<TreasuryService<S>>>) -> Response
where
    S: PortalStore + 'static,
{
    (StatusCode::OK, Json(service.approval_tiers())).into_response()
}

pub(crate) async fn resolve_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Json(request): Json<ApprovalRequest>,
) -> Response
where
    S: PortalStore + 'static,
{
    (StatusCode::OK, Json(service.resolve_approval(request.amount))).into_response()
}

pub(crate) async fn submit_financials_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Json(snapshot): Json<YearlyFinancials>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.submit_financials(snapshot) {
        Ok(receipt) => {
            let status = if receipt.replaced {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(receipt)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ratios_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Path(year): Path<String>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.ratios(&year) {
        Ok(ratios) => (StatusCode::OK, Json(ratios)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cash_flow_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Json(replacement): Json<CashFlowReplacement>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.replace_cash_flow(replacement.entries) {
        Ok(months) => (StatusCode::OK, Json(json!({ "months": months }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn health_handler<S>(State(service): State<Arc<TreasuryService<S>>>) -> Response
where
    S: PortalStore + 'static,
{
    match service.health_report() {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn credit_handler<S>(State(service): State<Arc<TreasuryService<S>>>) -> Response
where
    S: PortalStore + 'static,
{
    match service.credit_report() {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn forecast_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Json(request): Json<ForecastRequest>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.forecast(request.horizon_days) {
        Ok(projection) => (StatusCode::OK, Json(projection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
    Json(upload): Json<DocumentUpload>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.upload_document(upload) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_handler<S>(
    State(service): State<Arc<TreasuryService<S>>>,
) -> Response
where
    S: PortalStore + 'static,
{
    match service.checklist() {
        Ok(checklist) => (StatusCode::OK, Json(checklist)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TreasuryServiceError) -> Response {
    let status = match &error {
        TreasuryServiceError::Validation(_) | TreasuryServiceError::InvalidDocument(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TreasuryServiceError::YearNotFound(_) | TreasuryServiceError::MissingFinancials => {
            StatusCode::NOT_FOUND
        }
        TreasuryServiceError::InvalidHorizon(_) => StatusCode::BAD_REQUEST,
        TreasuryServiceError::Store(_) | TreasuryServiceError::Unavailable(_) => {
            tracing::error!(%error, "treasury request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
