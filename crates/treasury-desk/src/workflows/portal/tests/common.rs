use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::workflows::approvals::ApprovalResolver;
use crate::workflows::financials::{CashFlowEntry, YearlyFinancials};
use crate::workflows::forecast::{CashFlowForecaster, FixedSchedule, ForecastConfig};
use crate::workflows::portal::{
    BoxedSchedule, InMemoryPortalStore, PortalState, PortalStore, StoreError, TreasuryService,
};

pub(super) fn engine_config() -> EngineConfig {
    EngineConfig {
        mock_seed: 7,
        ..EngineConfig::default()
    }
}

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn snapshot(year: &str) -> YearlyFinancials {
    YearlyFinancials::from_components(
        year, 200_000.0, 300_000.0, 100_000.0, 150_000.0, 1_000_000.0, 900_000.0,
    )
}

pub(super) fn steady_history(balance: f64) -> Vec<CashFlowEntry> {
    (1..=6)
        .map(|month| CashFlowEntry::new(format!("2025-{month:02}"), 0.0, 0.0, balance))
        .collect()
}

pub(super) type MemoryService = TreasuryService<InMemoryPortalStore>;

/// Service with no documented flows so projections depend only on history.
pub(super) fn build_service() -> (Arc<MemoryService>, Arc<InMemoryPortalStore>) {
    let store = Arc::new(InMemoryPortalStore::default());
    let forecaster: CashFlowForecaster<BoxedSchedule> =
        CashFlowForecaster::new(Box::new(FixedSchedule::empty()), ForecastConfig::default());
    let service = TreasuryService::with_components(
        store.clone(),
        ApprovalResolver::default(),
        forecaster,
        &engine_config(),
    );
    (Arc::new(service), store)
}

pub(super) struct UnavailableStore;

impl PortalStore for UnavailableStore {
    fn load(&self) -> Result<PortalState, StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn save(&self, _state: &PortalState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
