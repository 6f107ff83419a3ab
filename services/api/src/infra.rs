use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use treasury_desk::config::{EngineConfig, MAX_FORECAST_HORIZON_DAYS};
use treasury_desk::workflows::portal::{
    InMemoryPortalStore, JsonFilePortalStore, PortalState, PortalStore, StoreError,
    TreasuryService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected by `TREASURY_STATE_PATH`: a JSON file when set, process
/// memory otherwise.
#[derive(Debug)]
pub(crate) enum ConfiguredStore {
    Memory(InMemoryPortalStore),
    File(JsonFilePortalStore),
}

impl ConfiguredStore {
    pub(crate) fn from_config(engine: &EngineConfig) -> Self {
        match &engine.state_path {
            Some(path) => Self::File(JsonFilePortalStore::new(path)),
            None => Self::Memory(InMemoryPortalStore::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            ConfiguredStore::Memory(_) => "in-memory".to_string(),
            ConfiguredStore::File(store) => store.path().display().to_string(),
        }
    }
}

impl PortalStore for ConfiguredStore {
    fn load(&self) -> Result<PortalState, StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.load(),
            ConfiguredStore::File(store) => store.load(),
        }
    }

    fn save(&self, state: &PortalState) -> Result<(), StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.save(state),
            ConfiguredStore::File(store) => store.save(state),
        }
    }
}

pub(crate) type ApiService = TreasuryService<ConfiguredStore>;

pub(crate) fn build_service(engine: &EngineConfig) -> Arc<ApiService> {
    let store = Arc::new(ConfiguredStore::from_config(engine));
    info!(store = %store.describe(), "portal store selected");
    Arc::new(TreasuryService::new(store, engine))
}

/// Accepts amounts as typed into payment forms, e.g. `$12,500.00`.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("failed to parse '{raw}' as an amount"))
}

pub(crate) fn parse_horizon(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|days| (1..=MAX_FORECAST_HORIZON_DAYS).contains(days))
        .ok_or_else(|| {
            format!("horizon must be between 1 and {MAX_FORECAST_HORIZON_DAYS} days (got '{raw}')")
        })
}
