use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::documents::{
    build_checklist, CreditChecklist, DocumentId, DocumentRecord, DocumentUpload,
};
use super::state::PortalState;
use super::store::{PortalStore, StoreError};
use crate::config::{EngineConfig, MAX_FORECAST_HORIZON_DAYS};
use crate::workflows::approvals::{ApprovalResolver, ApprovalTier};
use crate::workflows::financials::{
    compute_ratios, health_breakdown, CashFlowEntry, FinancialMetrics, FinancialRatios,
    FinancialsValidationError, HealthScoreBreakdown, YearlyFinancials,
};
use crate::workflows::forecast::{
    CashFlowForecaster, CashFlowProjection, ForecastConfig, ProportionalSchedule,
    ScheduledFlowSource,
};
use crate::workflows::mock::{CreditScoreDrift, MockFinancialsGenerator};

pub type BoxedSchedule = Box<dyn ScheduledFlowSource>;

/// Service composing the rule engine with the persisted portal state.
pub struct TreasuryService<S> {
    store: Arc<S>,
    resolver: ApprovalResolver,
    forecaster: CashFlowForecaster<BoxedSchedule>,
    default_horizon_days: u32,
    generator: Mutex<MockFinancialsGenerator>,
    credit_drift: Mutex<CreditScoreDrift>,
    // serializes load-modify-save cycles
    write_lock: Mutex<()>,
}

impl<S> TreasuryService<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>, engine: &EngineConfig) -> Self {
        let forecaster: CashFlowForecaster<BoxedSchedule> = CashFlowForecaster::new(
            Box::new(ProportionalSchedule::default()),
            ForecastConfig {
                fallback_cash_balance: engine.fallback_cash_balance,
            },
        );
        Self::with_components(store, ApprovalResolver::default(), forecaster, engine)
    }

    pub fn with_components(
        store: Arc<S>,
        resolver: ApprovalResolver,
        forecaster: CashFlowForecaster<BoxedSchedule>,
        engine: &EngineConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            forecaster,
            default_horizon_days: engine.forecast_horizon_days,
            generator: Mutex::new(MockFinancialsGenerator::new(engine.mock_seed)),
            credit_drift: Mutex::new(CreditScoreDrift::new(engine.mock_seed.rotate_left(17))),
            write_lock: Mutex::new(()),
        }
    }

    pub fn approval_tiers(&self) -> Vec<ApprovalTier> {
        self.resolver.table().tiers().cloned().collect()
    }

    pub fn resolve_approval(&self, amount: f64) -> ApprovalTier {
        let tier = self.resolver.resolve(amount).clone();
        debug!(
            amount,
            tier = %tier.tier_name,
            approvers = tier.required_approvers,
            "resolved approval tier"
        );
        tier
    }

    pub fn metrics(&self) -> Result<FinancialMetrics, TreasuryServiceError> {
        Ok(self.store.load()?.financial_metrics)
    }

    /// Validate and store a yearly snapshot, replacing any snapshot for the same year.
    pub fn submit_financials(
        &self,
        snapshot: YearlyFinancials,
    ) -> Result<SubmissionReceipt, TreasuryServiceError> {
        snapshot.validate()?;
        let ratios = compute_ratios(&snapshot);
        let year = snapshot.year.clone();

        let replaced =
            self.update_state(|state| Ok(state.financial_metrics.upsert_year(snapshot)))?;

        info!(%year, replaced, "yearly financials stored");
        Ok(SubmissionReceipt {
            year,
            replaced,
            ratios,
        })
    }

    /// Replace the monthly history; entries are kept in the order given.
    pub fn replace_cash_flow(
        &self,
        entries: Vec<CashFlowEntry>,
    ) -> Result<usize, TreasuryServiceError> {
        for entry in &entries {
            entry.validate()?;
        }
        let count = entries.len();

        self.update_state(|state| {
            state.financial_metrics.cash_flow = entries;
            Ok(())
        })?;

        info!(months = count, "cash-flow history replaced");
        Ok(count)
    }

    pub fn ratios(&self, year: &str) -> Result<FinancialRatios, TreasuryServiceError> {
        let metrics = self.metrics()?;
        let snapshot = metrics
            .year(year)
            .ok_or_else(|| TreasuryServiceError::YearNotFound(year.to_string()))?;
        let ratios = compute_ratios(snapshot);

        let undefined = ratios.undefined();
        if !undefined.is_empty() {
            warn!(%year, ?undefined, "ratios undefined for zero denominators");
        }
        Ok(ratios)
    }

    pub fn health_report(&self) -> Result<HealthReport, TreasuryServiceError> {
        self.health_report_at(Utc::now())
    }

    pub fn health_report_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HealthReport, TreasuryServiceError> {
        self.update_state(|state| {
            let breakdown = health_breakdown(&state.financial_metrics);
            let track = &mut state.score_history.health;
            track.record(breakdown.score as u16, now);

            info!(score = breakdown.score, delta = ?track.delta(), "health score computed");
            Ok(HealthReport {
                score: breakdown.score,
                previous: track.previous_score(),
                delta: track.delta(),
                breakdown,
            })
        })
    }

    pub fn credit_report(&self) -> Result<CreditReport, TreasuryServiceError> {
        self.credit_report_at(Utc::now())
    }

    /// Credit scores drift once per week; within a week the cached score is reused.
    pub fn credit_report_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<CreditReport, TreasuryServiceError> {
        self.update_state(|state| {
            let track = &mut state.score_history.credit;
            if !track.is_fresh(now) {
                let latest = track.latest.map(|snapshot| snapshot.score);
                let next = lock(&self.credit_drift)?.next_score(latest);
                track.record(next, now);
            }

            let score = track
                .latest
                .map(|snapshot| snapshot.score)
                .ok_or_else(|| {
                    TreasuryServiceError::Unavailable("credit score missing".to_string())
                })?;

            Ok(CreditReport {
                score,
                previous: track.previous_score(),
                delta: track.delta(),
            })
        })
    }

    pub fn forecast(
        &self,
        horizon_days: Option<u32>,
    ) -> Result<CashFlowProjection, TreasuryServiceError> {
        let horizon_days = horizon_days.unwrap_or(self.default_horizon_days);
        if horizon_days == 0 || horizon_days > MAX_FORECAST_HORIZON_DAYS {
            return Err(TreasuryServiceError::InvalidHorizon(horizon_days));
        }

        let metrics = self.metrics()?;
        let current = metrics
            .latest_year()
            .ok_or(TreasuryServiceError::MissingFinancials)?;

        let projection = self
            .forecaster
            .project(current, &metrics.cash_flow, horizon_days);

        info!(
            horizon_days,
            projected_balance = projection.projected_balance,
            outlook = projection.outlook.label(),
            "cash-flow forecast computed"
        );
        Ok(projection)
    }

    /// Record upload metadata. Financial statements replace the stored metrics
    /// with fabricated figures since their contents are never read.
    pub fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<DocumentRecord, TreasuryServiceError> {
        self.upload_document_at(upload, Utc::now())
    }

    pub fn upload_document_at(
        &self,
        upload: DocumentUpload,
        now: DateTime<Utc>,
    ) -> Result<DocumentRecord, TreasuryServiceError> {
        let file_name = upload.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(TreasuryServiceError::InvalidDocument(
                "file name is required".to_string(),
            ));
        }

        self.update_state(|state| {
            let record = DocumentRecord {
                id: DocumentId(format!("doc-{:06}", state.documents.len() + 1)),
                file_name,
                category: upload.category,
                size_bytes: upload.size_bytes,
                uploaded_at: now,
            };

            if upload.category.is_financial_statement() {
                let latest_year = fabrication_year(&state.financial_metrics, now);
                state.financial_metrics = lock(&self.generator)?.metrics(latest_year);
                info!(
                    document = %record.id.0,
                    latest_year,
                    "financial statement upload replaced metrics with fabricated figures"
                );
            }

            state.documents.push(record.clone());
            Ok(record)
        })
    }

    pub fn checklist(&self) -> Result<CreditChecklist, TreasuryServiceError> {
        Ok(build_checklist(&self.store.load()?.documents))
    }

    /// Replace stored metrics with a seeded demo set ending in `latest_year`.
    pub fn seed_demo_data(
        &self,
        latest_year: i32,
    ) -> Result<FinancialMetrics, TreasuryServiceError> {
        let metrics = lock(&self.generator)?.metrics(latest_year);
        let stored = metrics.clone();
        self.update_state(|state| {
            state.financial_metrics = stored;
            Ok(())
        })?;
        info!(latest_year, "demo financial metrics seeded");
        Ok(metrics)
    }

    fn update_state<T>(
        &self,
        apply: impl FnOnce(&mut PortalState) -> Result<T, TreasuryServiceError>,
    ) -> Result<T, TreasuryServiceError> {
        let _guard = lock(&self.write_lock)?;
        let mut state = self.store.load()?;
        let value = apply(&mut state)?;
        self.store.save(&state)?;
        Ok(value)
    }
}

/// Latest stored year when it and the year before are calendar years, else last year.
fn fabrication_year(metrics: &FinancialMetrics, now: DateTime<Utc>) -> i32 {
    let calendar = (NaiveDate::MIN.year() + 1)..=NaiveDate::MAX.year();
    metrics
        .latest_year()
        .and_then(|snapshot| snapshot.year.trim().parse::<i32>().ok())
        .filter(|year| calendar.contains(year))
        .unwrap_or_else(|| now.year() - 1)
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, TreasuryServiceError> {
    mutex
        .lock()
        .map_err(|_| TreasuryServiceError::Unavailable("service mutex poisoned".to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub year: String,
    pub replaced: bool,
    pub ratios: FinancialRatios,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<i32>,
    pub breakdown: HealthScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditReport {
    pub score: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<i32>,
}

/// Error raised by the treasury service.
#[derive(Debug, thiserror::Error)]
pub enum TreasuryServiceError {
    #[error(transparent)]
    Validation(#[from] FinancialsValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no financials recorded for year {0}")]
    YearNotFound(String),
    #[error("no yearly financials recorded yet")]
    MissingFinancials,
    #[error(
        "forecast horizon must be between 1 and {max} days (got {0})",
        max = MAX_FORECAST_HORIZON_DAYS
    )]
    InvalidHorizon(u32),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}
