//! Business-health inputs and the pure calculators that read them.

pub mod domain;
mod health;
mod ratios;

pub use domain::{
    AssetBreakdown, CashFlowEntry, FinancialMetrics, FinancialsValidationError, IncomeStatement,
    LiabilityBreakdown, YearlyFinancials,
};
pub use health::{
    compute_health_score, health_breakdown, trend_delta, HealthScoreBreakdown, TrendDelta,
    BASE_SCORE, MAX_SCORE, MIN_SCORE, TREND_WINDOW_MONTHS,
};
pub use ratios::{compute_ratios, FinancialRatios};
