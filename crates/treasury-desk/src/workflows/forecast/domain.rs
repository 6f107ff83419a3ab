use serde::{Deserialize, Serialize};

/// Longest horizon the forecaster projects; larger requests are clamped to it.
pub const MAX_PROJECTION_DAYS: u32 = 3_650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Receivable,
    Payable,
    Payout,
}

impl FlowKind {
    pub fn is_inflow(&self) -> bool {
        matches!(self, FlowKind::Receivable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowKind::Receivable => "Receivable",
            FlowKind::Payable => "Payable",
            FlowKind::Payout => "Payout",
        }
    }
}

/// A documented cash movement expected `day_offset` days from today (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledFlow {
    pub day_offset: u32,
    pub kind: FlowKind,
    pub amount: f64,
    pub description: String,
}

/// One day of historical bank activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub inflow: f64,
    pub outflow: f64,
}

/// Recommendation bucket for a projected balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashOutlook {
    UrgentShortfall,
    LowBuffer,
    Stable,
}

impl CashOutlook {
    pub fn label(&self) -> &'static str {
        match self {
            CashOutlook::UrgentShortfall => "Urgent shortfall",
            CashOutlook::LowBuffer => "Low buffer",
            CashOutlook::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub horizon_days: u32,
    pub current_cash: f64,
    pub expected_cash_in: f64,
    pub expected_cash_out: f64,
    pub adt_projection_in: f64,
    pub adt_projection_out: f64,
    pub avg_daily_inflow: f64,
    pub avg_daily_outflow: f64,
    pub projected_balance: f64,
    pub outlook: CashOutlook,
    pub recommendations: Vec<String>,
    pub scheduled: Vec<ScheduledFlow>,
}
