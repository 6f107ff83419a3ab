use serde::{Deserialize, Serialize};

use super::domain::{CashFlowEntry, FinancialMetrics};

pub const BASE_SCORE: f64 = 70.0;
pub const MIN_SCORE: u8 = 30;
pub const MAX_SCORE: u8 = 95;

/// Months compared on each side of the trend split.
pub const TREND_WINDOW_MONTHS: usize = 3;

const INCOME_TREND_DIVISOR: f64 = 5.0;
const INCOME_TREND_CAP: f64 = 10.0;
const EXPENSE_TREND_DIVISOR: f64 = 4.0;
const EXPENSE_TREND_CAP: f64 = 15.0;
const BALANCE_DIVISOR: f64 = 2_000.0;
const BALANCE_CAP: f64 = 10.0;

/// Additive terms behind a health score so the summary cards can show why the
/// score moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScoreBreakdown {
    pub base: f64,
    pub income_trend_pct: f64,
    pub expense_trend_pct: f64,
    pub income_adjustment: f64,
    pub expense_adjustment: f64,
    pub liquidity_adjustment: f64,
    pub score: u8,
}

/// Percentage change of average income and expenses between the prior and the
/// most recent three months. Zero when fewer than six months are known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendDelta {
    pub income_pct: f64,
    pub expenses_pct: f64,
}

pub fn trend_delta(cash_flow: &[CashFlowEntry]) -> TrendDelta {
    let window = TREND_WINDOW_MONTHS;
    if cash_flow.len() < window * 2 {
        return TrendDelta::default();
    }

    let tail = &cash_flow[cash_flow.len() - window * 2..];
    let (prior, recent) = tail.split_at(window);

    TrendDelta {
        income_pct: percent_change(
            average(prior, |entry| entry.income),
            average(recent, |entry| entry.income),
        ),
        expenses_pct: percent_change(
            average(prior, |entry| entry.expenses),
            average(recent, |entry| entry.expenses),
        ),
    }
}

pub fn health_breakdown(metrics: &FinancialMetrics) -> HealthScoreBreakdown {
    let delta = trend_delta(&metrics.cash_flow);
    let last_balance = metrics
        .cash_flow
        .last()
        .map(|entry| entry.balance)
        .unwrap_or(0.0);

    let income_adjustment =
        (delta.income_pct / INCOME_TREND_DIVISOR).clamp(-INCOME_TREND_CAP, INCOME_TREND_CAP);
    let expense_adjustment =
        -(delta.expenses_pct / EXPENSE_TREND_DIVISOR).clamp(-EXPENSE_TREND_CAP, EXPENSE_TREND_CAP);
    let liquidity_adjustment = (last_balance / BALANCE_DIVISOR).clamp(-BALANCE_CAP, BALANCE_CAP);

    let raw = BASE_SCORE + income_adjustment + expense_adjustment + liquidity_adjustment;
    let score = if raw.is_nan() {
        BASE_SCORE
    } else {
        raw.clamp(MIN_SCORE as f64, MAX_SCORE as f64).round()
    };

    HealthScoreBreakdown {
        base: BASE_SCORE,
        income_trend_pct: delta.income_pct,
        expense_trend_pct: delta.expenses_pct,
        income_adjustment,
        expense_adjustment,
        liquidity_adjustment,
        score: score as u8,
    }
}

/// Bounded business-health score in `[30, 95]`.
pub fn compute_health_score(metrics: &FinancialMetrics) -> u8 {
    health_breakdown(metrics).score
}

fn average(entries: &[CashFlowEntry], field: impl Fn(&CashFlowEntry) -> f64) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(field).sum::<f64>() / entries.len() as f64
}

// A zero prior average divides by one instead.
fn percent_change(prior: f64, recent: f64) -> f64 {
    let denominator = if prior == 0.0 { 1.0 } else { prior };
    (recent - prior) / denominator * 100.0
}
