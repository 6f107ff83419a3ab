use serde::{Deserialize, Serialize};

use super::domain::{
    CashFlowProjection, CashOutlook, DailyTotal, ScheduledFlow, MAX_PROJECTION_DAYS,
};
use super::schedule::{ProportionalSchedule, ScheduledFlowSource, DAYS_PER_MONTH};
use crate::workflows::financials::{CashFlowEntry, YearlyFinancials};

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// A projected balance under this many days of average outflow is a low buffer.
pub const LOW_BUFFER_DAYS: f64 = 3.0;

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Opening cash used when no monthly history exists.
    pub fallback_cash_balance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            fallback_cash_balance: 0.0,
        }
    }
}

/// Average daily inflow and outflow used for the ADT projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyAverages {
    pub inflow: f64,
    pub outflow: f64,
}

impl DailyAverages {
    /// Prefers a supplied daily series, then the monthly history spread over
    /// thirty days, then the yearly income statement spread over a year.
    pub fn derive(
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        daily: &[DailyTotal],
    ) -> Self {
        if !daily.is_empty() {
            let days = daily.len() as f64;
            return Self {
                inflow: daily.iter().map(|day| day.inflow).sum::<f64>() / days,
                outflow: daily.iter().map(|day| day.outflow).sum::<f64>() / days,
            };
        }

        if !cash_flow.is_empty() {
            let months = cash_flow.len() as f64;
            return Self {
                inflow: cash_flow.iter().map(|entry| entry.income).sum::<f64>()
                    / months
                    / DAYS_PER_MONTH,
                outflow: cash_flow.iter().map(|entry| entry.expenses).sum::<f64>()
                    / months
                    / DAYS_PER_MONTH,
            };
        }

        Self {
            inflow: current.income.revenue / DAYS_PER_YEAR,
            outflow: current.income.expenses / DAYS_PER_YEAR,
        }
    }
}

pub struct CashFlowForecaster<S> {
    schedule: S,
    config: ForecastConfig,
}

impl Default for CashFlowForecaster<ProportionalSchedule> {
    fn default() -> Self {
        Self::new(ProportionalSchedule::default(), ForecastConfig::default())
    }
}

impl<S> CashFlowForecaster<S>
where
    S: ScheduledFlowSource,
{
    pub fn new(schedule: S, config: ForecastConfig) -> Self {
        Self { schedule, config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn project(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        horizon_days: u32,
    ) -> CashFlowProjection {
        self.project_with_history(current, cash_flow, &[], horizon_days)
    }

    /// Horizons beyond [`MAX_PROJECTION_DAYS`] are clamped; the returned
    /// projection reports the horizon actually used.
    pub fn project_with_history(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        daily: &[DailyTotal],
        horizon_days: u32,
    ) -> CashFlowProjection {
        let horizon_days = horizon_days.min(MAX_PROJECTION_DAYS);
        let current_cash = cash_flow
            .last()
            .map(|entry| entry.balance)
            .unwrap_or(self.config.fallback_cash_balance);

        let scheduled: Vec<ScheduledFlow> = self
            .schedule
            .scheduled_flows(current, cash_flow, horizon_days)
            .into_iter()
            .filter(|flow| flow.day_offset >= 1 && flow.day_offset <= horizon_days)
            .collect();

        let expected_cash_in: f64 = scheduled
            .iter()
            .filter(|flow| flow.kind.is_inflow())
            .map(|flow| flow.amount)
            .sum();
        let expected_cash_out: f64 = scheduled
            .iter()
            .filter(|flow| !flow.kind.is_inflow())
            .map(|flow| flow.amount)
            .sum();

        let averages = DailyAverages::derive(current, cash_flow, daily);
        let horizon = horizon_days as f64;
        let adt_projection_in = averages.inflow * horizon;
        let adt_projection_out = averages.outflow * horizon;

        let projected_balance = current_cash + expected_cash_in + adt_projection_in
            - expected_cash_out
            - adt_projection_out;

        let outlook = classify(projected_balance, averages.outflow);
        let recommendations = recommendations(outlook, projected_balance, horizon_days);

        CashFlowProjection {
            horizon_days,
            current_cash,
            expected_cash_in,
            expected_cash_out,
            adt_projection_in,
            adt_projection_out,
            avg_daily_inflow: averages.inflow,
            avg_daily_outflow: averages.outflow,
            projected_balance,
            outlook,
            recommendations,
            scheduled,
        }
    }
}

/// Projection with the proportional schedule and default configuration.
pub fn project_cash_flow(
    current: &YearlyFinancials,
    cash_flow: &[CashFlowEntry],
    horizon_days: u32,
) -> CashFlowProjection {
    CashFlowForecaster::default().project(current, cash_flow, horizon_days)
}

pub fn classify(projected_balance: f64, avg_daily_outflow: f64) -> CashOutlook {
    if projected_balance < 0.0 {
        CashOutlook::UrgentShortfall
    } else if projected_balance < LOW_BUFFER_DAYS * avg_daily_outflow {
        CashOutlook::LowBuffer
    } else {
        CashOutlook::Stable
    }
}

fn recommendations(outlook: CashOutlook, projected_balance: f64, horizon_days: u32) -> Vec<String> {
    match outlook {
        CashOutlook::UrgentShortfall => vec![
            format!(
                "Projected shortfall of {:.2} within {horizon_days} days",
                -projected_balance
            ),
            "Accelerate collection of outstanding receivables".to_string(),
            "Defer non-critical payables or draw on the revolving credit line".to_string(),
        ],
        CashOutlook::LowBuffer => vec![
            format!(
                "Projected balance of {projected_balance:.2} covers less than {LOW_BUFFER_DAYS:.0} days of average outflows"
            ),
            "Hold discretionary payments until receivables clear".to_string(),
        ],
        CashOutlook::Stable => vec![format!(
            "Projected balance of {projected_balance:.2} remains healthy over the next {horizon_days} days"
        )],
    }
}
