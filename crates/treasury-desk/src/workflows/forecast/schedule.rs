use super::domain::{FlowKind, ScheduledFlow, MAX_PROJECTION_DAYS};
use crate::workflows::financials::{CashFlowEntry, YearlyFinancials};
use crate::workflows::mock::SeededRng;

pub const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_WEEK: u32 = 7;

/// Supplies the documented receivables, payables and payouts the forecast adds
/// on top of the historical run rate.
pub trait ScheduledFlowSource: Send + Sync {
    fn scheduled_flows(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        horizon_days: u32,
    ) -> Vec<ScheduledFlow>;
}

impl<T> ScheduledFlowSource for Box<T>
where
    T: ScheduledFlowSource + ?Sized,
{
    fn scheduled_flows(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        horizon_days: u32,
    ) -> Vec<ScheduledFlow> {
        (**self).scheduled_flows(current, cash_flow, horizon_days)
    }
}

/// Deterministic split of the latest monthly aggregates into weekly
/// receivable, payable and payout installments.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionalSchedule {
    pub receivable_share: f64,
    pub payable_share: f64,
    pub payout_share: f64,
    pub receivable_day: u32,
    pub payable_day: u32,
    pub payout_day: u32,
}

impl Default for ProportionalSchedule {
    fn default() -> Self {
        Self {
            receivable_share: 0.25,
            payable_share: 0.20,
            payout_share: 0.10,
            receivable_day: 3,
            payable_day: 5,
            payout_day: 7,
        }
    }
}

impl ProportionalSchedule {
    fn monthly_aggregates(current: &YearlyFinancials, cash_flow: &[CashFlowEntry]) -> (f64, f64) {
        match cash_flow.last() {
            Some(entry) => (entry.income, entry.expenses),
            None => (
                current.income.revenue / 12.0,
                current.income.expenses / 12.0,
            ),
        }
    }
}

impl ScheduledFlowSource for ProportionalSchedule {
    fn scheduled_flows(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        horizon_days: u32,
    ) -> Vec<ScheduledFlow> {
        let (monthly_income, monthly_expenses) = Self::monthly_aggregates(current, cash_flow);
        let weekly = DAYS_PER_WEEK as f64 / DAYS_PER_MONTH;
        let weeks = horizon_days.min(MAX_PROJECTION_DAYS).div_ceil(DAYS_PER_WEEK);

        let installments = [
            (
                FlowKind::Receivable,
                self.receivable_day,
                monthly_income * self.receivable_share * weekly,
                "Customer invoices due",
            ),
            (
                FlowKind::Payable,
                self.payable_day,
                monthly_expenses * self.payable_share * weekly,
                "Supplier bills due",
            ),
            (
                FlowKind::Payout,
                self.payout_day,
                monthly_expenses * self.payout_share * weekly,
                "Payroll and scheduled payouts",
            ),
        ];

        let mut flows = Vec::new();
        for week in 0..weeks {
            for (kind, day, amount, description) in installments {
                flows.push(ScheduledFlow {
                    day_offset: week * DAYS_PER_WEEK + day,
                    kind,
                    amount,
                    description: description.to_string(),
                });
            }
        }
        flows.sort_by_key(|flow| flow.day_offset);
        flows
    }
}

/// Demo adapter that jitters proportional installments by up to 20% in amount
/// and one day in timing. Seeded per call, so equal inputs give equal flows.
#[derive(Debug, Clone)]
pub struct SeededSchedule {
    base: ProportionalSchedule,
    seed: u64,
}

impl SeededSchedule {
    pub fn new(seed: u64) -> Self {
        Self {
            base: ProportionalSchedule::default(),
            seed,
        }
    }

    pub fn with_base(base: ProportionalSchedule, seed: u64) -> Self {
        Self { base, seed }
    }
}

impl ScheduledFlowSource for SeededSchedule {
    fn scheduled_flows(
        &self,
        current: &YearlyFinancials,
        cash_flow: &[CashFlowEntry],
        horizon_days: u32,
    ) -> Vec<ScheduledFlow> {
        let mut rng = SeededRng::new(self.seed);
        let mut flows = self.base.scheduled_flows(current, cash_flow, horizon_days);

        for flow in &mut flows {
            flow.amount = (flow.amount * rng.range_f64(0.8, 1.2)).round();
            let shifted = flow.day_offset as i64 + rng.range_i64(-1, 1);
            flow.day_offset = shifted.max(1) as u32;
        }
        flows.sort_by_key(|flow| flow.day_offset);
        flows
    }
}

/// Injected fixture list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedSchedule {
    flows: Vec<ScheduledFlow>,
}

impl FixedSchedule {
    pub fn new(flows: Vec<ScheduledFlow>) -> Self {
        Self { flows }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ScheduledFlowSource for FixedSchedule {
    fn scheduled_flows(
        &self,
        _current: &YearlyFinancials,
        _cash_flow: &[CashFlowEntry],
        _horizon_days: u32,
    ) -> Vec<ScheduledFlow> {
        self.flows.clone()
    }
}
