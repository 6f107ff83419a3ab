use chrono::{Datelike, Months, NaiveDate};

use super::rng::SeededRng;
use crate::workflows::financials::{CashFlowEntry, FinancialMetrics, YearlyFinancials};

pub const CREDIT_SCORE_FLOOR: u16 = 300;
pub const CREDIT_SCORE_CEILING: u16 = 850;
pub const CREDIT_SCORE_START: u16 = 680;
pub const CREDIT_SCORE_MAX_STEP: i64 = 15;

/// Fabricates plausible statements for uploads whose contents are never parsed.
#[derive(Debug, Clone)]
pub struct MockFinancialsGenerator {
    rng: SeededRng,
}

impl MockFinancialsGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::new(seed),
        }
    }

    pub fn yearly(&mut self, year: &str) -> YearlyFinancials {
        let revenue = whole(self.rng.range_f64(1_200_000.0, 4_500_000.0));
        let expenses = whole(revenue * self.rng.range_f64(0.70, 0.95));
        let current_assets = whole(revenue * self.rng.range_f64(0.15, 0.30));
        let long_term_assets = whole(revenue * self.rng.range_f64(0.30, 0.60));
        let current_liabilities = whole(current_assets * self.rng.range_f64(0.40, 0.80));
        let long_term_liabilities = whole(long_term_assets * self.rng.range_f64(0.20, 0.50));

        YearlyFinancials::from_components(
            year,
            current_assets,
            long_term_assets,
            current_liabilities,
            long_term_liabilities,
            revenue,
            expenses,
        )
    }

    /// Monthly history starting at `start`'s month, with a running balance.
    pub fn cash_flow(
        &mut self,
        start: NaiveDate,
        months: u32,
        monthly_income: f64,
        opening_balance: f64,
    ) -> Vec<CashFlowEntry> {
        let first_of_month = start.with_day(1).unwrap_or(start);
        let mut balance = opening_balance;
        let mut entries = Vec::with_capacity(months as usize);

        for offset in 0..months {
            let Some(month) = first_of_month.checked_add_months(Months::new(offset)) else {
                break;
            };
            let income = whole(monthly_income * self.rng.range_f64(0.85, 1.15));
            let expenses = whole(income * self.rng.range_f64(0.75, 1.02));
            balance = whole(balance + income - expenses);

            entries.push(CashFlowEntry::new(
                month.format("%Y-%m").to_string(),
                income,
                expenses,
                balance,
            ));
        }

        entries
    }

    /// Two fiscal years ending in `latest_year` plus that year's twelve months.
    /// The cash-flow history is empty when the year is outside the calendar range.
    pub fn metrics(&mut self, latest_year: i32) -> FinancialMetrics {
        let latest_year = latest_year.max(i32::MIN + 1);
        let prior_year = latest_year.saturating_sub(1);
        let prior = self.yearly(&prior_year.to_string());
        let current = self.yearly(&latest_year.to_string());
        let monthly_income = current.income.revenue / 12.0;
        let opening_balance = whole(current.assets.current_assets * 0.4);

        let cash_flow = match NaiveDate::from_ymd_opt(latest_year, 1, 1) {
            Some(start) => self.cash_flow(start, 12, monthly_income, opening_balance),
            None => Vec::new(),
        };

        FinancialMetrics {
            yearly: vec![prior, current],
            cash_flow,
        }
    }
}

/// Week-over-week credit score movement shown on the credit dashboard.
#[derive(Debug, Clone)]
pub struct CreditScoreDrift {
    rng: SeededRng,
}

impl CreditScoreDrift {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::new(seed),
        }
    }

    pub fn next_score(&mut self, previous: Option<u16>) -> u16 {
        let previous = previous.unwrap_or(CREDIT_SCORE_START) as i64;
        let step = self
            .rng
            .range_i64(-CREDIT_SCORE_MAX_STEP, CREDIT_SCORE_MAX_STEP);
        (previous + step).clamp(CREDIT_SCORE_FLOOR as i64, CREDIT_SCORE_CEILING as i64) as u16
    }
}

fn whole(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yearly_snapshots_are_balanced_and_valid() {
        let mut generator = MockFinancialsGenerator::new(11);
        for year in ["2023", "2024", "2025"] {
            let snapshot = generator.yearly(year);
            assert!(snapshot.validate().is_ok());
            assert_eq!(
                snapshot.assets.total_assets,
                snapshot.assets.current_assets + snapshot.assets.long_term_assets
            );
            assert_eq!(
                snapshot.equity,
                snapshot.assets.total_assets - snapshot.liabilities.total_liabilities
            );
            assert!(snapshot.income.expenses < snapshot.income.revenue);
        }
    }

    #[test]
    fn same_seed_fabricates_same_metrics() {
        let a = MockFinancialsGenerator::new(42).metrics(2025);
        let b = MockFinancialsGenerator::new(42).metrics(2025);
        assert_eq!(a, b);

        let c = MockFinancialsGenerator::new(43).metrics(2025);
        assert_ne!(a, c);
    }

    #[test]
    fn extreme_years_fabricate_distinct_snapshots() {
        let mut generator = MockFinancialsGenerator::new(3);

        let metrics = generator.metrics(i32::MIN);
        let years: Vec<&str> = metrics.yearly.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["-2147483648", "-2147483647"]);
        assert!(metrics.cash_flow.is_empty());

        let metrics = generator.metrics(i32::MAX);
        assert_eq!(metrics.yearly[0].year, (i32::MAX - 1).to_string());
        assert!(metrics.cash_flow.is_empty());
    }

    #[test]
    fn cash_flow_is_chronological_with_running_balance() {
        let mut generator = MockFinancialsGenerator::new(5);
        let start = NaiveDate::from_ymd_opt(2024, 11, 17).expect("valid date");
        let entries = generator.cash_flow(start, 4, 100_000.0, 10_000.0);

        let months: Vec<&str> = entries.iter().map(|entry| entry.month.as_str()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);

        let mut balance = 10_000.0;
        for entry in &entries {
            balance += entry.income - entry.expenses;
            assert_eq!(entry.balance, balance);
        }
    }

    #[test]
    fn credit_drift_stays_within_bounds() {
        let mut drift = CreditScoreDrift::new(99);
        let first = drift.next_score(None);
        assert!((CREDIT_SCORE_START - 15..=CREDIT_SCORE_START + 15).contains(&first));

        assert!(drift.next_score(Some(CREDIT_SCORE_CEILING)) <= CREDIT_SCORE_CEILING);
        assert!(drift.next_score(Some(CREDIT_SCORE_FLOOR)) >= CREDIT_SCORE_FLOOR);
    }
}
