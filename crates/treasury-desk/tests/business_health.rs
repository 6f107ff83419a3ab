//! Ratio, health score and forecast calculators driven through public types.

use proptest::prelude::*;
use treasury_desk::workflows::financials::{
    compute_health_score, compute_ratios, CashFlowEntry, FinancialMetrics, YearlyFinancials,
    MAX_SCORE, MIN_SCORE,
};
use treasury_desk::workflows::forecast::{
    project_cash_flow, CashFlowForecaster, CashOutlook, FixedSchedule, FlowKind, ForecastConfig,
    ScheduledFlow,
};

fn snapshot(revenue: f64, expenses: f64) -> YearlyFinancials {
    YearlyFinancials::from_components(
        "2025", 250_000.0, 400_000.0, 125_000.0, 200_000.0, revenue, expenses,
    )
}

fn history(months: &[(f64, f64, f64)]) -> Vec<CashFlowEntry> {
    months
        .iter()
        .enumerate()
        .map(|(index, (income, expenses, balance))| {
            CashFlowEntry::new(format!("2025-{:02}", index + 1), *income, *expenses, *balance)
        })
        .collect()
}

#[test]
fn zero_revenue_leaves_margins_undefined() {
    let ratios = compute_ratios(&snapshot(0.0, 10_000.0));
    assert_eq!(ratios.profit_margin, None);
    assert_eq!(ratios.gross_margin, None);
    assert_eq!(ratios.current_ratio, Some(2.0));

    let json = serde_json::to_value(ratios).expect("ratios serialize");
    assert!(json["profit_margin"].is_null());
}

#[test]
fn growing_income_and_falling_costs_raise_the_score() {
    let metrics = FinancialMetrics {
        yearly: vec![snapshot(1_200_000.0, 900_000.0)],
        cash_flow: history(&[
            (10_000.0, 9_000.0, 5_000.0),
            (10_000.0, 9_000.0, 6_000.0),
            (10_000.0, 9_000.0, 7_000.0),
            (12_000.0, 8_100.0, 11_000.0),
            (12_000.0, 8_100.0, 15_000.0),
            (12_000.0, 8_100.0, 19_000.0),
        ]),
    };
    // +20% income → +4, -10% expenses → +2.5, 19k balance → +9.5
    assert_eq!(compute_health_score(&metrics), 86);
}

#[test]
fn forecast_adds_documented_flows_to_the_run_rate() {
    let current = snapshot(1_200_000.0, 900_000.0);
    let cash_flow = history(&[(30_000.0, 15_000.0, 20_000.0)]);
    let forecaster = CashFlowForecaster::new(
        FixedSchedule::new(vec![
            ScheduledFlow {
                day_offset: 2,
                kind: FlowKind::Receivable,
                amount: 4_000.0,
                description: "Invoice 2207".to_string(),
            },
            ScheduledFlow {
                day_offset: 6,
                kind: FlowKind::Payout,
                amount: 1_000.0,
                description: "Contractor payout".to_string(),
            },
            ScheduledFlow {
                day_offset: 30,
                kind: FlowKind::Payable,
                amount: 50_000.0,
                description: "Lease renewal".to_string(),
            },
        ]),
        ForecastConfig::default(),
    );

    let projection = forecaster.project(&current, &cash_flow, 7);
    assert_eq!(projection.scheduled.len(), 2);
    assert_eq!(projection.expected_cash_in, 4_000.0);
    assert_eq!(projection.expected_cash_out, 1_000.0);
    // 1,000/day in and 500/day out over seven days
    assert_eq!(projection.adt_projection_in, 7_000.0);
    assert_eq!(projection.adt_projection_out, 3_500.0);
    assert_eq!(projection.projected_balance, 26_500.0);
    assert_eq!(projection.outlook, CashOutlook::Stable);
}

#[test]
fn overdrawn_accounts_project_an_urgent_shortfall() {
    let current = snapshot(0.0, 0.0);
    let cash_flow = history(&[(0.0, 3_000.0, -500.0)]);

    let projection = project_cash_flow(&current, &cash_flow, 7);
    assert!(projection.projected_balance < 0.0);
    assert_eq!(projection.outlook, CashOutlook::UrgentShortfall);
    assert!(projection.recommendations[0].starts_with("Projected shortfall"));
}

fn arb_entry() -> impl Strategy<Value = (f64, f64, f64)> {
    (
        0.0f64..1_000_000.0,
        0.0f64..1_000_000.0,
        -1_000_000.0f64..1_000_000.0,
    )
}

proptest! {
    #[test]
    fn health_score_stays_within_bounds(months in prop::collection::vec(arb_entry(), 0..24)) {
        let metrics = FinancialMetrics {
            yearly: Vec::new(),
            cash_flow: history(&months),
        };
        let score = compute_health_score(&metrics);
        prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
    }
}
