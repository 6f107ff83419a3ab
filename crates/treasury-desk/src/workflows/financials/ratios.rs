use serde::{Deserialize, Serialize};

use super::domain::YearlyFinancials;

/// Liquidity, leverage and margin ratios for one year.
///
/// A ratio whose denominator is zero is `None` (serialized as `null`) rather
/// than an infinity or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub gross_margin: Option<f64>,
}

impl FinancialRatios {
    /// Names of the ratios that could not be computed.
    pub fn undefined(&self) -> Vec<&'static str> {
        [
            ("current_ratio", self.current_ratio),
            ("debt_to_equity", self.debt_to_equity),
            ("profit_margin", self.profit_margin),
            ("gross_margin", self.gross_margin),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

pub fn compute_ratios(year: &YearlyFinancials) -> FinancialRatios {
    let revenue = year.income.revenue;

    FinancialRatios {
        current_ratio: ratio(
            year.assets.current_assets,
            year.liabilities.current_liabilities,
        ),
        debt_to_equity: ratio(year.liabilities.total_liabilities, year.equity),
        profit_margin: ratio(year.income.net_income, revenue).map(|value| value * 100.0),
        gross_margin: ratio(revenue - year.income.expenses, revenue).map(|value| value * 100.0),
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> YearlyFinancials {
        YearlyFinancials::from_components(
            "2024", 800_000.0, 1_200_000.0, 400_000.0, 600_000.0, 2_500_000.0, 2_000_000.0,
        )
    }

    #[test]
    fn current_ratio_is_exact() {
        let ratios = compute_ratios(&snapshot());
        assert_eq!(ratios.current_ratio, Some(2.0));
    }

    #[test]
    fn computes_leverage_and_margins() {
        let ratios = compute_ratios(&snapshot());
        assert_eq!(ratios.debt_to_equity, Some(1.0));
        assert_eq!(ratios.profit_margin, Some(20.0));
        assert_eq!(ratios.gross_margin, Some(20.0));
        assert!(ratios.undefined().is_empty());
    }

    #[test]
    fn profit_margin_follows_reported_net_income() {
        let mut snapshot = snapshot();
        snapshot.income.net_income = 250_000.0;
        let ratios = compute_ratios(&snapshot);
        assert_eq!(ratios.profit_margin, Some(10.0));
        assert_eq!(ratios.gross_margin, Some(20.0));
    }

    #[test]
    fn zero_denominators_are_undefined() {
        let snapshot =
            YearlyFinancials::from_components("2024", 500.0, 500.0, 0.0, 1_000.0, 0.0, 0.0);
        let ratios = compute_ratios(&snapshot);

        assert_eq!(ratios.current_ratio, None);
        assert_eq!(snapshot.equity, 0.0);
        assert_eq!(ratios.debt_to_equity, None);
        assert_eq!(ratios.profit_margin, None);
        assert_eq!(ratios.gross_margin, None);
        assert_eq!(
            ratios.undefined(),
            vec![
                "current_ratio",
                "debt_to_equity",
                "profit_margin",
                "gross_margin"
            ]
        );
    }

    #[test]
    fn undefined_ratio_serializes_as_null() {
        let snapshot = YearlyFinancials::from_components("2024", 500.0, 0.0, 0.0, 0.0, 10.0, 5.0);
        let json = serde_json::to_value(compute_ratios(&snapshot)).expect("serialize");
        assert!(json["current_ratio"].is_null());
        assert_eq!(json["gross_margin"], serde_json::json!(50.0));
    }

    #[test]
    fn negative_equity_produces_negative_leverage() {
        let snapshot =
            YearlyFinancials::from_components("2024", 100.0, 0.0, 150.0, 50.0, 1_000.0, 900.0);
        let ratios = compute_ratios(&snapshot);
        assert_eq!(ratios.debt_to_equity, Some(-2.0));
    }
}
