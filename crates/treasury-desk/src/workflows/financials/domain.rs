use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub current_assets: f64,
    pub long_term_assets: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityBreakdown {
    pub current_liabilities: f64,
    pub long_term_liabilities: f64,
    pub total_liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
}

/// Balance-sheet and income snapshot for one fiscal year.
///
/// `total_assets = current + long_term` and `equity = total_assets - total_liabilities`
/// are maintained by whoever builds the value; they are not re-derived here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyFinancials {
    pub year: String,
    pub assets: AssetBreakdown,
    pub liabilities: LiabilityBreakdown,
    pub equity: f64,
    pub income: IncomeStatement,
}

impl YearlyFinancials {
    /// Builds a snapshot whose totals, equity and net income are consistent with
    /// the supplied components.
    pub fn from_components(
        year: impl Into<String>,
        current_assets: f64,
        long_term_assets: f64,
        current_liabilities: f64,
        long_term_liabilities: f64,
        revenue: f64,
        expenses: f64,
    ) -> Self {
        let total_assets = current_assets + long_term_assets;
        let total_liabilities = current_liabilities + long_term_liabilities;

        Self {
            year: year.into(),
            assets: AssetBreakdown {
                current_assets,
                long_term_assets,
                total_assets,
            },
            liabilities: LiabilityBreakdown {
                current_liabilities,
                long_term_liabilities,
                total_liabilities,
            },
            equity: total_assets - total_liabilities,
            income: IncomeStatement {
                revenue,
                expenses,
                net_income: revenue - expenses,
            },
        }
    }

    /// Form-level checks: year is at least four characters and every monetary
    /// field except equity and net income is a non-negative number.
    pub fn validate(&self) -> Result<(), FinancialsValidationError> {
        if self.year.trim().chars().count() < 4 {
            return Err(FinancialsValidationError::InvalidYear {
                year: self.year.clone(),
            });
        }

        let fields = [
            ("current_assets", self.assets.current_assets),
            ("long_term_assets", self.assets.long_term_assets),
            ("total_assets", self.assets.total_assets),
            ("current_liabilities", self.liabilities.current_liabilities),
            (
                "long_term_liabilities",
                self.liabilities.long_term_liabilities,
            ),
            ("total_liabilities", self.liabilities.total_liabilities),
            ("revenue", self.income.revenue),
            ("expenses", self.income.expenses),
        ];

        for (field, value) in fields {
            check_amount(field, value)?;
        }

        for (field, value) in [("equity", self.equity), ("net_income", self.income.net_income)] {
            if !value.is_finite() {
                return Err(FinancialsValidationError::NotFinite { field });
            }
        }

        Ok(())
    }
}

/// One month of the cash-flow history, oldest first in any sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

impl CashFlowEntry {
    pub fn new(month: impl Into<String>, income: f64, expenses: f64, balance: f64) -> Self {
        Self {
            month: month.into(),
            income,
            expenses,
            balance,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    /// Balance may be negative (overdraft); income and expenses may not.
    pub fn validate(&self) -> Result<(), FinancialsValidationError> {
        if self.month.trim().is_empty() {
            return Err(FinancialsValidationError::MissingMonth);
        }
        check_amount("income", self.income)?;
        check_amount("expenses", self.expenses)?;
        if !self.balance.is_finite() {
            return Err(FinancialsValidationError::NotFinite { field: "balance" });
        }
        Ok(())
    }
}

/// Everything the business-health views read: yearly snapshots plus the monthly
/// cash-flow history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub yearly: Vec<YearlyFinancials>,
    pub cash_flow: Vec<CashFlowEntry>,
}

impl FinancialMetrics {
    /// Most recent snapshot by year key. Numeric years compare numerically and
    /// sort after any non-numeric label.
    pub fn latest_year(&self) -> Option<&YearlyFinancials> {
        self.yearly
            .iter()
            .max_by(|a, b| year_key(&a.year).cmp(&year_key(&b.year)))
    }

    pub fn year(&self, year: &str) -> Option<&YearlyFinancials> {
        self.yearly.iter().find(|snapshot| snapshot.year == year)
    }

    /// Inserts the snapshot, replacing any existing snapshot for the same year.
    /// Returns true when a previous snapshot was overwritten.
    pub fn upsert_year(&mut self, snapshot: YearlyFinancials) -> bool {
        match self
            .yearly
            .iter_mut()
            .find(|existing| existing.year == snapshot.year)
        {
            Some(existing) => {
                *existing = snapshot;
                true
            }
            None => {
                self.yearly.push(snapshot);
                self.yearly
                    .sort_by(|a, b| year_key(&a.year).cmp(&year_key(&b.year)));
                false
            }
        }
    }
}

fn year_key(year: &str) -> (Option<i64>, &str) {
    (year.trim().parse::<i64>().ok(), year)
}

fn check_amount(field: &'static str, value: f64) -> Result<(), FinancialsValidationError> {
    if !value.is_finite() {
        return Err(FinancialsValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(FinancialsValidationError::NegativeAmount { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinancialsValidationError {
    #[error("year '{year}' must be at least four characters")]
    InvalidYear { year: String },
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("cash-flow entry is missing its month")]
    MissingMonth,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> YearlyFinancials {
        YearlyFinancials::from_components(
            "2024", 800_000.0, 1_200_000.0, 400_000.0, 600_000.0, 2_500_000.0, 2_100_000.0,
        )
    }

    #[test]
    fn from_components_keeps_totals_consistent() {
        let snapshot = snapshot();
        assert_eq!(snapshot.assets.total_assets, 2_000_000.0);
        assert_eq!(snapshot.liabilities.total_liabilities, 1_000_000.0);
        assert_eq!(snapshot.equity, 1_000_000.0);
        assert_eq!(snapshot.income.net_income, 400_000.0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_year() {
        let mut snapshot = snapshot();
        snapshot.year = "24".to_string();
        assert!(matches!(
            snapshot.validate(),
            Err(FinancialsValidationError::InvalidYear { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_revenue() {
        let mut snapshot = snapshot();
        snapshot.income.revenue = -1.0;
        assert_eq!(
            snapshot.validate(),
            Err(FinancialsValidationError::NegativeAmount {
                field: "revenue",
                value: -1.0
            })
        );
    }

    #[test]
    fn validate_allows_negative_equity() {
        let snapshot =
            YearlyFinancials::from_components("2024", 10.0, 0.0, 50.0, 0.0, 100.0, 150.0);
        assert!(snapshot.equity < 0.0);
        assert!(snapshot.income.net_income < 0.0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn cash_flow_entry_allows_overdraft_balance() {
        let entry = CashFlowEntry::new("2024-06", 1_000.0, 3_000.0, -2_000.0);
        assert!(entry.validate().is_ok());
        assert_eq!(entry.net(), -2_000.0);

        let entry = CashFlowEntry::new("2024-06", -5.0, 0.0, 0.0);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn upsert_overwrites_same_year() {
        let mut metrics = FinancialMetrics::default();
        assert!(!metrics.upsert_year(snapshot()));

        let mut revised = snapshot();
        revised.income.revenue = 3_000_000.0;
        assert!(metrics.upsert_year(revised));

        assert_eq!(metrics.yearly.len(), 1);
        assert_eq!(metrics.yearly[0].income.revenue, 3_000_000.0);
    }

    #[test]
    fn latest_year_uses_year_key() {
        let mut metrics = FinancialMetrics::default();
        let mut later = snapshot();
        later.year = "2025".to_string();
        metrics.upsert_year(later);
        metrics.upsert_year(snapshot());

        assert_eq!(metrics.yearly[0].year, "2024");
        assert_eq!(metrics.latest_year().map(|y| y.year.as_str()), Some("2025"));
    }

    #[test]
    fn year_key_orders_numerically_before_labels() {
        let mut metrics = FinancialMetrics::default();
        for year in ["10000", "FY2025", "2026", "2024"] {
            let mut entry = snapshot();
            entry.year = year.to_string();
            metrics.upsert_year(entry);
        }

        let years: Vec<&str> = metrics.yearly.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["FY2025", "2024", "2026", "10000"]);
        assert_eq!(metrics.latest_year().map(|y| y.year.as_str()), Some("10000"));
    }
}
