use super::tiers::{ApprovalTier, ApprovalTierTable};

/// Amounts arrive straight from form inputs with no upstream validation.
/// Negative and NaN amounts resolve as zero, i.e. the lowest tier.
pub fn normalize_amount(amount: f64) -> f64 {
    if amount.is_nan() || amount < 0.0 {
        0.0
    } else {
        amount
    }
}

/// Stateless lookup over a validated threshold table.
#[derive(Debug, Clone, Default)]
pub struct ApprovalResolver {
    table: ApprovalTierTable,
}

impl ApprovalResolver {
    pub fn new(table: ApprovalTierTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ApprovalTierTable {
        &self.table
    }

    /// First tier whose ceiling is at or above the amount, else the top tier.
    pub fn resolve(&self, amount: f64) -> &ApprovalTier {
        let amount = normalize_amount(amount);
        self.table
            .bounded_tiers()
            .iter()
            .find(|tier| tier.threshold_amount.admits(amount))
            .unwrap_or_else(|| self.table.top_tier())
    }
}

/// Resolve against the standard table.
pub fn resolve_approval_tier(amount: f64) -> ApprovalTier {
    ApprovalResolver::default().resolve(amount).clone()
}
