use serde::{Deserialize, Serialize};

/// Upper bound of an approval tier.
///
/// An amount exactly equal to an `AtMost` ceiling belongs to that tier, not the
/// next one up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum TierCeiling {
    AtMost(f64),
    Unbounded,
}

impl TierCeiling {
    pub fn admits(&self, amount: f64) -> bool {
        match self {
            TierCeiling::AtMost(ceiling) => amount <= *ceiling,
            TierCeiling::Unbounded => true,
        }
    }

    pub fn label(&self) -> String {
        match self {
            TierCeiling::AtMost(ceiling) => format!("up to {ceiling:.2}"),
            TierCeiling::Unbounded => "no upper limit".to_string(),
        }
    }
}

/// Named bracket of transaction amounts mapped to a required-approver count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalTier {
    pub threshold_amount: TierCeiling,
    pub required_approvers: u8,
    pub tier_name: String,
    pub description: String,
}

impl ApprovalTier {
    pub fn bounded(
        ceiling: f64,
        required_approvers: u8,
        tier_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            threshold_amount: TierCeiling::AtMost(ceiling),
            required_approvers,
            tier_name: tier_name.into(),
            description: description.into(),
        }
    }

    pub fn unbounded(
        required_approvers: u8,
        tier_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            threshold_amount: TierCeiling::Unbounded,
            required_approvers,
            tier_name: tier_name.into(),
            description: description.into(),
        }
    }
}

/// Ordered threshold table. Bounded tiers ascend by ceiling and the table always
/// ends in an unbounded top tier, so every amount has a tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalTierTable {
    bounded: Vec<ApprovalTier>,
    top: ApprovalTier,
}

impl ApprovalTierTable {
    pub fn new(bounded: Vec<ApprovalTier>, top: ApprovalTier) -> Result<Self, TierTableError> {
        if top.threshold_amount != TierCeiling::Unbounded {
            return Err(TierTableError::BoundedTopTier {
                tier_name: top.tier_name,
            });
        }

        let mut previous: Option<(f64, u8)> = None;
        for tier in &bounded {
            let ceiling = match tier.threshold_amount {
                TierCeiling::AtMost(ceiling) => ceiling,
                TierCeiling::Unbounded => {
                    return Err(TierTableError::UnboundedBeforeTop {
                        tier_name: tier.tier_name.clone(),
                    })
                }
            };

            if !ceiling.is_finite() || ceiling < 0.0 {
                return Err(TierTableError::InvalidCeiling {
                    tier_name: tier.tier_name.clone(),
                    ceiling,
                });
            }

            if let Some((previous_ceiling, previous_approvers)) = previous {
                if ceiling <= previous_ceiling {
                    return Err(TierTableError::NotAscending {
                        tier_name: tier.tier_name.clone(),
                    });
                }
                if tier.required_approvers < previous_approvers {
                    return Err(TierTableError::ApproversDecrease {
                        tier_name: tier.tier_name.clone(),
                    });
                }
            }

            previous = Some((ceiling, tier.required_approvers));
        }

        if let Some((_, approvers)) = previous {
            if top.required_approvers < approvers {
                return Err(TierTableError::ApproversDecrease {
                    tier_name: top.tier_name,
                });
            }
        }

        Ok(Self { bounded, top })
    }

    /// Default table used by the payment and transfer forms.
    pub fn standard() -> Self {
        Self {
            bounded: vec![
                ApprovalTier::bounded(
                    1_000.0,
                    0,
                    "Auto-approved",
                    "Released immediately without a second signer",
                ),
                ApprovalTier::bounded(
                    10_000.0,
                    1,
                    "Single approval",
                    "One approver with payment rights must sign off",
                ),
                ApprovalTier::bounded(
                    50_000.0,
                    2,
                    "Dual approval",
                    "Two independent approvers must sign off",
                ),
            ],
            top: ApprovalTier::unbounded(
                3,
                "Executive approval",
                "Two approvers plus a company officer must sign off",
            ),
        }
    }

    pub fn bounded_tiers(&self) -> &[ApprovalTier] {
        &self.bounded
    }

    pub fn top_tier(&self) -> &ApprovalTier {
        &self.top
    }

    /// All tiers in lookup order, top tier last.
    pub fn tiers(&self) -> impl Iterator<Item = &ApprovalTier> {
        self.bounded.iter().chain(std::iter::once(&self.top))
    }
}

impl Default for ApprovalTierTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TierTableError {
    #[error("top tier '{tier_name}' must be unbounded")]
    BoundedTopTier { tier_name: String },
    #[error("tier '{tier_name}' is unbounded but is not the top tier")]
    UnboundedBeforeTop { tier_name: String },
    #[error("tier '{tier_name}' has invalid ceiling {ceiling}")]
    InvalidCeiling { tier_name: String, ceiling: f64 },
    #[error("tier '{tier_name}' ceiling must be above the previous tier")]
    NotAscending { tier_name: String },
    #[error("tier '{tier_name}' requires fewer approvers than a lower tier")]
    ApproversDecrease { tier_name: String },
}
