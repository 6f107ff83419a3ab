//! Amount-based approval tiers for payments and transfers.

mod resolver;
mod tiers;

pub use resolver::{normalize_amount, resolve_approval_tier, ApprovalResolver};
pub use tiers::{ApprovalTier, ApprovalTierTable, TierCeiling, TierTableError};
