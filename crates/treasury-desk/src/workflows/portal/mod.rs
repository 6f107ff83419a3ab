//! Persisted portal state and the service that drives the rule engine from it.
//!
//! Everything the portal remembers between sessions lives in one
//! [`PortalState`] document behind a [`PortalStore`]. The [`TreasuryService`]
//! loads it, applies the approval, ratio, health and forecast calculators, and
//! writes back any score or document changes.

pub mod documents;
mod router;
mod service;
pub mod state;
mod store;

#[cfg(test)]
mod tests;

pub use documents::{
    build_checklist, ChecklistItem, CreditChecklist, DocumentCategory, DocumentId, DocumentRecord,
    DocumentUpload,
};
pub use router::{treasury_router, ApprovalRequest, CashFlowReplacement, ForecastRequest};
pub use service::{
    BoxedSchedule, CreditReport, HealthReport, SubmissionReceipt, TreasuryService,
    TreasuryServiceError,
};
pub use state::{PortalState, ScoreHistory, ScoreSnapshot, ScoreTrack, SCORE_ROLLOVER_DAYS};
pub use store::{InMemoryPortalStore, JsonFilePortalStore, PortalStore, StoreError};
