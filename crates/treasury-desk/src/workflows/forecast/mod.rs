//! Short-horizon cash-flow projection and its recommendation buckets.

pub mod domain;
mod projector;
mod schedule;

pub use domain::{
    CashFlowProjection, CashOutlook, DailyTotal, FlowKind, ScheduledFlow, MAX_PROJECTION_DAYS,
};
pub use projector::{
    classify, project_cash_flow, CashFlowForecaster, DailyAverages, ForecastConfig,
    DEFAULT_HORIZON_DAYS, LOW_BUFFER_DAYS,
};
pub use schedule::{
    FixedSchedule, ProportionalSchedule, ScheduledFlowSource, SeededSchedule, DAYS_PER_MONTH,
};
