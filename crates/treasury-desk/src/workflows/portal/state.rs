use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::documents::DocumentRecord;
use crate::workflows::financials::FinancialMetrics;

/// Scores are compared week over week.
pub const SCORE_ROLLOVER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u16,
    pub recorded_at: DateTime<Utc>,
}

/// Latest score plus the one it replaced at the last weekly rollover. Only used
/// to display a delta; the score itself is always recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTrack {
    pub latest: Option<ScoreSnapshot>,
    pub previous: Option<ScoreSnapshot>,
}

impl ScoreTrack {
    /// True when the latest snapshot is recent enough to reuse as-is.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.latest
            .map(|latest| now - latest.recorded_at < Duration::days(SCORE_ROLLOVER_DAYS))
            .unwrap_or(false)
    }

    pub fn record(&mut self, score: u16, now: DateTime<Utc>) {
        if let Some(latest) = self.latest {
            if !self.is_fresh(now) {
                self.previous = Some(latest);
            }
        }
        self.latest = Some(ScoreSnapshot {
            score,
            recorded_at: now,
        });
    }

    pub fn previous_score(&self) -> Option<u16> {
        self.previous.map(|snapshot| snapshot.score)
    }

    pub fn delta(&self) -> Option<i32> {
        match (self.latest, self.previous) {
            (Some(latest), Some(previous)) => Some(latest.score as i32 - previous.score as i32),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub health: ScoreTrack,
    pub credit: ScoreTrack,
}

/// Everything the portal keeps between sessions, one JSON document keyed by
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalState {
    #[serde(default)]
    pub financial_metrics: FinancialMetrics,
    #[serde(default)]
    pub score_history: ScoreHistory,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}
