//! The stored row shape shared by history backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cogtrack_core::model::{ResultLevel, TestType};
use cogtrack_core::traits::HistoryEntry;

/// One persisted test attempt.
///
/// Providers filter on `completed`: an abandoned attempt is stored but
/// never surfaces in trend history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    /// Unique result identifier.
    pub id: Uuid,
    /// Subject the attempt belongs to.
    pub user_id: String,
    /// Which test was taken.
    pub test_type: TestType,
    /// Recorded score.
    pub score: f64,
    /// Recorded percentage, when kept separately from the score.
    #[serde(default)]
    pub percentage: Option<f64>,
    /// Tier the attempt was classified into.
    pub result_level: ResultLevel,
    /// Whether the attempt ran to completion.
    #[serde(default = "default_completed")]
    pub completed: bool,
    /// When the attempt completed.
    pub completed_at: DateTime<Utc>,
}

fn default_completed() -> bool {
    true
}

impl StoredResult {
    /// Project the stored row into the engine's history entry shape.
    pub fn to_entry(&self) -> HistoryEntry {
        HistoryEntry {
            test_type: self.test_type,
            score: self.score,
            percentage: self.percentage,
            result_level: self.result_level,
            completed_at: self.completed_at,
        }
    }
}
