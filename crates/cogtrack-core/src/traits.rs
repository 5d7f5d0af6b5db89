//! Core trait definition for history retrieval.
//!
//! The async trait is implemented by the `cogtrack-history` crate; the
//! trend analyzer only ever sees this seam, never a concrete store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::model::{ResultLevel, TestType};

/// One previously scored, completed test attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Which test was taken.
    pub test_type: TestType,
    /// The recorded score.
    pub score: f64,
    /// The recorded percentage, when the store kept it separately.
    #[serde(default)]
    pub percentage: Option<f64>,
    /// Tier the attempt was classified into.
    pub result_level: ResultLevel,
    /// When the attempt was completed.
    pub completed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// The score used for trend math: the percentage when present, the
    /// plain score otherwise.
    pub fn effective_score(&self) -> f64 {
        self.percentage.unwrap_or(self.score)
    }
}

/// Trait for backends that retrieve a subject's scored history.
///
/// Implementations must return completed attempts only, ordered
/// most-recent-first, at most `limit` entries.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch the most recent completed results for a subject, optionally
    /// restricted to one test type.
    async fn fetch_recent(
        &self,
        user_id: &str,
        test_type: Option<TestType>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, HistoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_score_prefers_percentage() {
        let entry = HistoryEntry {
            test_type: TestType::Arithmetic,
            score: 12.0,
            percentage: Some(80.0),
            result_level: ResultLevel::High,
            completed_at: Utc::now(),
        };
        assert_eq!(entry.effective_score(), 80.0);

        let entry = HistoryEntry {
            percentage: None,
            ..entry
        };
        assert_eq!(entry.effective_score(), 12.0);
    }

    #[test]
    fn history_entry_serde_roundtrip() {
        let entry = HistoryEntry {
            test_type: TestType::Stroop,
            score: 70.0,
            percentage: Some(70.0),
            result_level: ResultLevel::Medium,
            completed_at: "2026-03-01T10:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"resultLevel\":\"medium\""));
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
