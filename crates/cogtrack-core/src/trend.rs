//! Longitudinal trend analysis over a subject's score history.
//!
//! The analyzer is a pure function of the history slice handed to it; the
//! only I/O is the delegated fetch through [`HistoryProvider`]. Histories
//! are small and noisy (a handful of repeat administrations), so the trend
//! rule is deliberately coarse: compare the means of the recent and older
//! halves of the window.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::model::{ResultLevel, TestType};
use crate::traits::{HistoryEntry, HistoryProvider};

/// Minimum number of results needed before any trend is reported.
pub const MIN_TREND_SAMPLES: usize = 3;
/// Mean shift, in percentage points, between the window halves that counts
/// as a real change. Placeholder calibration, not empirically derived.
pub const TREND_SHIFT_THRESHOLD: f64 = 5.0;
/// Default size of the trend window.
pub const DEFAULT_WINDOW_LIMIT: usize = 10;
/// Default per-type window for the breakdown.
pub const DEFAULT_BREAKDOWN_LIMIT: usize = 5;

/// Direction of change across a score history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Stable => write!(f, "stable"),
            Trend::Declining => write!(f, "declining"),
            Trend::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Chart-ready series in chronological (oldest-first) order, paired 1:1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub dates: Vec<chrono::DateTime<chrono::Utc>>,
    pub scores: Vec<f64>,
    pub levels: Vec<ResultLevel>,
}

/// Per-test-type summary within a full-history trend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTrend {
    pub average_score: f64,
    pub trend: Trend,
    pub last_score: f64,
    pub total_attempts: usize,
}

/// Derived, read-only view over a subject's recent results. Never
/// persisted; recomputed on every request from current history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub trend: Trend,
    /// Relative change from the oldest to the newest score in the window.
    pub change_percentage: f64,
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub chart_data: ChartData,
    /// Per-type summaries, present only for aggregate (untyped) analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type_breakdown: Option<BTreeMap<TestType, TypeTrend>>,
}

impl TrendReport {
    /// The sentinel report for histories below [`MIN_TREND_SAMPLES`].
    pub fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            change_percentage: 0.0,
            average_score: 0.0,
            best_score: 0.0,
            worst_score: 0.0,
            chart_data: ChartData::default(),
            test_type_breakdown: None,
        }
    }
}

/// Classifies score histories into trends.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    /// Most-recent results considered for the headline trend.
    pub window_limit: usize,
    /// Most-recent results considered per type in the breakdown.
    pub breakdown_limit: usize,
    /// Half-mean shift that counts as improvement or decline.
    pub shift_threshold: f64,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self {
            window_limit: DEFAULT_WINDOW_LIMIT,
            breakdown_limit: DEFAULT_BREAKDOWN_LIMIT,
            shift_threshold: TREND_SHIFT_THRESHOLD,
        }
    }
}

impl TrendAnalyzer {
    /// Analyze an already-fetched history window (most-recent-first).
    ///
    /// Fewer than [`MIN_TREND_SAMPLES`] entries yields the
    /// `insufficient_data` sentinel with zeroed statistics; the boundary is
    /// exact (2 results is insufficient, 3 is the minimum).
    pub fn analyze(&self, history: &[HistoryEntry]) -> TrendReport {
        let scores: Vec<f64> = history.iter().map(HistoryEntry::effective_score).collect();
        if scores.len() < MIN_TREND_SAMPLES {
            return TrendReport::insufficient();
        }

        let trend = self.classify(&scores);
        let change = change_percentage(&scores);
        let average = mean(&scores);
        let best = scores.iter().copied().fold(f64::MIN, f64::max);
        let worst = scores.iter().copied().fold(f64::MAX, f64::min);

        let chart_data = ChartData {
            dates: history.iter().rev().map(|e| e.completed_at).collect(),
            scores: scores.iter().rev().copied().collect(),
            levels: history.iter().rev().map(|e| e.result_level).collect(),
        };

        TrendReport {
            trend,
            change_percentage: round2(change),
            average_score: round2(average),
            best_score: best,
            worst_score: worst,
            chart_data,
            test_type_breakdown: None,
        }
    }

    /// Fetch a subject's window through the provider and analyze it.
    ///
    /// When no specific test type is requested, additionally fetches each
    /// supported type's recent slice concurrently and reports a per-type
    /// breakdown; a failed or empty per-type fetch is omitted, not an
    /// error.
    pub async fn analyze_user(
        &self,
        provider: &dyn HistoryProvider,
        user_id: &str,
        test_type: Option<TestType>,
    ) -> Result<TrendReport, HistoryError> {
        let history = provider
            .fetch_recent(user_id, test_type, self.window_limit)
            .await?;
        let mut report = self.analyze(&history);

        if test_type.is_none() && report.trend != Trend::InsufficientData {
            report.test_type_breakdown = Some(self.breakdown(provider, user_id).await);
        }

        Ok(report)
    }

    async fn breakdown(
        &self,
        provider: &dyn HistoryProvider,
        user_id: &str,
    ) -> BTreeMap<TestType, TypeTrend> {
        let fetches = TestType::ALL.map(|t| async move {
            (
                t,
                provider
                    .fetch_recent(user_id, Some(t), self.breakdown_limit)
                    .await,
            )
        });

        let mut breakdown = BTreeMap::new();
        for (test_type, fetched) in join_all(fetches).await {
            match fetched {
                Ok(entries) if !entries.is_empty() => {
                    let scores: Vec<f64> =
                        entries.iter().map(HistoryEntry::effective_score).collect();
                    breakdown.insert(
                        test_type,
                        TypeTrend {
                            average_score: round2(mean(&scores)),
                            trend: self.classify(&scores),
                            last_score: scores[0],
                            total_attempts: entries.len(),
                        },
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("skipping {test_type} history for {user_id}: {e}");
                }
            }
        }
        breakdown
    }

    /// Two-half comparison over a most-recent-first score sequence.
    fn classify(&self, scores: &[f64]) -> Trend {
        if scores.len() < MIN_TREND_SAMPLES {
            return Trend::InsufficientData;
        }
        let split = scores.len().div_ceil(2);
        let diff = mean(&scores[..split]) - mean(&scores[split..]);
        if diff > self.shift_threshold {
            Trend::Improving
        } else if diff < -self.shift_threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

/// Relative change from the oldest to the newest score in the window.
/// An oldest score of 0 yields 0, avoiding division by zero.
fn change_percentage(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let oldest = scores[scores.len() - 1];
    let newest = scores[0];
    if oldest == 0.0 {
        return 0.0;
    }
    (newest - oldest) / oldest * 100.0
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
