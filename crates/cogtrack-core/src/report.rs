//! JSON persistence and markdown rendering for engine outputs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::ScoreResult;
use crate::trend::{Trend, TrendReport};

/// Save any engine output as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// Load an engine output from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report from {}", path.display()))?;
    serde_json::from_str(&content).context("failed to parse report JSON")
}

impl ScoreResult {
    /// Format the scored result as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Result:** {} ({:.1}%, normalized {:.1})\n\n",
            self.result_level, self.percentage, self.normalized_score
        ));

        md.push_str("| Metric | Value |\n|--------|-------|\n");
        md.push_str(&format!("| Raw score | {:.2} |\n", self.raw_score));
        md.push_str(&format!("| Percentage | {:.2}% |\n", self.percentage));
        md.push_str(&format!(
            "| Normalized score | {:.2} |\n",
            self.normalized_score
        ));
        md.push_str(&format!("| Tier | {} |\n", self.result_level));
        md.push_str(&format!(
            "| Percentile rank | {} |\n",
            self.normative_comparison.percentile_rank
        ));
        if let Some(age_group) = &self.normative_comparison.age_group {
            md.push_str(&format!("| Age band | {age_group} |\n"));
        }
        md.push('\n');

        if let Some(interpretation) = &self.normative_comparison.interpretation {
            md.push_str(&format!("{interpretation}.\n\n"));
        }

        if !self.recommendations.is_empty() {
            md.push_str("### Recommendations\n\n");
            for rec in &self.recommendations {
                md.push_str(&format!("- {rec}\n"));
            }
        }

        md
    }
}

impl TrendReport {
    /// Format the trend report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        if self.trend == Trend::InsufficientData {
            md.push_str("**Trend:** insufficient data (fewer than 3 completed attempts)\n");
            return md;
        }

        md.push_str(&format!(
            "**Trend:** {} ({:+.1}% from oldest to newest)\n\n",
            self.trend, self.change_percentage
        ));
        md.push_str(&format!(
            "Average {:.1}%, best {:.1}%, worst {:.1}% over {} attempts.\n\n",
            self.average_score,
            self.best_score,
            self.worst_score,
            self.chart_data.scores.len()
        ));

        if let Some(breakdown) = &self.test_type_breakdown {
            md.push_str("### By test type\n\n");
            md.push_str("| Test | Average | Trend | Last | Attempts |\n");
            md.push_str("|------|---------|-------|------|----------|\n");
            for (test_type, t) in breakdown {
                md.push_str(&format!(
                    "| {} | {:.1}% | {} | {:.1}% | {} |\n",
                    test_type, t.average_score, t.trend, t.last_score, t.total_attempts
                ));
            }
        }

        md
    }
}
