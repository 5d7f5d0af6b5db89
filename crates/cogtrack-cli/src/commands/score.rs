//! The `cogtrack score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use cogtrack_core::model::{AnswerSet, ScoreRequest, ScoreResult, TestType};
use cogtrack_core::norms::NormTable;
use cogtrack_core::report;
use cogtrack_core::scoring::ScoreCalculator;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    test_type: String,
    answers_path: PathBuf,
    age: Option<u32>,
    time_spent: Option<u32>,
    norms_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let norms = match &norms_path {
        Some(path) => NormTable::load(path)?,
        None => NormTable::default(),
    };
    for warning in norms.validate() {
        tracing::warn!(
            "norm table{}: {}",
            warning
                .band
                .as_ref()
                .map(|b| format!(" [{b}]"))
                .unwrap_or_default(),
            warning.message
        );
    }
    let calculator = ScoreCalculator::new(norms);

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let answers: AnswerSet = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers JSON: {}", answers_path.display()))?;

    let result = match test_type.parse::<TestType>() {
        Ok(parsed) => {
            let mut request = ScoreRequest::new(parsed, answers);
            request.user_age = age;
            request.time_spent_secs = time_spent;
            calculator.score(&request)
        }
        Err(_) => {
            tracing::warn!("unrecognized test type '{test_type}', using the generic heuristic");
            calculator.score_generic(&answers, age)
        }
    };

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "markdown" | "md" => {
            println!("{}", result.to_markdown());
        }
        _ => print_text(&test_type, &result),
    }

    if let Some(path) = output {
        report::save_json(&result, &path)?;
        println!("Result saved to {}", path.display());
    }

    Ok(())
}

fn print_text(test_type: &str, result: &ScoreResult) {
    println!(
        "{test_type}: {} ({:.1}%, normalized {:.1})",
        result.result_level, result.percentage, result.normalized_score
    );
    println!(
        "Percentile rank: {}{}",
        result.normative_comparison.percentile_rank,
        result
            .normative_comparison
            .age_group
            .as_ref()
            .map(|g| format!(" (age band {g})"))
            .unwrap_or_default()
    );
    if let Some(interpretation) = &result.normative_comparison.interpretation {
        println!("{interpretation}.");
    }

    let stats = &result.performance_stats;
    if stats.total > 0 {
        println!(
            "Audited items: {}/{} correct ({:.1}%)",
            stats.correct, stats.total, stats.accuracy
        );
    }

    println!("\nRecommendations:");
    for rec in &result.recommendations {
        println!("  - {rec}");
    }
}
