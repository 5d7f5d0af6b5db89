//! The `cogtrack trend` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use cogtrack_core::model::TestType;
use cogtrack_core::trend::{Trend, TrendAnalyzer, TrendReport};
use cogtrack_history::JsonFileHistory;

pub async fn execute(
    history_path: PathBuf,
    user: String,
    test_type: Option<String>,
    limit: usize,
    format: String,
) -> Result<()> {
    let test_type = test_type
        .map(|s| s.parse::<TestType>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let provider = JsonFileHistory::new(&history_path);
    let analyzer = TrendAnalyzer {
        window_limit: limit,
        ..TrendAnalyzer::default()
    };

    let report = analyzer.analyze_user(&provider, &user, test_type).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        _ => print_text(&user, &report),
    }

    Ok(())
}

fn print_text(user: &str, report: &TrendReport) {
    if report.trend == Trend::InsufficientData {
        println!("Not enough completed attempts for {user} to report a trend (minimum 3).");
        return;
    }

    println!(
        "Trend for {user}: {} ({:+.1}% from oldest to newest)",
        report.trend, report.change_percentage
    );
    println!(
        "Average {:.1}%, best {:.1}%, worst {:.1}% over {} attempts",
        report.average_score,
        report.best_score,
        report.worst_score,
        report.chart_data.scores.len()
    );

    if let Some(breakdown) = &report.test_type_breakdown {
        let mut table = Table::new();
        table.set_header(["Test", "Average", "Trend", "Last", "Attempts"]);
        for (test_type, t) in breakdown {
            table.add_row([
                test_type.to_string(),
                format!("{:.1}%", t.average_score),
                t.trend.to_string(),
                format!("{:.1}%", t.last_score),
                t.total_attempts.to_string(),
            ]);
        }
        println!("\n{table}");
    }
}
