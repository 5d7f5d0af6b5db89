//! The `cogtrack list-types` command.

use anyhow::Result;

use cogtrack_core::model::TestType;

pub fn execute() -> Result<()> {
    println!("Supported test types:");
    for test_type in TestType::ALL {
        println!("  {test_type} — {}", describe(test_type));
    }
    println!();
    println!("Every type gets age normalization, tiered results, recommendations,");
    println!("and trend analysis over repeated attempts.");
    Ok(())
}

fn describe(test_type: TestType) -> &'static str {
    match test_type {
        TestType::VisualMemory => "recall of briefly shown images (item counting)",
        TestType::VerbalMemory => "recall of word lists (item counting)",
        TestType::AuditoryMemory => "recall of spoken material (item counting)",
        TestType::DigitSpan => "longest reproduced digit sequence plus trial accuracy",
        TestType::VisualAttention => "target detection weighted by hit rate and precision",
        TestType::Stroop => "interference control: accuracy, speed bonus, error penalty",
        TestType::Arithmetic => "mental arithmetic problems (item counting)",
        TestType::SymbolMemory => "recall of abstract symbols (item counting)",
    }
}
