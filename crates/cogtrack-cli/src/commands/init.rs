//! The `cogtrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("norms.toml").exists() {
        println!("norms.toml already exists, skipping.");
    } else {
        std::fs::write("norms.toml", SAMPLE_NORMS)?;
        println!("Created norms.toml");
    }

    if std::path::Path::new("answers.example.json").exists() {
        println!("answers.example.json already exists, skipping.");
    } else {
        std::fs::write("answers.example.json", EXAMPLE_ANSWERS)?;
        println!("Created answers.example.json");
    }

    println!("\nNext steps:");
    println!("  1. Adjust norms.toml to your reference population");
    println!("  2. Run: cogtrack validate --norms norms.toml");
    println!(
        "  3. Run: cogtrack score --test-type visual-memory --answers answers.example.json --age 42"
    );

    Ok(())
}

const SAMPLE_NORMS: &str = r#"# cogtrack normative reference table
#
# Bands must be contiguous and non-overlapping over ages 18-120.
# The values below are illustrative placeholders, not validated norms.

[thresholds]
high = 80.0
medium = 60.0

# Per-type overrides are possible, e.g.:
# [threshold_overrides.stroop]
# high = 75.0
# medium = 55.0

[[bands]]
ageMin = 18
ageMax = 29
mean = 85.0
standardDeviation = 12.0
percentiles = { p10 = 65.0, p25 = 75.0, p50 = 85.0, p75 = 95.0, p90 = 100.0 }

[[bands]]
ageMin = 30
ageMax = 49
mean = 80.0
standardDeviation = 15.0
percentiles = { p10 = 60.0, p25 = 70.0, p50 = 80.0, p75 = 90.0, p90 = 95.0 }

[[bands]]
ageMin = 50
ageMax = 69
mean = 75.0
standardDeviation = 18.0
percentiles = { p10 = 50.0, p25 = 65.0, p50 = 75.0, p75 = 85.0, p90 = 90.0 }

[[bands]]
ageMin = 70
ageMax = 120
mean = 70.0
standardDeviation = 20.0
percentiles = { p10 = 45.0, p25 = 60.0, p50 = 70.0, p75 = 80.0, p90 = 85.0 }
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "item_1": true,
  "item_2": true,
  "item_3": false,
  "item_4": true,
  "response_time_1": 850,
  "response_time_2": 1100,
  "response_time_3": 1400,
  "response_time_4": 950
}
"#;
