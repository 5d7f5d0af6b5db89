//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cogtrack() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("cogtrack").unwrap()
}

const ANSWERS_3_OF_4: &str = r#"{
    "item_1": true,
    "item_2": true,
    "item_3": false,
    "item_4": true
}"#;

#[test]
fn score_visual_memory_text_output() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, ANSWERS_3_OF_4).unwrap();

    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("visual-memory")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("medium"))
        .stdout(predicate::str::contains("75.0%"))
        .stdout(predicate::str::contains("3/4 correct"))
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn score_json_output_uses_wire_names() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, ANSWERS_3_OF_4).unwrap();

    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("visual-memory")
        .arg("--answers")
        .arg(&answers)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rawScore\": 75.0"))
        .stdout(predicate::str::contains("\"resultLevel\": \"medium\""));
}

#[test]
fn score_with_age_reports_band() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, ANSWERS_3_OF_4).unwrap();

    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("visual-memory")
        .arg("--answers")
        .arg(&answers)
        .arg("--age")
        .arg("25")
        .assert()
        .success()
        .stdout(predicate::str::contains("age band 18-29"))
        .stdout(predicate::str::contains("low"));
}

#[test]
fn score_unknown_test_type_uses_generic_heuristic() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, r#"{"question_1": true, "question_2": true}"#).unwrap();

    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("maze-running")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("high"));
}

#[test]
fn score_saves_result_json() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    let output = dir.path().join("result.json");
    std::fs::write(&answers, ANSWERS_3_OF_4).unwrap();

    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("visual-memory")
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Result saved"));

    let saved = std::fs::read_to_string(&output).unwrap();
    assert!(saved.contains("\"percentage\": 75.0"));
}

#[test]
fn score_missing_answers_file_fails() {
    cogtrack()
        .arg("score")
        .arg("--test-type")
        .arg("arithmetic")
        .arg("--answers")
        .arg("no_such_answers.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_valid_norms() {
    let dir = TempDir::new().unwrap();
    let norms = dir.path().join("norms.toml");
    std::fs::write(&norms, VALID_NORMS).unwrap();

    cogtrack()
        .arg("validate")
        .arg("--norms")
        .arg(&norms)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 age band(s)"))
        .stdout(predicate::str::contains("Norm table valid"));
}

#[test]
fn validate_flags_overlapping_bands() {
    let dir = TempDir::new().unwrap();
    let norms = dir.path().join("norms.toml");
    std::fs::write(&norms, OVERLAPPING_NORMS).unwrap();

    cogtrack()
        .arg("validate")
        .arg("--norms")
        .arg(&norms)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("overlaps"));
}

#[test]
fn validate_malformed_norms_fails() {
    let dir = TempDir::new().unwrap();
    let norms = dir.path().join("norms.toml");
    std::fs::write(&norms, "this is not [valid toml }{").unwrap();

    cogtrack()
        .arg("validate")
        .arg("--norms")
        .arg(&norms)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn list_types_names_all_eight() {
    cogtrack()
        .arg("list-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("visual-memory"))
        .stdout(predicate::str::contains("digit-span"))
        .stdout(predicate::str::contains("stroop"))
        .stdout(predicate::str::contains("symbol-memory"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    cogtrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created norms.toml"))
        .stdout(predicate::str::contains("Created answers.example.json"));

    assert!(dir.path().join("norms.toml").exists());
    assert!(dir.path().join("answers.example.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    cogtrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    cogtrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn trend_reports_improvement_and_breakdown() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    std::fs::write(&history, improving_history()).unwrap();

    cogtrack()
        .arg("trend")
        .arg("--history")
        .arg(&history)
        .arg("--user")
        .arg("u1")
        .assert()
        .success()
        .stdout(predicate::str::contains("improving"))
        .stdout(predicate::str::contains("visual-memory"))
        .stdout(predicate::str::contains("Attempts"));
}

#[test]
fn trend_with_two_results_is_insufficient() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    std::fs::write(&history, short_history()).unwrap();

    cogtrack()
        .arg("trend")
        .arg("--history")
        .arg(&history)
        .arg("--user")
        .arg("u1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough completed attempts"));
}

#[test]
fn trend_unknown_test_type_fails() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    std::fs::write(&history, improving_history()).unwrap();

    cogtrack()
        .arg("trend")
        .arg("--history")
        .arg(&history)
        .arg("--user")
        .arg("u1")
        .arg("--test-type")
        .arg("tea-leaves")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown test type"));
}

#[test]
fn help_output() {
    cogtrack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cognitive test scoring and trend analysis",
        ));
}

#[test]
fn version_output() {
    cogtrack()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cogtrack"));
}

const VALID_NORMS: &str = r#"
[thresholds]
high = 80.0
medium = 60.0

[[bands]]
ageMin = 18
ageMax = 59
mean = 82.0
standardDeviation = 14.0
percentiles = { p10 = 60.0, p25 = 72.0, p50 = 82.0, p75 = 92.0, p90 = 98.0 }

[[bands]]
ageMin = 60
ageMax = 120
mean = 72.0
standardDeviation = 19.0
percentiles = { p10 = 48.0, p25 = 62.0, p50 = 72.0, p75 = 82.0, p90 = 88.0 }
"#;

const OVERLAPPING_NORMS: &str = r#"
[[bands]]
ageMin = 18
ageMax = 60
mean = 82.0
standardDeviation = 14.0
percentiles = { p10 = 60.0, p25 = 72.0, p50 = 82.0, p75 = 92.0, p90 = 98.0 }

[[bands]]
ageMin = 50
ageMax = 120
mean = 72.0
standardDeviation = 19.0
percentiles = { p10 = 48.0, p25 = 62.0, p50 = 72.0, p75 = 82.0, p90 = 88.0 }
"#;

/// Five completed visual-memory attempts, improving over time.
fn improving_history() -> String {
    history_json(&[
        (90.0, "2026-03-05T10:00:00Z"),
        (88.0, "2026-03-04T10:00:00Z"),
        (60.0, "2026-03-03T10:00:00Z"),
        (58.0, "2026-03-02T10:00:00Z"),
        (55.0, "2026-03-01T10:00:00Z"),
    ])
}

fn short_history() -> String {
    history_json(&[
        (70.0, "2026-03-02T10:00:00Z"),
        (65.0, "2026-03-01T10:00:00Z"),
    ])
}

fn history_json(rows: &[(f64, &str)]) -> String {
    let rows: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, (score, date))| {
            let level = if *score >= 80.0 {
                "high"
            } else if *score >= 60.0 {
                "medium"
            } else {
                "low"
            };
            format!(
                r#"{{
    "id": "00000000-0000-0000-0000-{i:012}",
    "userId": "u1",
    "testType": "visual_memory",
    "score": {score},
    "percentage": {score},
    "resultLevel": "{level}",
    "completed": true,
    "completedAt": "{date}"
}}"#
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}
