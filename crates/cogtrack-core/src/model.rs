//! Core data model types for cogtrack.
//!
//! These are the fundamental types the entire cogtrack system uses to
//! represent test submissions, scored results, and result classifications.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The cognitive test kinds the engine knows how to score.
///
/// The set is closed: each variant selects a scoring heuristic and a
/// recommendation table. Callers holding an unrecognized test identifier
/// should score it through [`crate::scoring::ScoreCalculator::score_generic`]
/// instead of inventing a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    VisualMemory,
    VerbalMemory,
    AuditoryMemory,
    DigitSpan,
    VisualAttention,
    Stroop,
    Arithmetic,
    SymbolMemory,
}

impl TestType {
    /// All supported test types, in a stable order.
    pub const ALL: [TestType; 8] = [
        TestType::VisualMemory,
        TestType::VerbalMemory,
        TestType::AuditoryMemory,
        TestType::DigitSpan,
        TestType::VisualAttention,
        TestType::Stroop,
        TestType::Arithmetic,
        TestType::SymbolMemory,
    ];
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestType::VisualMemory => "visual-memory",
            TestType::VerbalMemory => "verbal-memory",
            TestType::AuditoryMemory => "auditory-memory",
            TestType::DigitSpan => "digit-span",
            TestType::VisualAttention => "visual-attention",
            TestType::Stroop => "stroop",
            TestType::Arithmetic => "arithmetic",
            TestType::SymbolMemory => "symbol-memory",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "visual-memory" => Ok(TestType::VisualMemory),
            "verbal-memory" => Ok(TestType::VerbalMemory),
            "auditory-memory" => Ok(TestType::AuditoryMemory),
            "digit-span" => Ok(TestType::DigitSpan),
            "visual-attention" => Ok(TestType::VisualAttention),
            "stroop" | "stroop-test" => Ok(TestType::Stroop),
            "arithmetic" => Ok(TestType::Arithmetic),
            "symbol-memory" => Ok(TestType::SymbolMemory),
            other => Err(format!("unknown test type: {other}")),
        }
    }
}

/// One submitted answer.
///
/// Submissions arrive as loosely shaped JSON: plain correctness flags,
/// numeric magnitudes, string markers, or structured per-trial records.
/// The untagged union accepts all of them at the boundary so the scoring
/// math only ever sees typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Trial(TrialRecord),
    Text(String),
}

/// A structured per-trial record, used by reaction-time tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Whether the trial was answered correctly.
    pub correct: bool,
    /// Response time in milliseconds.
    #[serde(default)]
    pub response_time: Option<f64>,
    /// Whether the error was an interference error (e.g. reading the word
    /// instead of naming the ink color).
    #[serde(default)]
    pub interference_error: bool,
}

impl AnswerValue {
    /// Whether this value marks a correct answer (`true`, `"correct"`, `1`,
    /// or a trial record with `correct: true`).
    pub fn is_correct(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Number(n) => *n == 1.0,
            AnswerValue::Text(s) => s == "correct",
            AnswerValue::Trial(t) => t.correct,
        }
    }

    /// Whether this value marks a selection (`true` or `"selected"`), used
    /// for distractor keys in attention tests.
    pub fn is_selected(&self) -> bool {
        match self {
            AnswerValue::Bool(b) => *b,
            AnswerValue::Text(s) => s == "selected",
            _ => false,
        }
    }

    /// The numeric value, if this is a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The trial record, if this is a structured trial.
    pub fn as_trial(&self) -> Option<&TrialRecord> {
        match self {
            AnswerValue::Trial(t) => Some(t),
            _ => None,
        }
    }
}

/// A complete answer set for one submission, keyed by item name.
///
/// Keys follow type-prefixed conventions (`item_*`, `word_*`, `span_*`,
/// `target_*`, `trial_*`, `problem_*`); the scorer pattern-matches prefixes
/// to decide which entries count.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

/// A request to score one completed test submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Which test was taken.
    pub test_type: TestType,
    /// The submitted answers.
    pub answers: AnswerSet,
    /// Wall-clock time spent on the test, in seconds.
    #[serde(default)]
    pub time_spent_secs: Option<u32>,
    /// Subject age, used only for normative adjustment.
    #[serde(default)]
    pub user_age: Option<u32>,
    /// Override for the test's maximum score (default 100).
    #[serde(default)]
    pub max_score: Option<f64>,
}

impl ScoreRequest {
    pub fn new(test_type: TestType, answers: AnswerSet) -> Self {
        Self {
            test_type,
            answers,
            time_spent_secs: None,
            user_age: None,
            max_score: None,
        }
    }
}

/// Qualitative classification of a normalized score.
///
/// Variant order matters: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultLevel {
    Low,
    Medium,
    High,
}

impl ResultLevel {
    /// The color associated with this level. A pure lookup: the color never
    /// varies independently of the level.
    pub fn color(&self) -> ColorInfo {
        match self {
            ResultLevel::High => ColorInfo {
                code: "#22c55e",
                name: "green",
            },
            ResultLevel::Medium => ColorInfo {
                code: "#f59e0b",
                name: "amber",
            },
            ResultLevel::Low => ColorInfo {
                code: "#ef4444",
                name: "red",
            },
        }
    }
}

impl fmt::Display for ResultLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultLevel::High => write!(f, "high"),
            ResultLevel::Medium => write!(f, "medium"),
            ResultLevel::Low => write!(f, "low"),
        }
    }
}

/// Display color for a result level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorInfo {
    pub code: &'static str,
    pub name: &'static str,
}

/// Generic execution statistics, tallied independently of the per-type
/// scoring heuristic.
///
/// This audits the raw input shape over `question_*`/`item_*` keys and
/// `*response_time*` fields. It may disagree with the type-specific counts
/// (a verbal-memory set keyed `word_*` audits as empty); that divergence is
/// accepted behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    /// Percentage of audited items answered correctly.
    pub accuracy: f64,
    /// Mean of any `*response_time*` numeric fields, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,
}

/// Comparison of a normalized score against the matched age band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormativeComparison {
    /// The score that was compared.
    pub score: f64,
    /// Stepped percentile rank within the age band (50 when no age given).
    pub percentile_rank: u32,
    /// The matched band, e.g. "50-69".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_for_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_deviation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

impl NormativeComparison {
    /// Neutral comparison used when no age (or no matching band) is known.
    pub fn neutral(score: f64) -> Self {
        Self {
            score,
            percentile_rank: 50,
            age_group: None,
            mean_for_age: None,
            standard_deviation: None,
            interpretation: None,
        }
    }
}

/// Per-domain cognitive profile derived from the answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CognitiveProfile {
    /// Recall split for the memory tasks.
    Memory {
        immediate_recall: f64,
        delayed_recall: f64,
        recognition_accuracy: f64,
    },
    /// Speed/inhibition split for interference tasks.
    Interference {
        processing_speed: f64,
        inhibitory_control: f64,
        interference_effect: f64,
    },
    /// No domain-specific breakdown available.
    General,
}

/// Type-specific qualitative breakdown of a scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub raw_score: f64,
    /// `None` when the submission was scored through the generic fallback.
    pub test_type: Option<TestType>,
    pub strong_points: Vec<String>,
    pub weak_points: Vec<String>,
    pub cognitive_profile: CognitiveProfile,
}

/// The complete scored result for one submission.
///
/// Created once per submission and immutable thereafter; results are not
/// recomputed when normative tables change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// 0-100 value from the type-specific heuristic, before age adjustment.
    pub raw_score: f64,
    /// Raw score scaled against the test's maximum.
    pub percentage: f64,
    /// Age-adjusted score, clamped to [0, 100].
    pub normalized_score: f64,
    pub result_level: ResultLevel,
    pub color_code: String,
    pub color_name: String,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: Vec<String>,
    pub normative_comparison: NormativeComparison,
    pub performance_stats: PerformanceStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display_and_parse() {
        assert_eq!(TestType::VisualMemory.to_string(), "visual-memory");
        assert_eq!(TestType::Stroop.to_string(), "stroop");
        assert_eq!(
            "visual-memory".parse::<TestType>().unwrap(),
            TestType::VisualMemory
        );
        assert_eq!(
            "digit_span".parse::<TestType>().unwrap(),
            TestType::DigitSpan
        );
        assert_eq!(
            "Stroop-Test".parse::<TestType>().unwrap(),
            TestType::Stroop
        );
        assert!("tea-leaves".parse::<TestType>().is_err());
    }

    #[test]
    fn test_type_all_is_exhaustive_and_stable() {
        assert_eq!(TestType::ALL.len(), 8);
        let mut seen = std::collections::HashSet::new();
        for t in TestType::ALL {
            assert!(seen.insert(t));
        }
    }

    #[test]
    fn answer_value_untagged_deserialization() {
        let raw = r#"{
            "item_1": true,
            "item_2": "correct",
            "max_span": 5,
            "trial_1": {"correct": true, "response_time": 850.0},
            "trial_2": {"correct": false, "interference_error": true}
        }"#;
        let answers: AnswerSet = serde_json::from_str(raw).unwrap();
        assert_eq!(answers["item_1"], AnswerValue::Bool(true));
        assert!(answers["item_2"].is_correct());
        assert_eq!(answers["max_span"].as_number(), Some(5.0));

        let t1 = answers["trial_1"].as_trial().unwrap();
        assert!(t1.correct);
        assert_eq!(t1.response_time, Some(850.0));
        assert!(!t1.interference_error);

        let t2 = answers["trial_2"].as_trial().unwrap();
        assert!(!t2.correct);
        assert!(t2.interference_error);
    }

    #[test]
    fn correctness_conventions() {
        assert!(AnswerValue::Bool(true).is_correct());
        assert!(AnswerValue::Number(1.0).is_correct());
        assert!(AnswerValue::Text("correct".into()).is_correct());
        assert!(!AnswerValue::Bool(false).is_correct());
        assert!(!AnswerValue::Number(0.0).is_correct());
        assert!(!AnswerValue::Text("wrong".into()).is_correct());
    }

    #[test]
    fn selection_conventions() {
        assert!(AnswerValue::Bool(true).is_selected());
        assert!(AnswerValue::Text("selected".into()).is_selected());
        assert!(!AnswerValue::Number(1.0).is_selected());
    }

    #[test]
    fn result_level_ordering_and_color() {
        assert!(ResultLevel::Low < ResultLevel::Medium);
        assert!(ResultLevel::Medium < ResultLevel::High);
        assert_eq!(ResultLevel::High.color().code, "#22c55e");
        assert_eq!(ResultLevel::Medium.color().name, "amber");
        assert_eq!(ResultLevel::Low.color().code, "#ef4444");
    }

    #[test]
    fn score_request_serde_roundtrip() {
        let mut answers = AnswerSet::new();
        answers.insert("item_1".into(), AnswerValue::Bool(true));
        let request = ScoreRequest {
            test_type: TestType::VisualMemory,
            answers,
            time_spent_secs: Some(120),
            user_age: Some(42),
            max_score: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"testType\":\"visual_memory\""));
        let back: ScoreRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.test_type, TestType::VisualMemory);
        assert_eq!(back.user_age, Some(42));
    }
}
