//! Per-test-type scoring algorithms and result assembly.
//!
//! The calculator is a pure function of the submission and the injected
//! normative table: no I/O, no shared state, and no failure path for
//! malformed answer data. Every ratio is guarded against a zero denominator,
//! so an empty or unrelated answer set scores 0 rather than NaN.
//!
//! The weights and baselines below are placeholder calibration values
//! carried over from the reference distributions, not empirically derived.

use crate::model::{
    AnswerSet, AnswerValue, CognitiveProfile, DetailedAnalysis, NormativeComparison,
    PerformanceStats, ResultLevel, ScoreRequest, ScoreResult, TestType,
};
use crate::norms::{interpret_percentile, NormTable};

/// Response-time baseline for the interference task, in milliseconds.
/// Responses faster than this earn a speed bonus.
pub const STROOP_BASELINE_MS: f64 = 2000.0;
/// Weight of accuracy in the interference score.
pub const STROOP_ACCURACY_WEIGHT: f64 = 0.7;
/// Weight of the speed bonus in the interference score.
pub const STROOP_SPEED_WEIGHT: f64 = 0.3;
/// Score fraction deducted per interference error.
pub const STROOP_INTERFERENCE_PENALTY: f64 = 0.05;
/// Weight of the hit rate in the attention score.
pub const ATTENTION_HIT_WEIGHT: f64 = 0.7;
/// Weight of precision in the attention score.
pub const ATTENTION_PRECISION_WEIGHT: f64 = 0.3;
/// Points awarded per digit of the longest reproduced span.
pub const SPAN_POINTS_PER_DIGIT: f64 = 10.0;
/// Points available for span-trial accuracy.
pub const SPAN_ACCURACY_POINTS: f64 = 50.0;
/// Default maximum score a test can yield.
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// Scores completed test submissions against a normative table.
///
/// The table is a constructor dependency so alternate norms (or per-type
/// threshold overrides) can be substituted without touching the algorithms.
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    norms: NormTable,
}

impl ScoreCalculator {
    pub fn new(norms: NormTable) -> Self {
        Self { norms }
    }

    pub fn norms(&self) -> &NormTable {
        &self.norms
    }

    /// Score one submission.
    ///
    /// Total over any answer set: unrelated or empty answers degrade to a
    /// zero score, never an error. `user_age` affects only the normalized
    /// score, never the raw score.
    pub fn score(&self, request: &ScoreRequest) -> ScoreResult {
        let raw = raw_score(request.test_type, &request.answers);
        self.assemble(
            Some(request.test_type),
            &request.answers,
            raw,
            request.user_age,
            request.max_score,
        )
    }

    /// Score a submission whose test kind is outside the supported set.
    ///
    /// Applies the generic item-counting heuristic and the default
    /// thresholds; the analysis carries no type-specific profile.
    pub fn score_generic(&self, answers: &AnswerSet, user_age: Option<u32>) -> ScoreResult {
        let raw = generic_score(answers);
        self.assemble(None, answers, raw, user_age, None)
    }

    fn assemble(
        &self,
        test_type: Option<TestType>,
        answers: &AnswerSet,
        raw: f64,
        user_age: Option<u32>,
        max_score: Option<f64>,
    ) -> ScoreResult {
        let max = match max_score {
            Some(m) if m > 0.0 => m,
            _ => DEFAULT_MAX_SCORE,
        };
        let percentage = (raw / max) * 100.0;

        let normalized = match user_age {
            Some(age) => self.norms.normalize(percentage, age),
            None => percentage,
        };

        let thresholds = match test_type {
            Some(t) => self.norms.thresholds_for(t),
            None => self.norms.thresholds,
        };
        let level = thresholds.classify(normalized);
        let color = level.color();

        let detailed_analysis = analyze(test_type, answers, raw);
        let recommendations = recommendations(test_type, level);
        let normative_comparison = self.compare_with_norms(normalized, user_age);
        let performance_stats = performance_stats(answers);

        ScoreResult {
            raw_score: raw,
            percentage: round2(percentage),
            normalized_score: round2(normalized),
            result_level: level,
            color_code: color.code.to_string(),
            color_name: color.name.to_string(),
            detailed_analysis,
            recommendations,
            normative_comparison,
            performance_stats,
        }
    }

    fn compare_with_norms(&self, normalized: f64, user_age: Option<u32>) -> NormativeComparison {
        let Some(band) = user_age.and_then(|age| self.norms.find_band(age)) else {
            return NormativeComparison::neutral(normalized);
        };
        let percentile = band.percentile_rank(normalized);
        NormativeComparison {
            score: normalized,
            percentile_rank: percentile,
            age_group: Some(band.label()),
            mean_for_age: Some(band.mean),
            standard_deviation: Some(band.standard_deviation),
            interpretation: Some(interpret_percentile(percentile).to_string()),
        }
    }
}

/// Dispatch to the type-specific heuristic. Exhaustive: adding a test type
/// is a compile-time concern, not a runtime default.
fn raw_score(test_type: TestType, answers: &AnswerSet) -> f64 {
    match test_type {
        TestType::VisualMemory | TestType::SymbolMemory => visual_memory_score(answers),
        TestType::VerbalMemory | TestType::AuditoryMemory => verbal_memory_score(answers),
        TestType::DigitSpan => digit_span_score(answers),
        TestType::VisualAttention => visual_attention_score(answers),
        TestType::Stroop => stroop_score(answers),
        TestType::Arithmetic => arithmetic_score(answers),
    }
}

// ---------------------------------------------------------------------------
// Per-type heuristics, all normalized to 0-100 by construction
// ---------------------------------------------------------------------------

fn visual_memory_score(answers: &AnswerSet) -> f64 {
    if let Some(score) = shortcut_ratio(answers, "remembered_items", "total_items") {
        return score;
    }
    let (correct, total) = count_prefixed(answers, &["item_", "image_"]);
    percent(correct, total)
}

fn verbal_memory_score(answers: &AnswerSet) -> f64 {
    if let Some(score) = shortcut_ratio(answers, "recalled_words", "total_words") {
        return score;
    }
    let (correct, total) = count_prefixed(answers, &["word_", "recall_"]);
    percent(correct, total)
}

fn digit_span_score(answers: &AnswerSet) -> f64 {
    let mut max_span = answers
        .get("max_span")
        .and_then(AnswerValue::as_number)
        .unwrap_or(0.0);
    let mut total = 0u32;
    let mut correct = 0u32;

    for (key, value) in answers {
        if key.starts_with("span_") || key.starts_with("sequence_") {
            total += 1;
            if value.is_correct() {
                correct += 1;
                if let Some(span) = numeric_token(key) {
                    max_span = max_span.max(span as f64);
                }
            }
        }
    }

    // Blended score: longest span reproduced plus trial accuracy.
    let span_score = max_span * SPAN_POINTS_PER_DIGIT;
    let accuracy_score = ratio(correct as f64, total as f64) * SPAN_ACCURACY_POINTS;
    (span_score + accuracy_score).min(100.0)
}

fn visual_attention_score(answers: &AnswerSet) -> f64 {
    let stats = attention_stats(answers);
    let hit_rate = ratio(stats.correct_targets as f64, stats.total_targets as f64);
    let precision = ratio(
        stats.correct_targets as f64,
        (stats.correct_targets + stats.false_positives) as f64,
    );
    ((ATTENTION_HIT_WEIGHT * hit_rate + ATTENTION_PRECISION_WEIGHT * precision) * 100.0).round()
}

fn stroop_score(answers: &AnswerSet) -> f64 {
    let stats = stroop_stats(answers);
    let accuracy = ratio(stats.correct as f64, stats.total as f64);
    let penalty = stats.interference_errors as f64 * STROOP_INTERFERENCE_PENALTY;
    let score = ((STROOP_ACCURACY_WEIGHT * accuracy
        + STROOP_SPEED_WEIGHT * stats.speed_bonus()
        - penalty)
        * 100.0)
        .round();
    score.max(0.0)
}

fn arithmetic_score(answers: &AnswerSet) -> f64 {
    let (correct, total) = count_prefixed(answers, &["problem_", "calc_"]);
    percent(correct, total)
}

fn generic_score(answers: &AnswerSet) -> f64 {
    if let Some(score) = shortcut_ratio(answers, "correct", "total") {
        return score;
    }
    let (correct, total) = count_prefixed(answers, &["question_", "item_", "answer_"]);
    percent(correct, total)
}

// ---------------------------------------------------------------------------
// Shared tallies
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct AttentionStats {
    correct_targets: u32,
    total_targets: u32,
    false_positives: u32,
}

fn attention_stats(answers: &AnswerSet) -> AttentionStats {
    if let Some(correct) = answers
        .get("correct_targets")
        .and_then(AnswerValue::as_number)
    {
        let total = answers
            .get("total_targets")
            .and_then(AnswerValue::as_number)
            .filter(|t| *t > 0.0)
            .unwrap_or(correct);
        let false_positives = answers
            .get("false_positives")
            .and_then(AnswerValue::as_number)
            .unwrap_or(0.0);
        return AttentionStats {
            correct_targets: correct as u32,
            total_targets: total as u32,
            false_positives: false_positives as u32,
        };
    }

    let mut stats = AttentionStats::default();
    for (key, value) in answers {
        if key.starts_with("target_") {
            stats.total_targets += 1;
            if value.is_correct() {
                stats.correct_targets += 1;
            }
        } else if key.starts_with("distractor_") && value.is_selected() {
            stats.false_positives += 1;
        }
    }
    stats
}

#[derive(Debug, Default)]
struct StroopStats {
    correct: u32,
    total: u32,
    total_time_ms: f64,
    interference_errors: u32,
}

impl StroopStats {
    fn avg_time_ms(&self) -> f64 {
        ratio(self.total_time_ms, self.total as f64)
    }

    /// Bonus in [0, 1] for responses faster than the baseline; 0 when no
    /// timing data was recorded.
    fn speed_bonus(&self) -> f64 {
        let avg = self.avg_time_ms();
        if avg > 0.0 {
            ((STROOP_BASELINE_MS - avg) / STROOP_BASELINE_MS).max(0.0)
        } else {
            0.0
        }
    }
}

fn stroop_stats(answers: &AnswerSet) -> StroopStats {
    let mut stats = StroopStats::default();
    for (key, value) in answers {
        if !key.starts_with("trial_") {
            continue;
        }
        stats.total += 1;
        if value.is_correct() {
            stats.correct += 1;
        }
        if let Some(trial) = value.as_trial() {
            if let Some(rt) = trial.response_time {
                stats.total_time_ms += rt;
            }
            if trial.interference_error {
                stats.interference_errors += 1;
            }
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Detailed analysis, recommendations, performance stats
// ---------------------------------------------------------------------------

fn analyze(test_type: Option<TestType>, answers: &AnswerSet, raw: f64) -> DetailedAnalysis {
    let mut strong_points = Vec::new();
    let mut weak_points = Vec::new();

    let profile = match test_type {
        Some(
            t @ (TestType::VisualMemory
            | TestType::VerbalMemory
            | TestType::AuditoryMemory
            | TestType::SymbolMemory),
        ) => {
            let prefixes: &[&str] = match t {
                TestType::VerbalMemory | TestType::AuditoryMemory => &["word_", "recall_"],
                _ => &["item_", "image_"],
            };
            let (correct, total) = count_prefixed(answers, prefixes);
            let recognition = percent(correct, total);
            if total > 0 && recognition >= 80.0 {
                strong_points.push("High recall accuracy".to_string());
            }
            if total > 0 && recognition < 50.0 {
                weak_points.push("Low recall accuracy".to_string());
            }
            let (imm_correct, imm_total) = count_prefixed(answers, &["immediate_"]);
            let (del_correct, del_total) = count_prefixed(answers, &["delayed_"]);
            CognitiveProfile::Memory {
                immediate_recall: percent(imm_correct, imm_total),
                delayed_recall: percent(del_correct, del_total),
                recognition_accuracy: recognition,
            }
        }
        Some(TestType::Stroop) => {
            let stats = stroop_stats(answers);
            let interference_effect =
                ratio(stats.interference_errors as f64, stats.total as f64) * 100.0;
            if stats.total > 0 && stats.interference_errors == 0 {
                strong_points.push("No interference errors".to_string());
            }
            if stats.interference_errors > 2 {
                weak_points.push("Prone to interference errors".to_string());
            }
            CognitiveProfile::Interference {
                processing_speed: round2(stats.speed_bonus() * 100.0),
                inhibitory_control: round2(100.0 - interference_effect),
                interference_effect: round2(interference_effect),
            }
        }
        Some(TestType::VisualAttention) => {
            let stats = attention_stats(answers);
            if stats.total_targets > 0 && stats.false_positives == 0 {
                strong_points.push("No false positives".to_string());
            }
            if stats.false_positives > 0 && stats.false_positives >= stats.correct_targets {
                weak_points.push("Frequent false positives".to_string());
            }
            CognitiveProfile::General
        }
        _ => CognitiveProfile::General,
    };

    DetailedAnalysis {
        raw_score: raw,
        test_type,
        strong_points,
        weak_points,
        cognitive_profile: profile,
    }
}

fn recommendations(test_type: Option<TestType>, level: ResultLevel) -> Vec<String> {
    let mut recs = vec![level_message(level).to_string()];
    if let Some(t) = test_type {
        recs.extend(type_tips(t, level).iter().map(|s| s.to_string()));
    }
    recs
}

fn level_message(level: ResultLevel) -> &'static str {
    match level {
        ResultLevel::High => "Excellent result. Keep up the regular cognitive activity.",
        ResultLevel::Medium => "Good result. Regular cognitive exercises are recommended.",
        ResultLevel::Low => {
            "A consultation with a specialist and regular training are recommended."
        }
    }
}

fn type_tips(test_type: TestType, level: ResultLevel) -> &'static [&'static str] {
    use ResultLevel::*;
    use TestType::*;
    match (test_type, level) {
        (VisualMemory, High) => &["Keep practicing visual exercises to maintain the skill"],
        (VisualMemory, Medium) => &["Try image-memorization games"],
        (VisualMemory, Low) => &["Start with simple visual memory exercises"],
        (VerbalMemory, High) => &["Read demanding literature to maintain the skill"],
        (VerbalMemory, Medium) => &["Practice memorizing word lists"],
        (VerbalMemory, Low) => &["Start with short texts and gradually increase the volume"],
        (AuditoryMemory, High) => &["Keep up the auditory exercises"],
        (AuditoryMemory, Medium) => &["Listen to audiobooks and recall their content"],
        (AuditoryMemory, Low) => &["Start with short audio recordings"],
        (DigitSpan, High) => &["Increase the length of the number sequences"],
        (DigitSpan, Medium) => &["Train your memory for numbers"],
        (DigitSpan, Low) => &["Start with short number sequences"],
        (VisualAttention, High) => &["Move on to harder visual search tasks"],
        (VisualAttention, Medium) => &["Train attention and concentration"],
        (VisualAttention, Low) => &["Start with simple attention exercises"],
        (Stroop, High) => &["Excellent processing speed"],
        (Stroop, Medium) => &["Train your reaction speed"],
        (Stroop, Low) => &["Work on concentration and selective attention"],
        (Arithmetic, High) => &["Take on harder arithmetic problems"],
        (Arithmetic, Medium) => &["Practice mental arithmetic"],
        (Arithmetic, Low) => &["Start with simple arithmetic operations"],
        (SymbolMemory, High) => &["Increase the number of symbols to memorize"],
        (SymbolMemory, Medium) => &["Train symbol memory"],
        (SymbolMemory, Low) => &["Start with simple symbols and signs"],
    }
}

/// Generic audit over `question_*`/`item_*` keys, independent of the
/// type-specific heuristic. May disagree with the headline score; it audits
/// the raw input shape, not the scoring rule.
fn performance_stats(answers: &AnswerSet) -> PerformanceStats {
    let mut correct = 0u32;
    let mut incorrect = 0u32;
    let mut total = 0u32;
    let mut total_response_time = 0.0;
    let mut response_count = 0u32;

    for (key, value) in answers {
        if key.starts_with("question_") || key.starts_with("item_") {
            total += 1;
            if value.is_correct() {
                correct += 1;
            } else {
                incorrect += 1;
            }
        }
        if key.contains("response_time") {
            if let Some(ms) = value.as_number() {
                total_response_time += ms;
                response_count += 1;
            }
        }
    }

    let accuracy = ratio(correct as f64, total as f64) * 100.0;
    let avg_response_time = if response_count > 0 {
        Some(total_response_time / response_count as f64)
    } else {
        None
    };

    PerformanceStats {
        correct,
        incorrect,
        total,
        accuracy: round2(accuracy),
        avg_response_time,
    }
}

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// `num / den`, or 0 when the denominator is not positive.
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn percent(correct: u32, total: u32) -> f64 {
    (ratio(correct as f64, total as f64) * 100.0).round()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Count `(correct, total)` over entries whose key starts with any of the
/// given prefixes.
fn count_prefixed(answers: &AnswerSet, prefixes: &[&str]) -> (u32, u32) {
    let mut correct = 0;
    let mut total = 0;
    for (key, value) in answers {
        if prefixes.iter().any(|p| key.starts_with(p)) {
            total += 1;
            if value.is_correct() {
                correct += 1;
            }
        }
    }
    (correct, total)
}

/// Explicit `{count, total}` shortcut: both fields present and nonzero.
fn shortcut_ratio(answers: &AnswerSet, count_key: &str, total_key: &str) -> Option<f64> {
    let count = answers.get(count_key).and_then(AnswerValue::as_number)?;
    let total = answers.get(total_key).and_then(AnswerValue::as_number)?;
    if count == 0.0 || total <= 0.0 {
        return None;
    }
    Some((count / total * 100.0).round())
}

/// First run of digits in a key, e.g. `span_7` → 7.
fn numeric_token(key: &str) -> Option<u32> {
    let digits: String = key
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
