//! Normative reference tables and age-based normalization.
//!
//! Loads norm tables from TOML files, validates them, and applies the
//! z-score transform and percentile lookups the score calculator uses.
//!
//! The built-in table is illustrative placeholder data, not validated
//! psychometric norms.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{ResultLevel, TestType};

/// Supported age range for norm bands.
pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 120;

/// The five percentile markers carried per age band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Reference distribution for one age band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormGroup {
    pub age_min: u32,
    pub age_max: u32,
    pub mean: f64,
    pub standard_deviation: f64,
    pub percentiles: Percentiles,
}

impl NormGroup {
    /// Whether this band contains the given age.
    pub fn contains(&self, age: u32) -> bool {
        age >= self.age_min && age <= self.age_max
    }

    /// Stepped percentile rank of a score within this band.
    ///
    /// Non-decreasing in the score: ≤p10→10, ≤p25→25, ≤p50→50, ≤p75→75,
    /// ≤p90→90, else 95.
    pub fn percentile_rank(&self, score: f64) -> u32 {
        let p = &self.percentiles;
        if score <= p.p10 {
            10
        } else if score <= p.p25 {
            25
        } else if score <= p.p50 {
            50
        } else if score <= p.p75 {
            75
        } else if score <= p.p90 {
            90
        } else {
            95
        }
    }

    /// Band label, e.g. "50-69".
    pub fn label(&self) -> String {
        format!("{}-{}", self.age_min, self.age_max)
    }
}

/// Tier thresholds applied to the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Normalized score at or above this is `High`.
    pub high: f64,
    /// Normalized score at or above this (but below `high`) is `Medium`.
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            medium: 60.0,
        }
    }
}

impl Thresholds {
    /// Classify a normalized score into a result tier.
    pub fn classify(&self, score: f64) -> ResultLevel {
        if score >= self.high {
            ResultLevel::High
        } else if score >= self.medium {
            ResultLevel::Medium
        } else {
            ResultLevel::Low
        }
    }
}

/// A complete normative table: age bands plus tier thresholds.
///
/// The default thresholds are uniform across test types; real norms differ
/// by task, so per-type overrides can be supplied (and loaded from TOML)
/// without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormTable {
    /// Age bands, expected contiguous and non-overlapping over 18-120.
    #[serde(default)]
    pub bands: Vec<NormGroup>,
    /// Thresholds applied when no per-type override exists.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Per-test-type threshold overrides.
    #[serde(default)]
    pub threshold_overrides: BTreeMap<TestType, Thresholds>,
}

impl Default for NormTable {
    fn default() -> Self {
        Self {
            bands: builtin_bands(),
            thresholds: Thresholds::default(),
            threshold_overrides: BTreeMap::new(),
        }
    }
}

/// The illustrative reference bands shipped with the engine.
fn builtin_bands() -> Vec<NormGroup> {
    vec![
        NormGroup {
            age_min: 18,
            age_max: 29,
            mean: 85.0,
            standard_deviation: 12.0,
            percentiles: Percentiles {
                p10: 65.0,
                p25: 75.0,
                p50: 85.0,
                p75: 95.0,
                p90: 100.0,
            },
        },
        NormGroup {
            age_min: 30,
            age_max: 49,
            mean: 80.0,
            standard_deviation: 15.0,
            percentiles: Percentiles {
                p10: 60.0,
                p25: 70.0,
                p50: 80.0,
                p75: 90.0,
                p90: 95.0,
            },
        },
        NormGroup {
            age_min: 50,
            age_max: 69,
            mean: 75.0,
            standard_deviation: 18.0,
            percentiles: Percentiles {
                p10: 50.0,
                p25: 65.0,
                p50: 75.0,
                p75: 85.0,
                p90: 90.0,
            },
        },
        NormGroup {
            age_min: 70,
            age_max: 120,
            mean: 70.0,
            standard_deviation: 20.0,
            percentiles: Percentiles {
                p10: 45.0,
                p25: 60.0,
                p50: 70.0,
                p75: 80.0,
                p90: 85.0,
            },
        },
    ]
}

impl NormTable {
    /// First band containing the given age, if any.
    pub fn find_band(&self, age: u32) -> Option<&NormGroup> {
        self.bands.iter().find(|b| b.contains(age))
    }

    /// Age-normalize a percentage score.
    ///
    /// Looks up the band containing `age`, computes the z-score against its
    /// mean and standard deviation, converts to a T-score-like scale
    /// (`50 + 10·z`), and clamps to [0, 100]. Ages with no matching band
    /// (and bands with a non-positive standard deviation, which validation
    /// flags) pass the score through unchanged.
    pub fn normalize(&self, percentage: f64, age: u32) -> f64 {
        let Some(band) = self.find_band(age) else {
            return percentage;
        };
        if band.standard_deviation <= 0.0 {
            return percentage;
        }
        let z = (percentage - band.mean) / band.standard_deviation;
        (50.0 + z * 10.0).clamp(0.0, 100.0)
    }

    /// Thresholds in effect for a test type.
    pub fn thresholds_for(&self, test_type: TestType) -> Thresholds {
        self.threshold_overrides
            .get(&test_type)
            .copied()
            .unwrap_or(self.thresholds)
    }

    /// Parse a norm table from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: NormTable = toml::from_str(content).context("failed to parse norm table TOML")?;
        Ok(table)
    }

    /// Load a norm table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read norm table: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid norm table: {}", path.display()))
    }

    /// Validate the table for configuration mistakes.
    ///
    /// Overlapping or gapped bands are configuration bugs, not runtime
    /// cases: lookup is "first band containing age", so an overlap silently
    /// shadows later bands.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if self.bands.is_empty() {
            warnings.push(ValidationWarning {
                band: None,
                message: "norm table has no age bands; normalization will be skipped".into(),
            });
            return warnings;
        }

        let mut sorted: Vec<&NormGroup> = self.bands.iter().collect();
        sorted.sort_by_key(|b| b.age_min);

        if sorted[0].age_min > AGE_MIN {
            warnings.push(ValidationWarning {
                band: Some(sorted[0].label()),
                message: format!("no band covers ages {}-{}", AGE_MIN, sorted[0].age_min - 1),
            });
        }
        if let Some(last) = sorted.last() {
            if last.age_max < AGE_MAX {
                warnings.push(ValidationWarning {
                    band: Some(last.label()),
                    message: format!("no band covers ages {}-{}", last.age_max + 1, AGE_MAX),
                });
            }
        }

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.age_min <= a.age_max {
                warnings.push(ValidationWarning {
                    band: Some(b.label()),
                    message: format!("band {} overlaps band {}", b.label(), a.label()),
                });
            } else if b.age_min > a.age_max + 1 {
                warnings.push(ValidationWarning {
                    band: Some(b.label()),
                    message: format!(
                        "gap between band {} and band {}",
                        a.label(),
                        b.label()
                    ),
                });
            }
        }

        for band in &self.bands {
            if band.age_min > band.age_max {
                warnings.push(ValidationWarning {
                    band: Some(band.label()),
                    message: "ageMin exceeds ageMax".into(),
                });
            }
            if band.standard_deviation <= 0.0 {
                warnings.push(ValidationWarning {
                    band: Some(band.label()),
                    message: "standard deviation must be positive".into(),
                });
            }
            let p = &band.percentiles;
            let markers = [p.p10, p.p25, p.p50, p.p75, p.p90];
            if markers.windows(2).any(|w| w[1] < w[0]) {
                warnings.push(ValidationWarning {
                    band: Some(band.label()),
                    message: "percentile markers are not non-decreasing".into(),
                });
            }
        }

        warnings
    }
}

/// A warning from norm table validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The band label (if applicable).
    pub band: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Textual interpretation of a percentile rank.
pub fn interpret_percentile(percentile: u32) -> &'static str {
    if percentile >= 90 {
        "Well above average for the age group"
    } else if percentile >= 75 {
        "Above average for the age group"
    } else if percentile >= 50 {
        "Within the average range for the age group"
    } else if percentile >= 25 {
        "Below average for the age group"
    } else {
        "Well below average for the age group"
    }
}
