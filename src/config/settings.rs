//! Matcher settings
//!
//! Defines the search stages and the confidence each stage must reach.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::search::MatchTier;

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shortest query (in chars, after trimming) worth matching
    pub min_query_chars: usize,
    /// Confidence reported for an exact case-insensitive hit
    pub exact_confidence: f64,
    /// Tolerances tried on the lower-cased query
    pub case_stages: Vec<Stage>,
    /// Tolerances tried on each OCR-normalized spelling
    pub ocr_stages: Vec<Stage>,
    /// Minimum confidence per tier
    pub thresholds: ConfidenceThresholds,
    /// Cap on alternative spellings searched in the OCR stage
    pub max_alternatives: usize,
    /// Cap on single-character substitution variants
    pub max_substitution_variants: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_query_chars: 5,
            exact_confidence: 0.98,
            case_stages: vec![
                Stage::new(1, MatchTier::Exact),
                Stage::new(2, MatchTier::Close),
                Stage::new(3, MatchTier::Close),
                Stage::new(4, MatchTier::Fuzzy),
            ],
            ocr_stages: vec![
                Stage::new(5, MatchTier::Fuzzy),
                Stage::new(8, MatchTier::Aggressive),
                Stage::new(12, MatchTier::Aggressive),
            ],
            thresholds: ConfidenceThresholds::default(),
            max_alternatives: 4,
            max_substitution_variants: 3,
        }
    }
}

impl Settings {
    /// Create settings that never accept aggressive matches
    pub fn conservative() -> Self {
        Self {
            ocr_stages: vec![Stage::new(5, MatchTier::Fuzzy), Stage::new(8, MatchTier::Fuzzy)],
            thresholds: ConfidenceThresholds {
                exact_match: 0.95,
                lenient: TierThresholds {
                    exact: 0.80,
                    close: 0.60,
                    fuzzy: 0.45,
                    aggressive: 0.30,
                },
                strict: TierThresholds {
                    exact: 0.85,
                    close: 0.70,
                    fuzzy: 0.50,
                    aggressive: 0.35,
                },
                lenient_max_distance: 3,
            },
            max_alternatives: 2,
            max_substitution_variants: 0,
            ..Default::default()
        }
    }

    /// Create settings for very noisy captures
    pub fn permissive() -> Self {
        Self {
            ocr_stages: vec![
                Stage::new(5, MatchTier::Fuzzy),
                Stage::new(8, MatchTier::Aggressive),
                Stage::new(12, MatchTier::Aggressive),
                Stage::new(16, MatchTier::Aggressive),
            ],
            thresholds: ConfidenceThresholds {
                exact_match: 0.90,
                lenient: TierThresholds {
                    exact: 0.60,
                    close: 0.40,
                    fuzzy: 0.25,
                    aggressive: 0.15,
                },
                strict: TierThresholds {
                    exact: 0.70,
                    close: 0.50,
                    fuzzy: 0.30,
                    aggressive: 0.20,
                },
                lenient_max_distance: 3,
            },
            ..Default::default()
        }
    }

    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that stages and thresholds are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_query_chars == 0 {
            return Err(ConfigError::Invalid("min_query_chars must be at least 1".into()));
        }
        check_unit("exact_confidence", self.exact_confidence)?;
        if self.case_stages.is_empty() {
            return Err(ConfigError::Invalid("case_stages must not be empty".into()));
        }
        check_stages("case_stages", &self.case_stages)?;
        check_stages("ocr_stages", &self.ocr_stages)?;
        self.thresholds.validate()
    }
}

/// One search pass: a distance bound and the tier it reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Largest edit distance searched in this pass
    pub max_distance: usize,
    /// Tier candidates found in this pass are scored as
    pub tier: MatchTier,
}

impl Stage {
    pub fn new(max_distance: usize, tier: MatchTier) -> Self {
        Self { max_distance, tier }
    }
}

/// Minimum confidence per tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub exact: f64,
    pub close: f64,
    pub fuzzy: f64,
    pub aggressive: f64,
}

impl TierThresholds {
    /// Threshold for `tier`
    pub fn for_tier(&self, tier: MatchTier) -> f64 {
        match tier {
            MatchTier::Exact => self.exact,
            MatchTier::Close => self.close,
            MatchTier::Fuzzy => self.fuzzy,
            MatchTier::Aggressive => self.aggressive,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        for tier in MatchTier::ALL {
            check_unit(&format!("{name}.{}", tier.label()), self.for_tier(tier))?;
        }
        Ok(())
    }
}

/// Confidence a candidate needs, by tier and stage tolerance.
///
/// Tolerances up to `lenient_max_distance` use the lenient table, larger
/// ones the strict table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    /// Required at distance 0
    pub exact_match: f64,
    /// Used for distances `1..=lenient_max_distance`
    pub lenient: TierThresholds,
    /// Used beyond `lenient_max_distance`
    pub strict: TierThresholds,
    pub lenient_max_distance: usize,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            exact_match: 0.95,
            lenient: TierThresholds {
                exact: 0.70,
                close: 0.50,
                fuzzy: 0.30,
                aggressive: 0.20,
            },
            strict: TierThresholds {
                exact: 0.80,
                close: 0.60,
                fuzzy: 0.40,
                aggressive: 0.25,
            },
            lenient_max_distance: 3,
        }
    }
}

impl ConfidenceThresholds {
    /// Minimum confidence for a candidate of `tier` found at `distance`
    pub fn min_confidence(&self, tier: MatchTier, distance: usize) -> f64 {
        if distance == 0 {
            self.exact_match
        } else if distance <= self.lenient_max_distance {
            self.lenient.for_tier(tier)
        } else {
            self.strict.for_tier(tier)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_unit("thresholds.exact_match", self.exact_match)?;
        self.lenient.validate("thresholds.lenient")?;
        self.strict.validate("thresholds.strict")
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be within 0..=1, got {value}")))
    }
}

fn check_stages(name: &str, stages: &[Stage]) -> Result<(), ConfigError> {
    if stages.iter().any(|s| s.max_distance == 0) {
        return Err(ConfigError::Invalid(format!("{name} distances must be positive")));
    }
    if stages.windows(2).any(|w| w[0].max_distance >= w[1].max_distance) {
        return Err(ConfigError::Invalid(format!("{name} distances must increase")));
    }
    Ok(())
}
