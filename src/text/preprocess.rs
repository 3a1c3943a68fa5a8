//! Corruption-aware preprocessing
//!
//! Chooses which normalized spellings of a line the search engine should
//! try, and in what order.

use serde::Serialize;

use super::corruption::{detect_corruption_level, CorruptionLevel};
use super::normalize::{normalize_level1, normalize_level2, normalize_level3};
use super::tables;

/// Default cap on alternative spellings
pub const DEFAULT_MAX_ALTERNATIVES: usize = 4;

/// Default cap on single-character substitution variants
pub const DEFAULT_MAX_VARIANTS: usize = 3;

/// Spellings of one input line to search for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preprocessed {
    /// Corruption level detected on the raw line
    pub corruption: CorruptionLevel,
    /// Form searched first
    pub primary: String,
    /// Further forms, deduplicated and non-empty
    pub alternatives: Vec<String>,
}

impl Preprocessed {
    /// All non-empty search targets, primary first
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str())
            .chain(self.alternatives.iter().map(String::as_str))
            .filter(|t| !t.is_empty())
    }
}

/// Preprocess with the default fan-out limits
pub fn smart_preprocess(s: &str) -> Preprocessed {
    smart_preprocess_with(s, DEFAULT_MAX_ALTERNATIVES, DEFAULT_MAX_VARIANTS)
}

/// Preprocess `s`, keeping at most `max_alternatives` alternatives of which
/// at most `max_variants` are substitution variants.
pub fn smart_preprocess_with(
    s: &str,
    max_alternatives: usize,
    max_variants: usize,
) -> Preprocessed {
    let corruption = detect_corruption_level(s);

    let (primary, candidates) = match corruption {
        CorruptionLevel::Low => (normalize_level1(s), vec![normalize_level2(s)]),
        CorruptionLevel::Medium => {
            (normalize_level2(s), vec![normalize_level1(s), normalize_level3(s)])
        }
        CorruptionLevel::High => {
            let primary = normalize_level2(s);
            let mut forms = vec![normalize_level1(s), normalize_level3(s)];
            forms.extend(substitution_variants(&primary, max_variants));
            (primary, forms)
        }
        CorruptionLevel::Extreme => {
            let primary = normalize_level2(s);
            let mut forms = vec![normalize_level3(s)];
            forms.extend(substitution_variants(&primary, max_variants));
            forms.push(normalize_level1(s));
            (primary, forms)
        }
    };

    let mut seen = vec![primary.to_lowercase()];
    let mut alternatives = Vec::new();
    for form in candidates {
        if alternatives.len() >= max_alternatives {
            break;
        }
        let key = form.to_lowercase();
        if form.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        alternatives.push(form);
    }

    Preprocessed {
        corruption,
        primary,
        alternatives,
    }
}

/// Variants of `s` with exactly one character swapped for a confusable.
///
/// Positions are tried left to right and each position contributes its
/// first confusable, so the output is deterministic.
pub fn substitution_variants(s: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = s.to_lowercase().chars().collect();
    let mut variants = Vec::new();

    for (i, &c) in chars.iter().enumerate() {
        if variants.len() >= max {
            break;
        }
        let Some(&alt) = tables::confusables_for(c).first() else {
            continue;
        };
        let mut variant = chars.clone();
        variant[i] = alt;
        variants.push(variant.into_iter().collect());
    }

    variants
}
