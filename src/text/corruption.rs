//! Corruption classification
//!
//! Scores how badly OCR likely garbled a line so the search engine can
//! pick how hard to normalize it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::normalize::is_accented_letter;
use super::tables;

/// How corrupted an input line likely is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CorruptionLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl CorruptionLevel {
    /// Classify a heuristic score
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 6 => CorruptionLevel::Extreme,
            s if s >= 4 => CorruptionLevel::High,
            s if s >= 2 => CorruptionLevel::Medium,
            _ => CorruptionLevel::Low,
        }
    }

    /// Confidence adjustment applied when scoring candidates
    pub fn confidence_adjustment(&self) -> f64 {
        match self {
            CorruptionLevel::Low => 0.10,
            CorruptionLevel::Medium => 0.05,
            CorruptionLevel::High => 0.0,
            CorruptionLevel::Extreme => -0.10,
        }
    }

    /// Whether substitution variants should be generated
    pub fn needs_variants(&self) -> bool {
        matches!(self, CorruptionLevel::High | CorruptionLevel::Extreme)
    }
}

/// Additive corruption score for `s`
pub fn corruption_score(s: &str) -> u32 {
    let chars: Vec<char> = s.chars().collect();
    let mut score = 0;

    let artifacts: HashSet<char> = chars
        .iter()
        .copied()
        .filter(|&c| tables::is_artifact(c))
        .collect();
    score += 2 * artifacts.len() as u32;

    if chars.iter().any(|&c| is_accented_letter(c)) {
        score += 1;
    }

    let digit_touches_letter = chars.windows(2).any(|w| {
        (w[0].is_ascii_digit() && w[1].is_alphabetic())
            || (w[0].is_alphabetic() && w[1].is_ascii_digit())
    });
    if digit_touches_letter {
        score += 1;
    }

    let symbol_touches_letter = chars.windows(2).any(|w| {
        (is_stray_symbol(w[0]) && w[1].is_alphabetic())
            || (w[0].is_alphabetic() && is_stray_symbol(w[1]))
    });
    if symbol_touches_letter {
        score += 1;
    }

    let symbol_run = chars.windows(2).any(|w| is_symbol(w[0]) && is_symbol(w[1]));
    if symbol_run {
        score += 2;
    }

    let tokens: Vec<&str> = s.split_whitespace().filter(|t| *t != "#" && *t != "%").collect();
    if !tokens.is_empty() {
        let single = tokens.iter().filter(|t| t.chars().count() == 1).count();
        if single as f64 / tokens.len() as f64 > 0.3 {
            score += 2;
        }
    }

    score
}

/// Classify how corrupted `s` likely is
pub fn detect_corruption_level(s: &str) -> CorruptionLevel {
    CorruptionLevel::from_score(corruption_score(s))
}

fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn is_stray_symbol(c: char) -> bool {
    is_symbol(c) && c != '#' && c != '%'
}
