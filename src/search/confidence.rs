//! Candidate confidence scoring
//!
//! A single pure function shared by every search stage.

use super::tier::MatchTier;
use crate::index::edit_distance_ci;
use crate::text::CorruptionLevel;

/// Weight of the length-similarity bonus
const LENGTH_BONUS_WEIGHT: f64 = 0.2;
/// Bonus when first characters agree
const FIRST_CHAR_BONUS: f64 = 0.10;
/// Bonus when last characters agree
const LAST_CHAR_BONUS: f64 = 0.05;

/// Inputs of the confidence formula once strings are reduced to numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParts {
    pub tier: MatchTier,
    /// Best edit distance between the candidate and the query or searched form
    pub distance: usize,
    pub query_len: usize,
    pub candidate_len: usize,
    pub corruption: CorruptionLevel,
    pub first_char_match: bool,
    pub last_char_match: bool,
}

impl ScoreParts {
    /// Reduce a query/candidate pair to scoring inputs
    pub fn new(
        query: &str,
        target: &str,
        candidate: &str,
        tier: MatchTier,
        corruption: CorruptionLevel,
    ) -> Self {
        let distance = edit_distance_ci(query, candidate).min(edit_distance_ci(target, candidate));
        Self {
            tier,
            distance,
            query_len: query.chars().count(),
            candidate_len: candidate.chars().count(),
            corruption,
            first_char_match: chars_match(query.chars().next(), candidate.chars().next()),
            last_char_match: chars_match(query.chars().last(), candidate.chars().last()),
        }
    }

    /// Final score, clamped to `0..=1`
    pub fn score(&self) -> f64 {
        let longest = self.query_len.max(self.candidate_len);
        let shortest = self.query_len.min(self.candidate_len);

        let (distance_factor, length_bonus) = if longest == 0 {
            (1.0, LENGTH_BONUS_WEIGHT)
        } else {
            let ratio = self.distance as f64 / longest as f64;
            (
                (1.0 - ratio).max(0.0),
                shortest as f64 / longest as f64 * LENGTH_BONUS_WEIGHT,
            )
        };

        let mut position_bonus = 0.0;
        if self.first_char_match {
            position_bonus += FIRST_CHAR_BONUS;
        }
        if self.last_char_match {
            position_bonus += LAST_CHAR_BONUS;
        }

        let raw = self.tier.base_confidence() * distance_factor
            + length_bonus
            + self.corruption.confidence_adjustment()
            + position_bonus;
        raw.clamp(0.0, 1.0)
    }
}

/// Confidence that `candidate` is what OCR read as `query`.
///
/// `target` is the normalized form that was searched; the distance used is
/// the smaller of the candidate's distance to the raw query and to it.
pub fn confidence(
    query: &str,
    target: &str,
    candidate: &str,
    tier: MatchTier,
    corruption: CorruptionLevel,
) -> f64 {
    ScoreParts::new(query, target, candidate, tier, corruption).score()
}

fn chars_match(a: Option<char>, b: Option<char>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase().eq(b.to_lowercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(distance: usize) -> ScoreParts {
        ScoreParts {
            tier: MatchTier::Fuzzy,
            distance,
            query_len: 30,
            candidate_len: 32,
            corruption: CorruptionLevel::High,
            first_char_match: false,
            last_char_match: false,
        }
    }

    #[test]
    fn test_identical_strings_score_high() {
        let score = confidence(
            "Area is very Alluring",
            "area is very alluring",
            "Area is very Alluring",
            MatchTier::Exact,
            CorruptionLevel::Low,
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_formula_components() {
        // 0.6 * (1 - 3/32) + 30/32 * 0.2 + 0.0
        let expected = 0.6 * (1.0 - 3.0 / 32.0) + 30.0 / 32.0 * 0.2;
        assert!((parts(3).score() - expected).abs() < 1e-9);

        let with_bonus = ScoreParts {
            first_char_match: true,
            last_char_match: true,
            ..parts(3)
        };
        assert!((with_bonus.score() - (expected + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_never_increases_with_distance() {
        let scores: Vec<f64> = (0..=40).map(|d| parts(d).score()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        let candidate = "abcdefghij";
        let queries = ["abcdefghij", "aXcdefghij", "aXXdefghij", "aXXXefghij", "aXXXXfghij"];
        let by_strings: Vec<f64> = queries
            .iter()
            .map(|q| confidence(q, q, candidate, MatchTier::Close, CorruptionLevel::Medium))
            .collect();
        assert!(by_strings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_uses_smaller_distance() {
        let medium = CorruptionLevel::Medium;
        let raw = ScoreParts::new("Alur~ing", "aluring", "Alluring", MatchTier::Close, medium);
        assert_eq!(raw.distance, 1);
        let normalized_worse =
            ScoreParts::new("Alluring", "xxxxxxx", "Alluring", MatchTier::Close, medium);
        assert_eq!(normalized_worse.distance, 0);
    }

    #[test]
    fn test_position_bonus_is_case_insensitive() {
        let low = CorruptionLevel::Low;
        let p = ScoreParts::new("area x", "area x", "AREA X", MatchTier::Fuzzy, low);
        assert!(p.first_char_match);
        assert!(p.last_char_match);
    }

    #[test]
    fn test_corruption_lowers_score() {
        let low = ScoreParts {
            corruption: CorruptionLevel::Low,
            ..parts(10)
        };
        let extreme = ScoreParts {
            corruption: CorruptionLevel::Extreme,
            ..parts(10)
        };
        assert!(low.score() > extreme.score());
    }

    #[test]
    fn test_score_is_clamped() {
        let far = ScoreParts {
            tier: MatchTier::Aggressive,
            distance: 100,
            query_len: 1,
            candidate_len: 50,
            corruption: CorruptionLevel::Extreme,
            first_char_match: false,
            last_char_match: false,
        };
        assert_eq!(far.score(), 0.0);
        assert!(ScoreParts::new("", "", "", MatchTier::Exact, CorruptionLevel::Low).score() <= 1.0);
    }
}
