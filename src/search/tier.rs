//! Match tiers

use serde::{Deserialize, Serialize};

/// Tolerance level a candidate was found at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    Exact,
    Close,
    Fuzzy,
    Aggressive,
}

impl MatchTier {
    pub const ALL: [MatchTier; 4] = [
        MatchTier::Exact,
        MatchTier::Close,
        MatchTier::Fuzzy,
        MatchTier::Aggressive,
    ];

    /// Confidence before distance and bonuses are applied
    pub fn base_confidence(&self) -> f64 {
        match self {
            MatchTier::Exact => 0.95,
            MatchTier::Close => 0.80,
            MatchTier::Fuzzy => 0.60,
            MatchTier::Aggressive => 0.40,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Close => "close",
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
