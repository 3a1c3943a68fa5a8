//! Public matching API
//!
//! `ModMatcher` owns the index and moves between two states: unbuilt and
//! built. Building validates the whole vocabulary first; resetting drops
//! the index so a different vocabulary can be built.

pub mod placeholder;

use serde::Serialize;

use crate::config::{ConfigError, Settings};
use crate::index::BkTree;
use crate::search::{SearchCandidate, SearchEngine};

pub use placeholder::{extract_numbers, resolve_placeholders};

/// Summary of a built index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    /// Vocabulary entries supplied to the build
    pub entries: usize,
    /// Distinct keys in the tree
    pub nodes: usize,
    /// Entries skipped because their key was already present
    pub duplicates: usize,
    pub depth: usize,
    pub average_branching: f64,
    /// Normalized spellings mapped back to entries
    pub normalized_forms: usize,
}

/// Matches OCR lines against a modifier vocabulary
#[derive(Debug, Clone, Default)]
pub struct ModMatcher {
    settings: Settings,
    index: Option<BkTree>,
    entries: usize,
}

impl ModMatcher {
    /// Create an unbuilt matcher with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            index: None,
            entries: 0,
        }
    }

    /// Create a matcher and build it from `vocabulary`
    pub fn with_vocabulary<I, S>(settings: Settings, vocabulary: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::new(settings);
        matcher.build(vocabulary)?;
        Ok(matcher)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a vocabulary has been built
    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// Build the index from `vocabulary`.
    ///
    /// Fails without touching the matcher if it is already built, the
    /// settings are invalid, or any entry is malformed. Entries are stored
    /// verbatim, so padding them with whitespace is rejected.
    pub fn build<I, S>(&mut self, vocabulary: I) -> Result<IndexStats, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_built() {
            log::error!("Build requested on a matcher that is already built");
            return Err(MatchError::AlreadyBuilt);
        }
        if let Err(e) = self.settings.validate() {
            log::error!("Refusing to build with invalid settings: {}", e);
            return Err(e.into());
        }

        let entries = match validate_vocabulary(vocabulary) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Vocabulary rejected: {}", e);
                return Err(e);
            }
        };

        let mut tree = BkTree::new();
        for entry in &entries {
            if !tree.add(entry) {
                log::warn!("Duplicate vocabulary entry {:?} ignored", entry);
            }
        }

        self.entries = entries.len();
        self.index = Some(tree);

        let stats = self.stats().ok_or(MatchError::NotBuilt)?;
        log::info!(
            "Built modifier index: {} entries, {} nodes, depth {}",
            stats.entries,
            stats.nodes,
            stats.depth
        );
        Ok(stats)
    }

    /// Drop the index, returning to the unbuilt state
    pub fn reset(&mut self) {
        if self.index.take().is_some() {
            log::info!("Modifier index reset");
        }
        self.entries = 0;
    }

    /// Statistics of the built index
    pub fn stats(&self) -> Option<IndexStats> {
        self.index.as_ref().map(|tree| IndexStats {
            entries: self.entries,
            nodes: tree.len(),
            duplicates: tree.duplicates(),
            depth: tree.depth(),
            average_branching: tree.average_branching(),
            normalized_forms: tree.normalized_form_count(),
        })
    }

    /// Best scored candidate for `query`, before placeholder resolution.
    ///
    /// Returns `Ok(None)` for queries that are too short or match nothing.
    pub fn explain(&self, query: &str) -> Result<Option<SearchCandidate>, MatchError> {
        let index = self.index.as_ref().ok_or(MatchError::NotBuilt)?;

        let query = query.trim();
        if query.chars().count() < self.settings.min_query_chars {
            return Ok(None);
        }

        let found = SearchEngine::new(index, &self.settings).find_best_match(query);
        if let Some(candidate) = &found {
            log::debug!("Matched {:?} -> {}", query, candidate);
        }
        Ok(found)
    }

    /// Match `query`, with placeholders resolved from its numbers
    pub fn try_match_line(&self, query: &str) -> Result<Option<String>, MatchError> {
        Ok(self
            .explain(query)?
            .map(|candidate| resolve_placeholders(&candidate.matched, query)))
    }

    /// Match `query`, returning an empty string when nothing matches.
    ///
    /// Querying an unbuilt matcher is an integration error; it is logged
    /// and answered with the empty string.
    pub fn match_line(&self, query: &str) -> String {
        match self.try_match_line(query) {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                log::error!("Cannot match {:?}: {}", query, e);
                String::new()
            }
        }
    }

    /// Match every query independently, preserving order
    pub fn match_batch<S: AsRef<str>>(&self, queries: &[S]) -> Vec<String> {
        queries.iter().map(|q| self.match_line(q.as_ref())).collect()
    }
}

/// Check every entry, failing on the first malformed one
fn validate_vocabulary<I, S>(vocabulary: I) -> Result<Vec<String>, MatchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    for (index, entry) in vocabulary.into_iter().enumerate() {
        let entry = entry.as_ref();
        if entry.trim().is_empty() {
            return Err(MatchError::InvalidEntry {
                index,
                reason: "blank entry".into(),
            });
        }
        if entry.trim() != entry {
            return Err(MatchError::InvalidEntry {
                index,
                reason: "leading or trailing whitespace".into(),
            });
        }
        if entry.chars().any(char::is_control) {
            return Err(MatchError::InvalidEntry {
                index,
                reason: "contains control characters".into(),
            });
        }
        entries.push(entry.to_string());
    }

    if entries.is_empty() {
        return Err(MatchError::EmptyVocabulary);
    }
    Ok(entries)
}

/// Matcher errors
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Matcher has not been built")]
    NotBuilt,
    #[error("Matcher is already built; reset it first")]
    AlreadyBuilt,
    #[error("Vocabulary is empty")]
    EmptyVocabulary,
    #[error("Invalid vocabulary entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCABULARY: &[&str] = &[
        "Area is very Alluring",
        "Area contains # additional Harbingers",
        "Players have #% reduced Movement Speed",
        "Monsters deal #% extra Physical Damage as Fire",
        "Monsters have #% increased Area of Effect",
        "Monsters fire # additional Projectiles",
        "Monsters are Hexproof",
        "Players cannot Regenerate Life, Mana or Energy Shield",
        "Area has patches of Burning Ground",
        "Area has patches of Shocked Ground",
        "Monsters reflect #% of Physical Damage",
        "Monsters reflect #% of Elemental Damage",
        "Players are Cursed with Elemental Weakness",
        "Players are Cursed with Vulnerability",
        "Unique Boss deals #% increased Damage",
        "Monsters gain # Power Charge on Hit",
        "Monsters gain # Frenzy Charge on Hit",
        "Rare Monsters each have a Nemesis Mod",
    ];

    fn matcher() -> ModMatcher {
        ModMatcher::with_vocabulary(Settings::default(), VOCABULARY).unwrap()
    }

    fn flip_case(s: &str) -> String {
        s.chars()
            .map(|c| {
                if c.is_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect()
    }

    #[test]
    fn test_every_entry_matches_itself_exactly() {
        let matcher = matcher();
        for entry in VOCABULARY {
            assert_eq!(matcher.match_line(entry), *entry);
            let found = matcher.explain(entry).unwrap().unwrap();
            assert_eq!(found.tier, crate::search::MatchTier::Exact);
            assert_eq!(found.distance, 0);
        }
    }

    #[test]
    fn test_case_flipped_entries_keep_original_casing() {
        let matcher = matcher();
        for entry in VOCABULARY {
            assert_eq!(matcher.match_line(&flip_case(entry)), *entry);
        }
    }

    #[test]
    fn test_placeholder_substitution() {
        let matcher = matcher();
        assert_eq!(
            matcher.match_line("Players have 15% reduced Movement Speed"),
            "Players have 15% reduced Movement Speed"
        );
    }

    #[test]
    fn test_corrupted_harbingers() {
        let matcher = matcher();
        assert_eq!(
            matcher.match_line("Aieä contains 3 additional Harbirigers"),
            "Area contains 3 additional Harbingers"
        );
    }

    #[test]
    fn test_corrupted_alluring() {
        let matcher = matcher();
        assert_eq!(matcher.match_line("Area i very Alur~ing"), "Area is very Alluring");
    }

    #[test]
    fn test_short_queries_return_empty() {
        let matcher = ModMatcher::with_vocabulary(Settings::default(), ["Buff", "Area"]).unwrap();
        for query in ["", "a", "Buff", "Area", "  Area  "] {
            assert_eq!(matcher.match_line(query), "");
            assert_eq!(matcher.try_match_line(query).unwrap(), None);
        }
    }

    #[test]
    fn test_batch_matches_single_calls() {
        let matcher = matcher();
        let queries = [
            "Area i very Alur~ing",
            "",
            "Players have 15% reduced Movement Speed",
            "Aieä contains 3 additional Harbirigers",
            "something else entirely, not a modifier at all",
            "MONSTERS ARE HEXPROOF",
            "Monsters gain 1 Frenzy Charge on Hit",
        ];
        let batch = matcher.match_batch(&queries);
        assert_eq!(batch.len(), queries.len());
        for (query, result) in queries.iter().zip(&batch) {
            assert_eq!(*result, matcher.match_line(query));
        }
        assert_eq!(batch[6], "Monsters gain 1 Frenzy Charge on Hit");
    }

    #[test]
    fn test_unbuilt_matcher() {
        let matcher = ModMatcher::default();
        assert!(!matcher.is_built());
        assert!(matches!(
            matcher.try_match_line("Area is very Alluring"),
            Err(MatchError::NotBuilt)
        ));
        assert_eq!(matcher.match_line("Area is very Alluring"), "");
        assert!(matcher.stats().is_none());
    }

    #[test]
    fn test_build_reset_rebuild() {
        let mut matcher = matcher();
        assert!(matcher.is_built());
        assert!(matches!(matcher.build(["Other"]), Err(MatchError::AlreadyBuilt)));

        matcher.reset();
        assert!(!matcher.is_built());
        assert_eq!(matcher.match_line("Area is very Alluring"), "");

        matcher.build(["Monsters are Hexproof"]).unwrap();
        assert_eq!(matcher.match_line("Monsters are Hexproof"), "Monsters are Hexproof");
        assert_eq!(matcher.match_line("Area is very Alluring"), "");
    }

    #[test]
    fn test_malformed_vocabulary() {
        let mut matcher = ModMatcher::default();
        assert!(matches!(
            matcher.build(Vec::<String>::new()),
            Err(MatchError::EmptyVocabulary)
        ));
        assert!(matches!(
            matcher.build(["Area is very Alluring", "   "]),
            Err(MatchError::InvalidEntry { index: 1, .. })
        ));
        assert!(matches!(
            matcher.build(["Area\u{7}"]),
            Err(MatchError::InvalidEntry { index: 0, .. })
        ));
        assert!(matches!(
            matcher.build(["Monsters are Hexproof", " Area is very Alluring "]),
            Err(MatchError::InvalidEntry { index: 1, .. })
        ));
        assert!(!matcher.is_built());
    }

    #[test]
    fn test_invalid_settings_block_build() {
        let settings = Settings {
            case_stages: Vec::new(),
            ..Default::default()
        };
        let mut matcher = ModMatcher::new(settings);
        assert!(matches!(matcher.build(VOCABULARY), Err(MatchError::InvalidSettings(_))));
    }

    #[test]
    fn test_verbatim_entries_survive_form_collisions() {
        let vocabulary = ["Monsters' Damage is high", "Monsters Damage is high"];
        let matcher = ModMatcher::with_vocabulary(Settings::default(), vocabulary).unwrap();
        for entry in vocabulary {
            assert_eq!(matcher.match_line(entry), entry);
        }
        let found = matcher.explain("Monsters Damage is high").unwrap().unwrap();
        assert_eq!(found.distance, 0);
        assert_eq!(found.tier, crate::search::MatchTier::Exact);

        let matcher = ModMatcher::with_vocabulary(Settings::default(), ["Area Fire", "areafire"])
            .unwrap();
        assert_eq!(matcher.match_line("areafire"), "areafire");
        assert_eq!(matcher.match_line("Area Fire"), "Area Fire");
    }

    #[test]
    fn test_stats() {
        let mut matcher = ModMatcher::default();
        let stats = matcher
            .build(["Area is very Alluring", "AREA IS VERY ALLURING", "Monsters are Hexproof"])
            .unwrap();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.depth, 2);
        assert_eq!(matcher.match_line("area is very alluring"), "Area is very Alluring");
    }
}
