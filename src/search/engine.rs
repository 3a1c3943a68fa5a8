//! Progressive-tolerance search
//!
//! Tries the query exactly, then at growing edit distances, then as a set
//! of OCR-normalized spellings, and stops at the first stage whose best
//! candidate clears its confidence threshold.

use serde::Serialize;

use super::confidence::confidence;
use super::tier::MatchTier;
use crate::config::{Settings, Stage};
use crate::index::{canonical_key, BkTree};
use crate::text::{detect_corruption_level, smart_preprocess_with, CorruptionLevel};

/// Which part of the search produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStage {
    /// Exact case-insensitive hit
    Exact,
    /// Bounded search on the lower-cased query
    CaseInsensitive,
    /// Bounded search on an OCR-normalized spelling
    OcrFallback,
}

impl SearchStage {
    pub fn label(&self) -> &'static str {
        match self {
            SearchStage::Exact => "exact",
            SearchStage::CaseInsensitive => "case-insensitive",
            SearchStage::OcrFallback => "ocr-fallback",
        }
    }
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCandidate {
    /// Vocabulary entry in its original casing
    pub matched: String,
    /// Edit distance between the searched form and the entry
    pub distance: usize,
    pub tier: MatchTier,
    pub confidence: f64,
    pub stage: SearchStage,
    /// The form that was searched for
    pub searched: String,
    /// Corruption level detected on the query
    pub corruption: CorruptionLevel,
}

impl std::fmt::Display for SearchCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} (stage={} tier={} d={} conf={:.3})",
            self.matched, self.stage, self.tier, self.distance, self.confidence
        )
    }
}

/// Search driver over a built index
pub struct SearchEngine<'a> {
    index: &'a BkTree,
    settings: &'a Settings,
}

impl<'a> SearchEngine<'a> {
    /// Create a search engine over `index`
    pub fn new(index: &'a BkTree, settings: &'a Settings) -> Self {
        Self { index, settings }
    }

    /// Best confident match for `query`, if any stage finds one
    pub fn find_best_match(&self, query: &str) -> Option<SearchCandidate> {
        let canonical = canonical_key(query);
        let corruption = detect_corruption_level(query);

        if let Some(hit) = self.index.search_with_distance(&canonical, 0).first() {
            return Some(SearchCandidate {
                matched: hit.original.to_string(),
                distance: 0,
                tier: MatchTier::Exact,
                confidence: self.settings.exact_confidence,
                stage: SearchStage::Exact,
                searched: canonical,
                corruption,
            });
        }

        for stage in &self.settings.case_stages {
            if let Some(found) =
                self.try_stage(query, &canonical, stage, corruption, SearchStage::CaseInsensitive)
            {
                return Some(found);
            }
        }

        let preprocessed = smart_preprocess_with(
            query,
            self.settings.max_alternatives,
            self.settings.max_substitution_variants,
        );
        for target in preprocessed.targets() {
            let target = canonical_key(target);
            for stage in &self.settings.ocr_stages {
                if let Some(found) =
                    self.try_stage(query, &target, stage, corruption, SearchStage::OcrFallback)
                {
                    return Some(found);
                }
            }
        }

        log::trace!("No stage cleared its threshold for {:?}", query);
        None
    }

    /// Search `target` within one stage, returning the best candidate if
    /// it is confident enough.
    fn try_stage(
        &self,
        query: &str,
        target: &str,
        stage: &Stage,
        corruption: CorruptionLevel,
        kind: SearchStage,
    ) -> Option<SearchCandidate> {
        let hits = self.index.search_with_distance(target, stage.max_distance);
        log::trace!(
            "{:?} stage d<={} on {:?}: {} candidates",
            kind,
            stage.max_distance,
            target,
            hits.len()
        );
        if hits.is_empty() {
            return None;
        }

        let mut best: Option<SearchCandidate> = None;
        for hit in &hits {
            let original = hit.original;
            let score = confidence(query, target, original, stage.tier, corruption);
            let better = match &best {
                None => true,
                Some(b) => {
                    score > b.confidence
                        || (score == b.confidence && hit.distance < b.distance)
                }
            };
            if better {
                best = Some(SearchCandidate {
                    matched: original.to_string(),
                    distance: hit.distance,
                    tier: stage.tier,
                    confidence: score,
                    stage: kind,
                    searched: target.to_string(),
                    corruption,
                });
            }
        }

        let best = best?;
        let required = self.settings.thresholds.min_confidence(stage.tier, stage.max_distance);
        if best.confidence >= required {
            Some(best)
        } else {
            log::trace!(
                "Best candidate {:?} scored {:.3}, needs {:.2}",
                best.matched,
                best.confidence,
                required
            );
            None
        }
    }
}
