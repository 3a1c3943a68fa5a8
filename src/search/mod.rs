//! Search engine
//!
//! Runs the staged search over the index and scores candidates with a
//! single confidence function.

pub mod confidence;
pub mod engine;
pub mod tier;

pub use confidence::{confidence, ScoreParts};
pub use engine::{SearchCandidate, SearchEngine, SearchStage};
pub use tier::MatchTier;
