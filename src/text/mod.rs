//! Text normalization for OCR output
//!
//! Strips OCR artifacts, folds look-alike characters and classifies how
//! corrupted an input line likely is.

pub mod corruption;
pub mod normalize;
pub mod preprocess;
pub mod tables;

pub use corruption::{detect_corruption_level, CorruptionLevel};
pub use normalize::{normalize_level1, normalize_level2, normalize_level3};
pub use preprocess::{smart_preprocess, smart_preprocess_with, Preprocessed};
