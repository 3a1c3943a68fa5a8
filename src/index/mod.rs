//! Metric index over the modifier vocabulary
//!
//! A BK-tree keyed by case-insensitive edit distance.

pub mod bktree;
pub mod distance;

pub use bktree::{BkTree, Hit};
pub use distance::{canonical_key, edit_distance, edit_distance_ci};
