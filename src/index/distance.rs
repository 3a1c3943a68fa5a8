//! Edit distance used as the tree metric

/// Levenshtein distance between two strings, counted in chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Canonical comparison key for a vocabulary entry or query
pub fn canonical_key(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive Levenshtein distance
pub fn edit_distance_ci(a: &str, b: &str) -> usize {
    edit_distance(&canonical_key(a), &canonical_key(b))
}
