//! Placeholder resolution
//!
//! Vocabulary entries carry `#` where the game prints a number. Once an
//! entry is matched, the numbers read from the raw OCR line are put back.

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder token in vocabulary entries
pub const PLACEHOLDER: char = '#';

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

/// Integers and decimals in `s`, left to right
pub fn extract_numbers(s: &str) -> Vec<&str> {
    NUMBER.find_iter(s).map(|m| m.as_str()).collect()
}

/// Replace each `#` in `entry` with the next number found in `query`.
///
/// Placeholders left over once the numbers run out stay as `#`.
pub fn resolve_placeholders(entry: &str, query: &str) -> String {
    if !entry.contains(PLACEHOLDER) {
        return entry.to_string();
    }

    let mut numbers = extract_numbers(query).into_iter();
    let mut resolved = String::with_capacity(entry.len() + 8);
    for c in entry.chars() {
        if c != PLACEHOLDER {
            resolved.push(c);
            continue;
        }
        match numbers.next() {
            Some(number) => resolved.push_str(number),
            None => resolved.push(PLACEHOLDER),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_numbers() {
        assert_eq!(extract_numbers("Players have 15% reduced"), vec!["15"]);
        assert_eq!(extract_numbers("1.5 to 20 and 3"), vec!["1.5", "20", "3"]);
        assert!(extract_numbers("no digits").is_empty());
    }

    #[test]
    fn test_single_placeholder() {
        assert_eq!(
            resolve_placeholders(
                "Players have #% reduced Movement Speed",
                "Players have 15% reduced Movement Speed"
            ),
            "Players have 15% reduced Movement Speed"
        );
    }

    #[test]
    fn test_numbers_come_from_raw_query() {
        assert_eq!(
            resolve_placeholders(
                "Area contains # additional Harbingers",
                "Aieä contains 3 additional Harbirigers"
            ),
            "Area contains 3 additional Harbingers"
        );
    }

    #[test]
    fn test_multiple_placeholders_in_order() {
        assert_eq!(
            resolve_placeholders("Adds # to # Fire Damage", "Adds 12 to 24.5 Fire Damage"),
            "Adds 12 to 24.5 Fire Damage"
        );
    }

    #[test]
    fn test_leftover_placeholders_stay() {
        assert_eq!(
            resolve_placeholders("Adds # to # Fire Damage", "Adds 12 to ?? Fire Damage"),
            "Adds 12 to # Fire Damage"
        );
        assert_eq!(resolve_placeholders("#% more", "more"), "#% more");
    }

    #[test]
    fn test_entry_without_placeholder_unchanged() {
        assert_eq!(
            resolve_placeholders("Area is very Alluring", "Area 1s very Alluring"),
            "Area is very Alluring"
        );
    }
}
