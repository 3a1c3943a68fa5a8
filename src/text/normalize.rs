//! Normalization levels
//!
//! Each level starts from the previous one and is more destructive:
//! level 1 only removes obvious OCR noise, level 2 strips everything that
//! is not text, level 3 produces a compact lower-case skeleton.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::tables;

/// Remove artifact glyphs, fold accents and context-confused digits/letters.
///
/// Digit/letter folding is bidirectional but driven by context: a digit
/// between two letters becomes a letter (`H4rbinger`), a letter standing
/// next to digits and no letters becomes a digit (`1O%`).
pub fn normalize_level1(s: &str) -> String {
    let cleaned: String = s.chars().filter(|&c| !tables::is_artifact(c)).collect();
    let folded = fold_accents(&cleaned);
    let chars: Vec<char> = folded.chars().collect();

    let mut out = String::with_capacity(folded.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let prev_letter = prev.is_some_and(char::is_alphabetic);
        let next_letter = next.is_some_and(char::is_alphabetic);

        if c.is_ascii_digit() && prev_letter && next_letter {
            if let Some(letter) = tables::digit_to_letter(c) {
                out.push(match_case(letter, next));
                continue;
            }
        }

        if c.is_alphabetic() && !prev_letter && !next_letter {
            let digit_neighbour = prev.is_some_and(|p| p.is_ascii_digit())
                || next.is_some_and(|n| n.is_ascii_digit());
            if digit_neighbour {
                if let Some(digit) = tables::letter_to_digit(c) {
                    out.push(digit);
                    continue;
                }
            }
        }

        if next_letter {
            if let Some(letter) = tables::symbol_to_letter(c) {
                out.push(match_case(letter, prev));
                continue;
            }
        }

        out.push(c);
    }

    collapse_whitespace(&out)
}

/// Level 1 plus removal of non-text characters and aggressive digit folding.
///
/// Only `#` and `%` survive among symbols since vocabulary entries use them.
/// Any confusable digit touching a letter is read as that letter.
pub fn normalize_level2(s: &str) -> String {
    let level1 = normalize_level1(s);
    let chars: Vec<char> = level1.chars().filter(|&c| is_text_char(c)).collect();

    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();

        let touches_letter =
            prev.is_some_and(char::is_alphabetic) || next.is_some_and(char::is_alphabetic);
        if c.is_ascii_digit() && touches_letter {
            if let Some(letter) = tables::digit_to_letter(c) {
                out.push(match_case(letter, prev));
                continue;
            }
        }

        out.push(c);
    }

    collapse_whitespace(&out)
}

/// Level 2 lower-cased with whitespace removed, restricted to `[a-z0-9#%]`.
pub fn normalize_level3(s: &str) -> String {
    normalize_level2(s)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '#' || *c == '%')
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold accented Latin letters to their base letter.
pub fn fold_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if let Some(base) = tables::latin_fold(c) {
            out.push(base);
        } else if c.is_ascii() {
            out.push(c);
        } else {
            out.extend(std::iter::once(c).nfd().filter(|&d| !is_combining_mark(d)));
        }
    }
    out
}

/// Whether `c` is a Latin letter carrying a diacritic
pub fn is_accented_letter(c: char) -> bool {
    if !c.is_alphabetic() || c.is_ascii() {
        return false;
    }
    tables::latin_fold(c).is_some() || std::iter::once(c).nfd().any(is_combining_mark)
}

fn is_text_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace() || c == '#' || c == '%'
}

/// Lower-case `letter` when it continues a lower-case word
fn match_case(letter: char, neighbour: Option<char>) -> char {
    match neighbour {
        Some(n) if n.is_lowercase() => letter.to_ascii_lowercase(),
        _ => letter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level1_removes_artifacts() {
        assert_eq!(normalize_level1("Area i very Alur~ing"), "Area i very Aluring");
        assert_eq!(normalize_level1("«Area» is `very` Alluring°"), "Area is very Alluring");
    }

    #[test]
    fn test_level1_folds_accents() {
        assert_eq!(
            normalize_level1("Aieä contains 3 additional Harbirigers"),
            "Aiea contains 3 additional Harbirigers"
        );
        assert_eq!(normalize_level1("Ménagerie Støne"), "Menagerie Stone");
    }

    #[test]
    fn test_level1_digit_between_letters_becomes_letter() {
        assert_eq!(normalize_level1("H4rbingers"), "Harbingers");
        assert_eq!(normalize_level1("MOVEM3NT"), "MOVEMENT");
    }

    #[test]
    fn test_level1_letter_next_to_digits_becomes_digit() {
        assert_eq!(normalize_level1("1O% reduced"), "10% reduced");
        assert_eq!(normalize_level1("have 2S%"), "have 25%");
    }

    #[test]
    fn test_level1_keeps_real_numbers() {
        assert_eq!(
            normalize_level1("Players have 15% reduced Movement Speed"),
            "Players have 15% reduced Movement Speed"
        );
    }

    #[test]
    fn test_level1_folds_symbols_touching_letters() {
        assert_eq!(normalize_level1("Alur|ng"), "Aluring");
        assert_eq!(normalize_level1("$peed"), "Speed");
        assert_eq!(normalize_level1("a | b"), "a | b");
        assert_eq!(normalize_level1("Alluring!"), "Alluring!");
    }

    #[test]
    fn test_level1_collapses_whitespace() {
        assert_eq!(normalize_level1("  Area   is\tvery  "), "Area is very");
    }

    #[test]
    fn test_level2_strips_symbols() {
        assert_eq!(
            normalize_level2("Players (have) 15% reduced, Movement Speed."),
            "Players have 15% reduced Movement Speed"
        );
        assert_eq!(normalize_level2("Area contains # additional"), "Area contains # additional");
    }

    #[test]
    fn test_level2_folds_digits_touching_one_letter() {
        assert_eq!(normalize_level2("4rea contains"), "Area contains");
        assert_eq!(normalize_level2("Harbinger5"), "Harbingers");
        assert_eq!(normalize_level2("have 15%"), "have 15%");
    }

    #[test]
    fn test_level3_is_compact_lowercase() {
        assert_eq!(
            normalize_level3("Players have 15% reduced Movement Speed"),
            "playershave15%reducedmovementspeed"
        );
        assert_eq!(normalize_level3("Area contains # Härbingers!"), "areacontains#harbingers");
    }

    #[test]
    fn test_levels_tolerate_empty_input() {
        assert_eq!(normalize_level1(""), "");
        assert_eq!(normalize_level2("~~~"), "");
        assert_eq!(normalize_level3("   "), "");
    }

    #[test]
    fn test_accent_detection() {
        assert!(is_accented_letter('ä'));
        assert!(is_accented_letter('ø'));
        assert!(!is_accented_letter('a'));
        assert!(!is_accented_letter('°'));
    }
}
