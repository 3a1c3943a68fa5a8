//! Character tables for OCR cleanup
//!
//! Every rule the normalizer applies lives here as plain data so the
//! tables can be audited and tested on their own.

/// Glyphs OCR emits from specks, borders and text shadows
pub const ARTIFACT_GLYPHS: &[char] = &[
    '`', '~', '°', '«', '»', '´', '¨', '¸', '·', '•', '¬', '¦', '¤', '¯', '‹', '›', '^',
    '†', '‡', '¡', '¿',
];

/// Latin letters that do not decompose under NFD
pub const LATIN_FOLDS: &[(char, char)] = &[
    ('ø', 'o'),
    ('Ø', 'O'),
    ('ł', 'l'),
    ('Ł', 'L'),
    ('đ', 'd'),
    ('Đ', 'D'),
    ('ı', 'i'),
    ('ħ', 'h'),
    ('Ħ', 'H'),
];

/// Digit/letter pairs OCR confuses in both directions
pub const DIGIT_LETTER_PAIRS: &[(char, char)] = &[
    ('4', 'A'),
    ('8', 'B'),
    ('6', 'G'),
    ('0', 'O'),
    ('1', 'I'),
    ('5', 'S'),
    ('3', 'E'),
    ('2', 'Z'),
];

/// Symbols that are read in place of a letter
pub const SYMBOL_LETTER_FOLDS: &[(char, char)] = &[('@', 'A'), ('$', 'S'), ('!', 'I'), ('|', 'I')];

/// Per-character alternatives used to build substitution variants.
///
/// Keys are lower-case since variants are generated from searchable forms.
pub const CONFUSABLES: &[(char, &[char])] = &[
    ('i', &['l', 'j']),
    ('l', &['i', 't']),
    ('j', &['i']),
    ('t', &['l', 'f']),
    ('f', &['t']),
    ('o', &['a', 'e']),
    ('a', &['o', 'e']),
    ('e', &['c', 'a']),
    ('c', &['e', 'o']),
    ('u', &['v', 'n']),
    ('v', &['u', 'y']),
    ('y', &['v']),
    ('n', &['h', 'r', 'u']),
    ('h', &['n', 'b']),
    ('r', &['n']),
    ('m', &['n']),
    ('b', &['h']),
    ('g', &['q']),
    ('q', &['g']),
    ('s', &['z']),
    ('z', &['s']),
];

/// Whether `c` is one of the OCR artifact glyphs
pub fn is_artifact(c: char) -> bool {
    ARTIFACT_GLYPHS.contains(&c)
}

/// Letter a confusable digit stands for
pub fn digit_to_letter(c: char) -> Option<char> {
    DIGIT_LETTER_PAIRS
        .iter()
        .find(|&&(digit, _)| digit == c)
        .map(|&(_, letter)| letter)
}

/// Digit a confusable letter stands for (case-insensitive)
pub fn letter_to_digit(c: char) -> Option<char> {
    let upper = c.to_ascii_uppercase();
    DIGIT_LETTER_PAIRS
        .iter()
        .find(|&&(_, letter)| letter == upper)
        .map(|&(digit, _)| digit)
}

/// Letter a look-alike symbol stands for
pub fn symbol_to_letter(c: char) -> Option<char> {
    SYMBOL_LETTER_FOLDS
        .iter()
        .find(|&&(symbol, _)| symbol == c)
        .map(|&(_, letter)| letter)
}

/// Base letter for Latin letters NFD leaves intact
pub fn latin_fold(c: char) -> Option<char> {
    LATIN_FOLDS
        .iter()
        .find(|&&(from, _)| from == c)
        .map(|&(_, to)| to)
}

/// Confusable alternatives for `c`, empty when it has none
pub fn confusables_for(c: char) -> &'static [char] {
    CONFUSABLES
        .iter()
        .find(|&&(key, _)| key == c)
        .map(|&(_, alts)| alts)
        .unwrap_or(&[])
}
