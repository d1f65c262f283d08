//! Text helpers shared by the matchers
//!
//! All comparisons in the matchers run on lower-cased text; these helpers
//! keep the lower-casing, hyphenation and tokenization rules in one place.

use regex::Regex;

lazy_static::lazy_static! {
    static ref DOC_EXTENSION_RE: Regex = Regex::new(r"(?i)\.(html|htm|php|aspx?)$").unwrap();
    static ref TOKEN_SPLIT_RE: Regex = Regex::new(r"[\s\-_./]+").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"^(19|20)\d{2}$").unwrap();
}

/// Minimum token length (in characters) kept by [`tokenize`] is this + 1.
pub const MIN_TOKEN_CHARS: usize = 3;

/// `"Miraval Rosé"` → `"miraval-rosé"`
pub fn hyphenate(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), "-").into_owned()
}

/// Drop a trailing `.html`, `.htm`, `.php`, `.asp` or `.aspx`
pub fn strip_document_extension(file_name: &str) -> &str {
    match DOC_EXTENSION_RE.find(file_name) {
        Some(m) => &file_name[..m.start()],
        None => file_name,
    }
}

/// Split on whitespace, `-`, `_`, `.` and `/`, keeping fragments longer
/// than [`MIN_TOKEN_CHARS`] characters.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_SPLIT_RE
        .split(text)
        .filter(|t| char_len(t) > MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Four-digit years such as `2023`
pub fn is_year(token: &str) -> bool {
    YEAR_RE.is_match(token)
}

/// First `n` characters (not bytes)
pub fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
