//! Label photo entry
//!
//! OCR output is noisy free text. The search-term table is tried first
//! (most specific priority first), then the individual words.

use super::name::first_by_name;
use super::{MatchResult, MatchStage, NoMatchReason, Resolution};
use crate::catalog::Catalog;
use crate::tables::MatchTables;
use crate::text;
use crate::types::{Language, WineRecord};

/// Characters of recognised text quoted back in a miss
const EXCERPT_CHARS: usize = 50;
/// Text shorter than this (trimmed) skips the word pass
const MIN_TEXT_CHARS: usize = 3;

/// First search-term alias found in `haystack` whose canonical query
/// resolves to a wine
fn match_search_terms<'a>(
    catalog: &'a Catalog,
    tables: &MatchTables,
    lang: Language,
    haystack: &str,
) -> Option<&'a WineRecord> {
    tables.terms_by_priority().into_iter().find_map(|term| {
        let alias = term.find_alias_in(haystack)?;
        let wine = first_by_name(catalog, &term.canonical_query, lang)?;
        tracing::debug!(alias = %alias, query = %term.canonical_query, wine = %wine.id, "search term hit");
        Some(wine)
    })
}

/// Whitespace-separated words longer than [`text::MIN_TOKEN_CHARS`],
/// punctuation stripped from both ends
fn words(recognised: &str) -> impl Iterator<Item = &str> {
    recognised
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| text::char_len(w) > text::MIN_TOKEN_CHARS)
}

pub fn match_text<'a>(
    catalog: &'a Catalog,
    tables: &MatchTables,
    lang: Language,
    recognised: &str,
) -> MatchResult<'a> {
    let lower = recognised.to_lowercase();
    let trimmed = lower.trim();
    if trimmed.is_empty() {
        return Err(NoMatchReason::EmptyInput.into());
    }

    if let Some(wine) = match_search_terms(catalog, tables, lang, trimmed) {
        return Ok(Resolution::new(wine, MatchStage::OcrKeyword));
    }

    if text::char_len(trimmed) >= MIN_TEXT_CHARS {
        if let Some(wine) = words(trimmed).find_map(|w| first_by_name(catalog, w, lang)) {
            tracing::debug!(wine = %wine.id, "ocr word hit");
            return Ok(Resolution::new(wine, MatchStage::OcrWord));
        }
    }

    Err(NoMatchReason::TextNotRecognized {
        excerpt: text::prefix_chars(recognised.trim(), EXCERPT_CHARS).to_string(),
    }
    .into())
}

pub fn match_file_name<'a>(
    catalog: &'a Catalog,
    tables: &MatchTables,
    lang: Language,
    file_name: &str,
) -> MatchResult<'a> {
    let lower = file_name.trim().to_lowercase();
    if lower.is_empty() {
        return Err(NoMatchReason::EmptyInput.into());
    }

    match_search_terms(catalog, tables, lang, &lower)
        .map(|wine| Resolution::new(wine, MatchStage::FileName))
        .ok_or_else(|| NoMatchReason::FileNameNotRecognized.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"wines": [
                {"id": "1", "name": "Hochgewächs Elbling", "nameDe": "Hochgewächs Elbling", "country": "Germany",
                 "region": "Mosel", "grapes": ["Elbling"], "grapesDe": ["Elbling"], "grapesZh": ["艾伯灵"],
                 "color": "white", "style": "still", "price": "budget"},
                {"id": "2", "name": "Spätburgunder Trocken", "nameDe": "Spätburgunder Trocken", "country": "Germany",
                 "region": "Ahr", "grapes": ["Pinot Noir"], "grapesDe": ["Spätburgunder"], "grapesZh": ["黑皮诺"],
                 "color": "red", "style": "still", "price": "mid"}
            ]}"#,
        )
        .unwrap()
    }

    fn tables() -> MatchTables {
        MatchTables::from_json(
            r#"{"searchTerms": [
                {"aliases": ["trocken"], "canonicalQuery": "trocken", "priority": 4},
                {"aliases": ["pinot", "黑皮诺"], "canonicalQuery": "pinot noir", "priority": 2}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_search_term_by_priority() {
        let catalog = catalog();
        let hit = match_text(&catalog, &tables(), Language::En, "WEINGUT X\nTrocken\nPinot 2019").unwrap();
        assert_eq!(hit.wine.id, "2");
        assert_eq!(hit.stage, MatchStage::OcrKeyword);
    }

    #[test]
    fn test_word_fallback_strips_punctuation() {
        let catalog = catalog();
        let hit = match_text(&catalog, &tables(), Language::En, "~ Mosel, 2021 ~").unwrap();
        assert_eq!(hit.wine.id, "1");
        assert_eq!(hit.stage, MatchStage::OcrWord);
    }

    #[test]
    fn test_miss_quotes_excerpt() {
        let catalog = catalog();
        let text = "x".repeat(80);
        let miss = match_text(&catalog, &tables(), Language::En, &text).unwrap_err();
        assert_eq!(
            miss.reason,
            NoMatchReason::TextNotRecognized { excerpt: "x".repeat(50) }
        );
    }

    #[test]
    fn test_blank_text() {
        let catalog = catalog();
        let miss = match_text(&catalog, &tables(), Language::En, " \n ").unwrap_err();
        assert_eq!(miss.reason, NoMatchReason::EmptyInput);
    }

    #[test]
    fn test_file_name_fallback() {
        let catalog = catalog();
        let hit = match_file_name(&catalog, &tables(), Language::En, "IMG_黑皮诺.jpg").unwrap();
        assert_eq!(hit.wine.id, "2");
        assert_eq!(hit.stage, MatchStage::FileName);

        let miss = match_file_name(&catalog, &tables(), Language::En, "IMG_0042.jpg").unwrap_err();
        assert_eq!(miss.reason, NoMatchReason::FileNameNotRecognized);
    }
}
