//! URL matching cascade
//!
//! ## Stages (first hit wins)
//! 1. exact alias table on the file token
//! 2. full wine name (en/de/zh, also hyphenated) inside the file token
//! 3. every word of a multi-word English name inside the file token
//! 4. search-term table by priority on file token + hostname
//! 5. single tokens of path + hostname through the name search
//! 6. scoring resolver over the same tokens
//!
//! Each stage is a [`UrlStrategy`]; [`UrlCascade`] runs them in order.

use super::name::first_by_name;
use super::score::score_and_rank;
use super::MatchStage;
use crate::catalog::Catalog;
use crate::tables::MatchTables;
use crate::text;
use crate::types::{Language, WineRecord};
use crate::url::ProductUrl;

/// Minimum name length (characters) for the full-name stage
const MIN_FULL_NAME_CHARS: usize = 3;
/// Words of a multi-word name must be longer than this
const MIN_NAME_WORD_CHARS: usize = 2;

/// Everything a strategy may read for one match attempt
pub struct MatchContext<'a> {
    pub catalog: &'a Catalog,
    pub tables: &'a MatchTables,
    pub language: Language,
}

/// Pre-computed views of a parsed product URL
#[derive(Debug, Clone)]
pub struct UrlInput {
    pub url: ProductUrl,
    /// Last path segment, extension stripped, lower-cased
    pub file_token: String,
    /// `file_token` + hostname
    pub keyword_text: String,
    /// Path segments + hostname
    pub path_text: String,
    /// Tokens of `path_text` minus stopwords
    pub tokens: Vec<String>,
}

impl UrlInput {
    pub fn new(url: ProductUrl, tables: &MatchTables) -> Self {
        let file_token = url.file_token();
        let keyword_text = format!("{} {}", file_token, url.hostname);
        let path_text = url.path_text();
        let tokens = tables.content_tokens(&path_text);

        Self {
            url,
            file_token,
            keyword_text,
            path_text,
            tokens,
        }
    }
}

/// One stage of the cascade
pub trait UrlStrategy: Send + Sync {
    fn stage(&self) -> MatchStage;

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord>;
}

/// Pinned product slugs, checked before any generic matching
pub struct ExactAliasStrategy;

impl UrlStrategy for ExactAliasStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::ExactAlias
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        if input.file_token.is_empty() {
            return None;
        }

        for alias in &ctx.tables.exact_aliases {
            let Some(pattern) = alias
                .patterns
                .iter()
                .find(|p| !p.is_empty() && input.file_token.contains(p.as_str()))
            else {
                continue;
            };

            match ctx.catalog.get(&alias.wine_id) {
                Some(wine) => {
                    tracing::debug!(pattern = %pattern, wine = %wine.id, "exact alias hit");
                    return Some(wine);
                }
                None => {
                    tracing::warn!(wine_id = %alias.wine_id, "exact alias points at a wine missing from the catalog");
                }
            }
        }
        None
    }
}

/// Complete wine name inside the file token
pub struct FullNameStrategy;

impl UrlStrategy for FullNameStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::FullName
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        let token = input.file_token.as_str();
        if token.is_empty() {
            return None;
        }

        ctx.catalog.iter().find(|wine| {
            let latin = [&wine.name, &wine.name_de];
            let latin_hit = latin.iter().any(|name| {
                let lower = name.to_lowercase();
                text::char_len(&lower) >= MIN_FULL_NAME_CHARS
                    && (token.contains(&lower) || token.contains(&text::hyphenate(&lower)))
            });

            let zh = wine.name_zh.to_lowercase();
            latin_hit || (text::char_len(&zh) >= MIN_FULL_NAME_CHARS && token.contains(&zh))
        })
    }
}

/// All words of a multi-word English name inside the file token
pub struct MultiWordNameStrategy;

impl UrlStrategy for MultiWordNameStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::MultiWordName
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        let token = input.file_token.as_str();
        if token.is_empty() {
            return None;
        }

        ctx.catalog.iter().find(|wine| {
            let lower = wine.name.to_lowercase();
            let words: Vec<&str> = lower
                .split_whitespace()
                .filter(|w| text::char_len(w) > MIN_NAME_WORD_CHARS)
                .collect();
            words.len() > 1 && words.iter().all(|w| token.contains(w))
        })
    }
}

/// Search-term table, most specific priority first
pub struct KeywordTableStrategy;

impl UrlStrategy for KeywordTableStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::KeywordTable
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        for term in ctx.tables.terms_by_priority() {
            let Some(alias) = term.find_alias_in(&input.keyword_text) else {
                continue;
            };
            if let Some(wine) = first_by_name(ctx.catalog, &term.canonical_query, ctx.language) {
                tracing::debug!(
                    alias = %alias,
                    query = %term.canonical_query,
                    priority = term.priority,
                    wine = %wine.id,
                    "keyword table hit"
                );
                return Some(wine);
            }
        }
        None
    }
}

/// Individual path / host tokens through the name search
pub struct TokenStrategy;

impl UrlStrategy for TokenStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::Token
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        input
            .tokens
            .iter()
            .find_map(|token| first_by_name(ctx.catalog, token, ctx.language))
    }
}

/// Weighted multi-field scoring
pub struct ScoringStrategy;

impl UrlStrategy for ScoringStrategy {
    fn stage(&self) -> MatchStage {
        MatchStage::Score
    }

    fn try_match<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<&'a WineRecord> {
        score_and_rank(&input.tokens, ctx.catalog, &ctx.tables.weights()).map(|c| c.wine)
    }
}

/// Ordered list of strategies
pub struct UrlCascade {
    strategies: Vec<Box<dyn UrlStrategy>>,
}

impl UrlCascade {
    pub fn new(strategies: Vec<Box<dyn UrlStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ExactAliasStrategy),
            Box::new(FullNameStrategy),
            Box::new(MultiWordNameStrategy),
            Box::new(KeywordTableStrategy),
            Box::new(TokenStrategy),
            Box::new(ScoringStrategy),
        ])
    }

    pub fn stages(&self) -> Vec<MatchStage> {
        self.strategies.iter().map(|s| s.stage()).collect()
    }

    /// First strategy hit and the stage that produced it
    pub fn run<'a>(&self, input: &UrlInput, ctx: &MatchContext<'a>) -> Option<(&'a WineRecord, MatchStage)> {
        for strategy in &self.strategies {
            if let Some(wine) = strategy.try_match(input, ctx) {
                tracing::debug!(stage = %strategy.stage(), wine = %wine.id, "url resolved");
                return Some((wine, strategy.stage()));
            }
            tracing::trace!(stage = %strategy.stage(), "no hit");
        }
        None
    }
}

impl Default for UrlCascade {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"wines": [
                {"id": "1", "name": "Pesquera Crianza", "nameDe": "Pesquera Crianza", "nameZh": "佩斯克拉陈酿",
                 "country": "Spain", "region": "Ribera del Duero",
                 "grapes": ["Tempranillo"], "grapesDe": ["Tempranillo"], "grapesZh": ["丹魄"],
                 "color": "red", "style": "still", "price": "premium"},
                {"id": "2", "name": "Chianti Classico Riserva", "nameDe": "Chianti Classico Riserva",
                 "country": "Italy", "region": "Tuscany",
                 "grapes": ["Sangiovese"], "grapesDe": ["Sangiovese"], "grapesZh": ["桑娇维塞"],
                 "color": "red", "style": "still", "price": "mid"}
            ]}"#,
        )
        .unwrap()
    }

    fn input(url: &str, tables: &MatchTables) -> UrlInput {
        UrlInput::new(ProductUrl::parse(url).unwrap(), tables)
    }

    #[test]
    fn test_full_name_hyphenated() {
        let catalog = catalog();
        let tables = MatchTables::default();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::En };
        let hit = FullNameStrategy.try_match(&input("shop.es/tinto/pesquera-crianza-2020.html", &tables), &ctx);
        assert_eq!(hit.map(|w| w.id.as_str()), Some("1"));
    }

    #[test]
    fn test_full_name_chinese() {
        let catalog = catalog();
        let tables = MatchTables::default();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::Zh };
        let hit = FullNameStrategy.try_match(&input("shop.cn/佩斯克拉陈酿", &tables), &ctx);
        assert_eq!(hit.map(|w| w.id.as_str()), Some("1"));
    }

    #[test]
    fn test_multi_word_in_any_order() {
        let catalog = catalog();
        let tables = MatchTables::default();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::En };
        let url = input("shop.it/riserva_chianti_classico", &tables);
        assert!(FullNameStrategy.try_match(&url, &ctx).is_none());
        assert_eq!(MultiWordNameStrategy.try_match(&url, &ctx).map(|w| w.id.as_str()), Some("2"));
    }

    #[test]
    fn test_alias_with_unknown_wine_is_skipped() {
        let catalog = catalog();
        let tables = MatchTables::from_json(
            r#"{"exactAliases": [
                {"patterns": ["crianza"], "wineId": "99"},
                {"patterns": ["crianza"], "wineId": "1"}
            ]}"#,
        )
        .unwrap();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::En };
        let hit = ExactAliasStrategy.try_match(&input("shop.es/crianza", &tables), &ctx);
        assert_eq!(hit.map(|w| w.id.as_str()), Some("1"));
    }

    #[test]
    fn test_keyword_table_uses_hostname() {
        let catalog = catalog();
        let tables = MatchTables::from_json(
            r#"{"searchTerms": [{"aliases": ["toskana"], "canonicalQuery": "tuscany", "priority": 3}]}"#,
        )
        .unwrap();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::En };
        let hit = KeywordTableStrategy.try_match(&input("toskana-weine.de/angebot", &tables), &ctx);
        assert_eq!(hit.map(|w| w.id.as_str()), Some("2"));
    }

    #[test]
    fn test_token_strategy_skips_stopwords() {
        let catalog = catalog();
        let tables = MatchTables::from_json(r#"{"stoplist": ["spain"]}"#).unwrap();
        let ctx = MatchContext { catalog: &catalog, tables: &tables, language: Language::En };
        let url = input("shop.example/spain/sangiovese", &tables);
        assert_eq!(url.tokens, vec!["sangiovese", "shop", "example"]);
        assert_eq!(TokenStrategy.try_match(&url, &ctx).map(|w| w.id.as_str()), Some("2"));
    }

    #[test]
    fn test_cascade_order() {
        let cascade = UrlCascade::standard();
        assert_eq!(
            cascade.stages(),
            vec![
                MatchStage::ExactAlias,
                MatchStage::FullName,
                MatchStage::MultiWordName,
                MatchStage::KeywordTable,
                MatchStage::Token,
                MatchStage::Score,
            ]
        );
    }
}
