//! Declarative match tables
//!
//! Data consumed by the generic matching algorithms:
//! - exact aliases: product-URL fragments pinned to a catalog id
//! - search terms: synonyms (any language) → canonical name query, by priority
//! - stoplist: web / wine-trade noise words skipped by token matching
//! - score weights: per-field weights of the scoring resolver
//!
//! The built-in tables can be extended or replaced from JSON, which is how
//! tests swap in fixture tables.

use crate::error::{Error, Result};
use crate::matcher::score::ScoreWeights;
use crate::text;
use serde::{Deserialize, Serialize};

/// A product-slug alias resolving straight to one wine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactAlias {
    /// Lower-case fragments tested against the URL file token
    pub patterns: Vec<String>,
    pub wine_id: String,
}

/// Synonym group mapped to one canonical name query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTerm {
    pub aliases: Vec<String>,
    pub canonical_query: String,
    /// 1 = full wine name, 2 = grape, 3 = region, 4 = style / technique
    pub priority: u8,
}

impl SearchTerm {
    /// First alias contained in `haystack` (already lower-cased)
    pub fn find_alias_in(&self, haystack: &str) -> Option<&str> {
        self.aliases
            .iter()
            .map(String::as_str)
            .find(|alias| !alias.is_empty() && haystack.contains(alias))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTables {
    #[serde(default)]
    pub exact_aliases: Vec<ExactAlias>,
    #[serde(default)]
    pub search_terms: Vec<SearchTerm>,
    #[serde(default)]
    pub stoplist: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<ScoreWeights>,
}

impl MatchTables {
    /// Read tables from JSON (lower-casing patterns and aliases)
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validated()
    }

    /// Read tables from a JSON file (non-WASM only)
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Append another table set. Aliases and terms from `other` come after
    /// the existing ones; its weights replace ours when it has any.
    pub fn merge(&mut self, other: &MatchTables) {
        self.exact_aliases.extend(other.exact_aliases.iter().cloned());
        self.search_terms.extend(other.search_terms.iter().cloned());
        for word in &other.stoplist {
            if !self.stoplist.contains(word) {
                self.stoplist.push(word.clone());
            }
        }
        if other.weights.is_some() {
            self.weights = other.weights;
        }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights.unwrap_or_default()
    }

    /// Search terms ordered by ascending priority; equal priorities keep
    /// table order.
    pub fn terms_by_priority(&self) -> Vec<&SearchTerm> {
        let mut terms: Vec<&SearchTerm> = self.search_terms.iter().collect();
        terms.sort_by_key(|t| t.priority);
        terms
    }

    /// Stoplisted word or a year such as `2023`
    pub fn is_stopword(&self, token: &str) -> bool {
        text::is_year(token) || self.stoplist.iter().any(|w| w == token)
    }

    /// Tokens of `text` (see [`text::tokenize`]) minus stopwords
    pub fn content_tokens(&self, text: &str) -> Vec<String> {
        text::tokenize(text)
            .into_iter()
            .filter(|t| !self.is_stopword(t))
            .collect()
    }

    fn validated(mut self) -> Result<Self> {
        for alias in &mut self.exact_aliases {
            if alias.wine_id.trim().is_empty() {
                return Err(Error::Tables("exact alias without wine id".into()));
            }
            alias.patterns.retain(|p| !p.trim().is_empty());
            if alias.patterns.is_empty() {
                return Err(Error::Tables(format!(
                    "exact alias for wine '{}' has no patterns",
                    alias.wine_id
                )));
            }
            for p in &mut alias.patterns {
                *p = p.to_lowercase();
            }
        }

        for term in &mut self.search_terms {
            if term.canonical_query.trim().is_empty() {
                return Err(Error::Tables("search term without canonical query".into()));
            }
            if term.priority == 0 {
                return Err(Error::Tables(format!(
                    "search term '{}' has priority 0 (use 1-4)",
                    term.canonical_query
                )));
            }
            term.aliases.retain(|a| !a.trim().is_empty());
            for a in &mut term.aliases {
                *a = a.to_lowercase();
            }
        }

        for word in &mut self.stoplist {
            *word = word.to_lowercase();
        }

        Ok(self)
    }

    /// Built-in tables for the bundled catalog
    pub fn builtin() -> Self {
        fn alias(patterns: &[&str], wine_id: &str) -> ExactAlias {
            ExactAlias {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                wine_id: wine_id.to_string(),
            }
        }
        fn term(aliases: &[&str], canonical_query: &str, priority: u8) -> SearchTerm {
            SearchTerm {
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
                canonical_query: canonical_query.to_string(),
                priority,
            }
        }

        let exact_aliases = vec![
            alias(&["miraval-rose", "miraval-rosé", "miraval rose", "miraval rosé", "miravalrose"], "20"),
            alias(&["pesquera-crianza", "pesquera crianza", "pesqueracrianza"], "8"),
            alias(&["prosecco"], "12"),
            alias(&["roero-arneis", "roero arneis", "roeroarneis", "roero", "arneis"], "21"),
            alias(&["meursault"], "22"),
        ];

        let search_terms = vec![
            // full names
            term(&["miraval rose", "miraval rosé", "miraval"], "miraval rosé", 1),
            term(&["pesquera crianza", "pesquera"], "pesquera crianza", 1),
            term(&["prosecco"], "prosecco", 1),
            term(&["roero arneis", "roero-arneis", "roero", "arneis"], "roero arneis", 1),
            term(&["meursault"], "meursault", 1),
            term(&["barolo"], "barolo", 1),
            term(&["tawny port", "tawny", "portwein"], "tawny port", 1),
            // grapes
            term(&["riesling", "雷司令"], "riesling", 2),
            term(&["spatburgunder", "spätburgunder", "pinot noir", "pinot", "黑皮诺"], "pinot noir", 2),
            term(&["gewurz", "gewürztraminer", "琼瑶浆"], "gewürztraminer", 2),
            term(&["dornfelder", "丹菲特"], "dornfelder", 2),
            term(&["sekt", "起泡酒", "sparkling"], "sekt", 2),
            term(&["tempranillo", "丹魄"], "tempranillo", 2),
            term(&["garnacha", "歌海娜"], "garnacha", 2),
            term(&["sangiovese", "桑娇维塞"], "sangiovese", 2),
            term(&["chardonnay", "霞多丽"], "chardonnay", 2),
            term(&["cabernet", "赤霞珠"], "cabernet", 2),
            term(&["merlot", "梅洛"], "merlot", 2),
            term(&["glera", "格雷拉"], "glera", 2),
            term(&["silvaner", "西万尼"], "silvaner", 2),
            term(&["muller", "müller", "thurgau", "米勒", "图高"], "müller-thurgau", 2),
            term(&["veltliner", "绿维特利纳"], "grüner veltliner", 2),
            term(&["nebbiolo", "内比奥罗"], "nebbiolo", 2),
            term(&["trollinger", "托林格"], "trollinger", 2),
            // regions
            term(&["mosel"], "mosel", 3),
            term(&["baden"], "baden", 3),
            term(&["pfalz"], "pfalz", 3),
            term(&["rheingau"], "rheingau", 3),
            term(&["ribera", "duero", "杜埃罗"], "ribera del duero", 3),
            term(&["rioja", "里奥哈"], "rioja", 3),
            term(&["champagne", "香槟"], "champagne", 3),
            term(&["bordeaux", "波尔多"], "bordeaux", 3),
            term(&["burgundy", "burgund", "勃艮第"], "burgundy", 3),
            term(&["chianti", "基安蒂"], "chianti", 3),
            term(&["tuscany", "toskana", "托斯卡纳"], "tuscany", 3),
            term(&["veneto", "威尼托"], "veneto", 3),
            term(&["franken", "弗兰肯"], "franken", 3),
            term(&["rheinhessen", "莱茵黑森"], "rheinhessen", 3),
            term(&["provence", "普罗旺斯"], "provence", 3),
            term(&["wachau", "瓦豪"], "wachau", 3),
            term(&["piemont", "piedmont", "皮埃蒙特"], "piedmont", 3),
            term(&["württemberg", "wurttemberg", "符腾堡"], "württemberg", 3),
            // style / technique
            term(&["trocken", "dry", "干型"], "trocken", 4),
            term(&["süß", "sweet", "甜型"], "sweet", 4),
            term(&["crianza", "陈酿"], "crianza", 4),
            term(&["reserva", "珍藏"], "reserva", 4),
            term(&["brut", "干型起泡"], "brut", 4),
        ];

        let stoplist = [
            "www", "http", "https", "com", "de", "en", "wine", "wein", "wines", "weine",
            "aop", "aoc", "docg", "doc", "igt", "familles", "pitt", "perrin", "cotes", "les",
            "vignes", "html", "htm", "php", "aspx", "shop", "product", "products", "produkt",
            "index",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();

        Self {
            exact_aliases,
            search_terms,
            stoplist,
            weights: None,
        }
    }
}
