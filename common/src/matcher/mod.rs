//! Wine matching
//!
//! [`Matcher`] binds a read-only [`Catalog`] and [`MatchTables`] and exposes
//! the entry points used by the adapters:
//! - [`Matcher::match_by_code`]: scanned barcode / QR payload
//! - [`Matcher::match_by_name`]: search box text
//! - [`Matcher::match_by_url`]: pasted product URL
//! - [`Matcher::match_by_ocr_text`]: text recognised on a label photo
//!
//! Every call is a pure function of its input. A miss is a [`NoMatch`]
//! value carrying a user-facing reason, never an error.

pub mod cascade;
pub mod code;
pub mod name;
pub mod ocr;
pub mod score;

use crate::catalog::Catalog;
use crate::tables::MatchTables;
use crate::text;
use crate::types::{Language, WineRecord};
use crate::url::ProductUrl;
use cascade::{MatchContext, UrlCascade, UrlInput};
use score::MatchCandidate;
use serde::Serialize;

/// Words never reported back as "detected" in a URL miss
const UNREPORTED_URL_WORDS: [&str; 5] = ["www", "http", "https", "com", "de"];
const MAX_DETECTED_TERMS: usize = 3;

/// Which entry point or cascade stage resolved the wine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStage {
    Code,
    Name,
    ExactAlias,
    FullName,
    MultiWordName,
    KeywordTable,
    Token,
    Score,
    /// URL could not be parsed; the raw text went through the name search
    UrlFallback,
    OcrKeyword,
    OcrWord,
    FileName,
}

impl MatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Code => "code",
            MatchStage::Name => "name",
            MatchStage::ExactAlias => "exact-alias",
            MatchStage::FullName => "full-name",
            MatchStage::MultiWordName => "multi-word-name",
            MatchStage::KeywordTable => "keyword-table",
            MatchStage::Token => "token",
            MatchStage::Score => "score",
            MatchStage::UrlFallback => "url-fallback",
            MatchStage::OcrKeyword => "ocr-keyword",
            MatchStage::OcrWord => "ocr-word",
            MatchStage::FileName => "file-name",
        }
    }
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved wine
#[derive(Debug, Clone, Serialize)]
pub struct Resolution<'a> {
    pub wine: &'a WineRecord,
    pub stage: MatchStage,
    /// Set for URL matches; this is the URL to associate with the wine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
}

impl<'a> Resolution<'a> {
    fn new(wine: &'a WineRecord, stage: MatchStage) -> Self {
        Self {
            wine,
            stage,
            normalized_url: None,
        }
    }

    pub fn wine_id(&self) -> &str {
        &self.wine.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoMatchReason {
    #[error("empty input")]
    EmptyInput,

    #[error("scanned code {code} not in catalog")]
    CodeNotInCatalog { code: String },

    #[error("no wine matches '{query}'")]
    NameNotFound { query: String },

    #[error("URL not recognized{}", detected_suffix(.detected_terms))]
    UrlNotRecognized { detected_terms: Vec<String> },

    #[error("URL '{url}' could not be parsed ({cause})")]
    UrlUnparseable { url: String, cause: String },

    #[error("label text not recognized: \"{excerpt}\"")]
    TextNotRecognized { excerpt: String },

    #[error("file name not recognized")]
    FileNameNotRecognized,
}

fn detected_suffix(terms: &[String]) -> String {
    if terms.is_empty() {
        String::new()
    } else {
        format!(" (detected: {}...)", terms.join(", "))
    }
}

/// The input could not be resolved to a catalog wine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct NoMatch {
    pub reason: NoMatchReason,
}

impl From<NoMatchReason> for NoMatch {
    fn from(reason: NoMatchReason) -> Self {
        Self { reason }
    }
}

pub type MatchResult<'a> = std::result::Result<Resolution<'a>, NoMatch>;

pub struct Matcher<'a> {
    catalog: &'a Catalog,
    tables: &'a MatchTables,
    language: Language,
    cascade: UrlCascade,
}

impl<'a> Matcher<'a> {
    pub fn new(catalog: &'a Catalog, tables: &'a MatchTables) -> Self {
        Self {
            catalog,
            tables,
            language: Language::default(),
            cascade: UrlCascade::standard(),
        }
    }

    /// Language used by the name searches inside the URL and OCR paths
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_cascade(mut self, cascade: UrlCascade) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn tables(&self) -> &'a MatchTables {
        self.tables
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn context(&self) -> MatchContext<'a> {
        MatchContext {
            catalog: self.catalog,
            tables: self.tables,
            language: self.language,
        }
    }

    /// Exact scan-code lookup. The code is compared as given, without
    /// trimming or case folding.
    pub fn match_by_code(&self, code: &str) -> MatchResult<'a> {
        if code.is_empty() {
            return Err(NoMatchReason::EmptyInput.into());
        }

        match code::match_by_code(self.catalog, code) {
            Some(wine) => {
                tracing::debug!(code = %code, wine = %wine.id, "code matched");
                Ok(Resolution::new(wine, MatchStage::Code))
            }
            None => {
                tracing::debug!(code = %code, "code not in catalog");
                Err(NoMatchReason::CodeNotInCatalog {
                    code: code.to_string(),
                }
                .into())
            }
        }
    }

    /// All wines whose `lang` name, region, country or grapes contain the
    /// query, in catalog order
    pub fn match_by_name(&self, query: &str, lang: Language) -> Vec<&'a WineRecord> {
        name::match_by_name(self.catalog, query, lang)
    }

    /// First name-search hit as a resolution
    pub fn match_first_by_name(&self, query: &str, lang: Language) -> MatchResult<'a> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NoMatchReason::EmptyInput.into());
        }
        name::first_by_name(self.catalog, query, lang)
            .map(|wine| Resolution::new(wine, MatchStage::Name))
            .ok_or_else(|| {
                NoMatchReason::NameNotFound {
                    query: query.to_string(),
                }
                .into()
            })
    }

    /// Resolve a product URL through the cascade
    pub fn match_by_url(&self, raw_url: &str) -> MatchResult<'a> {
        if raw_url.trim().is_empty() {
            return Err(NoMatchReason::EmptyInput.into());
        }

        let url = match ProductUrl::parse(raw_url) {
            Ok(url) => url,
            Err(err) => return self.match_unparseable_url(raw_url, err.to_string()),
        };

        let normalized = url.normalized.clone();
        let input = UrlInput::new(url, self.tables);
        tracing::debug!(
            url = %normalized,
            file_token = %input.file_token,
            tokens = ?input.tokens,
            "matching url"
        );

        match self.cascade.run(&input, &self.context()) {
            Some((wine, stage)) => Ok(Resolution {
                wine,
                stage,
                normalized_url: Some(normalized),
            }),
            None => {
                let detected_terms = text::tokenize(&input.path_text)
                    .into_iter()
                    .filter(|t| !UNREPORTED_URL_WORDS.contains(&t.as_str()))
                    .take(MAX_DETECTED_TERMS)
                    .collect();
                Err(NoMatchReason::UrlNotRecognized { detected_terms }.into())
            }
        }
    }

    /// A URL that fails to parse is searched as plain text
    fn match_unparseable_url(&self, raw_url: &str, cause: String) -> MatchResult<'a> {
        tracing::debug!(url = %raw_url, cause = %cause, "url unparseable, falling back to name search");

        let query = raw_url.trim().to_lowercase();
        match name::first_by_name(self.catalog, &query, self.language) {
            Some(wine) => Ok(Resolution {
                wine,
                stage: MatchStage::UrlFallback,
                normalized_url: None,
            }),
            None => Err(NoMatchReason::UrlUnparseable {
                url: raw_url.trim().to_string(),
                cause,
            }
            .into()),
        }
    }

    /// Ranked scoring candidates for a URL, for diagnostics.
    /// Empty when the URL cannot be parsed.
    pub fn explain_url(&self, raw_url: &str) -> Vec<MatchCandidate<'a>> {
        match ProductUrl::parse(raw_url) {
            Ok(url) => {
                let input = UrlInput::new(url, self.tables);
                score::rank_candidates(&input.tokens, self.catalog, &self.tables.weights())
            }
            Err(_) => Vec::new(),
        }
    }

    /// Identify a wine from recognised label text
    pub fn match_by_ocr_text(&self, text: &str) -> MatchResult<'a> {
        ocr::match_text(self.catalog, self.tables, self.language, text)
    }

    /// Identify a wine from a photo file name (used when OCR fails)
    pub fn match_by_file_name(&self, file_name: &str) -> MatchResult<'a> {
        ocr::match_file_name(self.catalog, self.tables, self.language, file_name)
    }
}
