//! Scoring resolver
//!
//! Last resort of the URL cascade. Every token is tested against every
//! field class of every wine, in all three languages:
//!
//! | field class            | weight |
//! |------------------------|--------|
//! | name                   | 10     |
//! | region (+ subregion)   | 8      |
//! | grape                  | 8      |
//! | country                | 5      |
//! | 4-char prefix on name or region, when neither matched fully | 2 |
//!
//! Hits are additive across field classes. The highest total wins; ties go
//! to the wine that comes first in the catalog. A best score of 0 is no
//! match.

use crate::catalog::Catalog;
use crate::text;
use crate::types::{Language, WineRecord};
use serde::{Deserialize, Serialize};

const PARTIAL_PREFIX_CHARS: usize = 4;

/// Points per token hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub name: u32,
    pub region: u32,
    pub grape: u32,
    pub country: u32,
    pub partial: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name: 10,
            region: 8,
            grape: 8,
            country: 5,
            partial: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldClass {
    Name,
    Region,
    Grape,
    Country,
    Partial,
}

impl std::fmt::Display for FieldClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldClass::Name => write!(f, "name"),
            FieldClass::Region => write!(f, "region"),
            FieldClass::Grape => write!(f, "grape"),
            FieldClass::Country => write!(f, "country"),
            FieldClass::Partial => write!(f, "partial"),
        }
    }
}

/// One token scoring against one field class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldHit {
    pub field: FieldClass,
    pub token: String,
    pub points: u32,
}

/// A wine with its accumulated score for one match attempt
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate<'a> {
    pub wine: &'a WineRecord,
    pub score: u32,
    pub matched_fields: Vec<FieldHit>,
}

/// Lower-cased searchable text of a wine, all languages
struct FieldText {
    names: Vec<String>,
    regions: Vec<String>,
    grapes: Vec<String>,
    countries: Vec<String>,
}

impl FieldText {
    fn of(wine: &WineRecord) -> Self {
        let collect = |values: Vec<&str>| -> Vec<String> {
            values
                .into_iter()
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
                .collect()
        };

        Self {
            names: collect(Language::ALL.iter().map(|&l| wine.name_in(l)).collect()),
            regions: collect(
                Language::ALL
                    .iter()
                    .flat_map(|&l| std::iter::once(wine.region_in(l)).chain(wine.subregion_in(l)))
                    .collect(),
            ),
            grapes: collect(
                Language::ALL
                    .iter()
                    .flat_map(|&l| wine.grapes_in(l).iter().map(String::as_str))
                    .collect(),
            ),
            countries: collect(Language::ALL.iter().map(|&l| wine.country_in(l)).collect()),
        }
    }
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.contains(needle))
}

/// Field hits of a single token. The prefix hit is only tried when no
/// name or region hit was found.
fn token_hits(fields: &FieldText, token: &str, weights: &ScoreWeights) -> Vec<FieldHit> {
    let hit = |field, points| FieldHit {
        field,
        token: token.to_string(),
        points,
    };

    let name = any_contains(&fields.names, token);
    let region = any_contains(&fields.regions, token);

    let mut hits = Vec::new();
    if name {
        hits.push(hit(FieldClass::Name, weights.name));
    }
    if region {
        hits.push(hit(FieldClass::Region, weights.region));
    }
    if any_contains(&fields.grapes, token) {
        hits.push(hit(FieldClass::Grape, weights.grape));
    }
    if any_contains(&fields.countries, token) {
        hits.push(hit(FieldClass::Country, weights.country));
    }
    if !name && !region {
        let prefix = text::prefix_chars(token, PARTIAL_PREFIX_CHARS);
        if any_contains(&fields.names, prefix) || any_contains(&fields.regions, prefix) {
            hits.push(hit(FieldClass::Partial, weights.partial));
        }
    }
    hits
}

/// Score one wine against lower-cased tokens
pub fn score_wine<'a>(
    wine: &'a WineRecord,
    tokens: &[String],
    weights: &ScoreWeights,
) -> MatchCandidate<'a> {
    let fields = FieldText::of(wine);
    let matched_fields: Vec<FieldHit> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .flat_map(|t| token_hits(&fields, t, weights))
        .collect();
    let score = matched_fields.iter().map(|h| h.points).sum();

    MatchCandidate {
        wine,
        score,
        matched_fields,
    }
}

/// All wines with a positive score, best first; equal scores keep
/// catalog order.
pub fn rank_candidates<'a>(
    tokens: &[String],
    catalog: &'a Catalog,
    weights: &ScoreWeights,
) -> Vec<MatchCandidate<'a>> {
    let mut ranked: Vec<MatchCandidate<'a>> = catalog
        .iter()
        .map(|wine| score_wine(wine, tokens, weights))
        .filter(|c| c.score > 0)
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Strictly highest scoring wine, first in catalog order on ties.
///
/// Per token the field weights add up (name, grape, region, country,
/// across all languages). The 4-character prefix hit is the exception:
/// it only counts for a token that hit neither a name nor a region.
pub fn score_and_rank<'a>(
    tokens: &[String],
    catalog: &'a Catalog,
    weights: &ScoreWeights,
) -> Option<MatchCandidate<'a>> {
    let best = catalog
        .iter()
        .map(|wine| score_wine(wine, tokens, weights))
        .filter(|c| c.score > 0)
        .fold(None, |best: Option<MatchCandidate<'a>>, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        });

    if let Some(ref c) = best {
        tracing::trace!(wine = %c.wine.id, score = c.score, hits = ?c.matched_fields, "best scoring candidate");
    }
    best
}
