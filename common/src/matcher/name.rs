//! Name search
//!
//! Case-insensitive substring search over name, region, country and grapes
//! in one language. Returns every hit in catalog order.

use crate::catalog::Catalog;
use crate::types::{Language, WineRecord};

/// All wines whose `lang` name, region, country or a grape contains
/// `query`. Blank queries return nothing.
pub fn match_by_name<'a>(catalog: &'a Catalog, query: &str, lang: Language) -> Vec<&'a WineRecord> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    catalog
        .iter()
        .filter(|wine| wine_contains(wine, &needle, lang))
        .collect()
}

/// First hit of [`match_by_name`]
pub fn first_by_name<'a>(catalog: &'a Catalog, query: &str, lang: Language) -> Option<&'a WineRecord> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    catalog.iter().find(|wine| wine_contains(wine, &needle, lang))
}

fn wine_contains(wine: &WineRecord, needle: &str, lang: Language) -> bool {
    let contains = |field: &str| !field.is_empty() && field.to_lowercase().contains(needle);

    contains(wine.name_in(lang))
        || contains(wine.region_in(lang))
        || contains(wine.country_in(lang))
        || wine.grapes_in(lang).iter().any(|g| contains(g))
}
