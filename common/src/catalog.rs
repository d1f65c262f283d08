//! Wine catalog
//!
//! Read-only list of [`WineRecord`]s plus lookup indexes built once at
//! load time. Every matcher receives the catalog explicitly; there is no
//! global instance.

use crate::error::{Error, Result};
use crate::types::WineRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// On-disk catalog format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub wines: Vec<WineRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    wines: Vec<WineRecord>,
    /// id → index
    by_id: HashMap<String, usize>,
    /// scan code → index of the first record carrying it
    by_code: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, checking record invariants
    pub fn from_records(wines: Vec<WineRecord>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(wines.len());
        let mut by_code: HashMap<String, usize> = HashMap::new();

        for (idx, wine) in wines.iter().enumerate() {
            validate_record(wine)?;

            if by_id.insert(wine.id.clone(), idx).is_some() {
                return Err(Error::Catalog(format!("duplicate wine id '{}'", wine.id)));
            }

            for code in &wine.scan_codes {
                if code.is_empty() {
                    continue;
                }
                if let Some(&first) = by_code.get(code) {
                    tracing::warn!(
                        code = %code,
                        kept = %wines[first].id,
                        ignored = %wine.id,
                        "scan code listed by more than one wine"
                    );
                    continue;
                }
                by_code.insert(code.clone(), idx);
            }
        }

        Ok(Self { wines, by_id, by_code })
    }

    /// Load from a JSON string (`{"wines": [...]}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_records(file.wines)
    }

    /// Load from a JSON file (non-WASM only)
    #[cfg(not(feature = "wasm"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn get(&self, id: &str) -> Option<&WineRecord> {
        self.by_id.get(id).map(|&idx| &self.wines[idx])
    }

    /// Exact scan-code lookup, no normalization
    pub fn find_by_code(&self, code: &str) -> Option<&WineRecord> {
        self.by_code.get(code).map(|&idx| &self.wines[idx])
    }

    /// Records in catalog order
    pub fn wines(&self) -> &[WineRecord] {
        &self.wines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WineRecord> {
        self.wines.iter()
    }

    pub fn len(&self) -> usize {
        self.wines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wines.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a WineRecord;
    type IntoIter = std::slice::Iter<'a, WineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.wines.iter()
    }
}

fn validate_record(wine: &WineRecord) -> Result<()> {
    if wine.id.trim().is_empty() {
        return Err(Error::Catalog(format!("wine '{}' has an empty id", wine.name)));
    }
    if wine.name.trim().is_empty() {
        return Err(Error::Catalog(format!("wine '{}' has an empty name", wine.id)));
    }

    let en = wine.grapes.len();
    if wine.grapes_de.len() != en || wine.grapes_zh.len() != en {
        return Err(Error::Catalog(format!(
            "wine '{}': grape lists differ in length (en {}, de {}, zh {})",
            wine.id,
            en,
            wine.grapes_de.len(),
            wine.grapes_zh.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wine_json(id: &str, name: &str, codes: &[&str]) -> String {
        format!(
            r#"{{"id":"{}","name":"{}","country":"Germany","region":"Mosel",
               "grapes":["Riesling"],"grapesDe":["Riesling"],"grapesZh":["雷司令"],
               "color":"white","style":"still","price":"mid","scanCodes":{}}}"#,
            id,
            name,
            serde_json::to_string(codes).unwrap()
        )
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().expect("bundled catalog must be valid");
        assert!(catalog.len() >= 20);
        assert!(catalog.get("12").is_some());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = format!(
            r#"{{"wines":[{},{}]}}"#,
            wine_json("1", "A", &[]),
            wine_json("1", "B", &[])
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_grape_lists_must_be_parallel() {
        let json = r#"{"wines":[{"id":"1","name":"A","country":"Germany","region":"Mosel",
            "grapes":["Riesling","Elbling"],"grapesDe":["Riesling"],"grapesZh":["雷司令"],
            "color":"white","style":"still","price":"mid"}]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(format!("{}", err).contains("grape lists differ"));
    }

    #[test]
    fn test_first_record_keeps_shared_code() {
        let json = format!(
            r#"{{"wines":[{},{}]}}"#,
            wine_json("1", "A", &["X1"]),
            wine_json("2", "B", &["X1", "X2"])
        );
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog.find_by_code("X1").map(|w| w.id.as_str()), Some("1"));
        assert_eq!(catalog.find_by_code("X2").map(|w| w.id.as_str()), Some("2"));
    }

    #[test]
    fn test_find_by_code_is_exact() {
        let json = format!(r#"{{"wines":[{}]}}"#, wine_json("1", "A", &["WINE-001"]));
        let catalog = Catalog::from_json(&json).unwrap();
        assert!(catalog.find_by_code("WINE-001").is_some());
        assert!(catalog.find_by_code("wine-001").is_none());
        assert!(catalog.find_by_code(" WINE-001").is_none());
    }
}
