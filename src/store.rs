//! Source-URL association
//!
//! Remembers, per wine, the last shop URL that resolved to it.
//! File format: `{"<wine id>": {"url": "...", "savedAt": "<RFC 3339>"}}`.

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wein_scan_common::Resolution;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUrl {
    pub url: String,
    pub saved_at: String,
}

#[derive(Debug, Clone)]
pub struct SourceUrlStore {
    path: PathBuf,
    entries: BTreeMap<String, SourceUrl>,
}

impl SourceUrlStore {
    /// Missing or unreadable files give an empty store
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt source-URL store");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, wine_id: &str) -> Option<&SourceUrl> {
        self.entries.get(wine_id)
    }

    /// Associate `url` with the wine and write the store
    pub fn save_url(&mut self, wine_id: &str, url: &str) -> Result<()> {
        self.entries.insert(
            wine_id.to_string(),
            SourceUrl {
                url: url.to_string(),
                saved_at: Utc::now().to_rfc3339(),
            },
        );
        self.save()
    }

    /// Store the URL a resolution came from. Resolutions without a
    /// parsed URL (code, name, raw-text fallback) leave the store alone.
    pub fn save_resolution(&mut self, resolution: &Resolution<'_>) -> Result<Option<String>> {
        match resolution.normalized_url.as_deref() {
            Some(url) => {
                self.save_url(resolution.wine_id(), url)?;
                Ok(Some(url.to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "source-URL store written");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = SourceUrlStore::load(&dir.path().join("urls.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("urls.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SourceUrlStore::load(&path).is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("urls.json");

        let mut store = SourceUrlStore::load(&path);
        store.save_url("12", "https://shop.example/prosecco.html").unwrap();
        store.save_url("12", "https://other.example/prosecco").unwrap();

        let reloaded = SourceUrlStore::load(&path);
        assert_eq!(reloaded.len(), 1);
        let entry = reloaded.get("12").unwrap();
        assert_eq!(entry.url, "https://other.example/prosecco");
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.saved_at).is_ok());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("savedAt"));
    }
}
