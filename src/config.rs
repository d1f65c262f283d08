//! User configuration
//!
//! Stored as JSON at `~/.config/wein-scan/config.json`. Missing file or
//! missing fields fall back to defaults.

use crate::error::{Result, WeinScanError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wein_scan_common::{Catalog, Language, MatchTables};

/// Environment variable overriding `catalog_path`
pub const CATALOG_ENV: &str = "WEIN_SCAN_CATALOG";

const STORE_FILE_NAME: &str = "source-urls.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    /// Catalog JSON replacing the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Match tables merged over the built-in ones
    pub tables_path: Option<PathBuf>,
    pub ocr_command: String,
    pub ocr_languages: String,
    pub ocr_timeout_seconds: u64,
    pub debounce_millis: u64,
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::En,
            catalog_path: None,
            tables_path: None,
            ocr_command: "tesseract".into(),
            ocr_languages: "eng+deu".into(),
            ocr_timeout_seconds: 60,
            debounce_millis: 1000,
            store_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WeinScanError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("wein-scan"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.language = language;
        self.save()
    }

    pub fn set_catalog(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(WeinScanError::FileNotFound(path.display().to_string()));
        }
        self.catalog_path = Some(path);
        self.save()
    }

    /// Catalog file to load; `env_value` (from [`CATALOG_ENV`]) wins over
    /// the configured path. `None` means the bundled catalog.
    pub fn catalog_source(&self, env_value: Option<String>) -> Option<PathBuf> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| self.catalog_path.clone())
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match self.catalog_source(std::env::var(CATALOG_ENV).ok()) {
            Some(path) => {
                if !path.exists() {
                    return Err(WeinScanError::FileNotFound(path.display().to_string()));
                }
                tracing::debug!(path = %path.display(), "loading catalog");
                Ok(Catalog::from_file(&path)?)
            }
            None => Ok(Catalog::builtin()?),
        }
    }

    /// Built-in tables, extended by `tables_path` when set
    pub fn load_tables(&self) -> Result<MatchTables> {
        let mut tables = MatchTables::builtin();
        if let Some(path) = &self.tables_path {
            if !path.exists() {
                return Err(WeinScanError::FileNotFound(path.display().to_string()));
            }
            tracing::debug!(path = %path.display(), "merging match tables");
            tables.merge(&MatchTables::from_file(path)?);
        }
        Ok(tables)
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(STORE_FILE_NAME)),
        }
    }
}
