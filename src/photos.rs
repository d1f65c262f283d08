//! Label photo identification and report
//!
//! Text acquisition is done up front (it shells out to the OCR engine);
//! matching the collected texts is pure and runs in parallel.

use crate::error::Result;
use crate::ocr::LabelText;
use crate::scanner::ImageInfo;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wein_scan_common::{Language, MatchResult, Matcher};

/// Label text of a photo, or why it could not be read
pub type LabelOutcome = std::result::Result<LabelText, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoReportEntry {
    pub file_name: String,
    /// Path below the scanned folder
    pub path: String,
    pub wine_id: Option<String>,
    pub wine_name: Option<String>,
    pub stage: Option<String>,
    pub reason: Option<String>,
}

impl PhotoReportEntry {
    fn from_result(image: &ImageInfo, result: &MatchResult<'_>, lang: Language) -> Self {
        let file_name = image.file_name.clone();
        let path = image.relative_path.clone();
        match result {
            Ok(resolution) => Self {
                file_name,
                path,
                wine_id: Some(resolution.wine.id.clone()),
                wine_name: Some(resolution.wine.display_name(lang).to_string()),
                stage: Some(resolution.stage.to_string()),
                reason: None,
            },
            Err(miss) => Self {
                file_name,
                path,
                wine_id: None,
                wine_name: None,
                stage: None,
                reason: Some(miss.to_string()),
            },
        }
    }

    pub fn is_match(&self) -> bool {
        self.wine_id.is_some()
    }
}

/// Match one photo: label text when available, the file name when the
/// text could not be read
pub fn identify<'a>(matcher: &Matcher<'a>, image: &ImageInfo, label: &LabelOutcome) -> MatchResult<'a> {
    match label {
        Ok(label) => matcher.match_by_ocr_text(&label.text),
        Err(error) => {
            tracing::debug!(file = %image.file_name, error = %error, "no label text, trying file name");
            matcher.match_by_file_name(&image.file_name)
        }
    }
}

/// Identify all photos in parallel, keeping input order
pub fn identify_all(matcher: &Matcher<'_>, labels: &[(ImageInfo, LabelOutcome)]) -> Vec<PhotoReportEntry> {
    let lang = matcher.language();
    labels
        .par_iter()
        .map(|(image, label)| {
            let result = identify(matcher, image, label);
            PhotoReportEntry::from_result(image, &result, lang)
        })
        .collect()
}

pub fn write_report(path: &Path, entries: &[PhotoReportEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}

/// Count of entries per resolving stage, misses excluded
pub fn stage_summary(entries: &[PhotoReportEntry]) -> Vec<(String, usize)> {
    let mut counts: std::collections::BTreeMap<String, usize> = std::collections::BTreeMap::new();
    for stage in entries.iter().filter_map(|e| e.stage.as_ref()) {
        *counts.entry(stage.clone()).or_default() += 1;
    }
    counts.into_iter().collect()
}
