//! External OCR engine
//!
//! Runs `<command> <image> stdout -l <languages>` (tesseract's calling
//! convention) and returns the cleaned stdout.

use crate::config::Config;
use crate::error::{Result, WeinScanError};
use regex::Regex;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

lazy_static::lazy_static! {
    static ref CONTROL_RE: Regex = Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").unwrap();
    static ref BLANKS_RE: Regex = Regex::new(r"[ \t]+").unwrap();
}

#[derive(Debug, Clone)]
pub struct OcrEngine {
    command: String,
    languages: String,
    timeout: Duration,
}

impl OcrEngine {
    pub fn new(command: impl Into<String>, languages: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            languages: languages.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.ocr_command.clone(),
            config.ocr_languages.clone(),
            Duration::from_secs(config.ocr_timeout_seconds),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub async fn recognize(&self, image: &Path) -> Result<String> {
        if !image.is_file() {
            return Err(WeinScanError::FileNotFound(image.display().to_string()));
        }

        tracing::debug!(command = %self.command, image = %image.display(), "running OCR engine");

        let run = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| WeinScanError::OcrTimeout {
                command: self.command.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| WeinScanError::OcrEngine(format!("cannot start '{}': {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WeinScanError::OcrEngine(format!(
                "'{}' failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = clean_text(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(chars = text.chars().count(), "OCR text received");
        Ok(text)
    }
}

/// Drop control characters, collapse blank runs, trim lines and remove
/// empty ones
pub fn clean_text(raw: &str) -> String {
    let without_control = CONTROL_RE.replace_all(raw, "");
    without_control
        .lines()
        .map(|line| BLANKS_RE.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
