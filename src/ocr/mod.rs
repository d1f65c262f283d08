//! Label text acquisition
//!
//! Order per photo: sidecar `<stem>.txt`, folder cache, OCR engine.

pub mod cache;
pub mod engine;

pub use cache::{compute_file_hash, OcrCache};
pub use engine::{clean_text, OcrEngine};

use crate::error::Result;
use crate::scanner::ImageInfo;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    Sidecar,
    Cache,
    Engine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelText {
    pub text: String,
    pub source: TextSource,
}

/// Text of one label photo. Engine results are added to `cache`; the
/// caller saves it.
pub async fn read_label(image: &ImageInfo, engine: &OcrEngine, cache: &mut OcrCache) -> Result<LabelText> {
    if let Some(sidecar) = &image.sidecar {
        let text = std::fs::read_to_string(sidecar)?;
        return Ok(LabelText {
            text: clean_text(&text),
            source: TextSource::Sidecar,
        });
    }

    let hash = compute_file_hash(&image.path)?;
    if let Some(text) = cache.get(&hash) {
        tracing::debug!(file = %image.file_name, "OCR cache hit");
        return Ok(LabelText {
            text: text.to_string(),
            source: TextSource::Cache,
        });
    }

    let text = engine.recognize(&image.path).await?;
    let file_size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
    cache.insert(hash, image.file_name.clone(), file_size, text.clone());

    Ok(LabelText {
        text,
        source: TextSource::Engine,
    })
}
