use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeinScanError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("No images found in {0}")]
    NoImagesFound(String),

    #[error("No wine with id '{0}' in the catalog")]
    UnknownWine(String),

    #[error("OCR engine error: {0}")]
    OcrEngine(String),

    #[error("OCR engine '{command}' timed out after {seconds}s")]
    OcrTimeout { command: String, seconds: u64 },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Catalog error: {0}")]
    Core(#[from] wein_scan_common::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WeinScanError>;
