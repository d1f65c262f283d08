//! wein-scan: entry adapters around the wine matching core
//!
//! Configuration, OCR engine, photo folders, scan debounce, source-URL
//! store and the manual-entry prompt. Matching itself lives in
//! `wein_scan_common`.

pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod ocr;
pub mod photos;
pub mod prompt;
pub mod scanner;
pub mod store;
