//! Scan-code debounce
//!
//! A camera decode loop reports the same code many times per second while
//! it stays in view. A code equal to the last accepted one is dropped
//! until the window has passed; any other code passes at once.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ScanDebouncer {
    window: Duration,
    last: Option<(String, Instant)>,
}

impl ScanDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn accept(&mut self, code: &str) -> bool {
        self.accept_at(code, Instant::now())
    }

    /// Suppressed repeats do not extend the window
    pub fn accept_at(&mut self, code: &str, now: Instant) -> bool {
        if let Some((last_code, at)) = &self.last {
            if last_code == code && now.saturating_duration_since(*at) < self.window {
                tracing::trace!(code = %code, "duplicate scan suppressed");
                return false;
            }
        }
        self.last = Some((code.to_string(), now));
        true
    }
}

/// One raw line from the scanner stream as a code. Only the line
/// terminator is stripped. Blank lines and payloads that are not UTF-8
/// give `None`.
pub fn scan_payload(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    match std::str::from_utf8(raw) {
        Ok(code) => Some(code.to_string()),
        Err(e) => {
            tracing::warn!(bytes = raw.len(), error = %e, "skipping scan payload that is not UTF-8");
            None
        }
    }
}

impl Default for ScanDebouncer {
    fn default() -> Self {
        Self::from_millis(1000)
    }
}
