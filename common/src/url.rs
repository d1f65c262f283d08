//! Product URL decomposition
//!
//! Turns user-submitted URL text into the pieces the URL matcher works on:
//! hostname, decoded path segments and the "file token" (last segment
//! without document extension, lower-cased).

use crate::text;

/// Why a URL could not be decomposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    Empty,
    MissingHost,
    InvalidHost(String),
    InvalidPort(String),
}

impl std::fmt::Display for UrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlError::Empty => write!(f, "empty URL"),
            UrlError::MissingHost => write!(f, "URL has no host"),
            UrlError::InvalidHost(host) => write!(f, "invalid host '{}'", host),
            UrlError::InvalidPort(port) => write!(f, "invalid port '{}'", port),
        }
    }
}

impl std::error::Error for UrlError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUrl {
    /// Trimmed input with `https://` prepended when no scheme was given
    pub normalized: String,
    /// Lower-cased host without port or credentials
    pub hostname: String,
    /// Non-empty, percent-decoded path segments in order
    pub path_segments: Vec<String>,
}

impl ProductUrl {
    /// Normalize and decompose a raw URL string
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let normalized = normalize(raw).ok_or(UrlError::Empty)?;

        let scheme_end = normalized.find("://").map(|i| i + 3).unwrap_or(0);
        let rest = &normalized[scheme_end..];

        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];
        let hostname = parse_host(authority)?;

        let after_authority = &rest[authority_end..];
        let path_end = after_authority.find(['?', '#']).unwrap_or(after_authority.len());
        let path_segments = after_authority[..path_end]
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect();

        Ok(Self {
            normalized,
            hostname,
            path_segments,
        })
    }

    /// Last path segment, document extension stripped, lower-cased
    pub fn file_token(&self) -> String {
        self.path_segments
            .last()
            .map(|seg| text::strip_document_extension(seg).to_lowercase())
            .unwrap_or_default()
    }

    /// All path segments followed by the hostname, space-joined, lower-cased
    pub fn path_text(&self) -> String {
        self.path_segments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.hostname.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Trim and prepend `https://` when the text has no http(s) scheme.
/// Returns `None` for blank input.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

fn parse_host(authority: &str) -> Result<String, UrlError> {
    // user:pass@host:port
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    if host_port.is_empty() {
        return Err(UrlError::MissingHost);
    }

    let (host, port) = if host_port.starts_with('[') {
        // [v6]:port
        match host_port.find(']') {
            Some(close) => (&host_port[..=close], host_port[close + 1..].strip_prefix(':')),
            None => return Err(UrlError::InvalidHost(host_port.to_string())),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((h, p)) => (h, Some(p)),
            None => (host_port, None),
        }
    };

    if let Some(port) = port {
        if !port.is_empty() && port.parse::<u16>().is_err() {
            return Err(UrlError::InvalidPort(port.to_string()));
        }
    }

    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }

    let valid = if host.starts_with('[') {
        host[1..host.len() - 1]
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.')
    } else {
        !host.chars().any(is_forbidden_host_char)
    };
    if !valid {
        return Err(UrlError::InvalidHost(host.to_string()));
    }

    Ok(host.to_lowercase())
}

/// Code points a WHATWG host parser refuses in a domain
fn is_forbidden_host_char(c: char) -> bool {
    c.is_control()
        || c.is_whitespace()
        || matches!(c, '#' | '/' | ':' | '<' | '>' | '?' | '@' | '[' | '\\' | ']' | '^' | '|' | '%')
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
