//! Scan-code lookup
//!
//! The decoded barcode / QR payload is compared byte for byte with the
//! catalog's scan codes. Case and surrounding whitespace are significant:
//! scanners deliver the payload as printed and the catalog stores it the
//! same way.

use crate::catalog::Catalog;
use crate::types::WineRecord;

/// Wine carrying exactly `code`, first in catalog order. Empty codes
/// never match.
pub fn match_by_code<'a>(catalog: &'a Catalog, code: &str) -> Option<&'a WineRecord> {
    if code.is_empty() {
        return None;
    }
    catalog.find_by_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{"wines": [
                {"id": "1", "name": "Mosel Riesling", "country": "Germany", "region": "Mosel",
                 "grapes": [], "color": "white", "style": "still", "price": "mid",
                 "scanCodes": ["4006542012018", "WEIN-001"]},
                {"id": "2", "name": "Baden Pinot", "country": "Germany", "region": "Baden",
                 "grapes": [], "color": "red", "style": "still", "price": "mid"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_every_listed_code_matches() {
        let catalog = catalog();
        for code in ["4006542012018", "WEIN-001"] {
            assert_eq!(match_by_code(&catalog, code).map(|w| w.id.as_str()), Some("1"));
        }
    }

    #[test]
    fn test_repeated_calls_are_stable() {
        let catalog = catalog();
        let first = match_by_code(&catalog, "WEIN-001").map(|w| w.id.clone());
        for _ in 0..5 {
            assert_eq!(match_by_code(&catalog, "WEIN-001").map(|w| w.id.clone()), first);
        }
    }

    #[test]
    fn test_code_is_not_normalized() {
        let catalog = catalog();
        assert!(match_by_code(&catalog, "wein-001").is_none());
        assert!(match_by_code(&catalog, "WEIN-001 ").is_none());
        assert!(match_by_code(&catalog, "").is_none());
    }

    #[test]
    fn test_wine_without_codes_is_never_scanned() {
        let catalog = catalog();
        assert!(catalog.iter().filter(|w| w.id == "2").all(|w| w.scan_codes.is_empty()));
        assert!(match_by_code(&catalog, "2").is_none());
    }
}
