//! Photo folder, OCR cache and source-URL store working together

use std::time::Duration;
use tempfile::tempdir;
use wein_scan::error::WeinScanError;
use wein_scan::ocr::{compute_file_hash, read_label, OcrCache, OcrEngine, TextSource};
use wein_scan::photos::{identify_all, LabelOutcome};
use wein_scan::scanner::{scan_folder, ImageInfo};
use wein_scan::store::SourceUrlStore;
use wein_scan_common::{Catalog, MatchStage, MatchTables, Matcher};

fn no_engine() -> OcrEngine {
    OcrEngine::new("wein-scan-no-such-ocr", "eng", Duration::from_secs(1))
}

#[test]
fn test_missing_folder() {
    let err = scan_folder(std::path::Path::new("/nonexistent/photos"), false).unwrap_err();
    assert!(matches!(err, WeinScanError::FolderNotFound(_)));
    assert!(err.to_string().contains("/nonexistent/photos"));
}

#[test]
fn test_core_error_converts() {
    let core = wein_scan_common::Error::Catalog("duplicate wine id '7'".to_string());
    let err: WeinScanError = core.into();
    assert!(matches!(err, WeinScanError::Core(_)));
    assert!(err.to_string().contains("duplicate wine id"));
}

/// A resolved URL is stored in normalized form and survives a reload
#[test]
fn test_source_url_round_trip() {
    let catalog = Catalog::builtin().unwrap();
    let tables = MatchTables::builtin();
    let matcher = Matcher::new(&catalog, &tables);
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("source-urls.json");

    let hit = matcher.match_by_url("moevenpick-wein.de/prosecco.html").unwrap();
    let normalized = hit.normalized_url.clone().unwrap();
    assert_eq!(normalized, "https://moevenpick-wein.de/prosecco.html");

    let mut store = SourceUrlStore::load(&path);
    assert!(store.is_empty());
    store.save_url(hit.wine_id(), &normalized).unwrap();

    let reloaded = SourceUrlStore::load(&path);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("12").map(|s| s.url.as_str()), Some(normalized.as_str()));
    assert!(reloaded.get("11").is_none());
}

#[test]
fn test_later_url_replaces_earlier() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("source-urls.json");

    let mut store = SourceUrlStore::load(&path);
    store.save_url("23", "https://a.example/barolo").unwrap();
    store.save_url("23", "https://b.example/barolo").unwrap();

    let reloaded = SourceUrlStore::load(&path);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("23").unwrap().url, "https://b.example/barolo");
}

/// Sidecar text wins; the engine is never started
#[tokio::test]
async fn test_sidecar_text_is_used() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("label.jpg"), b"jpeg").unwrap();
    std::fs::write(dir.path().join("label.txt"), "  BAROLO \n\n DOCG\n").unwrap();

    let images = scan_folder(dir.path(), false).unwrap();
    assert_eq!(images.len(), 1);

    let mut cache = OcrCache::load(dir.path());
    let label = read_label(&images[0], &no_engine(), &mut cache).await.unwrap();
    assert_eq!(label.source, TextSource::Sidecar);
    assert_eq!(label.text, "BAROLO\nDOCG");
    assert!(cache.is_empty());
}

/// Cached text is returned for an unchanged image, even without an engine
#[tokio::test]
async fn test_cached_text_survives_reload() {
    let dir = tempdir().unwrap();
    let image_path = dir.path().join("IMG_0042.jpg");
    std::fs::write(&image_path, b"label bytes").unwrap();

    let mut cache = OcrCache::load(dir.path());
    let hash = compute_file_hash(&image_path).unwrap();
    cache.insert(hash, "IMG_0042.jpg".into(), 11, "Wachau\nGrüner Veltliner".into());
    cache.save(dir.path()).unwrap();

    let mut reloaded = OcrCache::load(dir.path());
    let image = ImageInfo::from_path(&image_path);
    let label = read_label(&image, &no_engine(), &mut reloaded).await.unwrap();
    assert_eq!(label.source, TextSource::Cache);

    let catalog = Catalog::builtin().unwrap();
    let tables = MatchTables::builtin();
    let matcher = Matcher::new(&catalog, &tables);
    let outcome: LabelOutcome = Ok(label);
    let entries = identify_all(&matcher, &[(image, outcome)]);
    assert_eq!(entries[0].wine_id.as_deref(), Some("19"));
    assert_eq!(entries[0].stage.as_deref(), Some(MatchStage::OcrKeyword.as_str()));
}

#[tokio::test]
async fn test_changed_image_misses_cache() {
    let dir = tempdir().unwrap();
    let image_path = dir.path().join("label.png");
    std::fs::write(&image_path, b"first").unwrap();

    let mut cache = OcrCache::load(dir.path());
    cache.insert(compute_file_hash(&image_path).unwrap(), "label.png".into(), 5, "Barolo".into());
    std::fs::write(&image_path, b"second").unwrap();

    let image = ImageInfo::from_path(&image_path);
    let err = read_label(&image, &no_engine(), &mut cache).await.unwrap_err();
    assert!(matches!(err, WeinScanError::OcrEngine(_)));
}

/// A raw-text fallback hit has no URL to remember
#[test]
fn test_fallback_resolution_is_not_saved() {
    let catalog = Catalog::builtin().unwrap();
    let tables = MatchTables::builtin();
    let matcher = Matcher::new(&catalog, &tables);
    let dir = tempdir().unwrap();
    let path = dir.path().join("source-urls.json");

    let hit = matcher.match_by_url("Pfalz Dornfelder").unwrap();
    assert_eq!(hit.wine_id(), "4");
    assert_eq!(hit.stage, MatchStage::UrlFallback);
    assert_eq!(hit.normalized_url, None);

    let mut store = SourceUrlStore::load(&path);
    assert_eq!(store.save_resolution(&hit).unwrap(), None);
    assert!(!path.exists());
    assert!(SourceUrlStore::load(&path).get("4").is_none());

    let parsed = matcher.match_by_url("https://weine_shop.de/italien/prosecco.html").unwrap();
    assert_eq!(
        store.save_resolution(&parsed).unwrap().as_deref(),
        Some("https://weine_shop.de/italien/prosecco.html")
    );
    assert_eq!(SourceUrlStore::load(&path).len(), 1);
}

/// Same file name in two subfolders stays distinguishable in the report
#[tokio::test]
async fn test_recursive_report_keeps_relative_paths() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("keller");
    std::fs::create_dir(&sub).unwrap();
    for (folder, text) in [(dir.path(), "Barolo DOCG"), (sub.as_path(), "Pfalz Dornfelder")] {
        std::fs::write(folder.join("IMG_0001.jpg"), b"jpeg").unwrap();
        std::fs::write(folder.join("IMG_0001.txt"), text).unwrap();
    }

    let images = scan_folder(dir.path(), true).unwrap();
    let mut cache = OcrCache::load(dir.path());
    let mut labels = Vec::new();
    for image in images {
        let label: LabelOutcome = read_label(&image, &no_engine(), &mut cache)
            .await
            .map_err(|e| e.to_string());
        labels.push((image, label));
    }

    let catalog = Catalog::builtin().unwrap();
    let tables = MatchTables::builtin();
    let matcher = Matcher::new(&catalog, &tables);
    let entries = identify_all(&matcher, &labels);

    let rows: Vec<(&str, Option<&str>)> = entries
        .iter()
        .map(|e| (e.path.as_str(), e.wine_id.as_deref()))
        .collect();
    assert_eq!(
        rows,
        vec![("IMG_0001.jpg", Some("23")), ("keller/IMG_0001.jpg", Some("4"))]
    );
}
