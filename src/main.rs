use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wein_scan::cli::{Cli, Commands};
use wein_scan::config::Config;
use wein_scan::debounce::{scan_payload, ScanDebouncer};
use wein_scan::error::{Result, WeinScanError};
use wein_scan::ocr::{self, LabelText, OcrCache, OcrEngine, TextSource};
use wein_scan::photos::{self, LabelOutcome};
use wein_scan::prompt;
use wein_scan::scanner::{self, ImageInfo};
use wein_scan::store::{SourceUrl, SourceUrlStore};
use wein_scan_common::{
    CatalogFilter, Language, MatchCandidate, Matcher, NoMatch, ProductUrl, Resolution, WineRecord,
};

const REPORT_FILE_NAME: &str = "wein-scan-report.json";
const EXPLAIN_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let lang = cli.lang.unwrap_or(config.language);

    match cli.command {
        Commands::Config { show, set_language, set_catalog } => {
            run_config(config, show, set_language, set_catalog)
        }
        Commands::Cache { clear, folder, info } => run_cache(clear, folder, info),
        command => run_with_catalog(command, &config, lang).await,
    }
}

fn run_config(
    mut config: Config,
    show: bool,
    set_language: Option<Language>,
    set_catalog: Option<PathBuf>,
) -> Result<()> {
    let changed = set_language.is_some() || set_catalog.is_some();

    if let Some(language) = set_language {
        config.set_language(language)?;
        println!("✔ Language set to {}", language);
    }
    if let Some(path) = set_catalog {
        config.set_catalog(path)?;
        println!("✔ Catalog set");
    }
    if show || !changed {
        print_config(&config)?;
    }
    Ok(())
}

fn run_cache(clear: bool, folder: Option<PathBuf>, info: bool) -> Result<()> {
    let target = folder.unwrap_or_else(|| PathBuf::from("."));
    let cache_path = OcrCache::cache_path(&target);

    if info || !clear {
        if cache_path.exists() {
            let cache = OcrCache::load(&target);
            println!("OCR cache:");
            println!("  Path: {}", cache_path.display());
            println!("  Entries: {}", cache.len());
            if let Ok(meta) = std::fs::metadata(&cache_path) {
                println!("  Size: {} bytes", meta.len());
            }
        } else {
            println!("No OCR cache at {}", cache_path.display());
        }
    }

    if clear {
        match OcrCache::clear(&target) {
            Ok(true) => println!("✔ OCR cache deleted: {}", cache_path.display()),
            Ok(false) => println!("No OCR cache to delete"),
            Err(e) => println!("Could not delete OCR cache: {}", e),
        }
    }
    Ok(())
}

async fn run_with_catalog(command: Commands, config: &Config, lang: Language) -> Result<()> {
    let catalog = config.load_catalog()?;
    let tables = config.load_tables()?;
    let matcher = Matcher::new(&catalog, &tables).with_language(lang);
    tracing::debug!(wines = catalog.len(), language = %lang, "catalog loaded");

    match command {
        Commands::Search { query } => {
            let results = matcher.match_by_name(&query, lang);
            if results.is_empty() {
                println!("No wines match '{}'", query.trim());
            } else {
                for wine in &results {
                    println!("{}", wine_line(wine, lang));
                }
                println!("\n{} wine(s)", results.len());
            }
        }

        Commands::Code { code, interactive } => {
            let resolved = match matcher.match_by_code(&code) {
                Ok(resolution) => Some(resolution),
                Err(miss) => handle_miss(&matcher, &miss, interactive, lang)?,
            };
            if let Some(resolution) = resolved {
                print_resolution(&resolution, lang);
            }
        }

        Commands::Url { url, explain, no_save, interactive } => {
            if explain {
                print_candidates(&matcher.explain_url(&url), lang);
            }

            let resolved = match matcher.match_by_url(&url) {
                Ok(resolution) => Some(resolution),
                Err(miss) => handle_miss(&matcher, &miss, interactive, lang)?.map(|mut resolution| {
                    // only a URL that parsed is worth remembering
                    resolution.normalized_url = ProductUrl::parse(&url).ok().map(|u| u.normalized);
                    resolution
                }),
            };

            if let Some(resolution) = resolved {
                print_resolution(&resolution, lang);
                if !no_save {
                    let mut store = SourceUrlStore::load(&config.store_path()?);
                    if let Some(saved) = store.save_resolution(&resolution)? {
                        println!("  Source URL saved: {}", saved);
                    }
                }
            }
        }

        Commands::Photo { image, text, interactive } => {
            let info = ImageInfo::from_path(&image);
            let label = match text {
                Some(path) => {
                    if !path.is_file() {
                        return Err(WeinScanError::FileNotFound(path.display().to_string()));
                    }
                    Ok(LabelText {
                        text: ocr::clean_text(&std::fs::read_to_string(&path)?),
                        source: TextSource::Sidecar,
                    })
                }
                None => {
                    if !image.is_file() {
                        return Err(WeinScanError::FileNotFound(image.display().to_string()));
                    }
                    let folder = folder_of(&image);
                    let engine = OcrEngine::from_config(config);
                    let mut cache = OcrCache::load(&folder);
                    read_label_logged(&info, &engine, &mut cache, &folder).await
                }
            };

            match &label {
                Ok(label) => println!("Label text ({:?}): {}", label.source, one_line(&label.text)),
                Err(error) => println!("OCR failed ({}), trying the file name", error),
            }

            let resolved = match photos::identify(&matcher, &info, &label) {
                Ok(resolution) => Some(resolution),
                Err(miss) => handle_miss(&matcher, &miss, interactive, lang)?,
            };
            if let Some(resolution) = resolved {
                print_resolution(&resolution, lang);
            }
        }

        Commands::Photos { folder, output, recursive, no_cache } => {
            println!("🍷 wein-scan - photo folder\n");

            println!("[1/3] Scanning photos...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(WeinScanError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {} photo(s) found\n", images.len());

            println!("[2/3] Reading labels...{}", if no_cache { " (cache ignored)" } else { "" });
            let engine = OcrEngine::from_config(config);
            let mut cache = if no_cache { OcrCache::default() } else { OcrCache::load(&folder) };

            let progress = ProgressBar::new(images.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let mut labels: Vec<(ImageInfo, LabelOutcome)> = Vec::with_capacity(images.len());
            let mut engine_runs = 0usize;
            for image in images {
                progress.set_message(image.relative_path.clone());
                let outcome = ocr::read_label(&image, &engine, &mut cache).await.map_err(|e| {
                    tracing::warn!(file = %image.file_name, error = %e, "label text unavailable");
                    e.to_string()
                });
                if matches!(&outcome, Ok(label) if label.source == TextSource::Engine) {
                    engine_runs += 1;
                }
                labels.push((image, outcome));
                progress.inc(1);
            }
            progress.finish_and_clear();

            if engine_runs > 0 || no_cache {
                cache.save(&folder)?;
            }
            let unreadable = labels.iter().filter(|(_, l)| l.is_err()).count();
            println!("✔ Labels read ({} by OCR, {} unreadable)\n", engine_runs, unreadable);

            println!("[3/3] Matching...");
            let entries = photos::identify_all(&matcher, &labels);
            let report_path = output.unwrap_or_else(|| folder.join(REPORT_FILE_NAME));
            photos::write_report(&report_path, &entries)?;

            let matched = entries.iter().filter(|e| e.is_match()).count();
            println!("✔ {}/{} photo(s) identified", matched, entries.len());
            for (stage, count) in photos::stage_summary(&entries) {
                println!("  {:<16} {}", stage, count);
            }
            println!("✔ Report saved: {}", report_path.display());
        }

        Commands::Scan => {
            let mut debouncer = ScanDebouncer::from_millis(config.debounce_millis);
            println!("Reading scanned codes from stdin (Ctrl-D to stop)");

            for line in std::io::stdin().lock().split(b'\n') {
                let code = match scan_payload(&line?) {
                    Some(code) => code,
                    None => continue,
                };
                if !debouncer.accept(&code) {
                    continue;
                }
                match matcher.match_by_code(&code) {
                    Ok(resolution) => println!(
                        "✔ Scanned: {} → {} ({})",
                        code,
                        resolution.wine.display_name(lang),
                        resolution.wine_id()
                    ),
                    Err(_) => println!("Scanned: {} (not in catalog)", code),
                }
            }
        }

        Commands::Source { id } => {
            let wine = catalog.get(&id).ok_or_else(|| WeinScanError::UnknownWine(id.clone()))?;
            let store = SourceUrlStore::load(&config.store_path()?);
            match store.get(&wine.id) {
                Some(source) => println!("{}\n  saved {}", source.url, source.saved_at),
                None => println!("No source URL stored for {} ({})", wine.display_name(lang), wine.id),
            }
        }

        Commands::List { color, style, price } => {
            let filter = CatalogFilter {
                colors: color,
                styles: style,
                prices: price,
            };
            let wines = filter.apply(&catalog);
            for wine in &wines {
                println!("{}", wine_line(wine, lang));
            }
            println!("\n{} of {} wine(s)", wines.len(), catalog.len());
        }

        Commands::Show { id } => {
            let wine = catalog.get(&id).ok_or_else(|| WeinScanError::UnknownWine(id.clone()))?;
            let store = SourceUrlStore::load(&config.store_path()?);
            print_wine(wine, lang, store.get(&wine.id));
        }

        Commands::Config { .. } | Commands::Cache { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the reason; with `interactive`, fall back to manual entry
fn handle_miss<'a>(
    matcher: &Matcher<'a>,
    miss: &NoMatch,
    interactive: bool,
    lang: Language,
) -> Result<Option<Resolution<'a>>> {
    println!("✘ {}", miss);
    if interactive {
        prompt::run_manual_fallback(matcher, lang)
    } else {
        Ok(None)
    }
}

async fn read_label_logged(
    info: &ImageInfo,
    engine: &OcrEngine,
    cache: &mut OcrCache,
    folder: &Path,
) -> LabelOutcome {
    match ocr::read_label(info, engine, cache).await {
        Ok(label) => {
            if label.source == TextSource::Engine {
                if let Err(e) = cache.save(folder) {
                    tracing::warn!(error = %e, "could not write OCR cache");
                }
            }
            Ok(label)
        }
        Err(e) => {
            tracing::warn!(file = %info.file_name, error = %e, "label text unavailable");
            Err(e.to_string())
        }
    }
}

fn folder_of(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Localized value, English when the translation is empty
fn localized<'w>(local: &'w str, english: &'w str) -> &'w str {
    if local.is_empty() {
        english
    } else {
        local
    }
}

fn wine_line(wine: &WineRecord, lang: Language) -> String {
    format!(
        "{:>4}  {}  ({}, {})",
        wine.id,
        wine.display_name(lang),
        localized(wine.region_in(lang), &wine.region),
        localized(wine.country_in(lang), &wine.country)
    )
}

fn print_resolution(resolution: &Resolution<'_>, lang: Language) {
    println!(
        "✔ {} ({}) via {}",
        resolution.wine.display_name(lang),
        resolution.wine_id(),
        resolution.stage
    );
}

fn print_wine(wine: &WineRecord, lang: Language, source: Option<&SourceUrl>) {
    println!("{} ({})", wine.display_name(lang), wine.id);
    println!("  Country: {}", localized(wine.country_in(lang), &wine.country));
    match wine.subregion_in(lang).or(wine.subregion.as_deref()) {
        Some(sub) => println!("  Region:  {} / {}", localized(wine.region_in(lang), &wine.region), sub),
        None => println!("  Region:  {}", localized(wine.region_in(lang), &wine.region)),
    }

    let grapes = if wine.grapes_in(lang).is_empty() { &wine.grapes } else { wine.grapes_in(lang) };
    println!("  Grapes:  {}", grapes.join(", "));
    println!("  Type:    {} / {} / {}", wine.color, wine.style, wine.price);
    if let Some(year) = wine.year {
        println!("  Year:    {}", year);
    }
    if let Some(tasting) = wine.tasting_in(lang).or(wine.tasting.as_deref()) {
        println!("  Tasting: {}", tasting);
    }
    if let Some(image_url) = &wine.image_url {
        println!("  Image:   {}", image_url);
    }
    if !wine.scan_codes.is_empty() {
        println!("  Codes:   {}", wine.scan_codes.join(", "));
    }
    if let Some(source) = source {
        println!("  Source:  {} (saved {})", source.url, source.saved_at);
    }
}

fn print_candidates(candidates: &[MatchCandidate<'_>], lang: Language) {
    if candidates.is_empty() {
        println!("No scoring candidates");
        return;
    }

    println!("Scoring candidates:");
    for (rank, candidate) in candidates.iter().take(EXPLAIN_LIMIT).enumerate() {
        println!(
            "  {:>2}. {} ({}) score {}",
            rank + 1,
            candidate.wine.display_name(lang),
            candidate.wine.id,
            candidate.score
        );
        for hit in &candidate.matched_fields {
            println!("        {} '{}' +{}", hit.field, hit.token, hit.points);
        }
    }
    println!();
}

fn print_config(config: &Config) -> Result<()> {
    println!("Config: {}", Config::config_path()?.display());
    println!("  Language: {}", config.language);
    println!(
        "  Catalog: {}",
        config
            .catalog_source(std::env::var(wein_scan::config::CATALOG_ENV).ok())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "bundled".into())
    );
    println!(
        "  Match tables: {}",
        config
            .tables_path
            .as_ref()
            .map(|p| format!("built-in + {}", p.display()))
            .unwrap_or_else(|| "built-in".into())
    );
    println!(
        "  OCR: {} -l {} (timeout {}s)",
        config.ocr_command, config.ocr_languages, config.ocr_timeout_seconds
    );
    println!("  Scan debounce: {} ms", config.debounce_millis);
    println!("  Source URL store: {}", config.store_path()?.display());
    Ok(())
}
