use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wein_scan_common::{Language, PriceTier, WineColor, WineStyle};

#[derive(Parser)]
#[command(name = "wein-scan")]
#[command(about = "Identify wines from scan codes, label photos and shop URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Display language (en/de/zh); defaults to the configured one
    #[arg(long, global = true)]
    pub lang: Option<Language>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search wines by name, region, country or grape
    Search {
        #[arg(required = true)]
        query: String,
    },

    /// Look up a scanned code
    Code {
        #[arg(required = true)]
        code: String,

        /// Ask for manual input when the code is unknown
        #[arg(short, long)]
        interactive: bool,
    },

    /// Identify the wine behind a shop URL and remember the URL
    Url {
        #[arg(required = true)]
        url: String,

        /// Print the scoring candidates
        #[arg(long)]
        explain: bool,

        /// Do not store the URL for the resolved wine
        #[arg(long)]
        no_save: bool,

        /// Ask for manual input when the URL is not recognized
        #[arg(short, long)]
        interactive: bool,
    },

    /// Identify one label photo
    Photo {
        #[arg(required = true)]
        image: PathBuf,

        /// Use this text file instead of running OCR
        #[arg(short, long)]
        text: Option<PathBuf>,

        /// Ask for manual input when the label is not recognized
        #[arg(short, long)]
        interactive: bool,
    },

    /// Identify every label photo in a folder and write a JSON report
    Photos {
        #[arg(required = true)]
        folder: PathBuf,

        /// Report file (default: <folder>/wein-scan-report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include subfolders
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Ignore the OCR cache (results are still written to it)
        #[arg(long)]
        no_cache: bool,
    },

    /// Read scanned codes from stdin, one per line
    Scan,

    /// Print the stored source URL of a wine
    Source {
        #[arg(required = true)]
        id: String,
    },

    /// List catalog wines, optionally filtered
    List {
        /// red/white/rose (comma separated)
        #[arg(long, value_delimiter = ',')]
        color: Vec<WineColor>,

        /// still/sparkling/fortified (comma separated)
        #[arg(long, value_delimiter = ',')]
        style: Vec<WineStyle>,

        /// budget/mid/premium (comma separated)
        #[arg(long, value_delimiter = ',')]
        price: Vec<PriceTier>,
    },

    /// Show one wine
    Show {
        #[arg(required = true)]
        id: String,
    },

    /// Show or edit the configuration
    Config {
        #[arg(long)]
        show: bool,

        #[arg(long)]
        set_language: Option<Language>,

        /// Catalog JSON to use instead of the bundled one
        #[arg(long)]
        set_catalog: Option<PathBuf>,
    },

    /// Manage the OCR cache of a photo folder
    Cache {
        /// Delete the cache
        #[arg(long)]
        clear: bool,

        /// Photo folder (default: current directory)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Show cache information
        #[arg(long)]
        info: bool,
    },
}
