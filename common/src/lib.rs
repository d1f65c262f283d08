//! wein-scan common library
//!
//! Wine identification core shared by the CLI and any other front end:
//! catalog, match tables and the code / name / URL / label-text matchers.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod tables;
pub mod text;
pub mod types;
pub mod url;

pub use catalog::{Catalog, CatalogFile};
pub use error::{Error, Result};
pub use filter::CatalogFilter;
pub use matcher::score::{FieldClass, FieldHit, MatchCandidate, ScoreWeights};
pub use matcher::{MatchResult, MatchStage, Matcher, NoMatch, NoMatchReason, Resolution};
pub use tables::{ExactAlias, MatchTables, SearchTerm};
pub use types::{Language, PriceTier, WineColor, WineRecord, WineStyle};
pub use url::ProductUrl;
