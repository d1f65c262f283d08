//! Wine catalog types
//!
//! - WineRecord: one catalog entry with English/German/Chinese fields
//! - Language: display language used by the name search
//! - WineColor / WineStyle / PriceTier: filter dimensions

use serde::{Deserialize, Serialize};

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Zh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Zh];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Zh => "zh",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "de" | "german" | "deutsch" => Ok(Language::De),
            "zh" | "chinese" | "中文" => Ok(Language::Zh),
            _ => Err(format!("Unknown language: {}. Use en, de, or zh", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineColor {
    Red,
    White,
    Rose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineStyle {
    Still,
    Sparkling,
    Fortified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Budget,
    Mid,
    Premium,
}

macro_rules! impl_str_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(format!(
                        "Unknown {}: {}. Use {}",
                        stringify!($ty),
                        s,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

impl_str_enum!(WineColor { Red => "red", White => "white", Rose => "rose" });
impl_str_enum!(WineStyle { Still => "still", Sparkling => "sparkling", Fortified => "fortified" });
impl_str_enum!(PriceTier { Budget => "budget", Mid => "mid", Premium => "premium" });

/// Catalog entry
///
/// `grapes`, `grapes_de` and `grapes_zh` are parallel lists: same length,
/// same variety at the same index. [`Catalog`](crate::Catalog) rejects
/// records that break this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WineRecord {
    pub id: String,

    pub name: String,
    #[serde(default)]
    pub name_de: String,
    #[serde(default)]
    pub name_zh: String,

    pub country: String,
    #[serde(default)]
    pub country_de: String,
    #[serde(default)]
    pub country_zh: String,

    pub region: String,
    #[serde(default)]
    pub region_de: String,
    #[serde(default)]
    pub region_zh: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion_de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion_zh: Option<String>,

    #[serde(default)]
    pub grapes: Vec<String>,
    #[serde(default)]
    pub grapes_de: Vec<String>,
    #[serde(default)]
    pub grapes_zh: Vec<String>,

    pub color: WineColor,
    pub style: WineStyle,
    pub price: PriceTier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting_de: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting_zh: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Barcode / QR payloads identifying this wine exactly
    #[serde(default)]
    pub scan_codes: Vec<String>,
}

impl WineRecord {
    pub fn name_in(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.name,
            Language::De => &self.name_de,
            Language::Zh => &self.name_zh,
        }
    }

    pub fn country_in(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.country,
            Language::De => &self.country_de,
            Language::Zh => &self.country_zh,
        }
    }

    pub fn region_in(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.region,
            Language::De => &self.region_de,
            Language::Zh => &self.region_zh,
        }
    }

    pub fn grapes_in(&self, lang: Language) -> &[String] {
        match lang {
            Language::En => &self.grapes,
            Language::De => &self.grapes_de,
            Language::Zh => &self.grapes_zh,
        }
    }

    pub fn subregion_in(&self, lang: Language) -> Option<&str> {
        match lang {
            Language::En => self.subregion.as_deref(),
            Language::De => self.subregion_de.as_deref(),
            Language::Zh => self.subregion_zh.as_deref(),
        }
    }

    pub fn tasting_in(&self, lang: Language) -> Option<&str> {
        match lang {
            Language::En => self.tasting.as_deref(),
            Language::De => self.tasting_de.as_deref(),
            Language::Zh => self.tasting_zh.as_deref(),
        }
    }

    /// Localized name for display, falling back to English when the
    /// translation is missing.
    pub fn display_name(&self, lang: Language) -> &str {
        let name = self.name_in(lang);
        if name.is_empty() {
            &self.name
        } else {
            name
        }
    }
}
