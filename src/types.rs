//! Core types for wwdc-dl

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Conference years the site currently publishes session catalogs for.
const SUPPORTED_YEARS: &[u16] = &[2012, 2013, 2014, 2015, 2016, 2017, 2018, 2019, 2024];

/// A WWDC conference edition
///
/// Only years with a published session catalog are representable; both
/// construction paths ([`Year::try_from`] and [`FromStr`](std::str::FromStr))
/// reject anything else with [`Error::UnknownYear`] before any network
/// traffic happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(u16);

impl Year {
    /// Get the numeric year
    pub fn get(&self) -> u16 {
        self.0
    }

    /// The year's URL path segment, e.g. `wwdc2024`
    pub fn slug(&self) -> String {
        format!("wwdc{}", self.0)
    }
}

impl Default for Year {
    fn default() -> Self {
        Year(2024)
    }
}

impl TryFrom<u16> for Year {
    type Error = Error;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        if SUPPORTED_YEARS.contains(&year) {
            Ok(Year(year))
        } else {
            Err(Error::UnknownYear(year.to_string()))
        }
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Year {
    type Err = Error;

    /// Accepts both the bare year (`2019`) and the slug form (`wwdc2019`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("wwdc").unwrap_or(s);
        let year: u16 = digits
            .parse()
            .map_err(|_| Error::UnknownYear(s.to_string()))?;
        Year::try_from(year)
    }
}

/// Subtitle languages the conference site publishes
///
/// Serialized forms are the request codes (`eng`, `chs`, `jpn`), matching
/// what [`FromStr`](std::str::FromStr) accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtitleLanguage {
    /// English
    #[default]
    #[serde(rename = "eng")]
    English,
    /// Simplified Chinese (requested as `chs`, served as `zho`)
    #[serde(rename = "chs")]
    SimplifiedChinese,
    /// Japanese
    #[serde(rename = "jpn")]
    Japanese,
}

impl SubtitleLanguage {
    /// The language code used in fragment URLs and output filenames
    pub fn code(&self) -> &'static str {
        match self {
            SubtitleLanguage::English => "eng",
            SubtitleLanguage::SimplifiedChinese => "zho",
            SubtitleLanguage::Japanese => "jpn",
        }
    }
}

impl std::str::FromStr for SubtitleLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eng" => Ok(SubtitleLanguage::English),
            "chs" => Ok(SubtitleLanguage::SimplifiedChinese),
            "jpn" => Ok(SubtitleLanguage::Japanese),
            other => Err(Error::UnknownLanguage(other.to_string())),
        }
    }
}

/// Video quality tag used in output filenames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    /// Standard definition
    Sd,
    /// High definition
    #[default]
    Hd,
}

impl VideoQuality {
    /// The filename tag for this quality
    pub fn tag(&self) -> &'static str {
        match self {
            VideoQuality::Sd => "sd",
            VideoQuality::Hd => "hd",
        }
    }
}

/// A fully resolved conference session
///
/// Immutable once built by the resolver. `resource_urls` is empty when the
/// session page carried no matching download elements; `subtitle_index_url`
/// is derived from the first resource URL and is absent whenever derivation
/// found nothing to work with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Catalog identifier, e.g. `10067`
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Video resource URLs in document order
    pub resource_urls: Vec<String>,
    /// Root manifest URL for the session's subtitles, when derivable
    pub subtitle_index_url: Option<String>,
}
