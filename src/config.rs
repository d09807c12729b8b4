//! Configuration types for wwdc-dl

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::PatternSet;
use crate::types::{SubtitleLanguage, VideoQuality, Year};

/// Main configuration for [`WwdcDownloader`](crate::WwdcDownloader)
///
/// Every field has a sensible default, so `Config::default()` downloads
/// English subtitles for every session of the most recent conference into
/// the current directory. The whole struct round-trips through JSON, which
/// is also how a replacement [`PatternSet`] is supplied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Conference edition to resolve (default: the most recent one)
    #[serde(default)]
    pub year: Year,

    /// Session IDs to download; `None` downloads every session in the catalog
    #[serde(default)]
    pub session_ids: Option<Vec<String>>,

    /// Subtitle language to download; `None` lists the catalog instead of
    /// downloading anything
    #[serde(default = "default_language")]
    pub language: Option<SubtitleLanguage>,

    /// Directory output files are written to (default: ".")
    ///
    /// Must exist before a run starts; the library never creates it.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Video quality tag used in output filenames (default: HD)
    #[serde(default)]
    pub quality: VideoQuality,

    /// Base URL of the conference site (default: "https://developer.apple.com")
    ///
    /// Only the host part is meant to change; the path templates under it
    /// are fixed.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Extraction patterns (default: the built-in set)
    #[serde(default)]
    pub patterns: PatternSet,

    /// Per-request HTTP timeout in seconds (default: 30)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,

    /// How many subtitle fragments of one session are fetched at a time
    /// (default: 1, i.e. strictly sequential)
    ///
    /// Fragment text is aggregated in manifest order regardless of this
    /// setting; it only bounds in-flight requests.
    #[serde(default = "default_fragment_concurrency")]
    pub fragment_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            year: Year::default(),
            session_ids: None,
            language: default_language(),
            output_dir: default_output_dir(),
            quality: VideoQuality::default(),
            base_url: default_base_url(),
            patterns: PatternSet::default(),
            fetch_timeout: default_fetch_timeout(),
            fragment_concurrency: default_fragment_concurrency(),
        }
    }
}

impl Config {
    /// Validate settings that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is not an absolute
    /// HTTP(S) URL or the fragment concurrency is zero.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "invalid base_url '{}': expected an http(s) URL",
                self.base_url
            )));
        }
        if self.fragment_concurrency == 0 {
            return Err(Error::config("fragment_concurrency must be at least 1"));
        }
        Ok(())
    }
}

fn default_language() -> Option<SubtitleLanguage> {
    Some(SubtitleLanguage::English)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_base_url() -> String {
    "https://developer.apple.com".to_string()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_fragment_concurrency() -> usize {
    1
}

// Duration serialization helper (seconds as integer)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
