//! Pattern-driven extraction of session information from fetched text
//!
//! The conference site publishes no structured API; everything the resolver
//! knows comes from running a small set of patterns over rendered HTML and
//! plain-text manifests. The patterns live in a [`PatternSet`] so they can be
//! replaced as a unit when the site markup changes, without touching the
//! extraction code.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum compiled size for a single extraction pattern.
///
/// Pattern sets can be loaded from user-supplied files, so compilation is
/// bounded the same way user-supplied filter patterns are.
const PATTERN_SIZE_LIMIT: usize = 1024 * 1024;

/// The three extraction operations the resolver relies on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtractionKind {
    /// Subtitle manifest prefix out of a resource URL
    SubtitleIndexPrefix,
    /// Video resource URLs out of a session page
    ResourceList,
    /// Session ID and title pairs out of a catalog page
    CatalogListing,
}

impl ExtractionKind {
    /// Stable name used in error messages and pattern files
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionKind::SubtitleIndexPrefix => "subtitle-index-prefix",
            ExtractionKind::ResourceList => "resource-list",
            ExtractionKind::CatalogListing => "catalog-listing",
        }
    }
}

/// One pattern string per extraction kind
///
/// A pattern set is a versioned asset: the built-in set matches the markup
/// the conference site serves today, and a replacement can be loaded from a
/// JSON file when the markup moves on. Patterns use capture group 1 for the
/// extracted value (and group 2 for the title in the catalog listing).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    /// Pattern for [`ExtractionKind::SubtitleIndexPrefix`]
    pub subtitle_index_prefix: String,
    /// Pattern for [`ExtractionKind::ResourceList`]
    pub resource_list: String,
    /// Pattern for [`ExtractionKind::CatalogListing`]
    pub catalog_listing: String,
}

impl PatternSet {
    /// The pattern set matching the current conference site markup
    pub fn builtin() -> Self {
        Self {
            subtitle_index_prefix: r"(http.*)/.*_hd".to_string(),
            resource_list: concat!(
                r#"<li class="download">[\s\S]*?<a href=""#,
                r"(https://devstreaming-cdn\.apple\.com/videos/wwdc/[0-9]{4}/[0-9]+/.*?\.mp4\?dl=1)",
                r#"">"#
            )
            .to_string(),
            catalog_listing: concat!(
                r#"<a href="/videos/play/[\w-]+/([0-9]+)/"[^>]*?>"#,
                r#".*?<h5 class="vc-card__title">(.*?)</h5>"#
            )
            .to_string(),
        }
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Extraction of session information from fetched text
///
/// Implementations are pure: the same content always yields the same result,
/// and absence of matches is an empty result, never an error. A second
/// implementation of this trait is how a future markup version gets
/// supported next to the current one.
pub trait SessionInfoExtractor: Send + Sync {
    /// Subtitle manifest prefix of a resource URL.
    ///
    /// Returns capture group 1 of the first match, with a trailing
    /// `/downloads` path segment stripped (the manifest tree hangs off the
    /// directory above it). Empty string when nothing matches.
    fn subtitle_index_prefix(&self, content: &str) -> String;

    /// Every resource URL in `content`, in document order.
    fn resource_urls(&self, content: &str) -> Vec<String>;

    /// Session ID to title map for a catalog page.
    ///
    /// When the same ID appears more than once, the later occurrence wins.
    fn catalog_listing(&self, content: &str) -> HashMap<String, String>;
}

/// Regex-backed [`SessionInfoExtractor`]
///
/// All patterns are compiled once at construction; a pattern that fails to
/// compile surfaces as [`Error::Pattern`] here rather than failing every
/// extraction call later.
#[derive(Debug)]
pub struct RegexExtractor {
    subtitle_index_prefix: Regex,
    resource_list: Regex,
    catalog_listing: Regex,
}

impl RegexExtractor {
    /// Compile `patterns` into a ready extractor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] naming the offending kind when any pattern
    /// fails to compile or exceeds the compiled size limit.
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        Ok(Self {
            subtitle_index_prefix: compile(
                &patterns.subtitle_index_prefix,
                ExtractionKind::SubtitleIndexPrefix,
                false,
            )?,
            resource_list: compile(&patterns.resource_list, ExtractionKind::ResourceList, true)?,
            catalog_listing: compile(
                &patterns.catalog_listing,
                ExtractionKind::CatalogListing,
                true,
            )?,
        })
    }
}

fn compile(pattern: &str, kind: ExtractionKind, dot_matches_new_line: bool) -> Result<Regex> {
    regex::RegexBuilder::new(pattern)
        .size_limit(PATTERN_SIZE_LIMIT)
        .dot_matches_new_line(dot_matches_new_line)
        .build()
        .map_err(|e| Error::pattern(kind.as_str(), e))
}

impl SessionInfoExtractor for RegexExtractor {
    fn subtitle_index_prefix(&self, content: &str) -> String {
        let prefix = self
            .subtitle_index_prefix
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or_default();
        prefix.strip_suffix("/downloads").unwrap_or(prefix).to_string()
    }

    fn resource_urls(&self, content: &str) -> Vec<String> {
        self.resource_list
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn catalog_listing(&self, content: &str) -> HashMap<String, String> {
        self.catalog_listing
            .captures_iter(content)
            .filter_map(|caps| {
                let id = caps.get(1)?.as_str().to_string();
                let title = caps.get(2)?.as_str().to_string();
                Some((id, title))
            })
            .collect()
    }
}
