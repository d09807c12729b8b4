//! Error types for wwdc-dl
//!
//! This module provides error handling for the library, including:
//! - Pre-flight validation errors (unknown year, language, or session ID)
//! - Fetch-level errors (network failures, non-success HTTP statuses)
//! - Per-session errors that degrade to a warning while the run continues
//! - A fatality classification used by the orchestrator to decide between
//!   aborting the run and skipping a single session

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wwdc-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wwdc-dl
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested conference year has no published session catalog
    #[error("unsupported WWDC year: {0}")]
    UnknownYear(String),

    /// Requested subtitle language is not one the conference site publishes
    #[error("unsupported subtitle language: {0}")]
    UnknownLanguage(String),

    /// Explicitly requested session ID is absent from the year's catalog
    #[error("session {id} not found in the wwdc{year} catalog")]
    UnknownSession {
        /// The session ID that was requested
        id: String,
        /// The conference year whose catalog was searched
        year: u16,
    },

    /// Output directory does not exist
    #[error("output directory not found: {}", .0.display())]
    OutputDirNotFound(PathBuf),

    /// Extraction pattern failed to compile
    #[error("invalid {kind} pattern: {source}")]
    Pattern {
        /// Which extraction pattern failed (e.g., "catalog-listing")
        kind: String,
        /// The underlying regex compilation error
        #[source]
        source: Box<regex::Error>,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The status code the server returned
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Every fetched fragment was empty or lacked the WEBVTT marker
    #[error("no subtitle content found for {filename}")]
    EmptySubtitle {
        /// The output filename the session would have been written to
        filename: String,
    },

    /// Aggregated fragment text contained no parseable cue
    #[error("subtitle assembly failed: {0}")]
    Assembly(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error aborts the whole run.
    ///
    /// Fatal errors are configuration-class problems that no amount of
    /// continuing can fix: an unsupported year or language, a session ID the
    /// catalog does not contain, a missing output directory, or a pattern
    /// that failed to compile. Everything else is scoped to a single session
    /// and is reported while the run moves on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnknownYear(_)
                | Error::UnknownLanguage(_)
                | Error::UnknownSession { .. }
                | Error::OutputDirNotFound(_)
                | Error::Pattern { .. }
                | Error::Config { .. }
        )
    }

    pub(crate) fn pattern(kind: impl Into<String>, source: regex::Error) -> Self {
        Error::Pattern {
            kind: kind.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
