//! # wwdc-dl
//!
//! Subtitle downloader for WWDC conference sessions.
//!
//! The conference site publishes no structured API, so wwdc-dl resolves a
//! year's session catalog out of rendered HTML, derives each session's
//! subtitle manifest from its video resource URLs, fetches the WebVTT
//! fragments, and assembles one `.srt` file per session.
//!
//! ## Design Philosophy
//!
//! - **Pattern-driven** - The site markup is matched by a replaceable
//!   [`PatternSet`] asset, not by code that has to change with it
//! - **Fail fast, degrade late** - Bad years, languages, session IDs, and
//!   patterns are rejected before a single request; a failing session never
//!   takes the rest of the run with it
//! - **Idempotent** - Re-running skips every subtitle that already exists
//!
//! ## Quick Start
//!
//! ```no_run
//! use wwdc_dl::{Config, WwdcDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         session_ids: Some(vec!["10067".to_string()]),
//!         ..Default::default()
//!     };
//!
//!     let downloader = WwdcDownloader::new(config)?;
//!     for report in downloader.run().await? {
//!         println!("{}: {:?}", report.session_id, report.outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Pattern-driven extraction from fetched text
pub mod extract;
/// HTTP content fetching
pub mod fetch;
/// Session resolution against the conference site
pub mod resolver;
/// WebVTT to SRT assembly
pub mod srt;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::{SessionOutcome, SessionReport, WwdcDownloader};
pub use error::{Error, Result};
pub use extract::{ExtractionKind, PatternSet, RegexExtractor, SessionInfoExtractor};
pub use fetch::{ContentFetcher, HttpFetcher};
pub use resolver::SessionResolver;
pub use types::{Session, SubtitleLanguage, VideoQuality, Year};
