//! Core downloader implementation split into focused submodules.
//!
//! The `WwdcDownloader` struct and its methods are organized by domain:
//! - [`subtitles`] - Per-session fragment retrieval, assembly, and writing

mod subtitles;


use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{RegexExtractor, SessionInfoExtractor};
use crate::fetch::{ContentFetcher, HttpFetcher};
use crate::resolver::SessionResolver;

/// Terminal state of one session within a run
#[derive(Debug)]
pub enum SessionOutcome {
    /// Output file already existed; nothing was fetched
    SkippedExisting(PathBuf),
    /// The session page carried no usable resources
    NoResources,
    /// Fetching or assembling the subtitle failed; the run continued
    Failed(Error),
    /// Subtitle document written to this path
    Written(PathBuf),
}

/// What happened to one session during a run
#[derive(Debug)]
pub struct SessionReport {
    /// The session's catalog ID
    pub session_id: String,
    /// The session's terminal state
    pub outcome: SessionOutcome,
}

/// Main downloader instance
///
/// Built once from a validated [`Config`]; [`run`](WwdcDownloader::run)
/// drives the whole pipeline and [`list_sessions`](WwdcDownloader::list_sessions)
/// stops after catalog resolution.
pub struct WwdcDownloader {
    config: Config,
    fetcher: Arc<dyn ContentFetcher>,
    resolver: SessionResolver,
}

impl WwdcDownloader {
    /// Create a downloader from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration fails validation and
    /// [`Error::Pattern`] when one of the configured extraction patterns does
    /// not compile.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        let extractor: Arc<dyn SessionInfoExtractor> =
            Arc::new(RegexExtractor::new(&config.patterns)?);
        let resolver = SessionResolver::new(
            Arc::clone(&fetcher),
            extractor,
            config.year,
            &config.base_url,
        );

        Ok(Self {
            config,
            fetcher,
            resolver,
        })
    }

    /// The year's session list as sorted `(id, title)` pairs.
    ///
    /// Only the catalog page is fetched; no session pages and no subtitle
    /// content.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the catalog page cannot be retrieved.
    pub async fn list_sessions(&self) -> Result<Vec<(String, String)>> {
        let catalog = self.resolver.catalog().await?;
        let mut sessions: Vec<(String, String)> = catalog
            .iter()
            .map(|(id, title)| (id.clone(), title.clone()))
            .collect();
        sessions.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(sessions)
    }

    /// Download subtitles for the configured sessions.
    ///
    /// Resolves the configured sessions (all of them when none are named),
    /// then works through them in ID order. Each session ends in exactly one
    /// [`SessionOutcome`]; a failed session is reported and the run moves on
    /// to the next.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no subtitle language is configured,
    /// [`Error::OutputDirNotFound`] when the output directory is missing,
    /// and any fatal resolution error ([`Error::UnknownSession`], a failed
    /// catalog fetch) as-is.
    pub async fn run(&self) -> Result<Vec<SessionReport>> {
        let Some(language) = self.config.language else {
            return Err(Error::config(
                "no subtitle language configured; use list_sessions() to inspect the catalog",
            ));
        };
        if !self.config.output_dir.is_dir() {
            return Err(Error::OutputDirNotFound(self.config.output_dir.clone()));
        }

        let sessions = self
            .resolver
            .resolve_sessions(self.config.session_ids.as_deref())
            .await?;
        info!(
            sessions = sessions.len(),
            language = language.code(),
            "starting subtitle downloads"
        );

        let mut reports = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let outcome = self.download_subtitle(session, language).await;
            match &outcome {
                SessionOutcome::Written(path) => {
                    info!(session = %session.id, path = %path.display(), "subtitle written");
                }
                SessionOutcome::SkippedExisting(path) => {
                    info!(session = %session.id, path = %path.display(), "already exists, skipping");
                }
                SessionOutcome::NoResources => {
                    debug!(session = %session.id, "no downloadable resources, skipping");
                }
                SessionOutcome::Failed(e) => {
                    warn!(session = %session.id, error = %e, "subtitle download failed");
                }
            }
            reports.push(SessionReport {
                session_id: session.id.clone(),
                outcome,
            });
        }

        Ok(reports)
    }
}
