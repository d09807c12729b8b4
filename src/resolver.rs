//! Session resolution against the conference site
//!
//! A [`SessionResolver`] owns everything needed to turn a year into a
//! catalog and a session ID into a fully resolved [`Session`]: the fetcher,
//! the extractor, and a memoized copy of the year's catalog. One resolver
//! serves one run; nothing here is global.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extract::SessionInfoExtractor;
use crate::fetch::ContentFetcher;
use crate::types::{Session, Year};

/// Resolves session catalogs and individual sessions for one conference year
pub struct SessionResolver {
    fetcher: Arc<dyn ContentFetcher>,
    extractor: Arc<dyn SessionInfoExtractor>,
    year: Year,
    base_url: String,
    catalog: OnceCell<HashMap<String, String>>,
}

impl SessionResolver {
    /// Create a resolver for `year` rooted at `base_url`.
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        extractor: Arc<dyn SessionInfoExtractor>,
        year: Year,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            fetcher,
            extractor,
            year,
            base_url,
            catalog: OnceCell::new(),
        }
    }

    /// The year this resolver serves.
    pub fn year(&self) -> Year {
        self.year
    }

    /// The year's session catalog (ID to title).
    ///
    /// Fetched and extracted on first call, then reused for the rest of the
    /// run; a second call performs no HTTP request.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the catalog page cannot be retrieved. An
    /// unparseable page is not an error; it yields an empty catalog.
    pub async fn catalog(&self) -> Result<&HashMap<String, String>> {
        self.catalog
            .get_or_try_init(|| async {
                let url = format!("{}/videos/{}/", self.base_url, self.year.slug());
                debug!(url = %url, "fetching session catalog");
                let content = self.fetcher.fetch(&url).await?;
                let catalog = self.extractor.catalog_listing(&content);
                info!(year = %self.year, sessions = catalog.len(), "session catalog resolved");
                Ok(catalog)
            })
            .await
    }

    /// Resolve one session by catalog ID.
    ///
    /// Fetches the session's play page, extracts its resource URLs, and
    /// derives the subtitle manifest URL from the first of them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] when `id` is absent from the
    /// catalog, or a fetch error when the play page cannot be retrieved.
    pub async fn resolve_session(&self, id: &str) -> Result<Session> {
        let catalog = self.catalog().await?;
        let title = catalog.get(id).ok_or_else(|| Error::UnknownSession {
            id: id.to_string(),
            year: self.year.get(),
        })?;

        let url = format!("{}/videos/play/{}/{}/", self.base_url, self.year.slug(), id);
        debug!(session = %id, url = %url, "fetching session page");
        let content = self.fetcher.fetch(&url).await?;
        let resource_urls = self.extractor.resource_urls(&content);
        let subtitle_index_url = self
            .prefix_of(&resource_urls)
            .map(|prefix| subtitle_index_url(&prefix));

        Ok(Session {
            id: id.to_string(),
            title: title.clone(),
            resource_urls,
            subtitle_index_url,
        })
    }

    /// Resolve a batch of sessions, sorted by ID.
    ///
    /// `ids = None` resolves every session in the catalog. Sessions whose
    /// play page cannot be fetched are skipped with a warning; the batch
    /// continues. The result is sorted by ID ascending, comparing IDs as
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSession`] when an explicitly requested ID is
    /// absent from the catalog, or a fetch error when the catalog page
    /// itself cannot be retrieved.
    pub async fn resolve_sessions(&self, ids: Option<&[String]>) -> Result<Vec<Session>> {
        // Catalog failures fail the batch; the skip arm below is for play
        // pages only.
        let catalog = self.catalog().await?;
        let ids: Vec<String> = match ids {
            Some(ids) => ids.to_vec(),
            None => catalog.keys().cloned().collect(),
        };

        let mut sessions = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.resolve_session(id).await {
                Ok(session) => sessions.push(session),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(session = %id, error = %e, "failed to resolve session, skipping"),
            }
        }

        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    /// Subtitle manifest prefix for `session`, when derivable.
    ///
    /// The fragment URLs the orchestrator builds hang off this same prefix,
    /// which is why it is exposed separately from the full manifest URL.
    pub fn subtitle_index_prefix(&self, session: &Session) -> Option<String> {
        self.prefix_of(&session.resource_urls)
    }

    fn prefix_of(&self, resource_urls: &[String]) -> Option<String> {
        let first = resource_urls.first()?;
        let prefix = self.extractor.subtitle_index_prefix(first);
        if prefix.is_empty() { None } else { Some(prefix) }
    }
}

/// The manifest tree is only published under `eng`; the requested subtitle
/// language selects fragment content, not the manifest location.
fn subtitle_index_url(prefix: &str) -> String {
    format!("{prefix}/subtitles/eng/prog_index.m3u8")
}
