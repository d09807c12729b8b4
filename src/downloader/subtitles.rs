//! Per-session subtitle retrieval
//!
//! Everything between a resolved [`Session`] and an `.srt` file on disk:
//! deriving the fragment URL list from the session's manifest, fetching the
//! fragments in manifest order, validating them, and handing the aggregate
//! to the assembler.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::debug;

use super::{SessionOutcome, WwdcDownloader};
use crate::error::{Error, Result};
use crate::srt;
use crate::types::{Session, SubtitleLanguage, VideoQuality};

/// Marker every usable WebVTT fragment contains. Fragments without it are
/// error pages or placeholders and contribute nothing.
const WEBVTT_MARKER: &str = "WEBVTT";

impl WwdcDownloader {
    /// Drive one session to its terminal state.
    pub(super) async fn download_subtitle(
        &self,
        session: &Session,
        language: SubtitleLanguage,
    ) -> SessionOutcome {
        let filename = output_filename(session, self.config.quality, language);
        let path = self.config.output_dir.join(&filename);

        if path.exists() {
            return SessionOutcome::SkippedExisting(path);
        }

        let Some(prefix) = self.resolver.subtitle_index_prefix(session) else {
            return SessionOutcome::NoResources;
        };
        let Some(index_url) = session.subtitle_index_url.as_deref() else {
            return SessionOutcome::NoResources;
        };

        match self
            .assemble_subtitle(&prefix, index_url, language, &filename)
            .await
        {
            Ok(content) => match write_atomic(&path, &content).await {
                Ok(()) => SessionOutcome::Written(path),
                Err(e) => SessionOutcome::Failed(e),
            },
            Err(e) => SessionOutcome::Failed(e),
        }
    }

    /// Fetch the session's fragments and assemble them into an SRT document.
    async fn assemble_subtitle(
        &self,
        prefix: &str,
        index_url: &str,
        language: SubtitleLanguage,
        filename: &str,
    ) -> Result<String> {
        let urls = self.fragment_urls(prefix, index_url, language).await?;
        debug!(fragments = urls.len(), "fetching subtitle fragments");

        let lines = self.collect_fragment_lines(&urls).await?;
        if lines.is_empty() {
            return Err(Error::EmptySubtitle {
                filename: filename.to_string(),
            });
        }

        srt::assemble(&lines)
    }

    /// Fragment URLs for one session, in manifest order.
    async fn fragment_urls(
        &self,
        prefix: &str,
        index_url: &str,
        language: SubtitleLanguage,
    ) -> Result<Vec<String>> {
        let manifest = self.fetcher.fetch(index_url).await?;
        Ok(fragment_urls_in(&manifest, prefix, language))
    }

    /// Fetch every fragment and aggregate the lines of the valid ones.
    ///
    /// Fetches are bounded by `fragment_concurrency` but the aggregate is
    /// always in manifest order; scheduling never reorders output.
    async fn collect_fragment_lines(&self, urls: &[String]) -> Result<Vec<String>> {
        let bodies: Vec<Result<String>> = stream::iter(urls)
            .map(|url| self.fetcher.fetch(url))
            .buffered(self.config.fragment_concurrency)
            .collect()
            .await;

        let mut lines = Vec::new();
        for body in bodies {
            let body = body?;
            if body.contains(WEBVTT_MARKER) {
                lines.extend(body.lines().map(str::to_string));
            }
        }
        Ok(lines)
    }
}

/// Fragment URLs listed in `manifest`, in manifest order.
///
/// Each `.webvtt` line maps to `<prefix>/subtitles/<code>/<line>` for the
/// requested language. Derivation is pure: the same manifest text always
/// yields the same URL list.
fn fragment_urls_in(manifest: &str, prefix: &str, language: SubtitleLanguage) -> Vec<String> {
    manifest
        .lines()
        .filter(|line| line.ends_with(".webvtt"))
        .map(|line| format!("{prefix}/subtitles/{}/{line}", language.code()))
        .collect()
}

/// Write `content` to `path` via a temporary sibling.
///
/// A partially written file must never satisfy the skip-if-exists check on
/// a later run, so the document only appears under its final name once it
/// is complete.
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("srt.part");
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Output filename for one session: `<id>_<sd|hd>_<normalized-title>.<code>.srt`.
///
/// The title is lowercased, spaces become underscores, and `/` is removed so
/// the name never escapes the output directory.
fn output_filename(
    session: &Session,
    quality: VideoQuality,
    language: SubtitleLanguage,
) -> String {
    let title = session
        .title
        .to_lowercase()
        .replace(' ', "_")
        .replace('/', "");
    format!(
        "{}_{}_{}.{}.srt",
        session.id,
        quality.tag(),
        title,
        language.code()
    )
}
