//! Retrieval orchestrator implementation.
//!
//! Each selected entry runs resolve → fetch → verify → decompress as one
//! unit, retried as a whole. Entries run concurrently on a pool of
//! `max_parallel` slots.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{error, info, warn};

use crate::archive::Decompressor;
use crate::catalog::{SelectedEntry, Selection};
use crate::config::{validate_config, Config};
use crate::fetcher::{discard, FetchOutcome, HttpFetcher, TorrentFetchOutcome, TorrentFetcher};
use crate::integrity::IntegrityVerifier;
use crate::resolver::UrlResolver;
use crate::torrent::TorrentSession;

use super::config::RetrievalConfig;
use super::source::{choose_source, ChosenSource, SourceKind};
use super::types::{
    EntryReport, OrchestratorError, RetrievalError, RetrievalOutcome, RetrievalReport, SkipReason,
};

/// Drives the retrieval of a selection.
pub struct RetrievalOrchestrator {
    config: RetrievalConfig,
    http: HttpFetcher,
    torrent: TorrentFetcher,
    verifier: IntegrityVerifier,
    decompressor: Decompressor,
}

impl RetrievalOrchestrator {
    /// Create an orchestrator with the default host resolvers.
    pub fn new(config: &Config, session: Arc<dyn TorrentSession>) -> Result<Self, OrchestratorError> {
        let client = Client::builder().cookie_store(true).build()?;
        let resolver = Arc::new(UrlResolver::new(client.clone(), &config.resolver));
        Self::with_resolver(config, session, client, resolver)
    }

    /// Create an orchestrator around an existing client and resolver.
    ///
    /// Fails if `config` does not pass [`validate_config`].
    pub fn with_resolver(
        config: &Config,
        session: Arc<dyn TorrentSession>,
        client: Client,
        resolver: Arc<UrlResolver>,
    ) -> Result<Self, OrchestratorError> {
        validate_config(config)?;
        let retrieval = config.retrieval.clone();

        Ok(Self {
            http: HttpFetcher::new(client, resolver, &retrieval),
            torrent: TorrentFetcher::new(session, retrieval.torrent_downloads),
            verifier: IntegrityVerifier::new(retrieval.chunk_size, retrieval.skip_integrity_check),
            decompressor: Decompressor::new(config.archive.clone(), retrieval.remove_archive),
            config: retrieval,
        })
    }

    /// Retrieve every entry of `selection`.
    ///
    /// Per-entry failures end up in the report. Only a fatal error stops the
    /// run, in which case entries still in flight are abandoned.
    pub async fn run(&self, selection: &Selection) -> Result<RetrievalReport, OrchestratorError> {
        let started_at = Utc::now();
        let base_dir = &self.config.base_dir;

        tokio::fs::create_dir_all(base_dir)
            .await
            .map_err(|e| OrchestratorError::BaseDirectory {
                path: base_dir.clone(),
                source: e,
            })?;

        info!(
            entries = selection.len(),
            max_parallel = self.config.max_parallel,
            base_dir = %base_dir.display(),
            "Starting retrieval"
        );

        let mut results = stream::iter(selection.entries.iter())
            .map(|selected| self.retrieve(selected))
            .buffer_unordered(self.config.max_parallel);

        let mut entries = Vec::with_capacity(selection.len());
        while let Some(result) = results.next().await {
            entries.push(result?);
        }

        let report = RetrievalReport {
            started_at,
            finished_at: Utc::now(),
            entries,
        };

        info!(
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Retrieval finished"
        );

        Ok(report)
    }

    /// Retrieve one entry, retrying the whole sequence.
    async fn retrieve(&self, selected: &SelectedEntry) -> Result<EntryReport, OrchestratorError> {
        let name = selected.entry.name.clone();
        let dir = self.config.base_dir.join(&selected.category);

        let Some(source) = choose_source(&selected.entry, self.config.prefer_http) else {
            let error = RetrievalError::NoSource { entry: name.clone() };
            error!(entry = %name, error = %error, "Cannot retrieve entry");
            return Ok(EntryReport {
                category: selected.category.clone(),
                name,
                path: None,
                outcome: RetrievalOutcome::Failed {
                    reason: error.to_string(),
                    attempts: 0,
                },
            });
        };

        let max_attempts = self.config.max_attempts();
        let mut produced = Vec::new();
        let mut path: Option<PathBuf> = None;
        let mut last_error = None;

        info!(entry = %name, category = %selected.category, url = %source.url, "Retrieving");

        for attempt in 1..=max_attempts {
            let result = self.attempt(&dir, &source, &mut produced).await;
            path = produced.last().cloned();

            match result {
                Ok(outcome) => {
                    info!(entry = %name, outcome = ?outcome, "Entry done");
                    return Ok(EntryReport {
                        category: selected.category.clone(),
                        name,
                        path,
                        outcome,
                    });
                }
                Err(e) if e.is_fatal() => {
                    error!(entry = %name, error = %e, "Fatal error, aborting run");
                    return Err(OrchestratorError::Fatal {
                        entry: name,
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(
                        entry = %name,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Attempt failed"
                    );
                    for output in produced.drain(..) {
                        discard(&output).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt was made".to_string());
        error!(entry = %name, attempts = max_attempts, reason = %reason, "Giving up on entry");

        Ok(EntryReport {
            category: selected.category.clone(),
            name,
            path,
            outcome: RetrievalOutcome::Failed {
                reason,
                attempts: max_attempts,
            },
        })
    }

    /// One pass of the fetch sequence.
    ///
    /// Every file the pass puts on disk is pushed to `produced`, the reported
    /// one last, so a failed pass can be cleaned up before the next.
    async fn attempt(
        &self,
        dir: &Path,
        source: &ChosenSource,
        produced: &mut Vec<PathBuf>,
    ) -> Result<RetrievalOutcome, RetrievalError> {
        tokio::fs::create_dir_all(dir).await?;

        match &source.kind {
            SourceKind::Http(url) => {
                let dest = http_destination(dir, source)?;
                produced.push(dest.clone());

                let fetched = self.http.fetch(url, &dest).await?;
                self.verifier.verify(&source.checksum, &dest).await?;
                if self.config.decompress {
                    self.decompressor.decompress(&dest).await?;
                }

                Ok(match fetched {
                    FetchOutcome::AlreadyPresent => RetrievalOutcome::Skipped {
                        reason: SkipReason::AlreadyPresent,
                    },
                    FetchOutcome::Downloaded { .. } => RetrievalOutcome::Success,
                })
            }
            SourceKind::Magnet(uri) => {
                // Nothing to verify a magnet payload against.
                let payload = self.torrent.fetch_magnet(uri, dir).await?;
                produced.push(payload.clone());
                self.decompressor.decompress(&payload).await?;
                Ok(RetrievalOutcome::Success)
            }
            SourceKind::TorrentDescriptor(url) => {
                let dest = http_destination(dir, source)?;
                produced.push(dest.clone());

                self.http.fetch(url, &dest).await?;
                self.verifier.verify(&source.checksum, &dest).await?;

                match self.torrent.fetch_descriptor(&dest).await? {
                    TorrentFetchOutcome::Disabled => Ok(RetrievalOutcome::Skipped {
                        reason: SkipReason::TorrentDisabled,
                    }),
                    TorrentFetchOutcome::Completed { path } => {
                        produced.push(path.clone());
                        self.decompressor.decompress(&path).await?;
                        Ok(RetrievalOutcome::Success)
                    }
                }
            }
        }
    }
}

/// Where an HTTP-delivered file lands.
fn http_destination(dir: &Path, source: &ChosenSource) -> Result<PathBuf, RetrievalError> {
    source
        .filename
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| dir.join(name))
        .ok_or_else(|| RetrievalError::NoSource {
            entry: source.url.clone(),
        })
}
