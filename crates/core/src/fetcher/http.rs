//! HTTP streaming fetcher.

use std::path::Path;
use std::sync::Arc;

use reqwest::header::USER_AGENT;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::FetchError;
use crate::orchestrator::RetrievalConfig;
use crate::resolver::UrlResolver;

/// Result of an HTTP fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body written to the destination.
    Downloaded { bytes: u64 },
    /// Destination already existed; nothing was requested.
    AlreadyPresent,
}

/// Downloads URLs to files.
pub struct HttpFetcher {
    client: Client,
    resolver: Arc<UrlResolver>,
    user_agent: String,
    chunk_size: usize,
}

impl HttpFetcher {
    pub fn new(client: Client, resolver: Arc<UrlResolver>, config: &RetrievalConfig) -> Self {
        Self {
            client,
            resolver,
            user_agent: config.user_agent.clone(),
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Fetch `url` into `dest`.
    ///
    /// An existing `dest` is trusted as-is and no network request is made.
    /// On error a partially written `dest` may remain; callers own cleanup.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchOutcome, FetchError> {
        if tokio::fs::try_exists(dest).await? {
            debug!(path = %dest.display(), "Already present, not downloading");
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let resolved = self.resolver.resolve(url).await;
        if resolved.is_empty() {
            return Err(FetchError::Unresolved {
                url: url.to_string(),
            });
        }

        info!(url = %resolved, path = %dest.display(), "Downloading");

        let mut response = self
            .client
            .get(&resolved)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: resolved,
                status: status.as_u16(),
            });
        }

        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = response.chunk().await? {
            for piece in chunk.chunks(self.chunk_size) {
                file.write_all(piece).await?;
                written += piece.len() as u64;
            }
        }
        file.flush().await?;

        debug!(path = %dest.display(), bytes = written, "Download finished");
        Ok(FetchOutcome::Downloaded { bytes: written })
    }
}
