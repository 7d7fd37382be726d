//! Torrent fetcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{discard, FetchError};
use crate::torrent::{AddTorrentRequest, AddTorrentResult, TorrentSession};

/// Result of fetching from a `.torrent` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentFetchOutcome {
    /// Payload written to `path`.
    Completed { path: PathBuf },
    /// Torrent downloads are switched off.
    Disabled,
}

/// Downloads payloads through the shared torrent session.
pub struct TorrentFetcher {
    session: Arc<dyn TorrentSession>,
    enabled: bool,
}

impl TorrentFetcher {
    /// `enabled` gates descriptor downloads; magnets are always fetched.
    pub fn new(session: Arc<dyn TorrentSession>, enabled: bool) -> Self {
        Self { session, enabled }
    }

    /// Fetch a magnet URI into `dir`. Returns `<dir>/<torrent name>`.
    pub async fn fetch_magnet(&self, uri: &str, dir: &Path) -> Result<PathBuf, FetchError> {
        info!(session = self.session.name(), dir = %dir.display(), "Fetching magnet");

        let added = self
            .session
            .add_torrent(AddTorrentRequest::magnet(uri, dir))
            .await?;
        self.complete(added, dir).await
    }

    /// Fetch the payload described by the local `.torrent` at `descriptor`.
    ///
    /// The descriptor is deleted once the session has taken it. A missing
    /// descriptor is fatal for the run.
    pub async fn fetch_descriptor(
        &self,
        descriptor: &Path,
    ) -> Result<TorrentFetchOutcome, FetchError> {
        if !self.enabled {
            info!(path = %descriptor.display(), "Torrent downloads disabled, skipping");
            return Ok(TorrentFetchOutcome::Disabled);
        }

        if !tokio::fs::try_exists(descriptor).await? {
            return Err(FetchError::MissingDescriptor {
                path: descriptor.to_path_buf(),
            });
        }

        let dir = match descriptor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let data = tokio::fs::read(descriptor).await?;

        let mut request = AddTorrentRequest::torrent_file(data, &dir);
        if let Some(name) = descriptor.file_name().and_then(|n| n.to_str()) {
            request = request.with_filename(name);
        }

        info!(session = self.session.name(), path = %descriptor.display(), "Fetching torrent");

        let added = self.session.add_torrent(request).await?;
        tokio::fs::remove_file(descriptor).await?;
        debug!(path = %descriptor.display(), "Descriptor removed");

        let path = self.complete(added, &dir).await?;
        Ok(TorrentFetchOutcome::Completed { path })
    }

    async fn complete(&self, added: AddTorrentResult, dir: &Path) -> Result<PathBuf, FetchError> {
        let name = added.name.ok_or_else(|| FetchError::UnnamedTorrent {
            hash: added.hash.clone(),
        })?;

        let path = dir.join(name);

        if let Err(e) = self.session.wait_until_complete(&added.hash).await {
            warn!(hash = %added.hash, error = %e, "Torrent failed, discarding payload");
            if let Err(remove_err) = self.session.remove_torrent(&added.hash).await {
                debug!(hash = %added.hash, error = %remove_err, "Failed to release torrent");
            }
            discard(&path).await;
            return Err(e.into());
        }
        self.session.remove_torrent(&added.hash).await?;

        info!(hash = %added.hash, path = %path.display(), "Torrent complete");
        Ok(path)
    }
}
