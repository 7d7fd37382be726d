//! librqbit embedded torrent session.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use librqbit::{
    AddTorrent as RqbitAddTorrent, AddTorrentOptions, AddTorrentResponse, ManagedTorrent, Session,
    SessionOptions,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{AddTorrentRequest, AddTorrentResult, TorrentError, TorrentSession};
use crate::config::TorrentConfig;

/// Embedded librqbit session, started on the first torrent operation.
///
/// Runs that only use HTTP never open the listening port.
pub struct LibrqbitSession {
    config: TorrentConfig,
    session: OnceCell<Arc<Session>>,
}

impl LibrqbitSession {
    pub fn new(config: TorrentConfig) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> Result<&Arc<Session>, TorrentError> {
        self.session
            .get_or_try_init(|| async {
                let mut opts = SessionOptions::default();

                if !self.config.enable_dht {
                    opts.disable_dht = true;
                }

                // Range, not RangeInclusive
                if let Some(port) = self.config.listen_port {
                    opts.listen_port_range = Some(port..port.saturating_add(1));
                }

                // Every add carries its own output folder.
                let default_folder = std::env::temp_dir().join("wordlistctl");

                info!(
                    listen_port = ?self.config.listen_port,
                    dht_enabled = !opts.disable_dht,
                    "Initializing librqbit session"
                );

                let session = Session::new_with_opts(default_folder, opts)
                    .await
                    .map_err(|e| TorrentError::SessionStart(e.to_string()))?;

                if let Some(port) = session.tcp_listen_port() {
                    info!(port = port, "librqbit listening on TCP port");
                }

                Ok(session)
            })
            .await
    }

    fn format_hash(hash: &librqbit_core::Id20) -> String {
        hash.as_string()
    }

    fn find_torrent(session: &Session, hash: &str) -> Option<Arc<ManagedTorrent>> {
        let hash_lower = hash.to_lowercase();

        session.with_torrents(|iter| {
            for (_, torrent) in iter {
                if Self::format_hash(&torrent.info_hash()) == hash_lower {
                    return Some(torrent.clone());
                }
            }
            None
        })
    }
}

#[async_trait]
impl TorrentSession for LibrqbitSession {
    fn name(&self) -> &str {
        "librqbit"
    }

    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentError> {
        let session = self.session().await?;
        let output_folder: PathBuf = request.download_path().to_path_buf();

        let add_torrent = match request {
            AddTorrentRequest::Magnet { uri, .. } => RqbitAddTorrent::from_url(uri),
            AddTorrentRequest::TorrentFile { data, filename, .. } => {
                debug!(filename = ?filename, size = data.len(), "Adding torrent file");
                RqbitAddTorrent::from_bytes(data)
            }
        };

        let opts = AddTorrentOptions {
            output_folder: Some(output_folder.to_string_lossy().into_owned()),
            overwrite: true,
            ..Default::default()
        };

        // Magnets wait here until the metadata has been fetched from peers.
        let response = session
            .add_torrent(add_torrent, Some(opts))
            .await
            .map_err(|e| TorrentError::ApiError(format!("Failed to add torrent: {}", e)))?;

        match response {
            AddTorrentResponse::Added(_, handle) => {
                let hash = Self::format_hash(&handle.info_hash());
                let name = handle.name().map(|s| s.to_string());
                debug!(hash = %hash, name = ?name, "Torrent added");
                Ok(AddTorrentResult { hash, name })
            }
            AddTorrentResponse::AlreadyManaged(_, handle) => {
                let hash = Self::format_hash(&handle.info_hash());
                let name = handle.name().map(|s| s.to_string());
                warn!(hash = %hash, "Torrent already in session");
                Ok(AddTorrentResult { hash, name })
            }
            AddTorrentResponse::ListOnly(_) => Err(TorrentError::InvalidTorrent(
                "torrent was added in list-only mode".to_string(),
            )),
        }
    }

    async fn wait_until_complete(&self, hash: &str) -> Result<(), TorrentError> {
        let session = self.session().await?;
        let torrent = Self::find_torrent(session, hash)
            .ok_or_else(|| TorrentError::TorrentNotFound(hash.to_string()))?;

        torrent
            .wait_until_completed()
            .await
            .map_err(|e| TorrentError::ApiError(format!("Torrent failed: {}", e)))?;

        debug!(hash = %hash, "Torrent completed");
        Ok(())
    }

    async fn remove_torrent(&self, hash: &str) -> Result<(), TorrentError> {
        let session = self.session().await?;
        let torrent = Self::find_torrent(session, hash)
            .ok_or_else(|| TorrentError::TorrentNotFound(hash.to_string()))?;

        session
            .delete(torrent.id().into(), false)
            .await
            .map_err(|e| TorrentError::ApiError(format!("Failed to remove torrent: {}", e)))?;

        debug!(hash = %hash, "Torrent removed, files kept");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_is_not_started_on_construction() {
        let session = LibrqbitSession::new(TorrentConfig::default());
        assert_eq!(session.name(), "librqbit");
        assert!(session.session.get().is_none());
    }
}
