//! Types for torrent session operations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during torrent session operations.
#[derive(Debug, Error)]
pub enum TorrentError {
    #[error("Failed to start torrent session: {0}")]
    SessionStart(String),

    #[error("Torrent not found: {0}")]
    TorrentNotFound(String),

    #[error("Invalid torrent data: {0}")]
    InvalidTorrent(String),

    #[error("Torrent session error: {0}")]
    ApiError(String),
}

/// Request to add a new torrent.
#[derive(Debug, Clone)]
pub enum AddTorrentRequest {
    /// Add via magnet URI.
    Magnet {
        /// Magnet URI.
        uri: String,
        /// Directory the payload is written into.
        download_path: PathBuf,
    },
    /// Add via .torrent file contents.
    TorrentFile {
        /// Raw .torrent file bytes.
        data: Vec<u8>,
        /// Original filename (for logging).
        filename: Option<String>,
        /// Directory the payload is written into.
        download_path: PathBuf,
    },
}

impl AddTorrentRequest {
    /// Create a magnet request.
    pub fn magnet(uri: impl Into<String>, download_path: impl Into<PathBuf>) -> Self {
        AddTorrentRequest::Magnet {
            uri: uri.into(),
            download_path: download_path.into(),
        }
    }

    /// Create a torrent file request.
    pub fn torrent_file(data: Vec<u8>, download_path: impl Into<PathBuf>) -> Self {
        AddTorrentRequest::TorrentFile {
            data,
            filename: None,
            download_path: download_path.into(),
        }
    }

    /// Set the original filename of a torrent file request.
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        if let AddTorrentRequest::TorrentFile { filename, .. } = &mut self {
            *filename = Some(name.into());
        }
        self
    }

    /// Directory the payload is written into.
    pub fn download_path(&self) -> &Path {
        match self {
            AddTorrentRequest::Magnet { download_path, .. }
            | AddTorrentRequest::TorrentFile { download_path, .. } => download_path,
        }
    }
}

/// Result of adding a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTorrentResult {
    /// Info hash of the added torrent (lowercase hex).
    pub hash: String,
    /// Name of the torrent from its metadata.
    pub name: Option<String>,
}

/// Trait for torrent session backends.
#[async_trait]
pub trait TorrentSession: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Add a torrent. Resolves once its metadata is known.
    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentError>;

    /// Wait until every selected file of the torrent has been downloaded.
    async fn wait_until_complete(&self, hash: &str) -> Result<(), TorrentError>;

    /// Stop tracking a torrent. Downloaded files stay on disk.
    async fn remove_torrent(&self, hash: &str) -> Result<(), TorrentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnet_request() {
        let req = AddTorrentRequest::magnet("magnet:?xt=urn:btih:abc", "/tmp/lists");
        match &req {
            AddTorrentRequest::Magnet { uri, .. } => assert_eq!(uri, "magnet:?xt=urn:btih:abc"),
            _ => panic!("Expected magnet request"),
        }
        assert_eq!(req.download_path(), Path::new("/tmp/lists"));
    }

    #[test]
    fn test_torrent_file_request_with_filename() {
        let req = AddTorrentRequest::torrent_file(vec![b'd', b'e'], "/tmp/lists")
            .with_filename("big.torrent");
        match req {
            AddTorrentRequest::TorrentFile {
                data,
                filename,
                download_path,
            } => {
                assert_eq!(data, b"de");
                assert_eq!(filename.as_deref(), Some("big.torrent"));
                assert_eq!(download_path, PathBuf::from("/tmp/lists"));
            }
            _ => panic!("Expected torrent file request"),
        }
    }

    #[test]
    fn test_with_filename_ignored_for_magnet() {
        let req = AddTorrentRequest::magnet("magnet:?xt=urn:btih:abc", "/tmp").with_filename("x");
        assert!(matches!(req, AddTorrentRequest::Magnet { .. }));
    }
}
