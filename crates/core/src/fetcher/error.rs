//! Error types for fetchers.

use std::path::PathBuf;
use thiserror::Error;

use crate::torrent::TorrentError;

/// Errors that can occur while fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Indirect URL could not be turned into a direct one.
    #[error("failed to resolve {url}")]
    Unresolved { url: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("torrent error: {0}")]
    Torrent(#[from] TorrentError),

    /// The session finished a torrent whose metadata carried no name.
    #[error("torrent {hash} has no name")]
    UnnamedTorrent { hash: String },

    /// A `.torrent` descriptor that should be on disk is not.
    #[error("torrent descriptor not found: {path}")]
    MissingDescriptor { path: PathBuf },
}

impl FetchError {
    /// Errors that abort the whole run instead of failing one attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingDescriptor { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_descriptor_is_fatal() {
        assert!(FetchError::MissingDescriptor {
            path: PathBuf::from("/w/big.torrent")
        }
        .is_fatal());
        assert!(!FetchError::Unresolved {
            url: "http://www.mediafire.com/file/x".to_string()
        }
        .is_fatal());
        assert!(!FetchError::Status {
            url: "http://a/file".to_string(),
            status: 503
        }
        .is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            url: "http://a/file".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "http://a/file returned HTTP 404");
    }
}
