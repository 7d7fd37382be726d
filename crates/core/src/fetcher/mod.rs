//! Transport fetchers.
//!
//! [`HttpFetcher`] streams a (possibly indirect) URL to disk.
//! [`TorrentFetcher`] hands magnets and `.torrent` descriptors to the shared
//! torrent session and waits for the payload.

mod error;
mod http;
mod torrent;

pub use error::FetchError;
pub use http::{FetchOutcome, HttpFetcher};
pub use torrent::{TorrentFetchOutcome, TorrentFetcher};

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

/// Delete a download that is partial or failed verification.
///
/// Torrent payloads can be directories. A path that is already gone is fine.
pub(crate) async fn discard(path: &Path) {
    let removed = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
        Ok(_) => tokio::fs::remove_file(path).await,
        Err(e) => Err(e),
    };

    match removed {
        Ok(()) => debug!(path = %path.display(), "Discarded download"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to discard download"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_discard_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        let payload = dir.path().join("multi");
        std::fs::write(&file, b"x").unwrap();
        std::fs::create_dir_all(payload.join("inner")).unwrap();
        std::fs::write(payload.join("inner/b.txt"), b"y").unwrap();

        discard(&file).await;
        discard(&payload).await;
        discard(&dir.path().join("never-existed")).await;

        assert!(!file.exists());
        assert!(!payload.exists());
    }
}
