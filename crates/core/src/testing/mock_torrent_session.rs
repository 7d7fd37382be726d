//! Mock torrent session for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::torrent::{AddTorrentRequest, AddTorrentResult, TorrentError, TorrentSession};

/// A recorded torrent addition for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAddTorrent {
    /// The request that was made.
    pub request: AddTorrentRequest,
    /// When the request was made.
    pub timestamp: chrono::DateTime<Utc>,
}

/// Mock implementation of the TorrentSession trait.
///
/// Every added torrent "downloads" instantly: waiting for completion writes
/// the configured payload into the request's download path under the
/// configured name.
///
/// # Example
///
/// ```rust,ignore
/// let session = MockTorrentSession::new().with_payload("rockyou.txt.gz", gz_bytes);
///
/// let added = session
///     .add_torrent(AddTorrentRequest::magnet("magnet:?...", "/tmp/lists"))
///     .await?;
/// session.wait_until_complete(&added.hash).await?; // writes /tmp/lists/rockyou.txt.gz
/// ```
#[derive(Debug)]
pub struct MockTorrentSession {
    /// Recorded add_torrent calls.
    added: Arc<RwLock<Vec<RecordedAddTorrent>>>,
    /// Payload destination of each active torrent by hash.
    active: Arc<RwLock<HashMap<String, PathBuf>>>,
    /// Hashes passed to remove_torrent.
    removed: Arc<RwLock<Vec<String>>>,
    /// If set, the next add_torrent will fail with this error.
    next_error: Arc<RwLock<Option<TorrentError>>>,
    /// If set, the next wait_until_complete fails after writing the payload.
    next_wait_error: Arc<RwLock<Option<TorrentError>>>,
    /// Counter for generating unique hashes.
    hash_counter: Arc<RwLock<u32>>,
    /// Name reported for added torrents. Generated per torrent when unset.
    payload_name: Option<String>,
    /// Bytes written on completion.
    payload: Vec<u8>,
}

impl Default for MockTorrentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTorrentSession {
    /// Create a new mock session.
    pub fn new() -> Self {
        Self {
            added: Arc::new(RwLock::new(Vec::new())),
            active: Arc::new(RwLock::new(HashMap::new())),
            removed: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_wait_error: Arc::new(RwLock::new(None)),
            hash_counter: Arc::new(RwLock::new(0)),
            payload_name: None,
            payload: Vec::new(),
        }
    }

    /// Report torrents under `name` and write `data` on completion.
    pub fn with_payload(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.payload_name = Some(name.into());
        self.payload = data.into();
        self
    }

    /// Get all recorded add_torrent calls.
    pub async fn added_torrents(&self) -> Vec<RecordedAddTorrent> {
        self.added.read().await.clone()
    }

    /// Get all hashes that were removed.
    pub async fn removed_hashes(&self) -> Vec<String> {
        self.removed.read().await.clone()
    }

    /// Number of torrents added but not yet removed.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }

    /// Make the next add_torrent call fail.
    pub async fn set_next_error(&self, error: TorrentError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make the next wait_until_complete call fail, leaving a partial payload.
    pub async fn set_next_wait_error(&self, error: TorrentError) {
        *self.next_wait_error.write().await = Some(error);
    }

    async fn generate_hash(&self) -> (u32, String) {
        let mut counter = self.hash_counter.write().await;
        *counter += 1;
        (*counter, format!("{:040x}", *counter))
    }
}

#[async_trait]
impl TorrentSession for MockTorrentSession {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let (n, hash) = self.generate_hash().await;
        let name = self
            .payload_name
            .clone()
            .unwrap_or_else(|| format!("torrent-{}.bin", n));
        let destination = request.download_path().join(&name);

        self.added.write().await.push(RecordedAddTorrent {
            request,
            timestamp: Utc::now(),
        });
        self.active.write().await.insert(hash.clone(), destination);

        Ok(AddTorrentResult {
            hash,
            name: Some(name),
        })
    }

    async fn wait_until_complete(&self, hash: &str) -> Result<(), TorrentError> {
        let destination = self
            .active
            .read()
            .await
            .get(hash)
            .cloned()
            .ok_or_else(|| TorrentError::TorrentNotFound(hash.to_string()))?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TorrentError::ApiError(e.to_string()))?;
        }
        tokio::fs::write(&destination, &self.payload)
            .await
            .map_err(|e| TorrentError::ApiError(e.to_string()))?;

        match self.next_wait_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn remove_torrent(&self, hash: &str) -> Result<(), TorrentError> {
        if self.active.write().await.remove(hash).is_none() {
            return Err(TorrentError::TorrentNotFound(hash.to_string()));
        }
        self.removed.write().await.push(hash.to_string());
        Ok(())
    }
}
