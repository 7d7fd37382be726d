//! Retrieval configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the retrieval orchestrator and the stages it drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Base directory wordlists are installed into (`<base>/<category>/<file>`).
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Active category filter. Narrows numeric selection to one category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Decompress HTTP-delivered archives after verification.
    /// Torrent-delivered payloads are always decompressed.
    #[serde(default)]
    pub decompress: bool,

    /// Delete the archive once it has been decompressed.
    #[serde(default)]
    pub remove_archive: bool,

    /// Pick the lexicographically smallest URL instead of the largest.
    #[serde(default)]
    pub prefer_http: bool,

    /// Allow joining swarms from `.torrent` descriptors.
    #[serde(default = "default_true")]
    pub torrent_downloads: bool,

    /// User-Agent sent on direct downloads.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Width of the worker pool.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Chunk size in bytes for streaming writes and digest reads.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Skip checksum verification for every entry.
    #[serde(default)]
    pub skip_integrity_check: bool,

    /// Retries after the first failed attempt of an entry.
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("/usr/share/wordlists")
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:68.0) Gecko/20100101 Firefox/68.0".to_string()
}

fn default_max_parallel() -> usize {
    5
}

fn default_chunk_size() -> usize {
    1024
}

fn default_max_retry() -> u32 {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            category: None,
            decompress: false,
            remove_archive: false,
            prefer_http: false,
            torrent_downloads: true,
            user_agent: default_user_agent(),
            max_parallel: default_max_parallel(),
            chunk_size: default_chunk_size(),
            skip_integrity_check: false,
            max_retry: default_max_retry(),
        }
    }
}

impl RetrievalConfig {
    /// Total number of attempts allowed per entry.
    pub fn max_attempts(&self) -> u32 {
        self.max_retry.saturating_add(1)
    }
}
