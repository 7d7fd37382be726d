use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::archive::ArchiveConfig;
use crate::orchestrator::RetrievalConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the wordlist catalog (JSON).
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub torrent: TorrentConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            retrieval: RetrievalConfig::default(),
            resolver: ResolverConfig::default(),
            torrent: TorrentConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("repo.json")
}

/// URL indirection resolver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Attempts before an indirect URL is reported unresolved (default: 10)
    #[serde(default = "default_resolve_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts in seconds (default: 10)
    #[serde(default = "default_resolve_delay")]
    pub retry_delay_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_resolve_attempts(),
            retry_delay_secs: default_resolve_delay(),
        }
    }
}

fn default_resolve_attempts() -> u32 {
    10
}

fn default_resolve_delay() -> u64 {
    10
}

/// Embedded torrent session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TorrentConfig {
    /// TCP port the session listens on, on all interfaces (default: 6881)
    #[serde(default = "default_listen_port")]
    pub listen_port: Option<u16>,
    /// Enable DHT peer discovery (default: true)
    #[serde(default = "default_true")]
    pub enable_dht: bool,
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            enable_dht: true,
        }
    }
}

fn default_listen_port() -> Option<u16> {
    Some(6881)
}

fn default_true() -> bool {
    true
}
