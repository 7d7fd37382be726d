//! Testing utilities and mock implementations.
//!
//! Lets the retrieval pipeline run end to end without a real BitTorrent
//! swarm.
//!
//! # Example
//!
//! ```rust,ignore
//! use wordlistctl_core::testing::{fixtures, MockTorrentSession};
//!
//! let session = Arc::new(MockTorrentSession::new().with_payload("big.txt.gz", gz_bytes));
//! let catalog = Catalog::new(vec![fixtures::category("misc", vec![
//!     fixtures::entry("big", "magnet:?xt=urn:btih:abc", "SKIP"),
//! ])]);
//! ```

mod mock_torrent_session;

pub use mock_torrent_session::{MockTorrentSession, RecordedAddTorrent};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{CatalogEntry, Category};

    /// Create a single-URL catalog entry with zero sizes.
    pub fn entry(name: &str, url: &str, checksum: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            urls: vec![url.to_string()],
            checksums: vec![checksum.to_string()],
            compressed_size: 0,
            decompressed_size: 0,
        }
    }

    /// Create an entry with several candidate URLs, checksums aligned by index.
    pub fn multi_url_entry(name: &str, sources: &[(&str, &str)]) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            urls: sources.iter().map(|(url, _)| url.to_string()).collect(),
            checksums: sources.iter().map(|(_, sum)| sum.to_string()).collect(),
            compressed_size: 0,
            decompressed_size: 0,
        }
    }

    /// Create a category with its count and sizes derived from `entries`.
    pub fn category(name: &str, entries: Vec<CatalogEntry>) -> Category {
        Category::new(name, entries)
    }

    /// Lowercase hex MD5 of `data`, as written in catalogs.
    pub fn md5_hex(data: &[u8]) -> String {
        format!("{:x}", md5::compute(data))
    }

    /// Gzip-compress `data` in memory.
    pub fn gzip(data: &[u8]) -> Vec<u8> {
        use std::io::Write;

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        // Writes to a Vec cannot fail.
        let _ = encoder.write_all(data);
        encoder.finish().unwrap_or_default()
    }
}
