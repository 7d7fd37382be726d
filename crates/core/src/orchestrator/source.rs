//! Picking one source URL for an entry.

use crate::catalog::CatalogEntry;

/// Marks a URL (or magnet) that must be fetched through BitTorrent.
pub const TORRENT_PREFIX: &str = "torrent+";

const MAGNET_PREFIX: &str = "magnet:?";

/// How a chosen source is transported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Direct download.
    Http(String),
    /// Magnet URI handed straight to the torrent session.
    Magnet(String),
    /// HTTP URL of a `.torrent` descriptor; the payload comes from peers.
    TorrentDescriptor(String),
}

impl SourceKind {
    pub fn classify(url: &str) -> Self {
        if url.starts_with("http") {
            return SourceKind::Http(url.to_string());
        }

        let stripped = url.strip_prefix(TORRENT_PREFIX).unwrap_or(url);
        if stripped.starts_with(MAGNET_PREFIX) {
            SourceKind::Magnet(stripped.to_string())
        } else {
            SourceKind::TorrentDescriptor(stripped.to_string())
        }
    }
}

/// The source an entry is retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenSource {
    /// URL exactly as listed in the catalog.
    pub url: String,
    pub kind: SourceKind,
    /// Local file name of what is downloaded over HTTP: the last `/` segment
    /// of the URL. `None` for magnets, whose payload is named by the swarm.
    pub filename: Option<String>,
    /// Checksum listed at the URL's position.
    pub checksum: String,
}

/// Choose the source for `entry`.
///
/// The candidate URLs are ordered lexicographically and the largest wins,
/// or the smallest with `prefer_http`. Since `http…` sorts before `magnet:`
/// and `torrent+`, this is what steers toward or away from direct downloads.
pub fn choose_source(entry: &CatalogEntry, prefer_http: bool) -> Option<ChosenSource> {
    let mut candidates: Vec<(usize, &String)> = entry.urls.iter().enumerate().collect();
    candidates.sort_by(|a, b| a.1.cmp(b.1));

    let &(index, url) = if prefer_http {
        candidates.first()?
    } else {
        candidates.last()?
    };
    let url = url.as_str();

    let checksum = entry.checksums.get(index)?.clone();
    let kind = SourceKind::classify(url);
    let filename = match kind {
        SourceKind::Magnet(_) => None,
        SourceKind::Http(_) | SourceKind::TorrentDescriptor(_) => {
            url.rsplit('/').next().map(str::to_string)
        }
    };

    Some(ChosenSource {
        url: url.to_string(),
        kind,
        filename,
        checksum,
    })
}
