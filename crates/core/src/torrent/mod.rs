//! BitTorrent transport.
//!
//! A `TorrentSession` adds magnets and `.torrent` payloads, waits for them to
//! finish and releases them again while keeping the downloaded files. The
//! production backend embeds a librqbit session that is created on first use.

mod librqbit;
mod types;

pub use librqbit::LibrqbitSession;
pub use types::*;
