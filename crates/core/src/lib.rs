//! Wordlist retrieval: catalog selection, multi-transport fetching,
//! checksum verification and decompression.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod integrity;
pub mod orchestrator;
pub mod resolver;
pub mod testing;
pub mod torrent;

#[cfg(test)]
pub(crate) mod test_server;

pub use archive::{ArchiveConfig, ArchiveError, ArchiveFormat, Decompressed, Decompressor};
pub use catalog::{
    list_entries, load_catalog, named_categories, parse_catalog, readable_size, resolve_category,
    search_entries, select, Catalog, CatalogEntry, CatalogError, Category, ListedEntry,
    SelectedEntry, Selection, SelectionError, SelectionScope,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ResolverConfig,
    TorrentConfig,
};
pub use fetcher::{FetchError, FetchOutcome, HttpFetcher, TorrentFetchOutcome, TorrentFetcher};
pub use integrity::{IntegrityError, IntegrityVerifier, Verification, SKIP_CHECKSUM};
pub use orchestrator::{
    EntryReport, OrchestratorError, RetrievalConfig, RetrievalError, RetrievalOrchestrator,
    RetrievalOutcome, RetrievalReport, SkipReason,
};
pub use resolver::{HostResolver, UrlResolver};
pub use torrent::{LibrqbitSession, TorrentError, TorrentSession};
