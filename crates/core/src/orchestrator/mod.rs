//! Retrieval orchestration.
//!
//! Turns a [`Selection`](crate::catalog::Selection) into files on disk:
//! - **Source choice**: one URL per entry, by lexicographic order
//! - **Attempt**: resolve → fetch → verify → decompress, retried as a unit
//! - **Pool**: entries run concurrently, `max_parallel` at a time

mod config;
mod runner;
mod source;
mod types;

pub use config::RetrievalConfig;
pub use runner::RetrievalOrchestrator;
pub use source::{choose_source, ChosenSource, SourceKind, TORRENT_PREFIX};
pub use types::{
    EntryReport, OrchestratorError, RetrievalError, RetrievalOutcome, RetrievalReport, SkipReason,
};
