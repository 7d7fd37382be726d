//! Archive extraction and stream decompression.
//!
//! Dispatch is on the lowercase filename suffix. Multi-file archives are
//! unpacked next to the archive; single-stream compressors produce a file
//! named after the archive with the last suffix removed.

mod config;
mod error;
mod extract;
mod format;

pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use extract::{Decompressed, Decompressor};
pub use format::ArchiveFormat;
