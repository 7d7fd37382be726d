//! Configuration for the archive module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// External tools used for formats without an in-process decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Path to the 7-Zip binary.
    #[serde(default = "default_seven_zip_path")]
    pub seven_zip_path: PathBuf,

    /// Path to the unrar binary.
    #[serde(default = "default_unrar_path")]
    pub unrar_path: PathBuf,
}

fn default_seven_zip_path() -> PathBuf {
    PathBuf::from("7z")
}

fn default_unrar_path() -> PathBuf {
    PathBuf::from("unrar")
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            seven_zip_path: default_seven_zip_path(),
            unrar_path: default_unrar_path(),
        }
    }
}
