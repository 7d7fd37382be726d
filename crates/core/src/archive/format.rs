//! Suffix based format detection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Formats understood by the decompressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveFormat {
    Rar,
    Zip,
    SevenZip,
    Tar,
    TarGz,
    TarXz,
    TarBz2,
    Gzip,
    Bzip2,
    /// `.xz` and legacy `.lzma`.
    Xz,
}

/// Checked in order; compound tar suffixes precede their stream suffix.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    (".rar", ArchiveFormat::Rar),
    (".zip", ArchiveFormat::Zip),
    (".7z", ArchiveFormat::SevenZip),
    (".tar", ArchiveFormat::Tar),
    (".tar.gz", ArchiveFormat::TarGz),
    (".tar.xz", ArchiveFormat::TarXz),
    (".tar.bz2", ArchiveFormat::TarBz2),
    (".gz", ArchiveFormat::Gzip),
    (".bz", ArchiveFormat::Bzip2),
    (".bz2", ArchiveFormat::Bzip2),
    (".lzma", ArchiveFormat::Xz),
    (".xz", ArchiveFormat::Xz),
];

impl ArchiveFormat {
    /// Detect the format from the file name. Case-insensitive.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, format)| *format)
    }

    /// Multi-file archive unpacked into a directory.
    pub fn is_archive(self) -> bool {
        !matches!(
            self,
            ArchiveFormat::Gzip | ArchiveFormat::Bzip2 | ArchiveFormat::Xz
        )
    }

    /// Needs an external tool.
    pub fn is_external(self) -> bool {
        matches!(self, ArchiveFormat::Rar | ArchiveFormat::SevenZip)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveFormat::Rar => "rar",
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::SevenZip => "7z",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarXz => "tar.xz",
            ArchiveFormat::TarBz2 => "tar.bz2",
            ArchiveFormat::Gzip => "gz",
            ArchiveFormat::Bzip2 => "bz2",
            ArchiveFormat::Xz => "xz",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a stream decoder: the input with its last suffix removed.
pub(crate) fn stream_output_path(path: &Path) -> PathBuf {
    path.with_extension("")
}
