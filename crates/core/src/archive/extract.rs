//! Decompressor implementation.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::{GzDecoder, MultiGzDecoder};
use tokio::process::Command;
use tracing::{debug, info};
use xz2::read::XzDecoder;
use xz2::stream::{Stream, CONCATENATED};
use zip::ZipArchive;

use super::format::stream_output_path;
use super::{ArchiveConfig, ArchiveError, ArchiveFormat};

/// Result of a successful decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    pub format: ArchiveFormat,
    /// Directory an archive was unpacked into, or the decoded file.
    pub output: PathBuf,
}

/// Unpacks archives in place.
#[derive(Debug, Clone)]
pub struct Decompressor {
    config: ArchiveConfig,
    remove_archive: bool,
}

impl Decompressor {
    pub fn new(config: ArchiveConfig, remove_archive: bool) -> Self {
        Self {
            config,
            remove_archive,
        }
    }

    /// Decompress `path` next to itself.
    ///
    /// The process working directory is never changed: external tools get
    /// the archive directory as their own working directory and in-process
    /// extractors are given it explicitly.
    pub async fn decompress(&self, path: &Path) -> Result<Decompressed, ArchiveError> {
        let format = ArchiveFormat::detect(path).ok_or_else(|| ArchiveError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let dir = archive_dir(path);

        info!(path = %path.display(), format = %format, "Decompressing");

        let output = if format.is_external() {
            let (tool, args) = match format {
                ArchiveFormat::Rar => (&self.config.unrar_path, ["x", "-o+"]),
                _ => (&self.config.seven_zip_path, ["x", "-y"]),
            };
            self.run_tool(tool, &args, path, &dir).await?;
            dir
        } else if format.is_archive() {
            let archive = path.to_path_buf();
            let target = dir.clone();
            run_blocking(move || unpack(format, &archive, &target)).await?;
            dir
        } else {
            let input = path.to_path_buf();
            let output = stream_output_path(path);
            let target = output.clone();
            if let Err(e) = run_blocking(move || decode_stream(format, &input, &target)).await {
                let _ = tokio::fs::remove_file(&output).await;
                return Err(e);
            }
            output
        };

        if self.remove_archive {
            tokio::fs::remove_file(path).await?;
            debug!(path = %path.display(), "Archive removed");
        }

        info!(path = %path.display(), output = %output.display(), "Decompressed");
        Ok(Decompressed { format, output })
    }

    async fn run_tool(
        &self,
        tool: &Path,
        args: &[&str],
        archive: &Path,
        dir: &Path,
    ) -> Result<(), ArchiveError> {
        let file_name = archive
            .file_name()
            .ok_or_else(|| ArchiveError::UnknownFormat {
                path: archive.to_path_buf(),
            })?;

        debug!(tool = %tool.display(), archive = %archive.display(), "Running extraction tool");

        let output = Command::new(tool)
            .args(args)
            .arg(file_name)
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    ArchiveError::ToolNotFound {
                        tool: tool.to_path_buf(),
                    }
                } else {
                    ArchiveError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ArchiveError::extraction_failed(
                format!("{} exited with code: {:?}", tool.display(), output.status.code()),
                Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            ));
        }

        Ok(())
    }
}

/// Directory holding the archive; `.` for a bare file name.
fn archive_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

async fn run_blocking<F>(job: F) -> Result<(), ArchiveError>
where
    F: FnOnce() -> Result<(), ArchiveError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ArchiveError::extraction_failed(format!("extraction task failed: {}", e), None))?
}

fn unpack(format: ArchiveFormat, archive: &Path, target: &Path) -> Result<(), ArchiveError> {
    let reader = BufReader::new(File::open(archive)?);

    match format {
        ArchiveFormat::Zip => {
            let mut zip = ZipArchive::new(reader)?;
            zip.extract(target)?;
        }
        ArchiveFormat::Tar => tar::Archive::new(reader).unpack(target)?,
        ArchiveFormat::TarGz => tar::Archive::new(GzDecoder::new(reader)).unpack(target)?,
        ArchiveFormat::TarXz => {
            tar::Archive::new(XzDecoder::new_multi_decoder(reader)).unpack(target)?
        }
        ArchiveFormat::TarBz2 => tar::Archive::new(BzDecoder::new(reader)).unpack(target)?,
        other => {
            return Err(ArchiveError::extraction_failed(
                format!("{} is not an in-process archive format", other),
                None,
            ))
        }
    }

    Ok(())
}

fn decode_stream(format: ArchiveFormat, input: &Path, output: &Path) -> Result<(), ArchiveError> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let written = match format {
        ArchiveFormat::Gzip => io::copy(&mut MultiGzDecoder::new(reader), &mut writer)?,
        ArchiveFormat::Bzip2 => io::copy(&mut BzDecoder::new(reader), &mut writer)?,
        ArchiveFormat::Xz => {
            // Auto decoder accepts both .xz and legacy .lzma containers.
            // Concatenated .xz streams decode into one output.
            let stream = Stream::new_auto_decoder(u64::MAX, CONCATENATED)
                .map_err(|e| ArchiveError::extraction_failed(e.to_string(), None))?;
            io::copy(&mut XzDecoder::new_stream(reader, stream), &mut writer)?
        }
        other => {
            return Err(ArchiveError::extraction_failed(
                format!("{} is not a stream format", other),
                None,
            ))
        }
    };

    io::Write::flush(&mut writer)?;
    debug!(output = %output.display(), bytes = written, "Stream decoded");
    Ok(())
}
