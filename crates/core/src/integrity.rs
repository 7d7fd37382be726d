//! Checksum verification of retrieved files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, warn};

/// Catalog checksum value that disables verification for one URL.
pub const SKIP_CHECKSUM: &str = "SKIP";

/// Errors from integrity verification.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Skipped,
}

/// Digest algorithm, picked from the length of the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestAlgorithm {
    /// 32 hex characters, the catalog's native format.
    Md5,
    /// 64 hex characters.
    Sha256,
}

impl DigestAlgorithm {
    pub fn for_expected(expected: &str) -> Self {
        if expected.len() == 64 {
            DigestAlgorithm::Sha256
        } else {
            DigestAlgorithm::Md5
        }
    }
}

enum Hasher {
    Md5(md5::Context),
    Sha256(Sha256),
}

impl Hasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Md5 => Hasher::Md5(md5::Context::new()),
            DigestAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(ctx) => ctx.consume(data),
            Hasher::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finish(self) -> String {
        match self {
            Hasher::Md5(ctx) => format!("{:x}", ctx.compute()),
            Hasher::Sha256(hasher) => format!("{:x}", hasher.finalize()),
        }
    }
}

/// Streams files through a digest and compares against catalog checksums.
#[derive(Debug, Clone)]
pub struct IntegrityVerifier {
    chunk_size: usize,
    skip_all: bool,
}

impl IntegrityVerifier {
    /// `skip_all` turns every verification into a warning.
    pub fn new(chunk_size: usize, skip_all: bool) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            skip_all,
        }
    }

    /// Check `path` against `expected`.
    ///
    /// The comparison is exact, so an upper-case expected value never matches.
    pub async fn verify(&self, expected: &str, path: &Path) -> Result<Verification, IntegrityError> {
        if self.skip_all || expected == SKIP_CHECKSUM {
            warn!(path = %path.display(), "Skipping integrity check");
            return Ok(Verification::Skipped);
        }

        let actual = self
            .digest(path, DigestAlgorithm::for_expected(expected))
            .await?;

        if actual != expected {
            return Err(IntegrityError::Mismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }

        debug!(path = %path.display(), checksum = %actual, "Integrity verified");
        Ok(Verification::Verified)
    }

    /// Lowercase hex digest of the file contents.
    pub async fn digest(
        &self,
        path: &Path,
        algorithm: DigestAlgorithm,
    ) -> Result<String, IntegrityError> {
        let read_err = |e| IntegrityError::Read {
            path: path.to_path_buf(),
            source: e,
        };

        let file = File::open(path).await.map_err(read_err)?;
        let mut reader = BufReader::with_capacity(self.chunk_size, file);
        let mut buffer = vec![0u8; self.chunk_size];
        let mut hasher = Hasher::new(algorithm);

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(read_err)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // md5("hello world\n")
    const HELLO_MD5: &str = "6f5902ac237024bdd0c176cb93063dc4";
    // sha256("hello world\n")
    const HELLO_SHA256: &str = "a948904f2f0f479b8f8197694b30184b0d2ed1c1cd2a1ec0fb85d299a192a447";

    async fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, data).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_verify_md5() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world\n").await;
        let verifier = IntegrityVerifier::new(4, false);

        assert_eq!(
            verifier.verify(HELLO_MD5, &path).await.unwrap(),
            Verification::Verified
        );
    }

    #[tokio::test]
    async fn test_verify_sha256_by_length() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world\n").await;
        let verifier = IntegrityVerifier::new(1024, false);

        assert_eq!(
            verifier.verify(HELLO_SHA256, &path).await.unwrap(),
            Verification::Verified
        );
    }

    #[tokio::test]
    async fn test_digest_round_trip() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let path = write_file(&dir, "blob.bin", &data).await;
        let verifier = IntegrityVerifier::new(1024, false);

        let digest = verifier.digest(&path, DigestAlgorithm::Md5).await.unwrap();
        assert_eq!(digest, format!("{:x}", md5::compute(&data)));
        assert_eq!(
            verifier.verify(&digest, &path).await.unwrap(),
            Verification::Verified
        );
    }

    #[tokio::test]
    async fn test_bit_flip_is_detected() {
        let dir = TempDir::new().unwrap();
        let mut data: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
        let path = write_file(&dir, "blob.bin", &data).await;
        let verifier = IntegrityVerifier::new(1024, false);
        let expected = verifier.digest(&path, DigestAlgorithm::Md5).await.unwrap();

        data[2048] ^= 0x01;
        tokio::fs::write(&path, &data).await.unwrap();

        match verifier.verify(&expected, &path).await {
            Err(IntegrityError::Mismatch {
                expected: e,
                actual,
                ..
            }) => {
                assert_eq!(e, expected);
                assert_ne!(actual, expected);
            }
            other => panic!("Expected mismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comparison_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world\n").await;
        let verifier = IntegrityVerifier::new(1024, false);

        let result = verifier.verify(&HELLO_MD5.to_uppercase(), &path).await;
        assert!(matches!(result, Err(IntegrityError::Mismatch { .. })));
    }

    #[tokio::test]
    async fn test_skip_sentinel_does_not_read() {
        let verifier = IntegrityVerifier::new(1024, false);
        let missing = Path::new("/nonexistent/wordlist.txt");

        assert_eq!(
            verifier.verify(SKIP_CHECKSUM, missing).await.unwrap(),
            Verification::Skipped
        );
    }

    #[tokio::test]
    async fn test_global_skip() {
        let verifier = IntegrityVerifier::new(1024, true);
        let missing = Path::new("/nonexistent/wordlist.txt");

        assert_eq!(
            verifier.verify(HELLO_MD5, missing).await.unwrap(),
            Verification::Skipped
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let verifier = IntegrityVerifier::new(1024, false);
        let result = verifier
            .verify(HELLO_MD5, Path::new("/nonexistent/wordlist.txt"))
            .await;
        assert!(matches!(result, Err(IntegrityError::Read { .. })));
    }
}
