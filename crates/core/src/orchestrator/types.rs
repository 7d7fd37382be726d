//! Types for the retrieval orchestrator.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::fetcher::FetchError;
use crate::integrity::IntegrityError;

/// Why a single retrieval attempt failed.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("decompression failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("entry {entry} has no usable source")]
    NoSource { entry: String },
}

impl RetrievalError {
    /// Aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_fatal())
    }
}

/// Why an entry was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file was already on disk.
    AlreadyPresent,
    /// The entry needs a torrent download and those are disabled.
    TorrentDisabled,
}

/// Final result for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RetrievalOutcome {
    Success,
    Skipped { reason: SkipReason },
    Failed { reason: String, attempts: u32 },
}

/// Outcome of one selected entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub category: String,
    pub name: String,
    /// Local file derived from the chosen source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub outcome: RetrievalOutcome,
}

/// Summary of a retrieval run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// In completion order.
    pub entries: Vec<EntryReport>,
}

impl RetrievalReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, RetrievalOutcome::Success))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RetrievalOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RetrievalOutcome::Failed { .. }))
    }

    /// Report for the named entry, if it was part of the run.
    pub fn entry(&self, name: &str) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn count(&self, pred: impl Fn(&RetrievalOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Errors that stop a whole run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// An entry hit an error that is not worth retrying anything after.
    #[error("retrieval of {entry} aborted the run: {source}")]
    Fatal {
        entry: String,
        #[source]
        source: RetrievalError,
    },

    #[error("failed to create base directory {path}: {source}")]
    BaseDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<RetrievalOutcome>) -> RetrievalReport {
        RetrievalReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            entries: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| EntryReport {
                    category: "misc".to_string(),
                    name: format!("entry-{}", i),
                    path: None,
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn test_report_counts() {
        let r = report(vec![
            RetrievalOutcome::Success,
            RetrievalOutcome::Skipped {
                reason: SkipReason::AlreadyPresent,
            },
            RetrievalOutcome::Failed {
                reason: "HTTP 500".to_string(),
                attempts: 4,
            },
            RetrievalOutcome::Success,
        ]);
        assert_eq!(r.succeeded(), 2);
        assert_eq!(r.skipped(), 1);
        assert_eq!(r.failed(), 1);
        assert!(r.entry("entry-2").is_some());
        assert!(r.entry("entry-9").is_none());
    }

    #[test]
    fn test_fatal_classification() {
        let fatal = RetrievalError::Fetch(FetchError::MissingDescriptor {
            path: PathBuf::from("/w/x.torrent"),
        });
        assert!(fatal.is_fatal());

        let retryable = RetrievalError::Fetch(FetchError::Unresolved {
            url: "http://www.mediafire.com/file/x".to_string(),
        });
        assert!(!retryable.is_fatal());

        let no_source = RetrievalError::NoSource {
            entry: "x".to_string(),
        };
        assert!(!no_source.is_fatal());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&RetrievalOutcome::Skipped {
            reason: SkipReason::TorrentDisabled,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"skipped","reason":"torrent_disabled"}"#);
    }
}
