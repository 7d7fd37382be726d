//! Operations behind the command line flags.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use regex_lite::Regex;
use tracing::{error, info, warn};
use walkdir::WalkDir;
use wordlistctl_core::{
    list_entries, named_categories, readable_size, search_entries, select, Catalog, Config,
    LibrqbitSession, ListedEntry, RetrievalOrchestrator, RetrievalOutcome, RetrievalReport,
};

/// Download the wordlists selected by `id`.
pub async fn fetch(config: &Config, catalog: &Catalog, id: i64) -> Result<()> {
    let selection = select(catalog, id, config.retrieval.category.as_deref())?;

    let session = Arc::new(LibrqbitSession::new(config.torrent.clone()));
    let orchestrator = RetrievalOrchestrator::new(config, session)?;
    let report = orchestrator.run(&selection).await?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &RetrievalReport) {
    for entry in &report.entries {
        match &entry.outcome {
            RetrievalOutcome::Success => info!(entry = %entry.name, "Downloaded"),
            RetrievalOutcome::Skipped { reason } => {
                info!(entry = %entry.name, reason = ?reason, "Skipped")
            }
            RetrievalOutcome::Failed { reason, attempts } => {
                error!(entry = %entry.name, attempts, reason = %reason, "Failed")
            }
        }
    }

    let elapsed = report.finished_at - report.started_at;
    info!(
        succeeded = report.succeeded(),
        skipped = report.skipped(),
        failed = report.failed(),
        elapsed_secs = elapsed.num_seconds(),
        "Done"
    );
}

/// Print the wordlists of the active scope with their ids.
pub fn print_entries(catalog: &Catalog, active_category: Option<&str>) -> Result<()> {
    println!("available wordlists:\n");
    println!("    > 0  - all wordlists");
    for listed in list_entries(catalog, active_category)? {
        println!("{}", entry_line(&listed));
    }
    println!();
    Ok(())
}

/// Print every category with its index and statistics.
pub fn print_categories(catalog: &Catalog) {
    println!("available wordlists category:\n");
    for (index, category) in catalog.categories().iter().enumerate() {
        println!(
            "    > {}  - {} ({} lsts, {}, {})",
            index,
            category.name,
            category.count,
            readable_size(category.compressed_size),
            readable_size(category.decompressed_size)
        );
    }
    println!();
}

/// Print the wordlists of each named category.
pub fn print_named(catalog: &Catalog, names: &str) -> Result<()> {
    for category in named_categories(catalog, names)? {
        println!("{}:", category.name);
        for entry in &category.entries {
            println!(
                "    > {} ({}, {})",
                entry.name,
                readable_size(entry.compressed_size),
                readable_size(entry.decompressed_size)
            );
        }
        println!();
    }
    Ok(())
}

/// Report catalog entries whose names match `pattern`.
pub fn search_catalog(catalog: &Catalog, active_category: Option<&str>, pattern: &str) -> Result<()> {
    info!(pattern = %pattern, "Searching catalog");
    let found = search_entries(catalog, active_category, pattern)?;

    if found.is_empty() {
        warn!("No wordlist found");
    }
    for listed in found {
        println!("wordlist {} found: id={}", listed.entry.name, listed.id);
    }
    Ok(())
}

/// Report files under the base directory whose names match `pattern`.
pub fn search_local(base_dir: &Path, pattern: &str) -> Result<()> {
    let found = find_local(base_dir, pattern)?;

    if found.is_empty() {
        warn!(base_dir = %base_dir.display(), "Wordlist not found");
    }
    for path in found {
        println!("wordlist found: {}", path.display());
    }
    Ok(())
}

/// Files under `base_dir` whose name matches `pattern` from its start.
pub fn find_local(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let regex = Regex::new(&format!("^(?:{})", pattern))
        .with_context(|| format!("Invalid search pattern: {}", pattern))?;

    let mut found: Vec<PathBuf> = WalkDir::new(base_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| regex.is_match(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    Ok(found)
}

fn entry_line(listed: &ListedEntry<'_>) -> String {
    format!(
        "    > {}  - {} ({}, {})",
        listed.id,
        listed.entry.name,
        readable_size(listed.entry.compressed_size),
        readable_size(listed.entry.decompressed_size)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wordlistctl_core::{CatalogEntry, Category};

    #[test]
    fn test_find_local_matches_file_names() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("password")).unwrap();
        std::fs::write(dir.path().join("password/rockyou.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("password/rockyou.txt.gz"), b"x").unwrap();
        std::fs::write(dir.path().join("password/darkweb.txt"), b"x").unwrap();
        std::fs::create_dir_all(dir.path().join("rockyou-dir")).unwrap();

        let found = find_local(dir.path(), "rock").unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("password/rockyou.txt"),
                dir.path().join("password/rockyou.txt.gz"),
            ]
        );
    }

    #[test]
    fn test_find_local_is_anchored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("myrockyou.txt"), b"x").unwrap();
        assert!(find_local(dir.path(), "rock").unwrap().is_empty());
    }

    #[test]
    fn test_find_local_bad_pattern() {
        let dir = TempDir::new().unwrap();
        assert!(find_local(dir.path(), "(").is_err());
    }

    #[test]
    fn test_entry_line() {
        let entry = CatalogEntry {
            name: "rockyou".to_string(),
            urls: vec!["http://h/rockyou.txt.gz".to_string()],
            checksums: vec!["SKIP".to_string()],
            compressed_size: 53_357_329,
            decompressed_size: 139_921_497,
        };
        let catalog = Catalog::new(vec![Category::new("password", vec![entry])]);
        let listed = list_entries(&catalog, None).unwrap();

        assert_eq!(
            entry_line(&listed[0]),
            "    > 1  - rockyou (53.36 Mbytes, 139.92 Mbytes)"
        );
    }
}
