//! Types for the wordlist catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    NotFound(String),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Malformed entry '{entry}' in category '{category}': {reason}")]
    MalformedEntry {
        category: String,
        entry: String,
        reason: String,
    },

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Errors raised while turning a user supplied id into a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{id} is not a valid wordlist id")]
    InvalidId { id: i64 },

    #[error("{0} is not a valid category id")]
    InvalidCategoryId(String),

    #[error("category {0} is unavailable")]
    UnknownCategory(String),
}

/// One downloadable wordlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Wordlist name.
    pub name: String,
    /// Candidate sources (HTTP URL, magnet URI or `torrent+` prefixed URL).
    pub urls: Vec<String>,
    /// Checksums aligned with `urls` (or `SKIP`).
    pub checksums: Vec<String>,
    /// Size of the archive in bytes.
    pub compressed_size: u64,
    /// Size once decompressed in bytes.
    pub decompressed_size: u64,
}

/// A named group of wordlists with cached statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub entries: Vec<CatalogEntry>,
    /// Number of entries.
    pub count: usize,
    /// Aggregate compressed size in bytes.
    pub compressed_size: u64,
    /// Aggregate decompressed size in bytes.
    pub decompressed_size: u64,
}

impl Category {
    /// Build a category with count and sizes derived from `entries`.
    pub fn new(name: impl Into<String>, entries: Vec<CatalogEntry>) -> Self {
        let [compressed_size, decompressed_size] = total_sizes(&entries);
        Self {
            name: name.into(),
            count: entries.len(),
            entries,
            compressed_size,
            decompressed_size,
        }
    }
}

/// Summed `[compressed, decompressed]` sizes, saturating at `u64::MAX`.
pub(crate) fn total_sizes(entries: &[CatalogEntry]) -> [u64; 2] {
    entries.iter().fold([0, 0], |[c, d], e| {
        [
            c.saturating_add(e.compressed_size),
            d.saturating_add(e.decompressed_size),
        ]
    })
}

/// All categories, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from already validated categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Total number of entries across every category.
    pub fn total_entries(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every entry paired with its category name, in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(move |e| (c.name.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, urls: &[&str], sums: &[&str]) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            urls: urls.iter().map(|s| s.to_string()).collect(),
            checksums: sums.iter().map(|s| s.to_string()).collect(),
            compressed_size: 10,
            decompressed_size: 20,
        }
    }

    #[test]
    fn test_catalog_entries_in_order() {
        let catalog = Catalog::new(vec![
            Category {
                name: "username".to_string(),
                entries: vec![entry("u1", &["http://h/u1"], &["SKIP"])],
                count: 1,
                compressed_size: 10,
                decompressed_size: 20,
            },
            Category {
                name: "password".to_string(),
                entries: vec![
                    entry("p1", &["http://h/p1"], &["SKIP"]),
                    entry("p2", &["http://h/p2"], &["SKIP"]),
                ],
                count: 2,
                compressed_size: 20,
                decompressed_size: 40,
            },
        ]);

        assert_eq!(catalog.total_entries(), 3);
        let names: Vec<_> = catalog
            .entries()
            .map(|(cat, e)| format!("{}/{}", cat, e.name))
            .collect();
        assert_eq!(names, vec!["username/u1", "password/p1", "password/p2"]);
        assert!(catalog.category("password").is_some());
        assert!(catalog.category("misc").is_none());
    }

    #[test]
    fn test_category_sizes_saturate() {
        let mut huge = entry("huge", &["http://h/huge"], &["SKIP"]);
        huge.compressed_size = u64::MAX;
        huge.decompressed_size = u64::MAX - 1;
        let small = entry("small", &["http://h/small"], &["SKIP"]);

        let category = Category::new("misc", vec![huge, small]);

        assert_eq!(category.count, 2);
        assert_eq!(category.compressed_size, u64::MAX);
        assert_eq!(category.decompressed_size, u64::MAX);
    }

    #[test]
    fn test_selection_error_display() {
        let err = SelectionError::InvalidId { id: 1337 };
        assert_eq!(err.to_string(), "1337 is not a valid wordlist id");

        let err = SelectionError::UnknownCategory("fuzzing".to_string());
        assert_eq!(err.to_string(), "category fuzzing is unavailable");
    }
}
