//! Catalog loading and validation.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{total_sizes, Catalog, CatalogEntry, CatalogError, Category};

#[derive(Debug, Deserialize)]
struct RawCategory {
    files: Vec<RawEntry>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    size: Option<[u64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    url: Vec<String>,
    sum: Vec<String>,
    #[serde(default)]
    size: [u64; 2],
}

/// Load the catalog from a JSON file.
pub async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    if !tokio::fs::try_exists(path).await? {
        return Err(CatalogError::NotFound(path.display().to_string()));
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&raw)?;

    debug!(
        path = %path.display(),
        categories = catalog.categories().len(),
        entries = catalog.total_entries(),
        "Catalog loaded"
    );

    Ok(catalog)
}

/// Parse and validate a catalog document.
///
/// Malformed entries are rejected here so retrieval never has to deal with
/// misaligned URL/checksum lists.
pub fn parse_catalog(raw: &str) -> Result<Catalog, CatalogError> {
    // serde_json is built with `preserve_order`, so the map keeps declaration order.
    let document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let mut categories = Vec::with_capacity(document.len());
    for (name, value) in document {
        let raw_category: RawCategory = serde_json::from_value(value)
            .map_err(|e| CatalogError::Parse(format!("category '{}': {}", name, e)))?;
        categories.push(build_category(name, raw_category)?);
    }

    Ok(Catalog::new(categories))
}

fn build_category(name: String, raw: RawCategory) -> Result<Category, CatalogError> {
    let mut entries = Vec::with_capacity(raw.files.len());
    for file in raw.files {
        entries.push(build_entry(&name, file)?);
    }

    let count = entries.len();
    if let Some(declared) = raw.count {
        if declared != count {
            warn!(
                category = %name,
                declared = declared,
                actual = count,
                "Category count does not match its file list, using actual count"
            );
        }
    }

    let [compressed_size, decompressed_size] =
        raw.size.unwrap_or_else(|| total_sizes(&entries));

    Ok(Category {
        name,
        entries,
        count,
        compressed_size,
        decompressed_size,
    })
}

fn build_entry(category: &str, raw: RawEntry) -> Result<CatalogEntry, CatalogError> {
    let malformed = |reason: String| CatalogError::MalformedEntry {
        category: category.to_string(),
        entry: raw.name.clone(),
        reason,
    };

    if raw.url.is_empty() {
        return Err(malformed("no source urls".to_string()));
    }
    if raw.url.len() != raw.sum.len() {
        return Err(malformed(format!(
            "{} urls but {} checksums",
            raw.url.len(),
            raw.sum.len()
        )));
    }
    if let Some(url) = raw.url.iter().find(|u| u.trim().is_empty()) {
        return Err(malformed(format!("empty url {:?}", url)));
    }

    Ok(CatalogEntry {
        name: raw.name,
        urls: raw.url,
        checksums: raw.sum,
        compressed_size: raw.size[0],
        decompressed_size: raw.size[1],
    })
}
