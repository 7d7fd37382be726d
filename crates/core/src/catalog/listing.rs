//! Listing and searching catalog entries.

use regex_lite::Regex;

use super::types::{Catalog, CatalogEntry, CatalogError, Category, SelectionError};

/// An entry as shown to the user, with its id in the listed scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry<'a> {
    /// 1-based id, usable with `select` under the same active category.
    pub id: usize,
    pub category: &'a str,
    pub entry: &'a CatalogEntry,
}

/// List entries of the active category, or of the whole catalog.
pub fn list_entries<'a>(
    catalog: &'a Catalog,
    active_category: Option<&str>,
) -> Result<Vec<ListedEntry<'a>>, SelectionError> {
    let scoped: Vec<(&str, &CatalogEntry)> = match active_category {
        Some(name) => {
            let category = catalog
                .category(name)
                .ok_or_else(|| SelectionError::UnknownCategory(name.to_string()))?;
            category
                .entries
                .iter()
                .map(|e| (category.name.as_str(), e))
                .collect()
        }
        None => catalog.entries().collect(),
    };

    Ok(scoped
        .into_iter()
        .enumerate()
        .map(|(idx, (category, entry))| ListedEntry {
            id: idx + 1,
            category,
            entry,
        })
        .collect())
}

/// Find entries whose name matches `pattern` at its start.
pub fn search_entries<'a>(
    catalog: &'a Catalog,
    active_category: Option<&str>,
    pattern: &str,
) -> Result<Vec<ListedEntry<'a>>, CatalogError> {
    let regex = Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| CatalogError::InvalidPattern(e.to_string()))?;

    let listed = list_entries(catalog, active_category)?;

    Ok(listed
        .into_iter()
        .filter(|l| regex.is_match(&l.entry.name))
        .collect())
}

/// Look up a comma separated list of category names.
///
/// Every name is checked before anything is returned. Duplicates are
/// dropped, first occurrence wins.
pub fn named_categories<'a>(
    catalog: &'a Catalog,
    names: &str,
) -> Result<Vec<&'a Category>, SelectionError> {
    let mut found: Vec<&Category> = Vec::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let category = catalog
            .category(name)
            .ok_or_else(|| SelectionError::UnknownCategory(name.to_string()))?;
        if !found.iter().any(|c| c.name == category.name) {
            found.push(category);
        }
    }
    Ok(found)
}

/// Human readable size using decimal units.
pub fn readable_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "Kbytes", "Mbytes", "Gbytes", "Tbytes"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size > 1000.0 && unit < UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}
