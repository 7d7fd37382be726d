//! Turning a numeric wordlist id into a set of entries to retrieve.

use super::types::{Catalog, CatalogEntry, Category, SelectionError};

/// What part of the catalog a selection covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionScope {
    /// Every entry of every category.
    Catalog,
    /// Every entry of one category.
    Category(String),
    /// A single entry.
    Entry { category: String, index: usize },
}

/// An entry picked for retrieval, with the category it is installed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEntry {
    pub category: String,
    pub entry: CatalogEntry,
}

/// Narrowed view of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub scope: SelectionScope,
    pub entries: Vec<SelectedEntry>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a category given either its position (0-based) or its name.
pub fn resolve_category<'a>(
    catalog: &'a Catalog,
    key: &str,
) -> Result<&'a Category, SelectionError> {
    if let Ok(index) = key.trim().parse::<i64>() {
        return usize::try_from(index)
            .ok()
            .and_then(|i| catalog.categories().get(i))
            .ok_or_else(|| SelectionError::InvalidCategoryId(key.to_string()));
    }

    catalog
        .category(key)
        .ok_or_else(|| SelectionError::UnknownCategory(key.to_string()))
}

/// Select catalog entries from a user supplied id.
///
/// `0` selects the active category, or the whole catalog when none is active.
/// `1..=total` selects one entry: relative to the active category if there is
/// one, otherwise counted across categories in declaration order.
pub fn select(
    catalog: &Catalog,
    id: i64,
    active_category: Option<&str>,
) -> Result<Selection, SelectionError> {
    let category = active_category
        .map(|name| {
            catalog
                .category(name)
                .ok_or_else(|| SelectionError::UnknownCategory(name.to_string()))
        })
        .transpose()?;

    let total = catalog.total_entries() as i64;
    if id < 0 || id > total {
        return Err(SelectionError::InvalidId { id });
    }

    if id == 0 {
        return Ok(match category {
            Some(cat) => Selection {
                scope: SelectionScope::Category(cat.name.clone()),
                entries: whole_category(cat),
            },
            None => Selection {
                scope: SelectionScope::Catalog,
                entries: catalog.categories().iter().flat_map(whole_category).collect(),
            },
        });
    }

    let position = (id - 1) as usize;
    let (owner, index) = match category {
        Some(cat) => (cat, position),
        None => locate_global(catalog, position).ok_or(SelectionError::InvalidId { id })?,
    };

    let entry = owner
        .entries
        .get(index)
        .ok_or(SelectionError::InvalidId { id })?;

    Ok(Selection {
        scope: SelectionScope::Entry {
            category: owner.name.clone(),
            index,
        },
        entries: vec![SelectedEntry {
            category: owner.name.clone(),
            entry: entry.clone(),
        }],
    })
}

fn whole_category(category: &Category) -> Vec<SelectedEntry> {
    category
        .entries
        .iter()
        .map(|entry| SelectedEntry {
            category: category.name.clone(),
            entry: entry.clone(),
        })
        .collect()
}

/// The first category whose cumulative count exceeds `position` owns it.
fn locate_global(catalog: &Catalog, position: usize) -> Option<(&Category, usize)> {
    let mut cumulative = 0;
    for category in catalog.categories() {
        if position < cumulative + category.count {
            return Some((category, position - cumulative));
        }
        cumulative += category.count;
    }
    None
}
