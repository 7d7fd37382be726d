//! Wordlist catalog - categories of downloadable wordlists.
//!
//! The catalog is loaded once from a JSON document, validated eagerly and is
//! read-only afterwards. Category declaration order is preserved because it
//! drives numeric wordlist ids.

mod listing;
mod loader;
mod select;
mod types;

pub use listing::{list_entries, named_categories, readable_size, search_entries, ListedEntry};
pub use loader::{load_catalog, parse_catalog};
pub use select::{resolve_category, select, SelectedEntry, Selection, SelectionScope};
pub use types::*;
