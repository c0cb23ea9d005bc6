use serde::{Deserialize, Serialize};

/// A catalogued title. Keyed by ISBN in the Books store, so the record
/// itself does not repeat the ISBN.
///
/// `quantity` is the number of copies the library owns; how many of those
/// are on the shelf is always derived from the Loans collection, never
/// stored here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: u32,
}

/// Fields for registering a title (or restocking an existing one).
#[derive(Debug, Clone)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: u32,
}

/// Fields for editing a title in place; `isbn` may differ from the current
/// key, in which case the record is re-keyed.
#[derive(Debug, Clone)]
pub struct BookEdit {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: u32,
}

/// Book row for search results and listings, with the key inlined.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: u32,
    pub available: u32,
}
