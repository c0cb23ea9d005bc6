pub mod records;

pub use records::RecordStore;

/// Collection names as they appear on disk (`<name>.json`).
pub const BOOKS: &str = "books";
pub const PATRONS: &str = "patrons";
pub const LOANS: &str = "loans";
