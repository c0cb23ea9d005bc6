use serde::{Deserialize, Serialize};
use std::fmt;

/// Borrower category, a closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatronCategory {
    Student,
    Teacher,
    Staff,
    Visitor,
}

impl fmt::Display for PatronCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatronCategory::Student => "student",
            PatronCategory::Teacher => "teacher",
            PatronCategory::Staff => "staff",
            PatronCategory::Visitor => "visitor",
        };
        write!(f, "{}", name)
    }
}

/// A registered borrower. Keyed by a caller-supplied patron ID in the
/// Patrons store.
///
/// `history` lists every loan ID ever issued to this patron, in issue
/// order. It is informational only: active-loan counts are always taken
/// from a scan of the Loans collection, never from this list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patron {
    pub name: String,
    pub category: PatronCategory,
    /// ISO-8601 date of first registration
    pub registration_date: String,
    #[serde(default)]
    pub history: Vec<String>,
}

/// Fields for registering a patron.
#[derive(Debug, Clone)]
pub struct NewPatron {
    pub id: String,
    pub name: String,
    pub category: PatronCategory,
}

/// Fields for editing a patron; a changed `id` re-keys the record and
/// cascades to every loan referencing the old ID.
#[derive(Debug, Clone)]
pub struct PatronEdit {
    pub id: String,
    pub name: String,
    pub category: PatronCategory,
}
