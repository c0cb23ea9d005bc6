use serde::{Deserialize, Serialize};
use std::fmt;

/// Loan lifecycle state. `Returned` is terminal; there is no cancellation
/// state, a mis-issued loan can only be corrected by returning it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "active"),
            LoanStatus::Returned => write!(f, "returned"),
        }
    }
}

/// A loan transaction. Keyed by a generated loan ID in the Loans store.
/// Never deleted; returned loans are the permanent lending history.
///
/// Dates are ISO-8601 strings as persisted; a malformed due date makes
/// fine computation yield zero rather than erroring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub patron_id: String,
    pub isbn: String,
    pub issue_date: String,
    pub due_date: String,
    pub status: LoanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    /// Fixed at return time; 0 while the loan is active
    pub fine: f64,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// Enriched loan for listings: the record plus resolved patron and book
/// names (`"Unknown"` when the referent no longer exists).
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithDetails {
    pub id: String,
    pub patron_id: String,
    pub isbn: String,
    pub issue_date: String,
    pub due_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub fine: f64,
    pub patron_name: String,
    pub book_title: String,
}

/// Filter parameters for listing loans
#[derive(Debug, Default, Clone)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub patron_id: Option<String>,
}
