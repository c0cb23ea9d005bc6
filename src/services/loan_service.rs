//! Loan Service - Pure business logic without presentation layer
//!
//! Owns the loan state machine (issue, return, fine computation) and
//! keeps inventory consistent on every transition. Availability is
//! derived, so issuing and returning never touch the book records.

use chrono::{Duration, Local, NaiveDate};
use std::collections::BTreeMap;

use crate::domain::DomainError;
use crate::library::Library;
use crate::models::{Loan, LoanFilter, LoanStatus, LoanWithDetails};
use crate::services::inventory_service;

/// Maximum simultaneous active loans per patron.
pub const LOAN_LIMIT: usize = 3;

/// Currency units charged per full day a return is late.
pub const FINE_RATE: f64 = 500.0;

const LOAN_ID_PREFIX: &str = "LN";
const DATE_FMT: &str = "%Y-%m-%d";

/// Smallest unused `LN` + 4-digit ID, probed monotonically.
fn next_loan_id(loans: &BTreeMap<String, Loan>) -> String {
    let mut counter: u32 = 1;
    loop {
        let id = format!("{}{:04}", LOAN_ID_PREFIX, counter);
        if !loans.contains_key(&id) {
            return id;
        }
        counter += 1;
    }
}

/// Authoritative count of a patron's active loans: a scan of the Loans
/// collection, never the patron's history list.
pub fn active_loan_count(lib: &Library, patron_id: &str) -> usize {
    lib.loans
        .values()
        .filter(|loan| loan.patron_id == patron_id && loan.is_active())
        .count()
}

/// Fine owed when a loan due on `due_date` is returned on `today`:
/// whole calendar days late times [`FINE_RATE`], zero on or before the
/// due date. A malformed or missing due date yields zero rather than an
/// error, matching the system's historical leniency.
pub fn late_fine(due_date: &str, today: NaiveDate) -> f64 {
    match NaiveDate::parse_from_str(due_date, DATE_FMT) {
        Ok(due) if today > due => (today - due).num_days() as f64 * FINE_RATE,
        _ => 0.0,
    }
}

/// Issue a loan to a patron.
///
/// Preconditions are checked in order and the first failure is the one
/// reported: patron exists, book exists, positive loan period, a copy is
/// available, patron is under the loan limit.
pub fn issue_loan(
    lib: &mut Library,
    patron_id: &str,
    isbn: &str,
    loan_period_days: i64,
) -> Result<(String, Loan), DomainError> {
    if !lib.patrons.contains_key(patron_id) {
        return Err(DomainError::NotFound(format!("patron '{}'", patron_id)));
    }
    if !lib.books.contains_key(isbn) {
        return Err(DomainError::NotFound(format!("book '{}'", isbn)));
    }
    if loan_period_days <= 0 {
        return Err(DomainError::Validation(
            "loan period must be a positive number of days".to_string(),
        ));
    }
    if inventory_service::availability(lib, isbn) == 0 {
        return Err(DomainError::Conflict("book unavailable".to_string()));
    }
    if active_loan_count(lib, patron_id) >= LOAN_LIMIT {
        return Err(DomainError::Conflict("loan limit reached".to_string()));
    }

    let today = Local::now().date_naive();
    let due = today + Duration::days(loan_period_days);

    let id = next_loan_id(&lib.loans);
    let loan = Loan {
        patron_id: patron_id.to_string(),
        isbn: isbn.to_string(),
        issue_date: today.format(DATE_FMT).to_string(),
        due_date: due.format(DATE_FMT).to_string(),
        status: LoanStatus::Active,
        return_date: None,
        fine: 0.0,
    };
    lib.loans.insert(id.clone(), loan.clone());

    // Checked above, so the patron is present
    if let Some(patron) = lib.patrons.get_mut(patron_id) {
        patron.history.push(id.clone());
    }

    tracing::info!(
        "Issued loan {}: '{}' to patron '{}', due {}",
        id,
        isbn,
        patron_id,
        loan.due_date
    );

    lib.persist_all()?;
    Ok((id, loan))
}

/// Return an active loan, fixing its fine permanently. Returns the
/// amount charged.
pub fn return_loan(lib: &mut Library, loan_id: &str) -> Result<f64, DomainError> {
    let today = Local::now().date_naive();

    let loan = lib
        .loans
        .get_mut(loan_id)
        .ok_or_else(|| DomainError::NotFound(format!("loan '{}'", loan_id)))?;

    if loan.status == LoanStatus::Returned {
        return Err(DomainError::Conflict(format!(
            "loan '{}' is already returned",
            loan_id
        )));
    }

    let fine = late_fine(&loan.due_date, today);
    loan.status = LoanStatus::Returned;
    loan.return_date = Some(today.format(DATE_FMT).to_string());
    loan.fine = fine;

    tracing::info!("Returned loan {}, fine {:.2}", loan_id, fine);

    lib.persist_loans()?;
    Ok(fine)
}

/// The fine on a loan as of today: for an active loan, what a return
/// today would charge (recomputed on every call, never stored); for a
/// returned loan, the recorded amount.
pub fn pending_fine(lib: &Library, loan_id: &str) -> Result<f64, DomainError> {
    let loan = lib
        .loans
        .get(loan_id)
        .ok_or_else(|| DomainError::NotFound(format!("loan '{}'", loan_id)))?;

    match loan.status {
        LoanStatus::Returned => Ok(loan.fine),
        LoanStatus::Active => Ok(late_fine(&loan.due_date, Local::now().date_naive())),
    }
}

/// List loans with related patron and book info, newest issue first.
pub fn list_loans(lib: &Library, filter: LoanFilter) -> Vec<LoanWithDetails> {
    let mut result: Vec<LoanWithDetails> = lib
        .loans
        .iter()
        .filter(|(_, loan)| {
            filter.status.map_or(true, |s| loan.status == s)
                && filter
                    .patron_id
                    .as_ref()
                    .map_or(true, |p| &loan.patron_id == p)
        })
        .map(|(id, loan)| {
            let patron_name = lib
                .patrons
                .get(&loan.patron_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Unknown".to_string());
            let book_title = lib
                .books
                .get(&loan.isbn)
                .map(|b| b.title.clone())
                .unwrap_or_else(|| "Unknown".to_string());

            LoanWithDetails {
                id: id.clone(),
                patron_id: loan.patron_id.clone(),
                isbn: loan.isbn.clone(),
                issue_date: loan.issue_date.clone(),
                due_date: loan.due_date.clone(),
                return_date: loan.return_date.clone(),
                status: loan.status,
                fine: loan.fine,
                patron_name,
                book_title,
            }
        })
        .collect();

    result.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
    result
}
