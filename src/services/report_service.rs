//! Reporting Service - read-only projections over the three collections
//!
//! Nothing here mutates or persists; every function derives its result
//! from the in-memory collections on each call.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::library::Library;
use crate::models::{LoanStatus, PatronCategory};
use crate::services::inventory_service;

const DATE_FMT: &str = "%Y-%m-%d";

/// One row of the most-borrowed report.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowCount {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub count: usize,
}

/// Titles ranked by how often they were ever borrowed (any status).
/// Ties are broken by title, then ISBN, so the ranking is stable.
pub fn most_borrowed(lib: &Library, limit: usize) -> Vec<BorrowCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for loan in lib.loans.values() {
        *counts.entry(loan.isbn.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<BorrowCount> = counts
        .into_iter()
        .map(|(isbn, count)| {
            let (title, author) = lib
                .books
                .get(isbn)
                .map(|b| (b.title.clone(), b.author.clone()))
                .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
            BorrowCount {
                isbn: isbn.to_string(),
                title,
                author,
                count,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.isbn.cmp(&b.isbn))
    });
    rows.truncate(limit);
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Issue,
    Return,
}

/// One issue or return event in the activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    pub date: String,
    pub kind: ActivityKind,
    pub patron_name: String,
    pub book_title: String,
}

/// Issue and return events from the last `days` days, newest first.
/// Loans whose dates do not parse are skipped. Same-date ordering is
/// the (deterministic) collection scan order.
pub fn recent_activity(lib: &Library, days: i64) -> Vec<ActivityEvent> {
    let cutoff = Local::now().date_naive() - Duration::days(days);

    let mut events = Vec::new();
    for loan in lib.loans.values() {
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

        if let Ok(issued) = NaiveDate::parse_from_str(&loan.issue_date, DATE_FMT) {
            if issued >= cutoff {
                events.push(ActivityEvent {
                    date: loan.issue_date.clone(),
                    kind: ActivityKind::Issue,
                    patron_name: patron_name.clone(),
                    book_title: book_title.clone(),
                });
            }
        }

        if loan.status == LoanStatus::Returned {
            if let Some(return_date) = &loan.return_date {
                if let Ok(returned) = NaiveDate::parse_from_str(return_date, DATE_FMT) {
                    if returned >= cutoff {
                        events.push(ActivityEvent {
                            date: return_date.clone(),
                            kind: ActivityKind::Return,
                            patron_name,
                            book_title,
                        });
                    }
                }
            }
        }
    }

    // Stable sort keeps scan order within a date
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}

/// One genre's share of the collection.
#[derive(Debug, Clone, Serialize)]
pub struct GenreShare {
    pub genre: String,
    pub copies: u32,
    pub percent: f64,
}

/// Copies owned per genre, as a percentage of all copies owned.
pub fn genre_distribution(lib: &Library) -> Vec<GenreShare> {
    let mut copies_by_genre: BTreeMap<&str, u32> = BTreeMap::new();
    for book in lib.books.values() {
        *copies_by_genre.entry(book.genre.as_str()).or_insert(0) += book.quantity;
    }

    let total: u32 = copies_by_genre.values().sum();

    let mut rows: Vec<GenreShare> = copies_by_genre
        .into_iter()
        .map(|(genre, copies)| GenreShare {
            genre: genre.to_string(),
            copies,
            percent: if total > 0 {
                copies as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| b.copies.cmp(&a.copies).then_with(|| a.genre.cmp(&b.genre)));
    rows
}

/// Aggregate snapshot of the whole collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub distinct_titles: usize,
    pub total_copies: u32,
    pub copies_available: u32,
    pub copies_on_loan: usize,
    pub total_loans: usize,
    pub active_loans: usize,
    pub returned_loans: usize,
    pub total_patrons: usize,
    pub patrons_by_category: Vec<(PatronCategory, usize)>,
}

pub fn collection_summary(lib: &Library) -> CollectionSummary {
    let total_copies: u32 = lib.books.values().map(|b| b.quantity).sum();
    let copies_available: u32 = lib
        .books
        .keys()
        .map(|isbn| inventory_service::availability(lib, isbn))
        .sum();

    let active_loans = lib.loans.values().filter(|l| l.is_active()).count();
    let total_loans = lib.loans.len();

    let categories = [
        PatronCategory::Student,
        PatronCategory::Teacher,
        PatronCategory::Staff,
        PatronCategory::Visitor,
    ];
    let patrons_by_category = categories
        .into_iter()
        .map(|category| {
            let count = lib
                .patrons
                .values()
                .filter(|p| p.category == category)
                .count();
            (category, count)
        })
        .collect();

    CollectionSummary {
        distinct_titles: lib.books.len(),
        total_copies,
        copies_available,
        copies_on_loan: active_loans,
        total_loans,
        active_loans,
        returned_loans: total_loans - active_loans,
        total_patrons: lib.patrons.len(),
        patrons_by_category,
    }
}
