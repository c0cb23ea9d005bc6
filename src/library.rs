//! Library context shared by all services
//!
//! One explicitly constructed `Library` owns the three collections and the
//! record store for the lifetime of a session. There is no ambient global
//! state; services receive the context by reference.

use std::collections::BTreeMap;

use crate::domain::DomainError;
use crate::models::{Book, Loan, Patron};
use crate::storage::{self, RecordStore};

pub struct Library {
    store: RecordStore,
    pub books: BTreeMap<String, Book>,
    pub patrons: BTreeMap<String, Patron>,
    pub loans: BTreeMap<String, Loan>,
}

impl Library {
    /// Load all three collections from the store.
    pub fn open(store: RecordStore) -> Self {
        let books = store.load(storage::BOOKS);
        let patrons = store.load(storage::PATRONS);
        let loans = store.load(storage::LOANS);

        tracing::info!(
            "Opened library: {} titles, {} patrons, {} loans",
            books.len(),
            patrons.len(),
            loans.len()
        );

        Self {
            store,
            books,
            patrons,
            loans,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn persist_books(&self) -> Result<(), DomainError> {
        self.store.save(storage::BOOKS, &self.books)
    }

    pub fn persist_patrons(&self) -> Result<(), DomainError> {
        self.store.save(storage::PATRONS, &self.patrons)
    }

    pub fn persist_loans(&self) -> Result<(), DomainError> {
        self.store.save(storage::LOANS, &self.loans)
    }

    /// Save all three collections. Best effort: every store is attempted
    /// even after a failure, and the first error is reported. In-memory
    /// state is never rolled back, so memory and disk can diverge until
    /// the next successful save.
    pub fn persist_all(&self) -> Result<(), DomainError> {
        let results = [
            self.persist_books(),
            self.persist_patrons(),
            self.persist_loans(),
        ];

        for result in results {
            if let Err(e) = result {
                tracing::error!("Persisting library state failed: {}", e);
                return Err(e);
            }
        }
        Ok(())
    }
}
