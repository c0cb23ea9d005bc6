//! Inventory Service - Pure business logic without presentation layer
//!
//! Catalog bookkeeping: registration, restock, edit and deletion of
//! titles, plus derived availability. A book's stored `quantity` is the
//! number of copies owned; availability subtracts the active loans.

use crate::domain::DomainError;
use crate::library::Library;
use crate::models::{Book, BookEdit, BookSummary, NewBook};

/// Number of copies of `isbn` currently out on active loans.
pub fn active_loans_for(lib: &Library, isbn: &str) -> u32 {
    lib.loans
        .values()
        .filter(|loan| loan.isbn == isbn && loan.is_active())
        .count() as u32
}

/// Copies of `isbn` currently on the shelf. An unknown ISBN counts as
/// zero copies owned, so the result is 0 rather than an error.
pub fn availability(lib: &Library, isbn: &str) -> u32 {
    let owned = lib.books.get(isbn).map(|b| b.quantity).unwrap_or(0);
    owned.saturating_sub(active_loans_for(lib, isbn))
}

/// Register a new title, or add copies to an already-registered ISBN.
///
/// Restocking deliberately merges by ISBN: only the quantity changes,
/// the existing record keeps its title, author and genre.
pub fn register_or_restock(lib: &mut Library, new: NewBook) -> Result<Book, DomainError> {
    if new.isbn.trim().is_empty() {
        return Err(DomainError::Validation("ISBN is required".to_string()));
    }

    if let Some(existing) = lib.books.get_mut(&new.isbn) {
        existing.quantity += new.quantity;
        let book = existing.clone();
        tracing::info!(
            "Restocked '{}' ({}): +{} copies, {} total",
            book.title,
            new.isbn,
            new.quantity,
            book.quantity
        );
        lib.persist_books()?;
        return Ok(book);
    }

    if new.title.trim().is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }

    let genre = if new.genre.trim().is_empty() {
        "unspecified".to_string()
    } else {
        new.genre
    };

    let book = Book {
        title: new.title,
        author: new.author,
        genre,
        quantity: new.quantity,
    };
    lib.books.insert(new.isbn.clone(), book.clone());
    tracing::info!(
        "Registered '{}' ({}) with {} copies",
        book.title,
        new.isbn,
        book.quantity
    );
    lib.persist_books()?;
    Ok(book)
}

/// Edit a title in place. A changed ISBN re-keys the record; historical
/// loans keep the ISBN they were issued under.
pub fn edit_book(lib: &mut Library, isbn_old: &str, edit: BookEdit) -> Result<Book, DomainError> {
    if !lib.books.contains_key(isbn_old) {
        return Err(DomainError::NotFound(format!("book '{}'", isbn_old)));
    }
    if edit.title.trim().is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }
    if edit.isbn.trim().is_empty() {
        return Err(DomainError::Validation("ISBN is required".to_string()));
    }
    if edit.isbn != isbn_old && lib.books.contains_key(&edit.isbn) {
        return Err(DomainError::Conflict(format!(
            "a book with ISBN {} already exists",
            edit.isbn
        )));
    }

    // Copies out on loan put a floor under the new quantity
    let on_loan = active_loans_for(lib, isbn_old);
    if edit.quantity < on_loan {
        return Err(DomainError::Conflict(format!(
            "{} copies are on loan, quantity cannot drop below that",
            on_loan
        )));
    }

    let book = Book {
        title: edit.title,
        author: edit.author,
        genre: if edit.genre.trim().is_empty() {
            "unspecified".to_string()
        } else {
            edit.genre
        },
        quantity: edit.quantity,
    };

    if edit.isbn != isbn_old {
        lib.books.remove(isbn_old);
    }
    lib.books.insert(edit.isbn.clone(), book.clone());
    tracing::info!("Edited book '{}' ({})", book.title, edit.isbn);
    lib.persist_books()?;
    Ok(book)
}

/// Delete a title. Refused while any copy is out on loan. Returns
/// `Ok(false)` when the ISBN was never registered, so callers can tell
/// "deleted" from "nothing to delete".
pub fn delete_book(lib: &mut Library, isbn: &str) -> Result<bool, DomainError> {
    if active_loans_for(lib, isbn) > 0 {
        return Err(DomainError::Conflict(format!(
            "book '{}' has active loans",
            isbn
        )));
    }

    if lib.books.remove(isbn).is_none() {
        return Ok(false);
    }

    tracing::info!("Deleted book '{}'", isbn);
    lib.persist_books()?;
    Ok(true)
}

/// Case-insensitive substring search over title, author and ISBN.
pub fn search_books(lib: &Library, term: &str) -> Vec<BookSummary> {
    let term = term.to_lowercase();

    lib.books
        .iter()
        .filter(|(isbn, book)| {
            book.title.to_lowercase().contains(&term)
                || book.author.to_lowercase().contains(&term)
                || isbn.to_lowercase().contains(&term)
        })
        .map(|(isbn, book)| BookSummary {
            isbn: isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            quantity: book.quantity,
            available: availability(lib, isbn),
        })
        .collect()
}
