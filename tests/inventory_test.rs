use tempfile::TempDir;

use libraria::models::{BookEdit, NewBook, NewPatron, PatronCategory};
use libraria::services::{inventory_service, loan_service, patron_service};
use libraria::storage::RecordStore;
use libraria::{DomainError, Library};

fn test_library() -> (TempDir, Library) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library = Library::open(RecordStore::new(dir.path()));
    (dir, library)
}

fn new_book(isbn: &str, title: &str, quantity: u32) -> NewBook {
    NewBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: "Author".to_string(),
        genre: "Fiction".to_string(),
        quantity,
    }
}

fn add_patron(lib: &mut Library, id: &str) {
    patron_service::register_patron(
        lib,
        NewPatron {
            id: id.to_string(),
            name: "Ana".to_string(),
            category: PatronCategory::Student,
        },
    )
    .expect("Failed to register patron");
}

#[test]
fn availability_is_quantity_minus_active_loans() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(&mut lib, new_book("111", "Dune", 3)).unwrap();
    add_patron(&mut lib, "p1");
    add_patron(&mut lib, "p2");

    assert_eq!(inventory_service::availability(&lib, "111"), 3);

    loan_service::issue_loan(&mut lib, "p1", "111", 7).unwrap();
    loan_service::issue_loan(&mut lib, "p2", "111", 7).unwrap();
    assert_eq!(inventory_service::availability(&lib, "111"), 1);

    loan_service::return_loan(&mut lib, "LN0001").unwrap();
    assert_eq!(inventory_service::availability(&lib, "111"), 2);

    // Unknown ISBN counts as zero copies, not an error
    assert_eq!(inventory_service::availability(&lib, "999"), 0);
}

#[test]
fn restock_merges_by_isbn_keeping_first_registration() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(&mut lib, new_book("111", "Dune", 3)).unwrap();

    let merged = inventory_service::register_or_restock(
        &mut lib,
        NewBook {
            isbn: "111".to_string(),
            title: "A Different Title".to_string(),
            author: "Somebody Else".to_string(),
            genre: "Romance".to_string(),
            quantity: 4,
        },
    )
    .unwrap();

    assert_eq!(merged.quantity, 7);
    assert_eq!(merged.title, "Dune");
    assert_eq!(merged.author, "Author");
    assert_eq!(merged.genre, "Fiction");
}

#[test]
fn registration_requires_isbn_and_title() {
    let (_dir, mut lib) = test_library();

    let err = inventory_service::register_or_restock(&mut lib, new_book("", "Dune", 1)).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = inventory_service::register_or_restock(&mut lib, new_book("111", "  ", 1)).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(lib.books.is_empty());
}

#[test]
fn blank_genre_defaults_to_unspecified() {
    let (_dir, mut lib) = test_library();
    let book = inventory_service::register_or_restock(
        &mut lib,
        NewBook {
            isbn: "111".to_string(),
            title: "Dune".to_string(),
            author: "Author".to_string(),
            genre: "".to_string(),
            quantity: 1,
        },
    )
    .unwrap();

    assert_eq!(book.genre, "unspecified");
}

#[test]
fn edit_rekeys_and_rejects_duplicate_isbn() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(&mut lib, new_book("111", "Dune", 2)).unwrap();
    inventory_service::register_or_restock(&mut lib, new_book("222", "Emma", 1)).unwrap();

    let err = inventory_service::edit_book(
        &mut lib,
        "111",
        BookEdit {
            isbn: "222".to_string(),
            title: "Dune".to_string(),
            author: "Author".to_string(),
            genre: "Fiction".to_string(),
            quantity: 2,
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    inventory_service::edit_book(
        &mut lib,
        "111",
        BookEdit {
            isbn: "333".to_string(),
            title: "Dune (2nd ed.)".to_string(),
            author: "Author".to_string(),
            genre: "Fiction".to_string(),
            quantity: 5,
        },
    )
    .unwrap();

    assert!(!lib.books.contains_key("111"));
    assert_eq!(lib.books["333"].title, "Dune (2nd ed.)");
    assert_eq!(lib.books["333"].quantity, 5);

    let err = inventory_service::edit_book(
        &mut lib,
        "999",
        BookEdit {
            isbn: "999".to_string(),
            title: "Ghost".to_string(),
            author: "".to_string(),
            genre: "".to_string(),
            quantity: 1,
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[test]
fn edit_cannot_drop_quantity_below_copies_on_loan() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(&mut lib, new_book("111", "Dune", 2)).unwrap();
    add_patron(&mut lib, "p1");
    loan_service::issue_loan(&mut lib, "p1", "111", 7).unwrap();

    let err = inventory_service::edit_book(
        &mut lib,
        "111",
        BookEdit {
            isbn: "111".to_string(),
            title: "Dune".to_string(),
            author: "Author".to_string(),
            genre: "Fiction".to_string(),
            quantity: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(lib.books["111"].quantity, 2);
}

#[test]
fn delete_refused_while_on_loan() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(&mut lib, new_book("111", "Dune", 1)).unwrap();
    add_patron(&mut lib, "p1");
    loan_service::issue_loan(&mut lib, "p1", "111", 7).unwrap();

    let err = inventory_service::delete_book(&mut lib, "111").unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert!(lib.books.contains_key("111"));

    loan_service::return_loan(&mut lib, "LN0001").unwrap();
    assert_eq!(inventory_service::delete_book(&mut lib, "111").unwrap(), true);
    assert!(!lib.books.contains_key("111"));

    // Never-registered ISBN is a signalled no-op, not an error
    assert_eq!(inventory_service::delete_book(&mut lib, "999").unwrap(), false);
}

#[test]
fn search_matches_title_author_and_isbn() {
    let (_dir, mut lib) = test_library();
    inventory_service::register_or_restock(
        &mut lib,
        NewBook {
            isbn: "111".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            quantity: 2,
        },
    )
    .unwrap();
    inventory_service::register_or_restock(
        &mut lib,
        NewBook {
            isbn: "222".to_string(),
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            genre: "Romance".to_string(),
            quantity: 1,
        },
    )
    .unwrap();

    let hits = inventory_service::search_books(&lib, "dune");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].isbn, "111");
    assert_eq!(hits[0].available, 2);

    assert_eq!(inventory_service::search_books(&lib, "austen").len(), 1);
    assert_eq!(inventory_service::search_books(&lib, "11").len(), 1);
    assert_eq!(inventory_service::search_books(&lib, "").len(), 2);
    assert!(inventory_service::search_books(&lib, "tolkien").is_empty());
}
