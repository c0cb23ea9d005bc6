pub mod book;
pub mod loan;
pub mod patron;

pub use book::{Book, BookEdit, BookSummary, NewBook};
pub use loan::{Loan, LoanFilter, LoanStatus, LoanWithDetails};
pub use patron::{NewPatron, Patron, PatronCategory, PatronEdit};
