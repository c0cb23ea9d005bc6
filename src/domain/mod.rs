//! Domain layer - Pure business abstractions
//!
//! No storage or presentation dependencies; only error types shared by
//! every service.

pub mod errors;

pub use errors::DomainError;
