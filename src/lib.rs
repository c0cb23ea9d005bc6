pub mod config;
pub mod domain;
pub mod library;
pub mod models;
pub mod services;
pub mod storage;

pub use domain::DomainError;
pub use library::Library;
