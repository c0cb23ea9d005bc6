//! Service layer - business logic shared by every presentation surface

pub mod inventory_service;
pub mod loan_service;
pub mod patron_service;
pub mod report_service;
