//! Patron Service - Pure business logic without presentation layer

use chrono::Local;

use crate::domain::DomainError;
use crate::library::Library;
use crate::models::{LoanFilter, LoanWithDetails, NewPatron, Patron, PatronEdit};
use crate::services::loan_service;

/// Register a patron under a caller-supplied ID.
pub fn register_patron(lib: &mut Library, new: NewPatron) -> Result<Patron, DomainError> {
    if new.id.trim().is_empty() {
        return Err(DomainError::Validation("patron ID is required".to_string()));
    }
    if new.name.trim().is_empty() {
        return Err(DomainError::Validation("name is required".to_string()));
    }
    if lib.patrons.contains_key(&new.id) {
        return Err(DomainError::Conflict(format!(
            "a patron with ID {} already exists",
            new.id
        )));
    }

    let patron = Patron {
        name: new.name,
        category: new.category,
        registration_date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
        history: Vec::new(),
    };
    lib.patrons.insert(new.id.clone(), patron.clone());
    tracing::info!("Registered patron '{}' ({})", patron.name, new.id);
    lib.persist_patrons()?;
    Ok(patron)
}

/// Edit a patron. A changed ID re-keys the record and cascades to every
/// loan referencing the old ID, so history stays joinable.
pub fn edit_patron(lib: &mut Library, id_old: &str, edit: PatronEdit) -> Result<(), DomainError> {
    if !lib.patrons.contains_key(id_old) {
        return Err(DomainError::NotFound(format!("patron '{}'", id_old)));
    }
    if edit.id.trim().is_empty() {
        return Err(DomainError::Validation("patron ID is required".to_string()));
    }
    if edit.name.trim().is_empty() {
        return Err(DomainError::Validation("name is required".to_string()));
    }
    if edit.id != id_old && lib.patrons.contains_key(&edit.id) {
        return Err(DomainError::Conflict(format!(
            "a patron with ID {} already exists",
            edit.id
        )));
    }

    let renamed = edit.id != id_old;

    let mut patron = lib
        .patrons
        .remove(id_old)
        .ok_or_else(|| DomainError::NotFound(format!("patron '{}'", id_old)))?;
    patron.name = edit.name;
    patron.category = edit.category;
    lib.patrons.insert(edit.id.clone(), patron);

    if renamed {
        for loan in lib.loans.values_mut() {
            if loan.patron_id == id_old {
                loan.patron_id = edit.id.clone();
            }
        }
        tracing::info!("Renamed patron '{}' to '{}'", id_old, edit.id);
        lib.persist_loans()?;
    }

    lib.persist_patrons()?;
    Ok(())
}

/// Delete a patron. Refused while the patron has active loans; the
/// patron's returned loans stay in the Loans store as history.
pub fn delete_patron(lib: &mut Library, id: &str) -> Result<(), DomainError> {
    if !lib.patrons.contains_key(id) {
        return Err(DomainError::NotFound(format!("patron '{}'", id)));
    }
    if loan_service::active_loan_count(lib, id) > 0 {
        return Err(DomainError::Conflict(format!(
            "patron '{}' has active loans",
            id
        )));
    }

    lib.patrons.remove(id);
    tracing::info!("Deleted patron '{}'", id);
    lib.persist_patrons()?;
    Ok(())
}

/// Every loan ever issued to a patron, enriched with book titles.
pub fn patron_history(lib: &Library, id: &str) -> Result<Vec<LoanWithDetails>, DomainError> {
    if !lib.patrons.contains_key(id) {
        return Err(DomainError::NotFound(format!("patron '{}'", id)));
    }

    Ok(loan_service::list_loans(
        lib,
        LoanFilter {
            status: None,
            patron_id: Some(id.to_string()),
        },
    ))
}
