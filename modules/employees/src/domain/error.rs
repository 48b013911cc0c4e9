use thiserror::Error;
use uuid::Uuid;

use crate::domain::repo::StoreError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: Uuid },

    #[error("Employee with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn employee_not_found(id: Uuid) -> Self {
        Self::EmployeeNotFound { id }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Map a repository failure into the domain taxonomy.
    ///
    /// `email` is the value being persisted when the store reported a
    /// unique violation; the store constraint is the authoritative
    /// uniqueness check under concurrent writes.
    pub fn from_store(err: StoreError, email: Option<&str>) -> Self {
        match err {
            StoreError::Unavailable(message) => Self::StoreUnavailable { message },
            StoreError::UniqueViolation(_) => Self::DuplicateEmail {
                email: email.unwrap_or_default().to_string(),
            },
            StoreError::Other(e) => Self::Database {
                message: e.to_string(),
            },
        }
    }
}
