//! Error types for list store operations.
//!
//! # Design
//! Both variants are user-correctable and carry the message shown to the
//! user. `NotFound` is separate because callers react differently: a
//! validation failure re-renders the form, a missing entity sends the user
//! back to the list index.

use thiserror::Error;

/// Errors returned by `SessionState` store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Submitted name or text failed validation. Nothing was mutated.
    #[error("{0}")]
    Validation(String),

    /// The referenced list or todo does not exist in this session.
    #[error("{0}")]
    NotFound(String),
}

impl StoreError {
    pub fn message(&self) -> &str {
        match self {
            StoreError::Validation(msg) | StoreError::NotFound(msg) => msg,
        }
    }

    pub(crate) fn list_not_found() -> Self {
        StoreError::NotFound("The requested list was not found".to_string())
    }

    pub(crate) fn todo_not_found() -> Self {
        StoreError::NotFound("The requested todo was not found".to_string())
    }
}
