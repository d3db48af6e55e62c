//! Server-level errors.
//!
//! User-correctable problems never reach this type; they are turned into
//! flashes and redirects by `ListHandler`. What is left is a page that
//! cannot be drawn, or a listener that fails.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_core::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A page referenced an entity the session no longer holds.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Store(err) => {
                tracing::warn!(error = %err, "page references missing entity");
                StatusCode::NOT_FOUND.into_response()
            }
            ServerError::Template(err) => {
                tracing::error!(error = %err, "failed to render page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ServerError::Io(err) => {
                tracing::error!(error = %err, "io failure");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
