//! Request and reply descriptions for the host-does-IO pattern.
//!
//! # Design
//! The handler never sees HTTP types. The server translates the transport's
//! request into an `InteractionMode` plus parameters, and translates the
//! returned `Reply` back into a response. Keeping both sides as plain data
//! lets the handler be tested without a router or a runtime.

use crate::types::ListId;

/// How the caller expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// A plain form submission; answer with redirects and rendered pages.
    #[default]
    Browser,
    /// An asynchronous request from the page script; answer with bare
    /// status codes and bodies.
    Programmatic,
}

/// A page the rendering layer knows how to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Lists,
    NewList {
        /// Previously submitted input, echoed back into the form.
        list_name: String,
    },
    List {
        list_id: ListId,
        todo_input: String,
    },
    EditList {
        list_id: ListId,
        list_name: String,
    },
}

/// What the server should send back, described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Redirect the browser to `location`.
    Redirect(String),
    /// Render `page` with a 200 status.
    Render(Page),
    /// 200 whose text body is a path the script should navigate to.
    Location(String),
    /// 204 with no body.
    NoContent,
}

impl Reply {
    pub fn redirect(location: impl Into<String>) -> Self {
        Reply::Redirect(location.into())
    }
}

/// Path of the list index.
pub fn lists_path() -> String {
    "/lists".to_string()
}

/// Path of a single list page.
pub fn list_path(id: ListId) -> String {
    format!("/lists/{id}")
}
