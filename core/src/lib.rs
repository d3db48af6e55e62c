//! Session-scoped list store for the todo service.
//!
//! # Overview
//! Holds a user's lists and todos as plain data inside a `SessionState`,
//! validates submitted names, and turns each request into a `Reply` without
//! touching the network (host-does-IO pattern). The server crate owns
//! sessions, routing and rendering; this crate is deterministic and
//! testable on its own.
//!
//! # Design
//! - `SessionState` is passed in explicitly per request; there is no global
//!   store.
//! - Store operations (`create_list`, `add_todo`, ...) live on
//!   `SessionState` and return the user-facing message or a `StoreError`.
//! - `ListHandler` wraps those operations with flash handling and picks the
//!   reply for the caller's `InteractionMode`.
//! - Ids come from per-collection counters and are never recycled.

pub mod error;
pub mod handler;
pub mod reply;
pub mod sort;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use handler::{parse_id, ListHandler};
pub use reply::{list_path, lists_path, InteractionMode, Page, Reply};
pub use sort::{sort_lists, sort_todos};
pub use store::{MAX_NAME_CHARS, MIN_NAME_CHARS};
pub use types::{Flash, FlashKind, List, ListId, SessionState, Todo, TodoId};
