//! Domain types held in a user's session.
//!
//! # Design
//! Every type is plain owned data with serde derives so a whole session can
//! be cloned out of the registry, mutated by one request, and written back.
//! Id counters live next to the collection they number: the session owns
//! `next_list_id`, each list owns `next_todo_id`. Deleting an entity never
//! rewinds a counter, so ids are never recycled.

use serde::{Deserialize, Serialize};

/// Identifier of a list, unique within one session.
pub type ListId = u64;

/// Identifier of a todo, unique within its parent list.
pub type TodoId = u64;

/// A single item on a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

/// A named, ordered collection of todos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub todos: Vec<Todo>,
    #[serde(default = "first_id")]
    pub(crate) next_todo_id: TodoId,
}

impl List {
    pub(crate) fn new(id: ListId, name: String) -> Self {
        Self {
            id,
            name,
            todos: Vec::new(),
            next_todo_id: first_id(),
        }
    }

    /// A list is completed when it has at least one todo and none are open.
    pub fn is_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.completed)
    }

    pub fn todos_count(&self) -> usize {
        self.todos.len()
    }

    /// Number of todos not yet completed.
    pub fn todos_remaining_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }
}

/// Whether a flash message reports success or a user-correctable error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot status message shown on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Everything a single session owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub lists: Vec<List>,
    #[serde(default)]
    pub flash: Option<Flash>,
    #[serde(default = "first_id")]
    pub(crate) next_list_id: ListId,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            lists: Vec::new(),
            flash: None,
            next_list_id: first_id(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and clear the pending flash message.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

fn first_id() -> u64 {
    1
}
