//! List store operations on a session's state.
//!
//! # Design
//! Every mutating operation validates and resolves ids before touching
//! state, so an `Err` always leaves the session exactly as it was. On
//! success the operation returns the status message for the user; choosing
//! how to deliver it (flash, redirect, status code) is the handler's job.
//!
//! Submitted names are trimmed before validation and storage. Lengths are
//! counted in characters, not bytes.

use crate::error::StoreError;
use crate::sort;
use crate::types::{List, ListId, SessionState, Todo, TodoId};

/// Shortest accepted list name or todo text, in characters.
pub const MIN_NAME_CHARS: usize = 1;
/// Longest accepted list name or todo text, in characters.
pub const MAX_NAME_CHARS: usize = 100;

impl SessionState {
    /// All lists, incomplete ones first.
    pub fn list_all(&self) -> Vec<&List> {
        sort::sort_lists(&self.lists)
    }

    pub fn get_list(&self, id: ListId) -> Result<&List, StoreError> {
        self.lists
            .iter()
            .find(|list| list.id == id)
            .ok_or_else(StoreError::list_not_found)
    }

    fn get_list_mut(&mut self, id: ListId) -> Result<&mut List, StoreError> {
        self.lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or_else(StoreError::list_not_found)
    }

    pub fn create_list(&mut self, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        self.validate_list_name(name, None)?;

        let id = self.next_list_id;
        self.next_list_id += 1;
        self.lists.push(List::new(id, name.to_string()));
        Ok(format!("The list {name} has been created."))
    }

    /// Rename a list. The list's own current name does not count as a
    /// duplicate, so renaming to the same name succeeds.
    pub fn rename_list(&mut self, id: ListId, new_name: &str) -> Result<String, StoreError> {
        self.get_list(id)?;
        let new_name = new_name.trim();
        self.validate_list_name(new_name, Some(id))?;

        self.get_list_mut(id)?.name = new_name.to_string();
        Ok("The list has been successfully changed.".to_string())
    }

    pub fn delete_list(&mut self, id: ListId) -> Result<String, StoreError> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id == id)
            .ok_or_else(StoreError::list_not_found)?;
        self.lists.remove(index);
        Ok("The list has been deleted.".to_string())
    }

    pub fn add_todo(&mut self, list_id: ListId, text: &str) -> Result<String, StoreError> {
        let list = self.get_list_mut(list_id)?;
        let text = text.trim();
        if !name_length_ok(text) {
            return Err(StoreError::Validation(format!(
                "Todo must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters."
            )));
        }

        let id = list.next_todo_id;
        list.next_todo_id += 1;
        list.todos.push(Todo {
            id,
            name: text.to_string(),
            completed: false,
        });
        Ok("The todo was added to your list.".to_string())
    }

    pub fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<String, StoreError> {
        let list = self.get_list_mut(list_id)?;
        let index = list
            .todos
            .iter()
            .position(|todo| todo.id == todo_id)
            .ok_or_else(StoreError::todo_not_found)?;
        list.todos.remove(index);
        Ok("The todo has been deleted".to_string())
    }

    pub fn set_todo_status(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> Result<String, StoreError> {
        let list = self.get_list_mut(list_id)?;
        let todo = list
            .todos
            .iter_mut()
            .find(|todo| todo.id == todo_id)
            .ok_or_else(StoreError::todo_not_found)?;
        todo.completed = completed;
        Ok(format!("{} has been successfully updated.", todo.name))
    }

    pub fn complete_all(&mut self, list_id: ListId) -> Result<String, StoreError> {
        let list = self.get_list_mut(list_id)?;
        for todo in &mut list.todos {
            todo.completed = true;
        }
        Ok(format!("{} has been completed.", list.name))
    }

    /// `except` names a list whose current name is ignored by the duplicate
    /// check (the list being renamed).
    fn validate_list_name(&self, name: &str, except: Option<ListId>) -> Result<(), StoreError> {
        if !name_length_ok(name) {
            return Err(StoreError::Validation(format!(
                "List name must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters."
            )));
        }
        let taken = self
            .lists
            .iter()
            .any(|list| Some(list.id) != except && list.name == name);
        if taken {
            return Err(StoreError::Validation(format!("The list {name} already exists.")));
        }
        Ok(())
    }
}

fn name_length_ok(name: &str) -> bool {
    (MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&name.chars().count())
}
