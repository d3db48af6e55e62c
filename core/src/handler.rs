//! Request handler for the list store.
//!
//! # Design
//! `ListHandler` borrows one session's state for the duration of one
//! request. Each route has a method that runs the store operation, records
//! the outcome in the session's flash slot, and returns a `Reply` shaped by
//! the caller's `InteractionMode`:
//!
//! - validation failures re-render the originating form with the submitted
//!   input and an error flash; nothing is mutated
//! - missing lists or todos flash an error and send the caller to the list
//!   index: a redirect for browsers, a `Location` body for the page script
//! - successes flash a message and redirect, except for the programmatic
//!   delete replies (`Location` for lists, `NoContent` for todos)

use crate::error::StoreError;
use crate::reply::{list_path, lists_path, InteractionMode, Page, Reply};
use crate::types::{Flash, ListId, SessionState, TodoId};

/// Parse an id path segment. Ids start at 1, so a segment that is not a
/// number resolves to 0 and finds nothing.
pub fn parse_id(segment: &str) -> u64 {
    segment.trim().parse().unwrap_or(0)
}

/// Handles one request against one session.
#[derive(Debug)]
pub struct ListHandler<'a> {
    state: &'a mut SessionState,
    mode: InteractionMode,
}

impl<'a> ListHandler<'a> {
    pub fn new(state: &'a mut SessionState, mode: InteractionMode) -> Self {
        Self { state, mode }
    }

    pub fn index(&mut self) -> Reply {
        Reply::Render(Page::Lists)
    }

    pub fn new_list_form(&mut self) -> Reply {
        Reply::Render(Page::NewList {
            list_name: String::new(),
        })
    }

    pub fn create_list(&mut self, list_name: &str) -> Reply {
        match self.state.create_list(list_name) {
            Ok(message) => self.succeed(message, lists_path()),
            Err(err) => self.fail(err, || Page::NewList {
                list_name: list_name.to_string(),
            }),
        }
    }

    pub fn show_list(&mut self, id: ListId) -> Reply {
        match self.state.get_list(id) {
            Ok(_) => Reply::Render(Page::List {
                list_id: id,
                todo_input: String::new(),
            }),
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    pub fn edit_list_form(&mut self, id: ListId) -> Reply {
        match self.state.get_list(id) {
            Ok(list) => Reply::Render(Page::EditList {
                list_id: id,
                list_name: list.name.clone(),
            }),
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    pub fn update_list(&mut self, id: ListId, list_name: &str) -> Reply {
        match self.state.rename_list(id, list_name) {
            Ok(message) => self.succeed(message, list_path(id)),
            Err(err) => self.fail(err, || Page::EditList {
                list_id: id,
                list_name: list_name.to_string(),
            }),
        }
    }

    pub fn delete_list(&mut self, id: ListId) -> Reply {
        match self.state.delete_list(id) {
            Ok(message) => {
                self.state.flash = Some(Flash::success(message));
                match self.mode {
                    InteractionMode::Browser => Reply::Redirect(lists_path()),
                    InteractionMode::Programmatic => Reply::Location(lists_path()),
                }
            }
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    pub fn add_todo(&mut self, list_id: ListId, text: &str) -> Reply {
        match self.state.add_todo(list_id, text) {
            Ok(message) => self.succeed(message, list_path(list_id)),
            Err(err) => self.fail(err, || Page::List {
                list_id,
                todo_input: text.to_string(),
            }),
        }
    }

    pub fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Reply {
        match self.state.delete_todo(list_id, todo_id) {
            Ok(message) => match self.mode {
                InteractionMode::Browser => self.succeed(message, list_path(list_id)),
                InteractionMode::Programmatic => Reply::NoContent,
            },
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    /// `completed` is the raw form value; only `"true"` marks the todo done.
    pub fn update_todo(&mut self, list_id: ListId, todo_id: TodoId, completed: &str) -> Reply {
        let completed = completed == "true";
        match self.state.set_todo_status(list_id, todo_id, completed) {
            Ok(message) => self.succeed(message, list_path(list_id)),
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    pub fn complete_all(&mut self, list_id: ListId) -> Reply {
        match self.state.complete_all(list_id) {
            Ok(message) => self.succeed(message, list_path(list_id)),
            Err(err) => self.fail(err, || Page::Lists),
        }
    }

    fn succeed(&mut self, message: String, location: String) -> Reply {
        self.state.flash = Some(Flash::success(message));
        Reply::Redirect(location)
    }

    fn fail(&mut self, err: StoreError, form: impl FnOnce() -> Page) -> Reply {
        match (err, self.mode) {
            (StoreError::NotFound(message), mode) => {
                self.state.flash = Some(Flash::error(message));
                match mode {
                    InteractionMode::Browser => Reply::Redirect(lists_path()),
                    InteractionMode::Programmatic => Reply::Location(lists_path()),
                }
            }
            (StoreError::Validation(message), _) => {
                self.state.flash = Some(Flash::error(message));
                Reply::Render(form())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlashKind;

    fn browser(state: &mut SessionState) -> ListHandler<'_> {
        ListHandler::new(state, InteractionMode::Browser)
    }

    fn programmatic(state: &mut SessionState) -> ListHandler<'_> {
        ListHandler::new(state, InteractionMode::Programmatic)
    }

    fn seeded() -> SessionState {
        let mut state = SessionState::new();
        state.create_list("Groceries").unwrap();
        state.add_todo(1, "Milk").unwrap();
        state.add_todo(1, "Eggs").unwrap();
        state
    }

    #[test]
    fn parse_id_falls_back_to_zero() {
        assert_eq!(parse_id("7"), 7);
        assert_eq!(parse_id("abc"), 0);
        assert_eq!(parse_id("-1"), 0);
        assert_eq!(parse_id(""), 0);
    }

    #[test]
    fn create_list_redirects_with_success_flash() {
        let mut state = SessionState::new();
        let reply = browser(&mut state).create_list("Groceries");
        assert_eq!(reply, Reply::redirect("/lists"));
        let flash = state.take_flash().unwrap();
        assert_eq!(flash.kind, FlashKind::Success);
        assert_eq!(flash.message, "The list Groceries has been created.");
        assert!(state.take_flash().is_none());
    }

    #[test]
    fn create_list_invalid_rerenders_form_with_input() {
        let mut state = SessionState::new();
        let long = "x".repeat(101);
        let reply = browser(&mut state).create_list(&long);
        assert_eq!(reply, Reply::Render(Page::NewList { list_name: long }));
        assert_eq!(state.flash.as_ref().unwrap().kind, FlashKind::Error);
        assert!(state.lists.is_empty());
    }

    #[test]
    fn show_missing_list_redirects_to_index() {
        let mut state = SessionState::new();
        let reply = browser(&mut state).show_list(3);
        assert_eq!(reply, Reply::redirect("/lists"));
        let flash = state.take_flash().unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.message, "The requested list was not found");
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut state = seeded();
        let reply = browser(&mut state).edit_list_form(1);
        assert_eq!(
            reply,
            Reply::Render(Page::EditList {
                list_id: 1,
                list_name: "Groceries".to_string()
            })
        );
    }

    #[test]
    fn update_list_duplicate_rerenders_edit_form() {
        let mut state = seeded();
        state.create_list("Hardware").unwrap();
        let reply = browser(&mut state).update_list(2, "Groceries");
        assert_eq!(
            reply,
            Reply::Render(Page::EditList {
                list_id: 2,
                list_name: "Groceries".to_string()
            })
        );
        assert_eq!(state.flash.unwrap().message, "The list Groceries already exists.");
    }

    #[test]
    fn update_list_redirects_to_list() {
        let mut state = seeded();
        assert_eq!(browser(&mut state).update_list(1, "Food"), Reply::redirect("/lists/1"));
    }

    #[test]
    fn delete_list_modes() {
        let mut state = seeded();
        state.create_list("Other").unwrap();
        assert_eq!(browser(&mut state).delete_list(1), Reply::redirect("/lists"));
        assert_eq!(
            programmatic(&mut state).delete_list(2),
            Reply::Location("/lists".to_string())
        );
        assert_eq!(state.flash.unwrap().message, "The list has been deleted.");
        assert!(state.lists.is_empty());
    }

    #[test]
    fn add_todo_invalid_rerenders_list_page() {
        let mut state = seeded();
        let reply = browser(&mut state).add_todo(1, "");
        assert_eq!(
            reply,
            Reply::Render(Page::List {
                list_id: 1,
                todo_input: String::new()
            })
        );
        assert_eq!(state.lists[0].todos.len(), 2);
    }

    #[test]
    fn delete_todo_browser_flashes_and_redirects() {
        let mut state = seeded();
        let reply = browser(&mut state).delete_todo(1, 1);
        assert_eq!(reply, Reply::redirect("/lists/1"));
        assert_eq!(state.take_flash().unwrap().message, "The todo has been deleted");
    }

    #[test]
    fn delete_todo_programmatic_is_no_content() {
        let mut state = seeded();
        let reply = programmatic(&mut state).delete_todo(1, 2);
        assert_eq!(reply, Reply::NoContent);
        assert!(state.flash.is_none());
        assert_eq!(state.lists[0].todos.len(), 1);
    }

    #[test]
    fn programmatic_not_found_sends_script_to_index() {
        let mut state = seeded();
        assert_eq!(
            programmatic(&mut state).delete_todo(1, 99),
            Reply::Location("/lists".to_string())
        );
        assert_eq!(
            state.take_flash().unwrap(),
            Flash::error("The requested todo was not found")
        );

        assert_eq!(
            programmatic(&mut state).delete_list(99),
            Reply::Location("/lists".to_string())
        );
        let flash = state.take_flash().unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.message, "The requested list was not found");
        assert_eq!(state.lists.len(), 1);
    }

    #[test]
    fn update_todo_only_true_completes() {
        let mut state = seeded();
        browser(&mut state).update_todo(1, 1, "true");
        assert!(state.lists[0].todos[0].completed);
        browser(&mut state).update_todo(1, 1, "yes");
        assert!(!state.lists[0].todos[0].completed);
        assert_eq!(
            state.take_flash().unwrap().message,
            "Milk has been successfully updated."
        );
    }

    #[test]
    fn complete_all_flashes_list_name() {
        let mut state = seeded();
        assert_eq!(browser(&mut state).complete_all(1), Reply::redirect("/lists/1"));
        assert_eq!(state.take_flash().unwrap().message, "Groceries has been completed.");
        assert!(state.lists[0].is_completed());
    }
}
