//! Display ordering for lists and todos.
//!
//! Both sorts are stable partitions that borrow from stored state; the
//! stored order is never changed.

use crate::types::{List, Todo};

/// Incomplete lists first, then completed lists.
pub fn sort_lists(lists: &[List]) -> Vec<&List> {
    let (done, open): (Vec<&List>, Vec<&List>) = lists.iter().partition(|list| list.is_completed());
    open.into_iter().chain(done).collect()
}

/// Incomplete todos first, then completed todos.
pub fn sort_todos(list: &List) -> Vec<&Todo> {
    let (done, open): (Vec<&Todo>, Vec<&Todo>) = list.todos.iter().partition(|todo| todo.completed);
    open.into_iter().chain(done).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionState;

    #[test]
    fn sort_todos_puts_completed_last_without_mutating() {
        let mut state = SessionState::new();
        state.create_list("L").unwrap();
        state.add_todo(1, "first").unwrap();
        state.add_todo(1, "second").unwrap();
        state.set_todo_status(1, 1, true).unwrap();

        let list = state.get_list(1).unwrap();
        let ids: Vec<_> = sort_todos(list).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let stored: Vec<_> = list.todos.iter().map(|t| t.id).collect();
        assert_eq!(stored, vec![1, 2]);
    }

    #[test]
    fn sort_todos_is_stable_within_partitions() {
        let mut state = SessionState::new();
        state.create_list("L").unwrap();
        for text in ["a", "b", "c", "d"] {
            state.add_todo(1, text).unwrap();
        }
        state.set_todo_status(1, 1, true).unwrap();
        state.set_todo_status(1, 3, true).unwrap();

        let ids: Vec<_> = sort_todos(state.get_list(1).unwrap()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn sort_lists_moves_completed_lists_last() {
        let mut state = SessionState::new();
        for name in ["done", "empty", "open", "also done"] {
            state.create_list(name).unwrap();
        }
        state.add_todo(1, "x").unwrap();
        state.complete_all(1).unwrap();
        state.add_todo(3, "y").unwrap();
        state.add_todo(4, "z").unwrap();
        state.complete_all(4).unwrap();

        let names: Vec<_> = state.list_all().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["empty", "open", "done", "also done"]);
    }
}
