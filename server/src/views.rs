//! HTML rendering for `Page` replies.
//!
//! Templates are compiled into the binary and rendered with minijinja,
//! which auto-escapes user-supplied names in `.html` templates.

use minijinja::{context, Environment};
use serde::Serialize;
use todo_core::{sort_todos, Flash, List, Page, SessionState, Todo};

use crate::error::ServerError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("lists.html", include_str!("../templates/lists.html")),
    ("new_list.html", include_str!("../templates/new_list.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("edit_list.html", include_str!("../templates/edit_list.html")),
];

/// A list as the templates see it, with derived counts and todos in
/// display order.
#[derive(Debug, Serialize)]
struct ListView<'a> {
    id: u64,
    name: &'a str,
    completed: bool,
    todos_count: usize,
    todos_remaining_count: usize,
    todos: Vec<&'a Todo>,
}

impl<'a> From<&'a List> for ListView<'a> {
    fn from(list: &'a List) -> Self {
        Self {
            id: list.id,
            name: &list.name,
            completed: list.is_completed(),
            todos_count: list.todos_count(),
            todos_remaining_count: list.todos_remaining_count(),
            todos: sort_todos(list),
        }
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, ServerError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render `page` from `state`. The flash has already been taken out of
    /// the session by the caller.
    pub fn render(
        &self,
        page: &Page,
        state: &SessionState,
        flash: Option<Flash>,
    ) -> Result<String, ServerError> {
        let html = match page {
            Page::Lists => {
                let lists: Vec<ListView<'_>> =
                    state.list_all().into_iter().map(ListView::from).collect();
                self.env
                    .get_template("lists.html")?
                    .render(context! { flash, lists })?
            }
            Page::NewList { list_name } => self
                .env
                .get_template("new_list.html")?
                .render(context! { flash, list_name })?,
            Page::List {
                list_id,
                todo_input,
            } => {
                let list = ListView::from(state.get_list(*list_id)?);
                self.env
                    .get_template("list.html")?
                    .render(context! { flash, list, todo_input })?
            }
            Page::EditList { list_id, list_name } => {
                let list = ListView::from(state.get_list(*list_id)?);
                self.env
                    .get_template("edit_list.html")?
                    .render(context! { flash, list, list_name })?
            }
        };
        Ok(html)
    }
}
