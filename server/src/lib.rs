//! HTTP front end for the session-backed todo list manager.
//!
//! Routes parse path ids and form fields, check the caller's session out of
//! the `SessionStore`, run the matching `ListHandler` method, and turn the
//! returned `Reply` into an axum response.

pub mod config;
pub mod error;
pub mod session;
pub mod views;

use std::{convert::Infallible, sync::Arc, time::Instant};

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use todo_core::{parse_id, InteractionMode, ListHandler, Reply, SessionState};
use tokio::net::TcpListener;

pub use config::Config;
pub use error::ServerError;
pub use session::{SessionStore, SESSION_COOKIE};
pub use views::Views;

const APPLICATION_JS: &str = include_str!("../assets/application.js");

/// Header value the page script sends on asynchronous requests.
const XHR_MARKER: &str = "XMLHttpRequest";

#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
    views: Arc<Views>,
}

#[derive(Deserialize)]
pub struct ListForm {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

#[derive(Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub completed: String,
}

/// The caller's `InteractionMode`, read from `X-Requested-With`.
#[derive(Debug, Clone, Copy)]
pub struct Mode(pub InteractionMode);

impl<S: Send + Sync> FromRequestParts<S> for Mode {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Mode(interaction_mode(&parts.headers)))
    }
}

pub fn interaction_mode(headers: &HeaderMap) -> InteractionMode {
    match headers.get("x-requested-with") {
        Some(value) if value.as_bytes().eq_ignore_ascii_case(XHR_MARKER.as_bytes()) => {
            InteractionMode::Programmatic
        }
        _ => InteractionMode::Browser,
    }
}

pub fn app() -> Result<Router, ServerError> {
    app_with(SessionStore::new())
}

/// Build the router around an existing session registry.
pub fn app_with(sessions: SessionStore) -> Result<Router, ServerError> {
    let state = AppState {
        sessions,
        views: Arc::new(Views::new()?),
    };
    let router = Router::new()
        .route("/", get(root))
        .route("/lists", get(index).post(create_list))
        .route("/lists/new", get(new_list_form))
        .route("/lists/{id}", get(show_list).post(update_list))
        .route("/lists/{id}/edit", get(edit_list_form))
        .route("/lists/{id}/delete", post(delete_list))
        .route("/lists/{id}/complete_all", post(complete_all))
        .route("/lists/{id}/todos", post(add_todo))
        .route("/lists/{id}/todos/{todo_id}", post(update_todo))
        .route("/lists/{id}/todos/{todo_id}/", post(update_todo))
        .route("/lists/{id}/todos/{todo_id}/delete", post(delete_todo))
        .route("/javascripts/application.js", get(application_js))
        .layer(middleware::from_fn(log_request))
        .with_state(state);
    Ok(router)
}

pub async fn run(listener: TcpListener, sessions: SessionStore) -> Result<(), ServerError> {
    axum::serve(listener, app_with(sessions)?)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Lock the caller's session, run `op`, build the response, and release the
/// session. The session stays locked for the whole request.
async fn dispatch<F>(app: &AppState, headers: &HeaderMap, mode: InteractionMode, op: F) -> Response
where
    F: FnOnce(&mut ListHandler<'_>) -> Reply,
{
    let mut checkout = app.sessions.load(session::session_id(headers)).await;
    let (id, fresh) = (checkout.id, checkout.fresh);

    let reply = op(&mut ListHandler::new(checkout.state(), mode));
    tracing::debug!(session = %id, ?mode, ?reply, "handled");

    let mut response = respond(&app.views, reply, checkout.state());
    let stored = app.sessions.save(checkout).await;

    if fresh && stored {
        if let Ok(cookie) = HeaderValue::from_str(&session::session_cookie(id)) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}

fn respond(views: &Views, reply: Reply, state: &mut SessionState) -> Response {
    match reply {
        Reply::Redirect(location) => Redirect::to(&location).into_response(),
        Reply::Render(page) => {
            let flash = state.take_flash();
            match views.render(&page, state, flash) {
                Ok(html) => Html(html).into_response(),
                Err(err) => err.into_response(),
            }
        }
        Reply::Location(path) => (StatusCode::OK, path).into_response(),
        Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn root() -> Redirect {
    Redirect::to("/lists")
}

async fn application_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APPLICATION_JS,
    )
}

async fn index(State(app): State<AppState>, headers: HeaderMap, Mode(mode): Mode) -> Response {
    dispatch(&app, &headers, mode, |h| h.index()).await
}

async fn new_list_form(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
) -> Response {
    dispatch(&app, &headers, mode, |h| h.new_list_form()).await
}

async fn create_list(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Form(form): Form<ListForm>,
) -> Response {
    dispatch(&app, &headers, mode, |h| h.create_list(&form.list_name)).await
}

async fn show_list(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(id): Path<String>,
) -> Response {
    let id = parse_id(&id);
    dispatch(&app, &headers, mode, |h| h.show_list(id)).await
}

async fn edit_list_form(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(id): Path<String>,
) -> Response {
    let id = parse_id(&id);
    dispatch(&app, &headers, mode, |h| h.edit_list_form(id)).await
}

async fn update_list(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(id): Path<String>,
    Form(form): Form<ListForm>,
) -> Response {
    let id = parse_id(&id);
    dispatch(&app, &headers, mode, |h| h.update_list(id, &form.list_name)).await
}

async fn delete_list(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(id): Path<String>,
) -> Response {
    let id = parse_id(&id);
    dispatch(&app, &headers, mode, |h| h.delete_list(id)).await
}

async fn complete_all(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(id): Path<String>,
) -> Response {
    let id = parse_id(&id);
    dispatch(&app, &headers, mode, |h| h.complete_all(id)).await
}

async fn add_todo(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path(list_id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Response {
    let list_id = parse_id(&list_id);
    dispatch(&app, &headers, mode, |h| h.add_todo(list_id, &form.todo)).await
}

async fn update_todo(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path((list_id, todo_id)): Path<(String, String)>,
    Form(form): Form<StatusForm>,
) -> Response {
    let (list_id, todo_id) = (parse_id(&list_id), parse_id(&todo_id));
    dispatch(&app, &headers, mode, |h| {
        h.update_todo(list_id, todo_id, &form.completed)
    })
    .await
}

async fn delete_todo(
    State(app): State<AppState>,
    headers: HeaderMap,
    Mode(mode): Mode,
    Path((list_id, todo_id)): Path<(String, String)>,
) -> Response {
    let (list_id, todo_id) = (parse_id(&list_id), parse_id(&todo_id));
    dispatch(&app, &headers, mode, |h| h.delete_todo(list_id, todo_id)).await
}
