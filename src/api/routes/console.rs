//! Console Routes
//!
//! Browser-facing pages. `GET /` renders whatever the caller's session
//! selects; every POST turns into a console `Action` and answers with a
//! redirect back to `/`.
//!
//! - GET /
//! - POST /login, /logout, /dashboard
//! - POST /types/:type_key, /types/:type_key/new
//! - POST /entries/new, /entries/:id/edit, /entries/:id/delete
//! - POST /editor/save, /editor/cancel

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;

use crate::api::dto::LoginForm;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::console::{self, Action, EditorSubmission};
use crate::session::{Session, SessionHandle, SessionId};

/// GET /
///
/// Render the current view and consume pending notices. A caller without a
/// live session gets the login page and no session is created.
pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let handle = match cookie_value(&headers, &state.config.cookie_name) {
        Some(id) => state.sessions.get(&id).await,
        None => None,
    };

    let html = match handle {
        Some(handle) => {
            let mut session = handle.lock().await;
            let notices = session.take_notices();
            console::render(&session, &notices)
        }
        None => console::render(&Session::new(), &[]),
    };

    Html(html)
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    dispatch(&state, &headers, form.into()).await
}

/// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::Logout).await
}

/// POST /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::ShowDashboard).await
}

/// POST /types/:type_key
pub async fn open_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(type_key): Path<String>,
) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::OpenList { type_key }).await
}

/// POST /types/:type_key/new
pub async fn new_for_type(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(type_key): Path<String>,
) -> ApiResult<Response> {
    let action = Action::NewEntry {
        type_key: Some(type_key),
    };
    dispatch(&state, &headers, action).await
}

/// POST /entries/new
pub async fn new_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::NewEntry { type_key: None }).await
}

/// POST /entries/:id/edit
pub async fn edit_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::EditEntry { id }).await
}

/// POST /entries/:id/delete
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::DeleteEntry { id }).await
}

/// POST /editor/save
///
/// The body is kept as raw pairs because custom-field control names depend
/// on the entry being edited.
pub async fn save_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let submission = EditorSubmission::from_pairs(pairs);
    dispatch(&state, &headers, Action::SaveEntry(submission)).await
}

/// POST /editor/cancel
pub async fn cancel(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    dispatch(&state, &headers, Action::Cancel).await
}

/// Apply an action to the caller's session and redirect to the page view
async fn dispatch(state: &AppState, headers: &HeaderMap, action: Action) -> ApiResult<Response> {
    let ctx = resolve_session(state, headers).await?;

    {
        let mut session = ctx.handle.lock().await;
        console::apply(&mut session, &state.client, action).await;
    }

    Ok(ctx.finish(state, Redirect::to("/").into_response()))
}

struct SessionContext {
    id: SessionId,
    handle: SessionHandle,
    created: bool,
}

impl SessionContext {
    /// Attach the session cookie when the session is new
    fn finish(&self, state: &AppState, mut response: Response) -> Response {
        if !self.created {
            return response;
        }

        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            state.config.cookie_name, self.id
        );
        if state.config.secure_cookie {
            cookie.push_str("; Secure");
        }

        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Invalid session cookie header"),
        }
        response
    }
}

async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
    let cookie = cookie_value(headers, &state.config.cookie_name);
    let (id, handle, created) = state.sessions.resolve(cookie.as_deref()).await?;
    Ok(SessionContext {
        id,
        handle,
        created,
    })
}

/// Find a cookie by name across all `Cookie` headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
