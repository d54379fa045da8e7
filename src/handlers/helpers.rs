use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use crate::models::{AppState, CurrentUser, Customization, Role};
use crate::services::random_session_id;

pub const SESSION_COOKIE: &str = "session_id";
pub const MAP_COOKIE: &str = "map_id";

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn current_username_from_jar(state: &AppState, jar: &CookieJar) -> Option<String> {
    let sid = session_id_from_jar(jar)?;
    state.session_user(&sid)
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<String> {
    let Some(sid) = session_id_from_jar(jar) else {
        return vec![];
    };
    let mut fs = state.flash_store.lock().unwrap();
    fs.remove(&sid).unwrap_or_default()
}

pub fn flash(state: &AppState, jar: &CookieJar, message: impl Into<String>) {
    if let Some(sid) = session_id_from_jar(jar) {
        state.push_flash(&sid, message);
    }
}

pub fn build_current_user(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    let username = current_username_from_jar(state, jar)?;
    let users = state.users.lock().unwrap();
    let rec = users.get(&username).filter(|r| r.active)?;
    Some(CurrentUser {
        username: username.clone(),
        name: rec.name.clone(),
        role: rec.role,
    })
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub backend_label: String,
    pub base_url: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub custom: Customization,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let current_user = build_current_user(state, jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        backend_label: state.units.backend().describe(),
        base_url: state.public_base_url.clone(),
        flash_messages,
        has_flash_messages,
        custom: state.settings.get(),
    }
}

/// Redirects to `/login` when nobody is logged in and back to `/admin` with a
/// flash message when the user's role is below `required`.
pub fn ensure_role(state: &AppState, jar: &CookieJar, required: Role) -> Option<Response> {
    let Some(user) = build_current_user(state, jar) else {
        return Some(Redirect::to("/login").into_response());
    };
    if user.can(required) {
        return None;
    }
    tracing::warn!(username = %user.username, required = required.as_str(), "Permission denied");
    flash(state, jar, format!("Permissão insuficiente: requer perfil {}", required.as_str()));
    Some(Redirect::to("/admin").into_response())
}

/// Returns the visitor's map session id, adding the cookie when it is new.
pub fn ensure_map_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(existing) = jar.get(MAP_COOKIE).map(|c| c.value().to_string()) {
        return (jar, existing);
    }
    let id = random_session_id();
    let mut cookie = Cookie::new(MAP_COOKIE, id.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    (jar.add(cookie), id)
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Serializes a value for embedding inside a `<script>` element.
pub fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}
