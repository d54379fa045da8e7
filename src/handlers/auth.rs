use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::models::AppState;
use crate::services::{authenticate, persist_users_file};
use crate::templates::LoginTemplate;

use super::helpers::{
    build_template_globals, current_username_from_jar, render_template, session_id_from_jar,
    SESSION_COOKIE,
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_username_from_jar(&state, &jar).is_some() {
        return Redirect::to("/admin").into_response();
    }
    render_template(LoginTemplate {
        globals: build_template_globals(&state, &jar),
        error: None,
    })
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if let Some(uname) = authenticate(&state.users, &form.username, &form.password) {
        if let Err(e) = persist_users_file(&state.users, &state.users_path).await {
            tracing::error!(%e, "Failed to record last login");
        }
        let sid = state.open_session(&uname);
        let mut cookie = Cookie::new(SESSION_COOKIE, sid);
        cookie.set_path("/");
        cookie.set_http_only(true);
        return (jar.add(cookie), Redirect::to("/admin")).into_response();
    }
    tracing::warn!(username = %form.username.trim(), "Failed login attempt");
    render_template(LoginTemplate {
        globals: build_template_globals(&state, &jar),
        error: Some("Usuário ou senha inválidos".into()),
    })
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(sid) = session_id_from_jar(&jar) {
        state.close_session(&sid);
    }
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Redirect::to("/login")).into_response()
}
