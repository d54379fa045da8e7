use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::models::{AppState, Customization, DatabaseSettings, MapType, Role};
use crate::templates::SettingsTemplate;
use crate::utils::{parse_flag, parse_optional_int};

use super::helpers::{build_template_globals, ensure_role, flash, render_template};

pub async fn settings_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Admin) {
        return r;
    }
    render_template(SettingsTemplate {
        globals: build_template_globals(&state, &jar),
        error: None,
    })
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SettingsForm {
    pub logo: String,
    pub home_title: String,
    pub home_subtitle: String,
    pub search_placeholder: String,
    pub search_button: String,
    pub select_state_label: String,
    pub select_city_label: String,
    pub whatsapp_number: String,
    pub whatsapp_message: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub map_type: String,
    pub show_coverage_circles: Option<String>,
    pub session_timeout_minutes: String,
    pub db_host: String,
    pub db_port: String,
    pub db_database: String,
    pub db_user: String,
    pub db_password: String,
    pub db_ssl: Option<String>,
}

impl SettingsForm {
    fn database(&self) -> DatabaseSettings {
        DatabaseSettings {
            host: self.db_host.trim().to_string(),
            port: parse_optional_int(Some(self.db_port.as_str()))
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(0),
            database: self.db_database.trim().to_string(),
            user: self.db_user.trim().to_string(),
            password: self.db_password.clone(),
            ssl: parse_flag(self.db_ssl.as_deref(), false),
        }
    }

    /// Applies the form over `current`. A blank DB password keeps the
    /// stored one.
    fn apply(self, current: &Customization) -> Result<Customization, String> {
        let timeout = parse_optional_int(Some(self.session_timeout_minutes.as_str()))
            .filter(|m| (1..=24 * 60).contains(m))
            .ok_or("Tempo de sessão deve estar entre 1 e 1440 minutos")?;
        let map_type = MapType::parse(&self.map_type).ok_or("Tipo de mapa inválido")?;
        let mut database = self.database();
        if database.password.is_empty() {
            database.password = current.database.password.clone();
        }
        Ok(Customization {
            logo: self.logo.trim().to_string(),
            home_title: self.home_title.trim().to_string(),
            home_subtitle: self.home_subtitle.trim().to_string(),
            search_placeholder: self.search_placeholder.trim().to_string(),
            search_button: self.search_button.trim().to_string(),
            select_state_label: self.select_state_label.trim().to_string(),
            select_city_label: self.select_city_label.trim().to_string(),
            whatsapp_number: self.whatsapp_number.trim().to_string(),
            whatsapp_message: self.whatsapp_message.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            map_type,
            show_coverage_circles: parse_flag(self.show_coverage_circles.as_deref(), false),
            session_timeout_minutes: timeout as u32,
            database,
        })
    }
}

pub async fn settings_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SettingsForm>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Admin) {
        return r;
    }
    let settings = match form.apply(&state.settings.get()) {
        Ok(s) => s,
        Err(msg) => {
            return render_template(SettingsTemplate {
                globals: build_template_globals(&state, &jar),
                error: Some(msg),
            })
        }
    };
    match state.settings.save(settings).await {
        Ok(()) => flash(&state, &jar, "Configurações salvas"),
        Err(e) => {
            tracing::error!(%e, "Failed to save settings");
            flash(&state, &jar, format!("Falha ao salvar configurações: {}", e));
        }
    }
    Redirect::to("/admin/settings").into_response()
}

/// Validates the submitted database settings without connecting.
pub async fn settings_test_database(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SettingsForm>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Admin) {
        return r;
    }
    let message = match form.database().test_connection() {
        Ok(msg) | Err(msg) => msg,
    };
    flash(&state, &jar, message);
    Redirect::to("/admin/settings").into_response()
}
