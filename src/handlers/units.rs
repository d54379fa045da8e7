use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{AppState, Role, Unit, UnitDraft, UnitType};
use crate::templates::{AdminUnitsTemplate, UnitFormTemplate, UnitFormValues, UnitRow};
use crate::utils::{parse_flag, parse_optional_f64};

use super::helpers::{build_template_globals, ensure_role, flash, json_error, render_template};

pub async fn api_units_list(State(state): State<AppState>) -> Json<Vec<Unit>> {
    Json(state.units.list())
}

pub async fn api_unit_get(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.units.get(id) {
        Some(unit) => Json(unit).into_response(),
        None => json_error(StatusCode::NOT_FOUND, format!("Unit {} not found", id)),
    }
}

pub async fn admin_index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let globals = build_template_globals(&state, &jar);
    let can_delete = globals
        .current_user
        .as_ref()
        .map_or(false, |u| u.can(Role::Manager));
    let can_configure = globals
        .current_user
        .as_ref()
        .map_or(false, |u| u.can(Role::Admin));
    let mut rows: Vec<UnitRow> = state.units.list().iter().map(UnitRow::from_unit).collect();
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    render_template(AdminUnitsTemplate {
        globals,
        rows,
        can_delete,
        can_configure,
    })
}

/// Raw form fields; numbers arrive as text and are parsed in
/// [`UnitForm::into_draft`].
#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct UnitForm {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub description: String,
    pub photo: String,
    pub latitude: String,
    pub longitude: String,
    pub kind: String,
    pub coverage_radius: String,
    pub show_coverage: Option<String>,
    pub state: String,
    pub city: String,
}

impl UnitForm {
    /// Builds a draft, geocoding city/state when coordinates are blank.
    pub async fn into_draft(self, state: &AppState) -> Result<UnitDraft, String> {
        let mut latitude = parse_optional_f64(Some(self.latitude.as_str()));
        let mut longitude = parse_optional_f64(Some(self.longitude.as_str()));
        if !self.latitude.trim().is_empty() && latitude.is_none() {
            return Err("Latitude inválida".into());
        }
        if !self.longitude.trim().is_empty() && longitude.is_none() {
            return Err("Longitude inválida".into());
        }
        if latitude.is_none() || longitude.is_none() {
            if self.city.trim().is_empty() || self.state.trim().is_empty() {
                return Err("Informe as coordenadas ou a cidade e o estado".into());
            }
            let found = state.geocoder.locate(&self.city, &self.state).await;
            tracing::info!(city = %self.city, state = %self.state, source = ?found.source, "Geocoded unit location");
            latitude = Some(found.position.lat);
            longitude = Some(found.position.lng);
        }
        let coverage_radius = match parse_optional_f64(Some(self.coverage_radius.as_str())) {
            Some(r) => Some(r),
            None if self.coverage_radius.trim().is_empty() => None,
            None => return Err("Raio de cobertura inválido".into()),
        };
        Ok(UnitDraft {
            name: self.name,
            address: self.address,
            phone: self.phone,
            email: self.email,
            website: self.website,
            description: self.description,
            photo: self.photo,
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
            kind: UnitType::parse(&self.kind).unwrap_or_default(),
            coverage_radius,
            show_coverage: parse_flag(self.show_coverage.as_deref(), false),
            state: Some(self.state),
            city: Some(self.city),
        })
    }

    /// True when both coordinates were typed in rather than left blank for
    /// geocoding.
    fn has_coordinates(&self) -> bool {
        parse_optional_f64(Some(self.latitude.as_str())).is_some()
            && parse_optional_f64(Some(self.longitude.as_str())).is_some()
    }

    fn values(&self) -> UnitFormValues {
        UnitFormValues {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            description: self.description.clone(),
            photo: self.photo.clone(),
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            kind: UnitType::parse(&self.kind).unwrap_or_default(),
            coverage_radius: self.coverage_radius.clone(),
            show_coverage: parse_flag(self.show_coverage.as_deref(), false),
            state: self.state.clone(),
            city: self.city.clone(),
        }
    }
}

fn form_page(
    state: &AppState,
    jar: &CookieJar,
    title: &str,
    action: String,
    values: UnitFormValues,
    error: Option<String>,
) -> Response {
    render_template(UnitFormTemplate {
        globals: build_template_globals(state, jar),
        title: title.to_string(),
        action,
        values,
        error,
    })
}

/// Remembers typed-in coordinates for the saved unit's city so later
/// geocoding of that city agrees with the unit.
fn pin_coordinates(state: &AppState, unit: &Unit) {
    let (Some(city), Some(uf)) = (unit.city.as_deref(), unit.state.as_deref()) else {
        return;
    };
    if !city.trim().is_empty() && !uf.trim().is_empty() {
        state.geocoder.add_custom_coordinates(city, uf, unit.position);
    }
}

pub async fn unit_new_get(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Operator) {
        return r;
    }
    form_page(&state, &jar, "Nova unidade", "/admin/units".into(), UnitFormValues::default(), None)
}

pub async fn unit_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<UnitForm>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Operator) {
        return r;
    }
    let values = form.values();
    let typed_coordinates = form.has_coordinates();
    let draft = match form.into_draft(&state).await {
        Ok(d) => d,
        Err(msg) => return form_page(&state, &jar, "Nova unidade", "/admin/units".into(), values, Some(msg)),
    };
    match state.units.add(draft).await {
        Ok(unit) => {
            if typed_coordinates {
                pin_coordinates(&state, &unit);
            }
            flash(&state, &jar, format!("Unidade \"{}\" criada", unit.name));
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            tracing::error!(%e, "Failed to create unit");
            form_page(&state, &jar, "Nova unidade", "/admin/units".into(), values, Some(e.to_string()))
        }
    }
}

pub async fn unit_edit_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Operator) {
        return r;
    }
    let Some(unit) = state.units.get(id) else {
        flash(&state, &jar, format!("Unidade {} não encontrada", id));
        return Redirect::to("/admin").into_response();
    };
    form_page(
        &state,
        &jar,
        "Editar unidade",
        format!("/admin/units/{}", id),
        UnitFormValues::from_draft(&UnitDraft::from_unit(&unit)),
        None,
    )
}

pub async fn unit_update_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<UnitForm>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Operator) {
        return r;
    }
    let action = format!("/admin/units/{}", id);
    let values = form.values();
    let typed_coordinates = form.has_coordinates();
    let draft = match form.into_draft(&state).await {
        Ok(d) => d,
        Err(msg) => return form_page(&state, &jar, "Editar unidade", action, values, Some(msg)),
    };
    match state.units.update(id, draft).await {
        Ok(unit) => {
            if typed_coordinates {
                pin_coordinates(&state, &unit);
            }
            flash(&state, &jar, format!("Unidade \"{}\" atualizada", unit.name));
            Redirect::to("/admin").into_response()
        }
        Err(StoreError::NotFound(_)) => {
            flash(&state, &jar, format!("Unidade {} não encontrada", id));
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            tracing::error!(%e, id, "Failed to update unit");
            form_page(&state, &jar, "Editar unidade", action, values, Some(e.to_string()))
        }
    }
}

pub async fn unit_delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    if let Some(r) = ensure_role(&state, &jar, Role::Manager) {
        return r;
    }
    match state.units.delete(id).await {
        Ok(()) => flash(&state, &jar, format!("Unidade {} excluída", id)),
        Err(e) => {
            tracing::error!(%e, id, "Failed to delete unit");
            flash(&state, &jar, format!("Falha ao excluir unidade {}: {}", id, e));
        }
    }
    Redirect::to("/admin").into_response()
}

/// Reloads units from the backend and drops cached IBGE and geocoding answers.
pub async fn units_refresh_post(State(state): State<AppState>, jar: CookieJar) -> Response {
    state.locations.clear_cache();
    state.geocoder.clear_cache();
    match state.units.refresh().await {
        Ok(count) => flash(&state, &jar, format!("{} unidades carregadas", count)),
        Err(e) => {
            tracing::error!(%e, "Failed to refresh units");
            flash(&state, &jar, format!("Falha ao recarregar unidades: {}", e));
        }
    }
    Redirect::to("/admin").into_response()
}
