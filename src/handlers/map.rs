use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::map::{MapController, MapIntent, MapViewState};
use crate::models::{AppState, Unit};
use crate::services::{covered_city_options, states_with_units};
use crate::templates::{MapTemplate, Notice};

use super::helpers::{build_template_globals, ensure_map_id, json_error, render_template, script_json};

#[derive(Deserialize, Default)]
pub struct LocationQuery {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl LocationQuery {
    fn state(&self) -> Option<&str> {
        self.state.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

fn with_visitor_map<R>(
    state: &AppState,
    map_id: &str,
    f: impl FnOnce(&mut MapController) -> R,
) -> R {
    let units = &state.units;
    state
        .map_sessions
        .with_controller(map_id, units.revision(), || units.list(), f)
}

/// Public map page. `?state=` focuses a state, `?state=&city=` checks
/// coverage for a city.
pub async fn index_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LocationQuery>,
) -> Response {
    let (jar, map_id) = ensure_map_id(jar);
    let all_units = state.units.list();
    let selected_state = query.state().map(str::to_uppercase);
    let selected_city = query.city().map(str::to_string);

    let mut notice = None;
    let view = with_visitor_map(&state, &map_id, |c| {
        match (selected_state.as_deref(), selected_city.as_deref()) {
            (Some(uf), Some(city)) => {
                let covering = covering_units(&all_units, uf, city);
                notice = Some(coverage_notice(city, &covering));
                if !covering.is_empty() {
                    c.filter_by_location(Some(uf), Some(city));
                }
            }
            (Some(uf), None) => c.focus_on_state(uf),
            (None, _) => {}
        }
        c.view().clone()
    });

    let custom = state.settings.get();
    let map_config = json!({
        "view": view,
        "showCoverage": custom.show_coverage_circles,
        "mapType": custom.map_type.as_str(),
    });
    let cities = selected_state
        .as_deref()
        .map(|uf| covered_city_options(&all_units, uf))
        .unwrap_or_default();

    let page = MapTemplate {
        globals: build_template_globals(&state, &jar),
        states: states_with_units(&all_units),
        selected_state: selected_state.unwrap_or_default(),
        cities,
        selected_city: selected_city.unwrap_or_default(),
        total_units: all_units.len(),
        units: view.filtered_resellers,
        notice,
        map_config_json: script_json(&map_config),
    };
    (jar, render_template(page)).into_response()
}

fn covering_units<'a>(units: &'a [Unit], state: &str, city: &str) -> Vec<&'a Unit> {
    units
        .iter()
        .filter(|u| u.in_state(state) && u.serves_city(city, Some(state)))
        .collect()
}

fn coverage_notice(city: &str, covering: &[&Unit]) -> Notice {
    match covering {
        [] => Notice::warning(format!(
            "SEM COBERTURA: Não há unidades que atendem a cidade {}.",
            city
        )),
        [one] => Notice::success(format!(
            "COBERTURA CONFIRMADA: A cidade {} é atendida pela unidade {}.",
            city, one.name
        )),
        many => Notice::success(format!(
            "MÚLTIPLAS OPÇÕES: A cidade {} é atendida por {} unidades: {}.",
            city,
            many.len(),
            many.iter().map(|u| u.name.as_str()).collect::<Vec<_>>().join(", ")
        )),
    }
}

pub async fn api_map_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, map_id) = ensure_map_id(jar);
    let view: MapViewState = with_visitor_map(&state, &map_id, |c| c.view().clone());
    (jar, Json(view))
}

pub async fn api_map_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(intent): Json<MapIntent>,
) -> Response {
    let (jar, map_id) = ensure_map_id(jar);
    tracing::debug!(?intent, map_id = %map_id, "Map intent");
    let outcome = with_visitor_map(&state, &map_id, |c| {
        intent.apply(c).map(|_| c.view().clone())
    });
    match outcome {
        Ok(view) => (jar, Json(view)).into_response(),
        Err(e) => (jar, json_error(StatusCode::NOT_FOUND, e.to_string())).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::demo_units;

    #[test]
    fn notice_wording_depends_on_match_count() {
        let units = demo_units();
        let covering = covering_units(&units, "MG", "Lavras");
        assert!(!covering.is_empty());
        let none = coverage_notice("Manaus", &[]);
        assert_eq!(none.level, "warning");
        let one = coverage_notice("Lavras", &covering[..1]);
        assert!(one.text.starts_with("COBERTURA CONFIRMADA"));
    }
}
