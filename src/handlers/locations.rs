use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::geo::{covered_cities, Position};
use crate::models::AppState;
use crate::services::{covered_city_options, LocationService};

use super::helpers::json_error;

pub async fn api_states(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.locations.states().await)
}

pub async fn api_state_cities(State(state): State<AppState>, Path(uf): Path<String>) -> Response {
    if !LocationService::is_valid_state(&uf) {
        return json_error(StatusCode::NOT_FOUND, format!("Unknown state '{}'", uf));
    }
    Json(state.locations.cities(&uf).await).into_response()
}

#[derive(Deserialize)]
pub struct CitySearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub state: Option<String>,
}

pub async fn api_city_search(
    State(state): State<AppState>,
    Query(query): Query<CitySearchQuery>,
) -> impl IntoResponse {
    let state_filter = query.state.as_deref().filter(|s| !s.trim().is_empty());
    Json(state.locations.search_cities(&query.q, state_filter).await)
}

#[derive(Deserialize)]
pub struct CoveredCitiesQuery {
    #[serde(default)]
    pub state: String,
}

pub async fn api_covered_cities(
    State(state): State<AppState>,
    Query(query): Query<CoveredCitiesQuery>,
) -> impl IntoResponse {
    Json(covered_city_options(&state.units.list(), &query.state))
}

#[derive(Deserialize)]
pub struct CoverageQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub radius: Option<f64>,
}

pub async fn api_coverage(Query(query): Query<CoverageQuery>) -> Response {
    let center = Position::new(query.lat, query.lng);
    if !center.is_valid() {
        return json_error(StatusCode::BAD_REQUEST, "lat must be in [-90, 90] and lng in [-180, 180]");
    }
    let cities = covered_cities(center, query.radius);
    Json(json!({ "count": cities.len(), "cities": cities })).into_response()
}

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub city: String,
    pub state: String,
}

pub async fn api_geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Response {
    if query.city.trim().is_empty() || query.state.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "city and state are required");
    }
    Json(state.geocoder.locate(&query.city, &query.state).await).into_response()
}
