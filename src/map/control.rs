use serde::Serialize;

use crate::geo::{fit_bounds, Position, ViewportFit};
use crate::models::Unit;

use super::presets::state_view;

/// Zoom used when a single unit is in focus.
pub const UNIT_FOCUS_ZOOM: u8 = 14;
/// Lowest zoom allowed when focusing a city with matching units.
pub const CITY_MIN_ZOOM: u8 = 12;
/// Zoom used when a city search widens to the whole state.
pub const STATE_FALLBACK_ZOOM: u8 = 10;

/// What the map currently shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewState {
    pub center: Position,
    pub zoom: u8,
    pub filtered_resellers: Vec<Unit>,
}

impl MapViewState {
    fn framed(fit: ViewportFit, units: Vec<Unit>) -> Self {
        MapViewState {
            center: fit.center,
            zoom: fit.zoom,
            filtered_resellers: units,
        }
    }
}

/// Turns user intents into [`MapViewState`] transitions.
///
/// Every transition is synchronous and replaces the held state wholesale;
/// intents that find nothing either leave the state alone or widen the
/// search, they never fail.
#[derive(Clone, Debug)]
pub struct MapController {
    units: Vec<Unit>,
    view: MapViewState,
}

impl MapController {
    pub fn new(units: Vec<Unit>) -> Self {
        let view = MapViewState::framed(ViewportFit::default(), units.clone());
        MapController { units, view }
    }

    pub fn view(&self) -> &MapViewState {
        &self.view
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn find_unit(&self, id: i64) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Replaces the known units. The filtered set resets to the full list;
    /// center and zoom are kept.
    pub fn set_units(&mut self, units: Vec<Unit>) {
        self.view.filtered_resellers = units.clone();
        self.units = units;
    }

    pub fn focus_on_unit(&mut self, unit: &Unit) {
        self.view = MapViewState {
            center: unit.position,
            zoom: UNIT_FOCUS_ZOOM,
            filtered_resellers: vec![unit.clone()],
        };
    }

    pub fn focus_on_state(&mut self, state: &str) {
        let matches = self.matching(Some(state), None);
        if let Some(preset) = state_view(state) {
            self.view = MapViewState::framed(preset, matches);
        } else if !matches.is_empty() {
            let fit = fit_bounds(&positions(&matches));
            self.view = MapViewState::framed(fit, matches);
        } else {
            tracing::debug!(state, "no preset and no units; map view unchanged");
        }
    }

    pub fn focus_on_city(&mut self, city: &str, state: &str) {
        let matches = self.matching(Some(state), Some(city));
        if !matches.is_empty() {
            let fit = fit_bounds(&positions(&matches));
            self.view = MapViewState {
                center: fit.center,
                zoom: fit.zoom.max(CITY_MIN_ZOOM),
                filtered_resellers: matches,
            };
            return;
        }
        // Never show an empty map for a city search: widen to the state.
        let in_state = self.matching(Some(state), None);
        if in_state.is_empty() {
            tracing::debug!(city, state, "no units in city or state; map view unchanged");
            return;
        }
        let fit = fit_bounds(&positions(&in_state));
        self.view = MapViewState {
            center: fit.center,
            zoom: STATE_FALLBACK_ZOOM,
            filtered_resellers: in_state,
        };
    }

    pub fn show_all(&mut self) {
        let fit = fit_bounds(&positions(&self.units));
        self.view = MapViewState::framed(fit, self.units.clone());
    }

    pub fn filter_by_location(&mut self, state: Option<&str>, city: Option<&str>) {
        let matches = self.matching(state, city);
        if matches.is_empty() {
            self.view.filtered_resellers.clear();
            return;
        }
        let fit = fit_bounds(&positions(&matches));
        let zoom = if matches.len() == 1 { UNIT_FOCUS_ZOOM } else { fit.zoom };
        self.view = MapViewState {
            center: fit.center,
            zoom,
            filtered_resellers: matches,
        };
    }

    pub fn custom_focus(&mut self, center: Position, zoom: u8, units: Vec<Unit>) {
        self.view = MapViewState {
            center,
            zoom,
            filtered_resellers: units,
        };
    }

    /// Units passing the given predicates; blank predicates are ignored.
    fn matching(&self, state: Option<&str>, city: Option<&str>) -> Vec<Unit> {
        let state = state.map(str::trim).filter(|s| !s.is_empty());
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        self.units
            .iter()
            .filter(|u| state.map_or(true, |s| u.in_state(s)))
            .filter(|u| city.map_or(true, |c| u.serves_city(c, state)))
            .cloned()
            .collect()
    }
}

fn positions(units: &[Unit]) -> Vec<Position> {
    units.iter().map(|u| u.position).collect()
}
