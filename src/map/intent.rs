use serde::Deserialize;
use thiserror::Error;

use crate::geo::Position;

use super::control::MapController;

/// A map interaction sent by the browser, e.g.
/// `{"action": "focus_city", "city": "Lavras", "state": "MG"}`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MapIntent {
    FocusUnit { id: i64 },
    FocusState { state: String },
    FocusCity { city: String, state: String },
    ShowAll,
    Filter {
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        city: Option<String>,
    },
    Custom {
        center: Position,
        zoom: u8,
        #[serde(default)]
        unit_ids: Vec<i64>,
    },
}

#[derive(Debug, Error, PartialEq)]
#[error("Unit {0} is not on the map")]
pub struct UnknownUnit(pub i64);

impl MapIntent {
    /// Resolves unit ids against the controller's units and runs the transition.
    pub fn apply(self, controller: &mut MapController) -> Result<(), UnknownUnit> {
        match self {
            MapIntent::FocusUnit { id } => {
                let unit = controller.find_unit(id).cloned().ok_or(UnknownUnit(id))?;
                controller.focus_on_unit(&unit);
            }
            MapIntent::FocusState { state } => controller.focus_on_state(&state),
            MapIntent::FocusCity { city, state } => controller.focus_on_city(&city, &state),
            MapIntent::ShowAll => controller.show_all(),
            MapIntent::Filter { state, city } => {
                controller.filter_by_location(state.as_deref(), city.as_deref())
            }
            MapIntent::Custom {
                center,
                zoom,
                unit_ids,
            } => {
                let units = unit_ids
                    .iter()
                    .map(|id| controller.find_unit(*id).cloned().ok_or(UnknownUnit(*id)))
                    .collect::<Result<Vec<_>, _>>()?;
                controller.custom_focus(center, zoom, units);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_intents() {
        let intent: MapIntent =
            serde_json::from_str(r#"{"action":"focus_city","city":"Lavras","state":"MG"}"#).unwrap();
        assert_eq!(
            intent,
            MapIntent::FocusCity {
                city: "Lavras".into(),
                state: "MG".into()
            }
        );
        let intent: MapIntent = serde_json::from_str(r#"{"action":"filter","state":"MG"}"#).unwrap();
        assert_eq!(
            intent,
            MapIntent::Filter {
                state: Some("MG".into()),
                city: None
            }
        );
        let intent: MapIntent =
            serde_json::from_str(r#"{"action":"custom","center":[-20.0,-45.0],"zoom":9}"#).unwrap();
        assert!(matches!(intent, MapIntent::Custom { zoom: 9, .. }));
    }

    #[test]
    fn unknown_unit_is_reported() {
        let mut controller = MapController::new(Vec::new());
        let before = controller.view().clone();
        assert_eq!(MapIntent::FocusUnit { id: 9 }.apply(&mut controller), Err(UnknownUnit(9)));
        assert_eq!(controller.view(), &before);
    }
}
