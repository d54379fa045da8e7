//! Wire records stored in XANO and their mapping to the domain model.
use serde::{Deserialize, Serialize};

use crate::geo::catalog::resolve_state;
use crate::geo::Position;
use crate::models::{Unit, UnitDraft, UnitType, DEFAULT_COVERAGE_RADIUS_KM};

/// Fallback position for records without coordinates (São Paulo).
pub const FALLBACK_POSITION: Position = Position::new(-23.5505, -46.6333);

pub const MISSING_NAME: &str = "Nome não informado";
pub const MISSING_ADDRESS: &str = "Endereço não informado";
pub const MISSING_PHONE: &str = "Telefone não informado";
pub const MISSING_EMAIL: &str = "Email não informado";

/// A unit as the backend stores it under `/user`. Absent fields are left out
/// of request bodies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XanoUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_coverage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl XanoUnit {
    /// Number of fields that would be sent in a request body.
    pub fn field_count(&self) -> usize {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(|o| o.len()))
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XanoCity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XanoSetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A city known to the backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CityRecord {
    pub name: String,
    pub state: String,
    pub position: Position,
    pub population: Option<u64>,
}

impl From<XanoCity> for CityRecord {
    fn from(c: XanoCity) -> Self {
        CityRecord {
            name: c.name,
            state: c.state,
            position: Position::new(c.latitude, c.longitude),
            population: c.population,
        }
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Guesses `(state, city)` from a free-form address such as
/// "Lavras, MG" or "Rua A, 10 - Centro, Lavras - Minas Gerais".
pub fn location_from_address(address: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = address
        .split(|c| c == ',' || c == '-')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let found = parts
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, p)| resolve_state(p).map(|s| (i, s.uf.to_string())));
    match found {
        Some((i, uf)) => {
            let city = if i > 0 { parts.get(i - 1) } else { None };
            (Some(uf), city.map(|c| c.to_string()))
        }
        None => (None, parts.first().map(|c| c.to_string())),
    }
}

/// Maps a backend record onto a [`Unit`]; never fails, placeholder values
/// stand in for anything missing.
pub fn unit_from_record(record: XanoUnit) -> Unit {
    let address = filled(record.address);
    let (parsed_state, parsed_city) = address
        .as_deref()
        .map(location_from_address)
        .unwrap_or((None, None));
    let mut unit = Unit {
        id: record.id.unwrap_or(0),
        name: filled(record.name).unwrap_or_else(|| MISSING_NAME.to_string()),
        address: address.unwrap_or_else(|| MISSING_ADDRESS.to_string()),
        phone: filled(record.phone).unwrap_or_else(|| MISSING_PHONE.to_string()),
        email: filled(record.email).unwrap_or_else(|| MISSING_EMAIL.to_string()),
        website: record.website.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        photo: record.photo_url.unwrap_or_default(),
        position: Position::new(
            record.latitude.unwrap_or(FALLBACK_POSITION.lat),
            record.longitude.unwrap_or(FALLBACK_POSITION.lng),
        ),
        kind: record
            .kind
            .as_deref()
            .and_then(UnitType::parse)
            .unwrap_or_default(),
        coverage_radius: Some(record.coverage_radius.unwrap_or(DEFAULT_COVERAGE_RADIUS_KM)),
        show_coverage: record.show_coverage.unwrap_or(false),
        state: filled(record.state).or(parsed_state).map(|s| s.to_uppercase()),
        city: filled(record.city).or(parsed_city),
        covered_cities: Vec::new(),
    };
    unit.refresh_coverage();
    unit
}

/// Full record for a unit; absent radius is sent as 0.
pub fn record_from_unit(unit: &Unit) -> XanoUnit {
    XanoUnit {
        id: None,
        name: Some(unit.name.clone()),
        email: Some(unit.email.clone()),
        address: Some(unit.address.clone()),
        phone: Some(unit.phone.clone()),
        latitude: Some(unit.position.lat),
        longitude: Some(unit.position.lng),
        kind: Some(unit.kind.as_str().to_string()),
        website: Some(unit.website.clone()),
        description: Some(unit.description.clone()),
        photo_url: Some(unit.photo.clone()),
        coverage_radius: Some(unit.coverage_radius.unwrap_or(0.0)),
        show_coverage: Some(unit.show_coverage),
        state: Some(unit.state.clone().unwrap_or_default()),
        city: Some(unit.city.clone().unwrap_or_default()),
    }
}

/// Record carrying only the fields a draft actually sets.
pub fn record_from_draft(draft: &UnitDraft) -> XanoUnit {
    XanoUnit {
        id: None,
        name: filled(Some(draft.name.clone())),
        email: filled(Some(draft.email.clone())),
        address: filled(Some(draft.address.clone())),
        phone: filled(Some(draft.phone.clone())),
        latitude: Some(draft.latitude),
        longitude: Some(draft.longitude),
        kind: Some(draft.kind.as_str().to_string()),
        website: filled(Some(draft.website.clone())),
        description: filled(Some(draft.description.clone())),
        photo_url: filled(Some(draft.photo.clone())),
        coverage_radius: draft.coverage_radius,
        show_coverage: Some(draft.show_coverage),
        state: filled(draft.state.clone()).map(|s| s.to_uppercase()),
        city: filled(draft.city.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parsing() {
        assert_eq!(
            location_from_address("Lavras, MG"),
            (Some("MG".into()), Some("Lavras".into()))
        );
        assert_eq!(
            location_from_address("Rua A, 10 - Centro, Vitória - Espírito Santo"),
            (Some("ES".into()), Some("Vitória".into()))
        );
        assert_eq!(location_from_address("Somewhere"), (None, Some("Somewhere".into())));
    }

    #[test]
    fn draft_record_omits_blank_fields() {
        let draft = UnitDraft {
            name: "X".into(),
            email: "x@example.com".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(record_from_draft(&draft)).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("name"));
        assert!(!obj.contains_key("phone"));
        assert!(!obj.contains_key("coverage_radius"));
        assert_eq!(obj["type"], "Unidade Regional");
    }
}
