use locator::api::{record_from_unit, unit_from_record, XanoUnit};
use locator::geo::Position;
use locator::models::UnitType;

#[test]
fn test_empty_record_gets_placeholders() {
    let unit = unit_from_record(XanoUnit::default());
    assert_eq!(unit.name, "Nome não informado");
    assert_eq!(unit.address, "Endereço não informado");
    assert_eq!(unit.phone, "Telefone não informado");
    assert_eq!(unit.email, "Email não informado");
    assert_eq!(unit.position, Position::new(-23.5505, -46.6333));
    assert_eq!(unit.kind, UnitType::Regional);
    assert_eq!(unit.coverage_radius, Some(50.0));
    assert!(unit.state.is_none());
}

#[test]
fn test_backend_json_maps_to_unit() {
    let record: XanoUnit = serde_json::from_str(
        r#"{
            "id": 7,
            "name": "ND Drones - Lavras",
            "email": "lavras@nddrones.com.br",
            "address": "Rua Central, 100 - Lavras, MG",
            "latitude": -21.25,
            "longitude": -45.0,
            "type": "Sede Principal",
            "coverage_radius": 100,
            "show_coverage": true,
            "created_at": 1700000000000
        }"#,
    )
    .unwrap();
    let unit = unit_from_record(record);
    assert_eq!(unit.id, 7);
    assert_eq!(unit.kind, UnitType::Headquarters);
    assert_eq!(unit.state.as_deref(), Some("MG"));
    assert_eq!(unit.city.as_deref(), Some("Lavras"));
    assert!(unit.show_coverage);
    assert!(unit.covered_cities.contains(&"Lavras, MG".to_string()));
}

#[test]
fn test_explicit_zero_radius_is_kept() {
    let record = XanoUnit {
        coverage_radius: Some(0.0),
        ..Default::default()
    };
    let unit = unit_from_record(record);
    assert_eq!(unit.coverage_radius, Some(0.0));
    assert!(unit.covered_cities.is_empty());
}

#[test]
fn test_unit_to_record_splits_position() {
    let mut unit = unit_from_record(XanoUnit {
        name: Some("Unaí".into()),
        latitude: Some(-16.3667),
        longitude: Some(-46.9),
        ..Default::default()
    });
    unit.coverage_radius = None;
    let record = record_from_unit(&unit);
    assert_eq!(record.latitude, Some(-16.3667));
    assert_eq!(record.longitude, Some(-46.9));
    assert_eq!(record.coverage_radius, Some(0.0));
    assert_eq!(record.kind.as_deref(), Some("Unidade Regional"));
    assert_eq!(record.id, None);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], "Unidade Regional");
    assert!(json.get("id").is_none());
}
