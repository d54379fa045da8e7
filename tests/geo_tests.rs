use std::collections::BTreeSet;

use locator::geo::{
    covered_cities, distance_km, fit_bounds, fold, Position, ViewportFit, BRAZILIAN_STATES,
    CITY_CATALOG, DEFAULT_CENTER, DEFAULT_ZOOM,
};

#[test]
fn test_distance_is_symmetric_and_zero_on_self() {
    let lavras = Position::new(-21.25, -45.0);
    let bh = Position::new(-19.9191, -43.9386);
    assert_eq!(distance_km(lavras, lavras), 0.0);
    let there = distance_km(lavras, bh);
    let back = distance_km(bh, lavras);
    assert!((there - back).abs() < 1e-9);
    assert!(there > 170.0 && there < 200.0, "got {}", there);
}

#[test]
fn test_unit_at_lavras_covers_lavras() {
    let cities = covered_cities(Position::new(-21.25, -45.0), Some(100.0));
    assert!(cities.contains(&"Lavras, MG".to_string()));
    assert!(cities.contains(&"Varginha, MG".to_string()));
    assert!(!cities.contains(&"Belo Horizonte, MG".to_string()));
}

#[test]
fn test_missing_or_non_positive_radius_covers_nothing() {
    let center = Position::new(-21.25, -45.0);
    assert!(covered_cities(center, None).is_empty());
    assert!(covered_cities(center, Some(0.0)).is_empty());
    assert!(covered_cities(center, Some(-10.0)).is_empty());
}

#[test]
fn test_covered_cities_are_sorted_and_unique() {
    let cities = covered_cities(Position::new(-20.9467, -49.2958), Some(200.0));
    assert!(!cities.is_empty());
    let mut keys: Vec<String> = cities.iter().map(|c| fold(c)).collect();
    let sorted = {
        let mut k = keys.clone();
        k.sort();
        k
    };
    assert_eq!(keys, sorted);
    keys.dedup();
    assert_eq!(keys.len(), cities.len());
}

#[test]
fn test_fit_bounds_two_distant_units_zooms_out() {
    let fit = fit_bounds(&[
        Position::new(-20.9467, -49.2958),
        Position::new(-20.6500, -41.9167),
    ]);
    assert_eq!(fit.zoom, 6);
    assert!((fit.center.lng - (-45.60625)).abs() < 1e-9);
}

#[test]
fn test_fit_bounds_single_point_and_empty() {
    let p = Position::new(-18.9113, -48.2622);
    assert_eq!(fit_bounds(&[p]), ViewportFit { center: p, zoom: 12 });
    assert_eq!(fit_bounds(&[]), ViewportFit { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM });
}

#[test]
fn test_fit_bounds_ignores_order() {
    let a = Position::new(-21.25, -45.0);
    let b = Position::new(-18.5833, -46.5167);
    let c = Position::new(-16.3667, -46.9);
    assert_eq!(fit_bounds(&[a, b, c]), fit_bounds(&[c, a, b, b]));
}

#[test]
fn test_catalog_covers_every_state_code() {
    assert_eq!(BRAZILIAN_STATES.len(), 27);
    for city in CITY_CATALOG {
        assert!(
            BRAZILIAN_STATES.iter().any(|s| s.uf == city.state),
            "{} has unknown state {}",
            city.name,
            city.state
        );
        assert!(city.position.is_valid());
    }
}

#[test]
fn test_coverage_matches_direct_distance_filter_over_catalog() {
    let mut centers = vec![
        Position::new(-21.25, -45.0),
        Position::new(-23.5505, -46.6333),
        Position::new(-3.119, -60.0217),
        Position::new(-15.7939, -47.8828),
    ];
    centers.extend(CITY_CATALOG.iter().step_by(7).map(|c| c.position));
    for center in centers {
        for radius in [0.5, 25.0, 100.0, 350.0, 1200.0] {
            let covered: BTreeSet<String> =
                covered_cities(center, Some(radius)).into_iter().collect();
            for city in CITY_CATALOG {
                let label = format!("{}, {}", city.name, city.state);
                let inside = distance_km(center, city.position) <= radius;
                assert_eq!(
                    covered.contains(&label),
                    inside,
                    "{} from ({}, {}) at {} km",
                    label,
                    center.lat,
                    center.lng,
                    radius
                );
            }
        }
    }
}
