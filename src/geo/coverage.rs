use super::catalog::{fold, CityReference, CITY_CATALOG};
use super::distance::{distance_km, Position};

/// Display label for a catalog city, e.g. "Lavras, MG".
pub fn format_city_label(city: &CityReference) -> String {
    format!("{}, {}", city.name, city.state)
}

/// Cities of `catalog` within `radius_km` of `center`, as sorted labels.
///
/// An absent, zero, negative or NaN radius covers nothing. Labels sort
/// alphabetically ignoring case and accents, ties broken by the raw label.
pub fn covered_cities_in(
    catalog: &[CityReference],
    center: Position,
    radius_km: Option<f64>,
) -> Vec<String> {
    let radius = match radius_km {
        Some(r) if r > 0.0 => r,
        _ => return Vec::new(),
    };
    let mut labels: Vec<String> = catalog
        .iter()
        .filter(|c| distance_km(center, c.position) <= radius)
        .map(format_city_label)
        .collect();
    labels.sort_by_cached_key(|l| (fold(l), l.clone()));
    labels
}

/// Covered cities against the embedded catalog.
pub fn covered_cities(center: Position, radius_km: Option<f64>) -> Vec<String> {
    covered_cities_in(CITY_CATALOG, center, radius_km)
}

/// Splits a "Name, UF" label back into its parts.
pub fn split_city_label(label: &str) -> (&str, Option<&str>) {
    match label.rsplit_once(", ") {
        Some((name, state)) => (name, Some(state)),
        None => (label, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CityReference> {
        vec![
            CityReference { name: "Zeta", state: "MG", position: Position::new(-21.0, -45.0) },
            CityReference { name: "Ávila", state: "MG", position: Position::new(-21.01, -45.0) },
            CityReference { name: "Far", state: "SP", position: Position::new(-10.0, -30.0) },
        ]
    }

    #[test]
    fn sorts_ignoring_accents() {
        let got = covered_cities_in(&sample(), Position::new(-21.0, -45.0), Some(50.0));
        assert_eq!(got, vec!["Ávila, MG".to_string(), "Zeta, MG".to_string()]);
    }

    #[test]
    fn nan_radius_covers_nothing() {
        assert!(covered_cities_in(&sample(), Position::new(-21.0, -45.0), Some(f64::NAN)).is_empty());
    }

    #[test]
    fn split_label() {
        assert_eq!(split_city_label("Juiz de Fora, MG"), ("Juiz de Fora", Some("MG")));
        assert_eq!(split_city_label("Somewhere"), ("Somewhere", None));
    }
}
