use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::catalog::find_city;
use crate::geo::{fold, Position};

use super::cache::TtlCache;

const GEOCODE_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Returned when a city cannot be located (centre of Brasília).
pub const GEOCODE_FALLBACK: Position = Position::new(-15.7939, -47.8828);

/// Where a geocoding answer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodeSource {
    Catalog,
    Cache,
    Nominatim,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub position: Position,
    pub source: GeocodeSource,
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// City + state to coordinates: embedded catalog, then cache, then Nominatim.
pub struct GeocodingService {
    client: reqwest::Client,
    base_url: Option<String>,
    cache: Mutex<TtlCache<String, Position>>,
}

impl GeocodingService {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self::build(client, Some(base_url.trim_end_matches('/').to_string()))
    }

    /// Never leaves the process; unknown cities resolve to the fallback.
    pub fn offline() -> Self {
        Self::build(reqwest::Client::new(), None)
    }

    fn build(client: reqwest::Client, base_url: Option<String>) -> Self {
        GeocodingService {
            client,
            base_url,
            cache: Mutex::new(TtlCache::new(GEOCODE_CACHE_TTL)),
        }
    }

    pub async fn locate(&self, city: &str, state: &str) -> GeocodeResult {
        if let Some(c) = find_city(city, state) {
            return GeocodeResult { position: c.position, source: GeocodeSource::Catalog };
        }
        let key = cache_key(city, state);
        if let Some(position) = self.cache.lock().unwrap().get(&key) {
            return GeocodeResult { position, source: GeocodeSource::Cache };
        }
        if let Some(base) = &self.base_url {
            match self.query_nominatim(base, city, state).await {
                Ok(Some(position)) => {
                    self.cache.lock().unwrap().insert(key, position);
                    return GeocodeResult { position, source: GeocodeSource::Nominatim };
                }
                Ok(None) => tracing::info!(city, state, "Nominatim found no match"),
                Err(e) => tracing::warn!(%e, city, state, "Nominatim lookup failed"),
            }
        }
        GeocodeResult { position: GEOCODE_FALLBACK, source: GeocodeSource::Fallback }
    }

    /// Pins coordinates for a city that the catalog does not know.
    pub fn add_custom_coordinates(&self, city: &str, state: &str, position: Position) {
        self.cache.lock().unwrap().insert(cache_key(city, state), position);
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    async fn query_nominatim(
        &self,
        base: &str,
        city: &str,
        state: &str,
    ) -> Result<Option<Position>, reqwest::Error> {
        let query = format!("{}, {}, Brazil", city.trim(), state.trim());
        let url = format!(
            "{}/search?format=json&q={}&limit=1&countrycodes=br",
            base,
            urlencoding::encode(&query)
        );
        let places: Vec<NominatimPlace> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(places.first().and_then(|p| {
            let lat = p.lat.parse::<f64>().ok()?;
            let lng = p.lon.parse::<f64>().ok()?;
            Some(Position::new(lat, lng)).filter(Position::is_valid)
        }))
    }
}

fn cache_key(city: &str, state: &str) -> String {
    format!("{}-{}", fold(city), state.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn catalog_then_custom_then_fallback() {
        let geo = GeocodingService::offline();
        let lavras = geo.locate("lavras", "mg").await;
        assert_eq!(lavras.source, GeocodeSource::Catalog);
        assert_eq!(lavras.position, Position::new(-21.25, -45.0));

        let unknown = geo.locate("Cidade Inventada", "MG").await;
        assert_eq!(unknown.source, GeocodeSource::Fallback);
        assert_eq!(unknown.position, GEOCODE_FALLBACK);

        geo.add_custom_coordinates("Cidade Inventada", "MG", Position::new(-20.0, -44.0));
        let pinned = geo.locate("cidade inventada", "mg").await;
        assert_eq!(pinned.source, GeocodeSource::Cache);
    }
}
