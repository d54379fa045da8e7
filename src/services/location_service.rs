use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::catalog::{cities_in_state, resolve_state};
use crate::geo::{fold, split_city_label, BRAZILIAN_STATES, CITY_CATALOG};
use crate::models::Unit;

use super::cache::TtlCache;

const LOCATION_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const MAX_CITY_RESULTS: usize = 50;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateEntry {
    pub uf: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CityMatch {
    pub name: String,
    pub state: String,
}

#[derive(Deserialize)]
struct IbgeState {
    sigla: String,
    nome: String,
}

#[derive(Deserialize)]
struct IbgeCity {
    nome: String,
}

/// Brazilian states and municipalities from the IBGE localities API,
/// with the embedded lists standing in whenever the API is unreachable.
pub struct LocationService {
    client: reqwest::Client,
    base_url: Option<String>,
    states: Mutex<TtlCache<(), Vec<StateEntry>>>,
    cities: Mutex<TtlCache<String, Vec<String>>>,
}

impl LocationService {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self::build(client, Some(base_url.trim_end_matches('/').to_string()))
    }

    /// Uses only the embedded lists.
    pub fn offline() -> Self {
        Self::build(reqwest::Client::new(), None)
    }

    fn build(client: reqwest::Client, base_url: Option<String>) -> Self {
        LocationService {
            client,
            base_url,
            states: Mutex::new(TtlCache::new(LOCATION_CACHE_TTL)),
            cities: Mutex::new(TtlCache::new(LOCATION_CACHE_TTL)),
        }
    }

    /// All 27 states sorted by name.
    pub async fn states(&self) -> Vec<StateEntry> {
        if let Some(cached) = self.states.lock().unwrap().get(&()) {
            return cached;
        }
        let Some(base) = &self.base_url else {
            return fallback_states();
        };
        let url = format!("{}/estados?orderBy=nome", base);
        match self.fetch::<Vec<IbgeState>>(&url).await {
            Ok(list) if !list.is_empty() => {
                let states: Vec<StateEntry> = list
                    .into_iter()
                    .map(|s| StateEntry { uf: s.sigla, name: s.nome })
                    .collect();
                self.states.lock().unwrap().insert((), states.clone());
                states
            }
            Ok(_) => fallback_states(),
            Err(e) => {
                tracing::warn!(%e, "IBGE states unavailable; using embedded list");
                fallback_states()
            }
        }
    }

    /// Municipality names of a state, sorted. Unknown states yield nothing.
    pub async fn cities(&self, state: &str) -> Vec<String> {
        let Some(info) = resolve_state(state) else {
            return Vec::new();
        };
        let uf = info.uf.to_string();
        if let Some(cached) = self.cities.lock().unwrap().get(&uf) {
            return cached;
        }
        let Some(base) = &self.base_url else {
            return fallback_cities(&uf);
        };
        let url = format!("{}/estados/{}/municipios?orderBy=nome", base, uf);
        match self.fetch::<Vec<IbgeCity>>(&url).await {
            Ok(list) if !list.is_empty() => {
                let names: Vec<String> = list.into_iter().map(|c| c.nome).collect();
                self.cities.lock().unwrap().insert(uf, names.clone());
                names
            }
            Ok(_) => fallback_cities(&uf),
            Err(e) => {
                tracing::warn!(%e, uf, "IBGE cities unavailable; using embedded list");
                fallback_cities(&uf)
            }
        }
    }

    /// Case and accent insensitive substring search over city names.
    pub async fn search_cities(&self, query: &str, state: Option<&str>) -> Vec<CityMatch> {
        let needle = fold(query);
        if needle.is_empty() {
            return Vec::new();
        }
        let candidates: Vec<CityMatch> = match state.and_then(resolve_state) {
            Some(info) => self
                .cities(info.uf)
                .await
                .into_iter()
                .map(|name| CityMatch { name, state: info.uf.to_string() })
                .collect(),
            None => CITY_CATALOG
                .iter()
                .map(|c| CityMatch { name: c.name.to_string(), state: c.state.to_string() })
                .collect(),
        };
        let mut found: Vec<CityMatch> = candidates
            .into_iter()
            .filter(|c| fold(&c.name).contains(&needle))
            .collect();
        found.sort_by_cached_key(|c| (fold(&c.name), c.state.clone()));
        found.truncate(MAX_CITY_RESULTS);
        found
    }

    pub fn is_valid_state(state: &str) -> bool {
        let code = state.trim();
        BRAZILIAN_STATES.iter().any(|s| s.uf.eq_ignore_ascii_case(code))
    }

    pub fn clear_cache(&self) {
        self.states.lock().unwrap().clear();
        self.cities.lock().unwrap().clear();
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

fn fallback_states() -> Vec<StateEntry> {
    let mut states: Vec<StateEntry> = BRAZILIAN_STATES
        .iter()
        .map(|s| StateEntry { uf: s.uf.to_string(), name: s.name.to_string() })
        .collect();
    states.sort_by_cached_key(|s| fold(&s.name));
    states
}

fn fallback_cities(uf: &str) -> Vec<String> {
    let mut names: Vec<String> = cities_in_state(uf).map(|c| c.name.to_string()).collect();
    names.sort_by_cached_key(|n| fold(n));
    names
}

/// States that have at least one unit, sorted.
pub fn states_with_units(units: &[Unit]) -> Vec<String> {
    units
        .iter()
        .filter_map(|u| u.state.as_deref())
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct city names covered by the units of `state`, sorted; feeds the
/// public city dropdown.
pub fn covered_city_options(units: &[Unit], state: &str) -> Vec<String> {
    if state.trim().is_empty() {
        return Vec::new();
    }
    let mut names: Vec<String> = units
        .iter()
        .filter(|u| u.in_state(state))
        .flat_map(|u| u.covered_cities.iter())
        .map(|label| split_city_label(label).0.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    names.sort_by_cached_key(|n| (fold(n), n.clone()));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_lists_come_from_catalog() {
        let service = LocationService::offline();
        let states = service.states().await;
        assert_eq!(states.len(), 27);
        assert_eq!(states[0].uf, "AC");
        let mg = service.cities("Minas Gerais").await;
        assert!(mg.contains(&"Lavras".to_string()));
        assert!(service.cities("XX").await.is_empty());
    }

    #[tokio::test]
    async fn search_is_accent_insensitive_and_bounded() {
        let service = LocationService::offline();
        let hits = service.search_cities("uberlandia", None).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Uberlândia");
        assert!(service.search_cities("   ", None).await.is_empty());
        assert!(service.search_cities("a", None).await.len() <= MAX_CITY_RESULTS);
    }

    #[test]
    fn state_codes() {
        assert!(LocationService::is_valid_state("mg"));
        assert!(!LocationService::is_valid_state("ZZ"));
    }
}
