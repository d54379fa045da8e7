use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{record_from_draft, unit_from_record, XanoClient};
use crate::error::{ApiError, StoreError};
use crate::models::{Unit, UnitDraft, UnitType, DEFAULT_COVERAGE_RADIUS_KM};
use crate::utils::hostname_from_url;

use super::file_store::write_file_atomic;

/// Where unit records live.
pub enum UnitBackend {
    Remote(XanoClient),
    Local(PathBuf),
}

impl UnitBackend {
    pub fn describe(&self) -> String {
        match self {
            UnitBackend::Remote(client) => format!("XANO ({})", hostname_from_url(client.base_url())),
            UnitBackend::Local(path) => format!("local file ({})", path.display()),
        }
    }
}

struct UnitCache {
    units: Vec<Unit>,
    revision: u64,
}

/// Cached unit list in front of the configured backend.
///
/// Every successful mutation or refresh bumps the revision so map sessions
/// know to reload. Local mutations are serialized and reach the cache only
/// after `units.json` has been written.
#[derive(Clone)]
pub struct UnitStore {
    backend: Arc<UnitBackend>,
    cache: Arc<Mutex<UnitCache>>,
    write_guard: Arc<tokio::sync::Mutex<()>>,
}

impl UnitStore {
    /// Creates an empty store; call [`UnitStore::refresh`] to load it.
    pub fn new(backend: UnitBackend) -> Self {
        UnitStore {
            backend: Arc::new(backend),
            cache: Arc::new(Mutex::new(UnitCache {
                units: Vec::new(),
                revision: 0,
            })),
            write_guard: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &UnitBackend {
        &self.backend
    }

    pub fn is_remote(&self) -> bool {
        matches!(*self.backend, UnitBackend::Remote(_))
    }

    pub fn list(&self) -> Vec<Unit> {
        self.cache.lock().unwrap().units.clone()
    }

    pub fn revision(&self) -> u64 {
        self.cache.lock().unwrap().revision
    }

    pub fn get(&self, id: i64) -> Option<Unit> {
        self.cache
            .lock()
            .unwrap()
            .units
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Reloads every unit from the backend, returning how many were loaded.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let _guard = self.write_guard.lock().await;
        let units = match &*self.backend {
            UnitBackend::Remote(client) => client
                .get_units()
                .await?
                .into_iter()
                .map(unit_from_record)
                .collect(),
            UnitBackend::Local(path) => load_units_file(path).await?,
        };
        let count = units.len();
        self.replace(units);
        tracing::info!(count, backend = %self.backend.describe(), "Units loaded");
        Ok(count)
    }

    pub async fn add(&self, mut draft: UnitDraft) -> Result<Unit, StoreError> {
        draft.validate()?;
        let unit = match &*self.backend {
            UnitBackend::Remote(client) => {
                let unit = unit_from_record(client.create_unit(&record_from_draft(&draft)).await?);
                self.mutate(|units| units.push(unit.clone()));
                unit
            }
            UnitBackend::Local(path) => {
                if draft.coverage_radius.is_none() {
                    draft.coverage_radius = Some(DEFAULT_COVERAGE_RADIUS_KM);
                }
                self.commit_local(path, |units| {
                    let id = units.iter().map(|u| u.id).max().unwrap_or(0) + 1;
                    let unit = draft.into_unit(id);
                    units.push(unit.clone());
                    Ok(unit)
                })
                .await?
            }
        };
        tracing::info!(id = unit.id, name = %unit.name, "Unit added");
        Ok(unit)
    }

    pub async fn update(&self, id: i64, draft: UnitDraft) -> Result<Unit, StoreError> {
        draft.validate()?;
        let unit = match &*self.backend {
            UnitBackend::Remote(client) => {
                let record = client
                    .update_unit(id, &record_from_draft(&draft))
                    .await
                    .map_err(|e| not_found_as(id, e))?;
                let mut unit = unit_from_record(record);
                unit.id = id;
                self.mutate(|units| {
                    if let Some(slot) = units.iter_mut().find(|u| u.id == id) {
                        *slot = unit.clone();
                    } else {
                        units.push(unit.clone());
                    }
                });
                unit
            }
            UnitBackend::Local(path) => {
                self.commit_local(path, |units| {
                    let slot = units
                        .iter_mut()
                        .find(|u| u.id == id)
                        .ok_or(StoreError::NotFound(id))?;
                    *slot = draft.into_unit(id);
                    Ok(slot.clone())
                })
                .await?
            }
        };
        tracing::info!(id, "Unit updated");
        Ok(unit)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match &*self.backend {
            UnitBackend::Remote(client) => {
                client.delete_unit(id).await.map_err(|e| not_found_as(id, e))?;
                self.mutate(|units| units.retain(|u| u.id != id));
            }
            UnitBackend::Local(path) => {
                self.commit_local(path, |units| {
                    let before = units.len();
                    units.retain(|u| u.id != id);
                    if units.len() == before {
                        return Err(StoreError::NotFound(id));
                    }
                    Ok(())
                })
                .await?;
            }
        }
        tracing::info!(id, "Unit deleted");
        Ok(())
    }

    fn replace(&self, units: Vec<Unit>) {
        self.mutate(|current| *current = units);
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Unit>)) {
        let mut cache = self.cache.lock().unwrap();
        f(&mut cache.units);
        cache.revision += 1;
    }

    /// Applies `change` to a copy of the list, writes it to `path` and only
    /// then swaps it into the cache. A failed change or write leaves both
    /// the cache and the revision untouched.
    async fn commit_local<T>(
        &self,
        path: &Path,
        change: impl FnOnce(&mut Vec<Unit>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.write_guard.lock().await;
        let mut units = self.list();
        let out = change(&mut units)?;
        write_units_file(path, &serde_json::to_string_pretty(&units)?).await?;
        self.replace(units);
        Ok(out)
    }
}

fn not_found_as(id: i64, e: ApiError) -> StoreError {
    match e {
        ApiError::Status { status: 404, .. } => StoreError::NotFound(id),
        other => StoreError::Api(other),
    }
}

/// Reads `units.json`, seeding it with the demo network when absent.
async fn load_units_file(path: &Path) -> Result<Vec<Unit>, StoreError> {
    if !path.exists() {
        let units = demo_units();
        write_units_file(path, &serde_json::to_string_pretty(&units)?).await?;
        tracing::info!(path = %path.display(), "Seeded units file with demo network");
        return Ok(units);
    }
    let text = tokio::fs::read_to_string(path).await?;
    let mut units: Vec<Unit> = serde_json::from_str(&text)?;
    for unit in units.iter_mut() {
        unit.refresh_coverage();
    }
    Ok(units)
}

async fn write_units_file(path: &Path, content: &str) -> Result<(), StoreError> {
    write_file_atomic(path, content).await
}

/// The built-in demo network: headquarters in São Paulo state and five
/// regional units across Minas Gerais.
pub fn demo_units() -> Vec<Unit> {
    let seed: [(&str, &str, &str, &str, f64, f64, UnitType, f64, bool); 6] = [
        ("ND Drones - Monte Azul Paulista (SEDE)", "Monte Azul Paulista, SP", "(11) 99999-9999", "contato@nddrones.com.br", -20.9467, -49.2958, UnitType::Headquarters, 200.0, true),
        ("ND Drones - Espera Feliz", "Espera Feliz, MG", "(32) 88888-8888", "esperafeliz@nddrones.com.br", -20.65, -41.9167, UnitType::Regional, 150.0, false),
        ("ND Drones - Janaúba", "Janaúba, MG", "(38) 77777-7777", "janauba@nddrones.com.br", -15.8, -43.3167, UnitType::Regional, 120.0, false),
        ("ND Drones - Lavras", "Lavras, MG", "(35) 66666-6666", "lavras@nddrones.com.br", -21.25, -45.0, UnitType::Regional, 100.0, false),
        ("ND Drones - Patos de Minas", "Patos de Minas, MG", "(34) 55555-5555", "patosdeminas@nddrones.com.br", -18.5833, -46.5167, UnitType::Regional, 130.0, false),
        ("ND Drones - Unaí", "Unaí, MG", "(38) 44444-4444", "unai@nddrones.com.br", -16.3667, -46.9, UnitType::Regional, 110.0, false),
    ];
    seed.iter()
        .enumerate()
        .map(|(i, (name, address, phone, email, lat, lng, kind, radius, show))| {
            let (city, state) = address.split_once(", ").unwrap_or((*address, ""));
            let description = match kind {
                UnitType::Headquarters => "Sede principal da ND Drones".to_string(),
                UnitType::Regional => format!("Unidade regional em {}", city),
            };
            let mut unit = UnitDraft {
                name: name.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
                description,
                latitude: *lat,
                longitude: *lng,
                kind: *kind,
                coverage_radius: Some(*radius),
                show_coverage: *show,
                state: Some(state.to_string()),
                city: Some(city.to_string()),
                ..Default::default()
            }
            .into_unit(i as i64 + 1);
            if *kind == UnitType::Headquarters {
                unit.website = "https://nddrones.com.br".into();
            }
            unit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_network_shape() {
        let units = demo_units();
        assert_eq!(units.len(), 6);
        assert_eq!(units[0].kind, UnitType::Headquarters);
        assert!(units.iter().skip(1).all(|u| u.state.as_deref() == Some("MG")));
        assert!(units.iter().all(|u| !u.covered_cities.is_empty()));
    }
}
