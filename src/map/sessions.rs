use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Unit;

use super::control::MapController;

/// Maximum number of visitor map states kept in memory.
const MAX_MAP_SESSIONS: usize = 1000;

struct MapSession {
    controller: MapController,
    revision: u64,
    last_used: u64,
}

struct SessionsInner {
    sessions: HashMap<String, MapSession>,
    tick: u64,
}

/// One [`MapController`] per visitor, keyed by the `map_id` cookie.
///
/// Controllers are resynchronized with the unit list whenever the unit
/// store's revision moves. The least recently used entry is evicted once the
/// store is full.
#[derive(Clone)]
pub struct MapSessionStore {
    inner: Arc<Mutex<SessionsInner>>,
}

impl Default for MapSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionsInner {
                sessions: HashMap::new(),
                tick: 0,
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` against the visitor's controller, creating it from `load` when
    /// missing and reloading units when `revision` differs from the one the
    /// controller last saw.
    pub fn with_controller<R>(
        &self,
        id: &str,
        revision: u64,
        load: impl FnOnce() -> Vec<Unit>,
        f: impl FnOnce(&mut MapController) -> R,
    ) -> R {
        let mut inner = self.inner.lock().unwrap();
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.sessions.contains_key(id) && inner.sessions.len() >= MAX_MAP_SESSIONS {
            let oldest = inner
                .sessions
                .iter()
                .min_by_key(|(_, s)| s.last_used)
                .map(|(k, _)| k.clone());
            if let Some(key) = oldest {
                inner.sessions.remove(&key);
            }
        }

        let session = match inner.sessions.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                let session = entry.into_mut();
                if session.revision != revision {
                    session.controller.set_units(load());
                    session.revision = revision;
                }
                session
            }
            Entry::Vacant(entry) => entry.insert(MapSession {
                controller: MapController::new(load()),
                revision,
                last_used: tick,
            }),
        };
        session.last_used = tick;
        f(&mut session.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use crate::models::{UnitDraft, UnitType};

    fn unit(id: i64) -> Unit {
        UnitDraft {
            name: format!("Unit {}", id),
            email: "u@example.com".into(),
            latitude: -20.0,
            longitude: -45.0 + id as f64,
            kind: UnitType::Regional,
            ..Default::default()
        }
        .into_unit(id)
    }

    #[test]
    fn controller_persists_between_calls() {
        let store = MapSessionStore::new();
        store.with_controller("a", 1, || vec![unit(1), unit(2)], |c| {
            let u = c.find_unit(2).cloned().unwrap();
            c.focus_on_unit(&u);
        });
        let zoom = store.with_controller("a", 1, || panic!("must not reload"), |c| c.view().zoom);
        assert_eq!(zoom, 14);
    }

    #[test]
    fn revision_change_resyncs_units() {
        let store = MapSessionStore::new();
        store.with_controller("a", 1, || vec![unit(1)], |c| c.show_all());
        let (count, center) = store.with_controller(
            "a",
            2,
            || vec![unit(1), unit(2), unit(3)],
            |c| (c.view().filtered_resellers.len(), c.view().center),
        );
        assert_eq!(count, 3);
        // Center is kept across a resync.
        assert_eq!(center, Position::new(-20.0, -44.0));
    }

    #[test]
    fn evicts_least_recently_used() {
        let store = MapSessionStore::new();
        for i in 0..MAX_MAP_SESSIONS {
            store.with_controller(&format!("s{}", i), 1, Vec::new, |_| ());
        }
        // Touch s0 so that s1 becomes the oldest.
        store.with_controller("s0", 1, Vec::new, |_| ());
        store.with_controller("new", 1, Vec::new, |_| ());
        assert_eq!(store.len(), MAX_MAP_SESSIONS);
        let reloaded = std::cell::Cell::new(false);
        store.with_controller("s1", 1, || { reloaded.set(true); Vec::new() }, |_| ());
        assert!(reloaded.get());
    }
}
