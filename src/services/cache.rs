use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Map whose entries expire `ttl` after insertion. Expired entries are
/// dropped on the next insert.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|(stored, _)| now.duration_since(*stored) < self.ttl)
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.purge_at(now);
        self.entries.insert(key, (now, value));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn purge_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|_, (stored, _)| now.duration_since(*stored) < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("sp", 1);
        assert_eq!(cache.get(&"sp"), Some(1));
        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(cache.get_at(&"sp", later), None);
        assert_eq!(cache.get(&"mg"), None);
    }

    #[test]
    fn zero_ttl_never_hits() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert(1, "x");
        assert_eq!(cache.get(&1), None);
        cache.insert(2, "y");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_drops_expired_entries() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let start = Instant::now();
        cache.insert_at("sp", 1, start);
        cache.insert_at("mg", 2, start + Duration::from_secs(30));
        assert_eq!(cache.len(), 2);
        cache.insert_at("rj", 3, start + Duration::from_secs(61));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&"sp", start + Duration::from_secs(61)), None);
        assert_eq!(cache.get_at(&"mg", start + Duration::from_secs(61)), Some(2));
    }
}
