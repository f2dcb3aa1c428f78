use std::collections::HashMap;

use serde_json::Value;

/// Default amount of time, in milliseconds, during which a cached response is reused.
pub const DEFAULT_CACHE_TTL_MS: f64 = 5. * 60. * 1000.;

struct CachedResponse {
    value: Value,

    /// Unix timestamp in milliseconds at which the response was received.
    fetched_at: f64,
}

/// Catalog responses, keyed by request signature.
///
/// Entries are never evicted by themselves: an entry older than the TTL is just not served and
/// gets replaced once the corresponding request is performed again.
pub(crate) struct ResponseCache {
    entries: HashMap<String, CachedResponse>,
    ttl: f64,
}

impl ResponseCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            ttl: DEFAULT_CACHE_TTL_MS,
        }
    }

    pub(crate) fn update_ttl(&mut self, ttl_ms: f64) {
        self.ttl = ttl_ms;
    }

    /// Returns the response stored for `signature` if it is younger than the TTL at `now`.
    pub(crate) fn get(&self, signature: &str, now: f64) -> Option<&Value> {
        self.entries
            .get(signature)
            .filter(|e| now - e.fetched_at < self.ttl)
            .map(|e| &e.value)
    }

    pub(crate) fn insert(&mut self, signature: String, value: Value, now: f64) {
        self.entries.insert(
            signature,
            CachedResponse {
                value,
                fetched_at: now,
            },
        );
    }

    pub(crate) fn remove(&mut self, signature: &str) {
        self.entries.remove(signature);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_freshness() {
        let mut cache = ResponseCache::new();
        cache.insert("a".to_owned(), json!(1), 1000.);
        assert_eq!(cache.get("a", 1000.), Some(&json!(1)));
        assert_eq!(cache.get("a", 1000. + DEFAULT_CACHE_TTL_MS - 1.), Some(&json!(1)));
        assert_eq!(cache.get("a", 1000. + DEFAULT_CACHE_TTL_MS), None);
        assert_eq!(cache.get("b", 1000.), None);
        assert_eq!(cache.len(), 1);

        cache.insert("a".to_owned(), json!(2), 1000. + DEFAULT_CACHE_TTL_MS);
        assert_eq!(cache.get("a", 1000. + DEFAULT_CACHE_TTL_MS), Some(&json!(2)));
        assert_eq!(cache.len(), 1);

        cache.insert("b".to_owned(), json!(3), 0.);
        cache.remove("a");
        assert_eq!(cache.get("a", 1000. + DEFAULT_CACHE_TTL_MS), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_update_ttl() {
        let mut cache = ResponseCache::new();
        cache.update_ttl(10.);
        cache.insert("a".to_owned(), json!(null), 0.);
        assert!(cache.get("a", 9.).is_some());
        assert!(cache.get("a", 10.).is_none());
    }
}
