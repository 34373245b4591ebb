//! Query caching for repeated views.

use dashmap::DashMap;
use hos_data::EgoNetwork;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::views::SearchHit;

/// Caches for repeated queries.
pub struct QueryCache {
    /// LRU cache for search results, keyed by lowercased query.
    searches: Mutex<LruCache<String, Vec<SearchHit>>>,

    /// Ego networks by person id. Bounded by the number of people.
    ego_networks: DashMap<String, EgoNetwork>,
}

impl QueryCache {
    /// Create a new cache with the specified search capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            searches: Mutex::new(LruCache::new(capacity)),
            ego_networks: DashMap::new(),
        }
    }

    fn search_key(query: &str) -> String {
        query.to_lowercase()
    }

    // ==========================================
    // Search Cache
    // ==========================================

    /// Get cached search hits.
    pub fn get_search(&self, query: &str) -> Option<Vec<SearchHit>> {
        self.searches
            .lock()
            .ok()?
            .get(&Self::search_key(query))
            .cloned()
    }

    /// Store search hits in cache.
    pub fn set_search(&self, query: &str, hits: Vec<SearchHit>) {
        if let Ok(mut guard) = self.searches.lock() {
            guard.put(Self::search_key(query), hits);
        }
    }

    // ==========================================
    // Ego Network Cache
    // ==========================================

    pub fn get_ego_network(&self, id: &str) -> Option<EgoNetwork> {
        self.ego_networks.get(id).map(|v| v.clone())
    }

    pub fn set_ego_network(&self, id: String, network: EgoNetwork) {
        self.ego_networks.insert(id, network);
    }

    /// Invalidate entire cache.
    pub fn invalidate_all(&self) {
        self.ego_networks.clear();

        if let Ok(mut guard) = self.searches.lock() {
            guard.clear();
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            searches_count: self.searches.lock().map(|g| g.len()).unwrap_or(0),
            ego_networks_count: self.ego_networks.len(),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub searches_count: usize,
    pub ego_networks_count: usize,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SEARCH_CACHE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hos_data::GraphNode;

    fn hit(id: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            url: hos_data::person_url(id),
            name: id.to_string(),
            description: None,
            roles: vec![],
        }
    }

    fn ego(id: &str) -> EgoNetwork {
        EgoNetwork {
            center: id.to_string(),
            nodes: vec![GraphNode::new(id, id)],
            links: vec![],
        }
    }

    #[test]
    fn test_cache_new_with_zero_capacity() {
        let cache = QueryCache::new(0);
        cache.set_search("isis", vec![hit("p1")]);
        assert_eq!(cache.stats().searches_count, 1);
    }

    #[test]
    fn test_search_key_is_case_insensitive() {
        let cache = QueryCache::new(10);
        cache.set_search("Sarton", vec![hit("p1"), hit("p2")]);

        let result = cache.get_search("SARTON").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "p1");
        assert!(cache.get_search("kuhn").is_none());
    }

    #[test]
    fn test_lru_eviction_for_searches() {
        let cache = QueryCache::new(2);
        cache.set_search("aa", vec![]);
        cache.set_search("bb", vec![]);
        cache.set_search("cc", vec![]);

        assert!(cache.get_search("aa").is_none());
        assert!(cache.get_search("bb").is_some());
        assert!(cache.get_search("cc").is_some());
    }

    #[test]
    fn test_ego_network_set_and_get() {
        let cache = QueryCache::default();
        cache.set_ego_network("p1".to_string(), ego("p1"));

        assert_eq!(cache.get_ego_network("p1").unwrap().center, "p1");
        assert!(cache.get_ego_network("p2").is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = QueryCache::default();
        cache.set_search("isis", vec![hit("p1")]);
        cache.set_ego_network("p1".to_string(), ego("p1"));

        cache.invalidate_all();

        assert_eq!(
            cache.stats(),
            CacheStats {
                searches_count: 0,
                ego_networks_count: 0,
            }
        );
    }

    #[test]
    fn test_concurrent_ego_inserts() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(QueryCache::default());
        let mut handles = vec![];

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for j in 0..50 {
                    let id = format!("p{i}-{j}");
                    cache.set_ego_network(id.clone(), ego(&id));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.stats().ego_networks_count, 400);
    }
}
