use crate::models::{HealthcareFacility, SearchFilters};
use crate::services::clock::Clock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Cached facility list with its creation time
#[derive(Debug, Clone)]
struct CacheEntry {
    facilities: Arc<Vec<HealthcareFacility>>,
    created_at: Instant,
}

/// In-memory facility cache with a fixed time-to-live
///
/// Entries live in a bounded moka cache; freshness is judged against the
/// injected clock so tests can move time without sleeping. Inserting under an
/// existing key replaces the entry, so a key never has two fresh entries.
pub struct FacilityCache {
    entries: moka::future::Cache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FacilityCache {
    /// Create a new cache
    pub fn new(max_entries: u64, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            clock,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get the facilities for a key if an entry younger than the TTL exists
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<HealthcareFacility>>> {
        let now = self.clock.now();

        match self.entries.get(key).await {
            Some(entry) if now.saturating_duration_since(entry.created_at) < self.ttl => {
                tracing::trace!("Cache hit: {}", key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.facilities)
            }
            Some(_) => {
                // Left for moka's TTL; a concurrent insert may already have replaced it
                tracing::trace!("Cache entry expired: {}", key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store facilities under a key, replacing any previous entry
    pub async fn insert(&self, key: String, facilities: Vec<HealthcareFacility>) {
        let entry = CacheEntry {
            facilities: Arc::new(facilities),
            created_at: self.clock.now(),
        };
        tracing::trace!("Cache set: {}", key);
        self.entries.insert(key, entry).await;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            entries: self.entries.entry_count(),
            hit_count: hits,
            miss_count: misses,
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a facility search
    ///
    /// Filters are keyed by their serialized form, which is stable because
    /// set-valued filters are ordered.
    pub fn facilities(location: &str, filters: &SearchFilters) -> String {
        let filters_json = serde_json::to_string(filters).unwrap_or_default();
        format!("facilities:{}:{}", location.trim(), filters_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;

    fn facility(name: &str) -> HealthcareFacility {
        HealthcareFacility {
            name: name.to_string(),
            facility_type: "Clinic".to_string(),
            address: String::new(),
            distance_km: None,
            rating: 4.0,
            phone: String::new(),
            hours: String::new(),
            services: vec![],
            coordinates: crate::models::Coordinates::new(0.0, 0.0),
            description: None,
            emergency: None,
            insurance: None,
            website: None,
            review_count: None,
        }
    }

    #[tokio::test]
    async fn test_cache_expires_by_clock() {
        let clock = Arc::new(ManualClock::new());
        let cache = FacilityCache::new(100, Duration::from_secs(300), clock.clone());

        cache.insert("k".to_string(), vec![facility("A")]).await;
        assert_eq!(cache.get("k").await.unwrap()[0].name, "A");

        clock.advance(Duration::from_secs(299));
        assert!(cache.get("k").await.is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("k").await.is_none());

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.miss_count, 1);
    }

    #[tokio::test]
    async fn test_stale_read_leaves_storage_alone() {
        let clock = Arc::new(ManualClock::new());
        let cache = FacilityCache::new(100, Duration::from_secs(300), clock.clone());

        cache.insert("k".to_string(), vec![facility("A")]).await;
        clock.advance(Duration::from_secs(301));

        assert!(cache.get("k").await.is_none());
        assert!(cache.entries.contains_key("k"));

        cache.insert("k".to_string(), vec![facility("B")]).await;
        assert_eq!(cache.get("k").await.unwrap()[0].name, "B");
    }

    #[tokio::test]
    async fn test_insert_replaces_entry() {
        let clock = Arc::new(ManualClock::new());
        let cache = FacilityCache::new(100, Duration::from_secs(300), clock);

        cache.insert("k".to_string(), vec![facility("A")]).await;
        cache.insert("k".to_string(), vec![facility("B")]).await;

        let facilities = cache.get("k").await.unwrap();
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].name, "B");
    }

    #[test]
    fn test_cache_key_builder() {
        let filters = SearchFilters {
            emergency_only: true,
            ..Default::default()
        };

        let a = CacheKey::facilities("40.7,-74.0", &filters);
        let b = CacheKey::facilities(" 40.7,-74.0 ", &filters);
        assert_eq!(a, b);
        assert!(a.starts_with("facilities:40.7,-74.0:{"));
        assert!(a.contains("\"emergencyOnly\":true"));

        assert_ne!(a, CacheKey::facilities("40.8,-74.0", &filters));
        assert_ne!(a, CacheKey::facilities("40.7,-74.0", &SearchFilters::default()));
    }

    #[test]
    fn test_cache_key_ignores_set_order() {
        let one = SearchFilters {
            insurance: ["Medicare".to_string(), "Aetna".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let two = SearchFilters {
            insurance: ["Aetna".to_string(), "Medicare".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(CacheKey::facilities("x", &one), CacheKey::facilities("x", &two));
    }
}
