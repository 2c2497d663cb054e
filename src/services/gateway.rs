use crate::core::{
    distance::haversine_km,
    fallback::fallback_facilities,
    parser::{parse_facilities, ParseError},
    prompt::{facility_prompt, FACILITIES_PER_RESPONSE},
};
use crate::models::{Coordinates, HealthcareFacility, SearchFilters, SearchResult};
use crate::services::cache::{CacheKey, CacheStats, FacilityCache};
use crate::services::gemini::{GenerativeClient, UpstreamError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors returned to callers of the gateway
///
/// Upstream and parsing failures never appear here; they degrade to fallback
/// data instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Reasons a live fetch did not produce facilities
#[derive(Debug, Error)]
enum FetchError {
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("malformed response: {0}")]
    Malformed(#[from] ParseError),
}

/// Caller id used when a search is not attributed to any client
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Gateway tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    pub debounce: Duration,
    pub upstream_timeout: Duration,
    pub result_limit: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            upstream_timeout: Duration::from_secs(20),
            result_limit: FACILITIES_PER_RESPONSE,
        }
    }
}

/// Searches waiting on the same debounce window
struct Burst {
    generation: u64,
    location: String,
    filters: SearchFilters,
    waiters: Vec<oneshot::Sender<SearchResult>>,
}

struct Shared {
    client: Arc<dyn GenerativeClient>,
    cache: FacilityCache,
    config: GatewayConfig,
    // One pending burst per caller; the cache is shared by everyone
    bursts: Mutex<HashMap<String, Burst>>,
    generations: AtomicU64,
}

/// Facility search with caching, debouncing and fallback
///
/// # Pipeline
/// 1. Reject empty locations
/// 2. Serve fresh cache hits immediately
/// 3. Merge misses into the caller's debounce burst (last arguments win)
/// 4. When the burst settles, ask the provider once, under a timeout
/// 5. Parse and cache live results, or fall back to filtered static data
///
/// Bursts are kept per caller, so two clients typing at once never receive
/// each other's results. Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct FacilitySearchGateway {
    shared: Arc<Shared>,
}

impl FacilitySearchGateway {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        cache: FacilityCache,
        config: GatewayConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                cache,
                config,
                bursts: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
            }),
        }
    }

    /// Search for facilities near a location
    ///
    /// Only an empty location is an error. Every other failure resolves to
    /// fallback data tagged with [`ResultSource::Fallback`].
    ///
    /// [`ResultSource::Fallback`]: crate::models::ResultSource::Fallback
    pub async fn search(
        &self,
        location: &str,
        filters: SearchFilters,
    ) -> Result<SearchResult, GatewayError> {
        self.search_for(ANONYMOUS_CALLER, location, filters).await
    }

    /// Search on behalf of one caller, debouncing only against that caller's
    /// own recent searches
    pub async fn search_for(
        &self,
        caller: &str,
        location: &str,
        filters: SearchFilters,
    ) -> Result<SearchResult, GatewayError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(GatewayError::InvalidInput("location must not be empty".to_string()));
        }

        let key = CacheKey::facilities(location, &filters);
        if let Some(facilities) = self.shared.cache.get(&key).await {
            tracing::debug!("Serving {} cached facilities for {}", facilities.len(), location);
            return Ok(cached_result(&facilities));
        }

        let receiver = self.join_burst(caller, location, &filters);

        match receiver.await {
            Ok(result) => Ok(result),
            Err(_) => {
                tracing::warn!("Search burst dropped before completing, serving fallback for {}", location);
                Ok(SearchResult::fallback(fallback_facilities(
                    location,
                    &filters,
                    self.shared.config.result_limit,
                )))
            }
        }
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.shared.cache.stats()
    }

    /// Add a search to the caller's pending burst and restart its debounce timer
    fn join_burst(
        &self,
        caller: &str,
        location: &str,
        filters: &SearchFilters,
    ) -> oneshot::Receiver<SearchResult> {
        let (sender, receiver) = oneshot::channel();
        let generation = self.shared.generations.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut bursts = self.shared.bursts.lock().unwrap_or_else(|e| e.into_inner());
            match bursts.get_mut(caller) {
                Some(burst) => {
                    burst.generation = generation;
                    burst.location = location.to_string();
                    burst.filters = filters.clone();
                    burst.waiters.push(sender);
                    tracing::trace!("Search joined burst ({} waiting)", burst.waiters.len());
                }
                None => {
                    bursts.insert(
                        caller.to_string(),
                        Burst {
                            generation,
                            location: location.to_string(),
                            filters: filters.clone(),
                            waiters: vec![sender],
                        },
                    );
                }
            }
        }

        // Only the timer of the latest call finds its generation still current
        let gateway = self.clone();
        let caller = caller.to_string();
        let delay = self.shared.config.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            gateway.fire(&caller, generation).await;
        });

        receiver
    }

    async fn fire(&self, caller: &str, generation: u64) {
        let burst = {
            let mut bursts = self.shared.bursts.lock().unwrap_or_else(|e| e.into_inner());
            if bursts.get(caller).is_some_and(|b| b.generation == generation) {
                bursts.remove(caller)
            } else {
                None
            }
        };

        let Some(burst) = burst else {
            return;
        };

        tracing::debug!(
            "Debounce settled for {} on behalf of {} ({} waiting)",
            burst.location,
            caller,
            burst.waiters.len()
        );

        let result = self.resolve(&burst.location, &burst.filters).await;

        for waiter in burst.waiters {
            // A caller that gave up is fine to ignore
            let _ = waiter.send(result.clone());
        }
    }

    /// Produce the result for the winning arguments of a burst
    async fn resolve(&self, location: &str, filters: &SearchFilters) -> SearchResult {
        let key = CacheKey::facilities(location, filters);
        if let Some(facilities) = self.shared.cache.get(&key).await {
            return cached_result(&facilities);
        }

        match self.fetch_live(location, filters).await {
            Ok(facilities) => {
                tracing::info!("Fetched {} live facilities for {}", facilities.len(), location);
                self.shared.cache.insert(key, facilities.clone()).await;
                SearchResult::live(facilities)
            }
            Err(e) => {
                tracing::warn!("Facility search for {} falling back: {}", location, e);
                SearchResult::fallback(fallback_facilities(
                    location,
                    filters,
                    self.shared.config.result_limit,
                ))
            }
        }
    }

    async fn fetch_live(
        &self,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<HealthcareFacility>, FetchError> {
        let prompt = facility_prompt(location, filters);
        tracing::trace!("Facility prompt: {}", prompt);

        let timeout = self.shared.config.upstream_timeout;
        let text = tokio::time::timeout(timeout, self.shared.client.generate(&prompt))
            .await
            .map_err(|_| UpstreamError::Timeout(timeout))??;

        let mut facilities = parse_facilities(&text)?;
        fill_missing_distances(location, &mut facilities);
        facilities.truncate(self.shared.config.result_limit);

        Ok(facilities)
    }
}

fn cached_result(facilities: &[HealthcareFacility]) -> SearchResult {
    let mut result = SearchResult::live(facilities.to_vec());
    result.cached = true;
    result
}

/// Compute distances the provider left out, when the origin is known
fn fill_missing_distances(location: &str, facilities: &mut [HealthcareFacility]) {
    let Some(origin) = Coordinates::parse(location) else {
        return;
    };

    for facility in facilities.iter_mut().filter(|f| f.distance_km.is_none()) {
        facility.distance_km = Some(haversine_km(origin, facility.coordinates));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::TokioClock;
    use async_trait::async_trait;

    struct FixedClient(&'static str);

    #[async_trait]
    impl GenerativeClient for FixedClient {
        async fn generate(&self, _prompt: &str) -> Result<String, UpstreamError> {
            Ok(self.0.to_string())
        }
    }

    fn gateway(reply: &'static str) -> FacilitySearchGateway {
        let cache = FacilityCache::new(100, Duration::from_secs(300), Arc::new(TokioClock));
        FacilitySearchGateway::new(Arc::new(FixedClient(reply)), cache, GatewayConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_location_rejected() {
        let gateway = gateway("[]");

        let err = gateway.search("   ", SearchFilters::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
        assert_eq!(gateway.cache_stats().miss_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_distance_is_computed_from_origin() {
        let gateway = gateway(
            r#"[{"name":"Near","type":"Clinic","coordinates":{"lat":40.71,"lng":-74.0}}]"#,
        );

        let result = gateway.search("40.7,-74.0", SearchFilters::default()).await.unwrap();

        assert!(!result.is_fallback());
        let km = result.facilities[0].distance_km.unwrap();
        assert!((km - 1.11).abs() < 0.05, "Expected ~1.1km, got {}", km);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_truncated_to_limit() {
        let gateway = gateway(
            r#"[
                {"name":"1","type":"Clinic","coordinates":{"lat":0,"lng":0}},
                {"name":"2","type":"Clinic","coordinates":{"lat":0,"lng":0}},
                {"name":"3","type":"Clinic","coordinates":{"lat":0,"lng":0}},
                {"name":"4","type":"Clinic","coordinates":{"lat":0,"lng":0}},
                {"name":"5","type":"Clinic","coordinates":{"lat":0,"lng":0}},
                {"name":"6","type":"Clinic","coordinates":{"lat":0,"lng":0}}
            ]"#,
        );

        let result = gateway.search("0,0", SearchFilters::default()).await.unwrap();
        assert_eq!(result.facilities.len(), 5);
    }
}
