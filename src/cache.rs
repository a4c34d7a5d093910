use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::interval;

pub const DEFAULT_TTL_SECONDS: u64 = 3600;

// Cache settings (ttl in seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

// Time source for entry ages
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// Only moves when told to, so expiry can be tested without sleeping
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

// Cache entry with timestamp. stored_at is written once; a refresh inserts a new entry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub stored_at: Instant,
}

// Query result cache, no size bound; stale entries go on lookup or purge
pub struct QueryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: config.ttl(),
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    // Fresh value or None; a stale entry is dropped on the way out
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();

        match self.entries.get(key) {
            None => return None,
            Some(entry) if self.is_fresh(&entry, now) => return Some(entry.value.clone()),
            Some(_) => {}
        }

        self.remove_if_stale(key, now);
        None
    }

    // Re-checks under the shard lock so an entry refreshed since `now` survives
    fn remove_if_stale(&self, key: &str, now: Instant) -> bool {
        self.entries
            .remove_if(key, |_, entry| !self.is_fresh(entry, now))
            .is_some()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: self.clock.now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Returns how many entries were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry, now));
        before.saturating_sub(self.entries.len())
    }
}

// Optional background sweep for entries nobody reads again
pub fn spawn_sweeper(cache: Arc<QueryCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        tracing::info!(interval = ?every, "cache sweeper started");

        loop {
            ticker.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, remaining = cache.len(), "swept expired cache entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache_with_clock() -> (QueryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = QueryCache::with_clock(CacheConfig::default(), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_hit_returns_stored_value() {
        let (cache, _clock) = cache_with_clock();
        cache.set("years", json!([2020, 2021]));

        assert_eq!(cache.get("years"), Some(json!([2020, 2021])));
    }

    #[test]
    fn test_unknown_key_is_a_miss() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.get("never_set"), None);
    }

    #[test]
    fn test_entry_just_before_ttl_is_still_served() {
        let (cache, clock) = cache_with_clock();
        cache.set("weather_conditions:year=2020", json!(["RAIN"]));

        clock.advance(Duration::from_secs(3599));

        assert_eq!(
            cache.get("weather_conditions:year=2020"),
            Some(json!(["RAIN"]))
        );
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("crash_x", json!({"a": 1}));

        clock.advance(Duration::from_secs(3600));

        assert_eq!(cache.get("crash_x"), None);
    }

    #[test]
    fn test_expired_entry_is_removed_and_not_resurrected() {
        let (cache, clock) = cache_with_clock();
        cache.set("crash_x", json!({"a": 1}));
        clock.advance(Duration::from_secs(3601));

        assert_eq!(cache.get("crash_x"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get("crash_x"), None);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", json!({"n": 1}));
        cache.set("k", json!({"n": 2}));

        assert_eq!(cache.get("k"), Some(json!({"n": 2})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_refresh_restarts_the_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", json!(1));
        clock.advance(Duration::from_secs(3000));
        cache.set("k", json!(1));
        clock.advance(Duration::from_secs(3000));

        assert_eq!(cache.get("k"), Some(json!(1)));
    }

    #[test]
    fn test_custom_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = QueryCache::with_clock(CacheConfig { ttl_seconds: 10 }, clock.clone());
        cache.set("k", json!("v"));

        clock.advance(Duration::from_secs(9));
        assert!(cache.get("k").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_purge_expired_only_drops_stale_entries() {
        let (cache, clock) = cache_with_clock();
        cache.set("old_a", json!(1));
        cache.set("old_b", json!(2));
        clock.advance(Duration::from_secs(2000));
        cache.set("young", json!(3));
        clock.advance(Duration::from_secs(2000));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("young"), Some(json!(3)));
    }

    #[test]
    fn test_concurrent_sets_keep_last_write() {
        let (cache, _clock) = cache_with_clock();
        let cache = Arc::new(cache);

        let first = {
            let cache = cache.clone();
            std::thread::spawn(move || cache.set("k", json!({"n": 1})))
        };
        first.join().unwrap();

        let second = {
            let cache = cache.clone();
            std::thread::spawn(move || cache.set("k", json!({"n": 2})))
        };
        second.join().unwrap();

        assert_eq!(cache.get("k"), Some(json!({"n": 2})));
    }

    #[test]
    fn test_parallel_readers_and_writers() {
        let (cache, _clock) = cache_with_clock();
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..200 {
                        let key = format!("key_{}", j % 10);
                        cache.set(key.clone(), json!(i));
                        assert!(cache.get(&key).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn test_stale_removal_keeps_entry_refreshed_after_check() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", json!("old"));
        clock.advance(Duration::from_secs(3601));

        // a lookup decided the entry was stale at this instant...
        let checked_at = clock.now();
        // ...then another request stored fresh rows before the removal ran
        cache.set("k", json!("new"));

        assert!(!cache.remove_if_stale("k", checked_at));
        assert_eq!(cache.get("k"), Some(json!("new")));
    }

    #[test]
    fn test_stale_removal_drops_expired_entry() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", json!("old"));
        clock.advance(Duration::from_secs(3600));

        assert!(cache.remove_if_stale("k", clock.now()));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_expired_entries() {
        let (cache, clock) = cache_with_clock();
        let cache = Arc::new(cache);
        cache.set("stale", json!(1));
        clock.advance(Duration::from_secs(3600));
        cache.set("fresh", json!(2));

        let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(60));

        // first tick fires immediately
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh"), Some(json!(2)));

        clock.advance(Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(cache.is_empty());

        sweeper.abort();
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let config: CacheConfig = serde_json::from_str(r#"{"ttlSeconds": 60}"#).unwrap();
        assert_eq!(config.ttl(), Duration::from_secs(60));
        assert_eq!(CacheConfig::default().ttl_seconds, 3600);
    }
}
