use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::sync::Arc;

use crate::cache::QueryCache;
use crate::error::QueryError;
use crate::key::CacheKey;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, COALESCED_WAITS, UPSTREAM_ERRORS};

// Get-or-populate for every read endpoint; failures are never cached
type PendingFetch = Shared<BoxFuture<'static, Result<Value, QueryError>>>;

enum Slot {
    Ready(Value),
    Pending(PendingFetch),
}

pub struct ReadThrough {
    cache: Arc<QueryCache>,
    in_flight: Option<Arc<DashMap<String, PendingFetch>>>,
}

impl ReadThrough {
    // every miss goes to the data source
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            in_flight: None,
        }
    }

    // concurrent misses on one key share a single fetch
    pub fn coalescing(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            in_flight: Some(Arc::new(DashMap::new())),
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn is_coalescing(&self) -> bool {
        self.in_flight.is_some()
    }

    // Cache hit, or run `fetch` and cache what it returns
    pub async fn get_or_populate<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<Value, QueryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, QueryError>> + Send + 'static,
    {
        if let Some(value) = self.cache.get(key.as_str()) {
            CACHE_HITS.inc();
            tracing::debug!(%key, "cache hit");
            return Ok(value);
        }
        CACHE_MISSES.inc();
        tracing::debug!(%key, "cache miss");

        let Some(in_flight) = &self.in_flight else {
            let result = fetch().await;
            return store(&self.cache, key.as_str(), result);
        };

        let pending = match self.claim(in_flight, key, fetch) {
            Slot::Ready(value) => return Ok(value),
            Slot::Pending(pending) => pending,
        };
        pending.await
    }

    // Join the fetch already running for `key`, or start one
    fn claim<F, Fut>(
        &self,
        in_flight: &Arc<DashMap<String, PendingFetch>>,
        key: &CacheKey,
        fetch: F,
    ) -> Slot
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, QueryError>> + Send + 'static,
    {
        match in_flight.entry(key.to_string()) {
            Entry::Occupied(slot) => {
                COALESCED_WAITS.inc();
                tracing::debug!(%key, "joining in-flight fetch");
                Slot::Pending(slot.get().clone())
            }
            Entry::Vacant(slot) => {
                // the previous leader may have stored its rows after our miss
                if let Some(value) = self.cache.get(key.as_str()) {
                    return Slot::Ready(value);
                }

                let cache = self.cache.clone();
                let registry = in_flight.clone();
                let owned_key = key.to_string();
                let request = fetch();

                // own task, so a disconnecting client does not cancel it for the others
                let task = tokio::spawn(async move {
                    let _slot = SlotGuard {
                        registry,
                        key: owned_key.clone(),
                    };
                    store(&cache, &owned_key, request.await)
                });

                let pending = async move {
                    task.await.unwrap_or_else(|err| {
                        tracing::warn!(error = %err, "fetch task did not complete");
                        Err(QueryError::Abandoned)
                    })
                }
                .boxed()
                .shared();

                slot.insert(pending.clone());
                Slot::Pending(pending)
            }
        }
    }
}

// Frees the in-flight slot however the fetch task ends, panics included
struct SlotGuard {
    registry: Arc<DashMap<String, PendingFetch>>,
    key: String,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.key);
    }
}

fn store(cache: &QueryCache, key: &str, result: Result<Value, QueryError>) -> Result<Value, QueryError> {
    match result {
        Ok(rows) => {
            cache.set(key, rows.clone());
            Ok(rows)
        }
        Err(err) => {
            UPSTREAM_ERRORS.inc();
            tracing::warn!(key, error = %err, "query failed, nothing cached");
            Err(err)
        }
    }
}
