use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::metrics::CACHE_SIZE;
use crate::state::AppState;

// The gauge tracks the cache this app owns, read at scrape time
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    CACHE_SIZE.set(state.cache().len() as f64);

    crate::metrics::render().map_err(|e| {
        tracing::error!(error = %e, "failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, QueryCache};
    use crate::error::QueryError;
    use crate::queries::CrashQuery;
    use crate::source::DataSource;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Unreachable;

    #[async_trait]
    impl DataSource for Unreachable {
        async fn query(&self, _query: &CrashQuery) -> Result<Value, QueryError> {
            Err(QueryError::Database("not connected".into()))
        }
    }

    fn state_with_entries(n: usize) -> Arc<AppState> {
        let cache = Arc::new(QueryCache::new(CacheConfig::default()));
        for i in 0..n {
            cache.set(format!("k{}", i), json!(i));
        }
        Arc::new(AppState::new(cache, Arc::new(Unreachable), false))
    }

    #[tokio::test]
    async fn test_scrape_reports_owned_cache_size() {
        // a second cache in the process must not leak into the gauge
        let other = QueryCache::new(CacheConfig::default());
        other.set("stray", json!(0));

        let text = metrics_handler(State(state_with_entries(3))).await.unwrap();

        assert!(text.contains("crash_api_cache_size 3"));
        assert_eq!(CACHE_SIZE.get(), 3.0);
    }
}
