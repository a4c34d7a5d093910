use std::sync::Arc;
use crate::cache::QueryCache;
use crate::read_through::ReadThrough;
use crate::source::DataSource;

// app's shared state, built once in main and handed to every handler
pub struct AppState {
    pub read_through: ReadThrough,
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(cache: Arc<QueryCache>, source: Arc<dyn DataSource>, coalesce: bool) -> Self {
        let read_through = if coalesce {
            ReadThrough::coalescing(cache)
        } else {
            ReadThrough::new(cache)
        };

        Self {
            read_through,
            source,
        }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        self.read_through.cache()
    }
}
