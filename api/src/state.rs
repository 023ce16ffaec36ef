use std::sync::Arc;

use shared::{Config, MemStore};

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub store: MemStore,
}

impl AppState {
    pub fn new(config: &Config) -> Arc<Self> {
        let store = match config.data_seed {
            Some(seed) => MemStore::with_seed(seed),
            None => MemStore::new(),
        };
        Arc::new(Self { store })
    }
}
