//! Shared application state.
//!
//! `AppState` is the only shared mutable resource: the configuration, the
//! response cache every view reads through, and the loader that performs
//! the actual network calls. Cache mutation happens exclusively through
//! `CacheStore::fetch`/`invalidate`.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::JsonCache;
use crate::config::{load_config, Config, ViewRefresh};
use crate::fetcher::{ApiLoader, HttpFetcher};

pub struct AppState {
    pub config: RwLock<Config>,
    pub cache: JsonCache,
    pub loader: Arc<dyn ApiLoader>,
}

impl AppState {
    /// Build state from `~/.scorecard/config.json`, wiring the HTTP loader
    /// to the configured base address.
    pub fn new() -> Result<Self, String> {
        let config = load_config()?;
        let loader = HttpFetcher::new(&config.api_base_url)?;
        Ok(Self::with_loader(config, Arc::new(loader)))
    }

    /// Build state around an injected loader. Tests use this with stubs.
    pub fn with_loader(config: Config, loader: Arc<dyn ApiLoader>) -> Self {
        AppState {
            config: RwLock::new(config),
            cache: JsonCache::new(),
            loader,
        }
    }

    /// Refresh settings for a view, by accessor, under a short read lock.
    pub fn view_refresh(&self, pick: impl FnOnce(&crate::config::ViewsConfig) -> ViewRefresh) -> ViewRefresh {
        pick(&self.config.read().views)
    }
}
