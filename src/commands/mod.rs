//! Subcommand implementations

pub mod cache;
pub mod reputation;
pub mod scan;
pub mod threshold;

use std::path::Path;
use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::settings::ConfigStore;
use crate::store::{JsonFileStore, Store};

/// Persistent state shared by the subcommands.
pub struct State {
    pub store: Arc<dyn Store>,
    pub cache: Arc<TtlCache>,
}

impl State {
    /// Open the state directory resolved from `config` and the CLI override.
    pub fn open(config: &Config, state_dir: Option<&Path>) -> Self {
        let dir = config.state_dir(state_dir);
        tracing::debug!(dir = %dir.display(), "Using state directory");

        let store: Arc<dyn Store> = Arc::new(JsonFileStore::new(dir));
        let cache = Arc::new(TtlCache::new(store.clone()));
        Self { store, cache }
    }

    pub fn settings(&self) -> ConfigStore {
        ConfigStore::new(self.store.clone(), self.cache.clone())
    }
}
