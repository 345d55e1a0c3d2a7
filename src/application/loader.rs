use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use metrics::counter;
use tracing::debug;

use crate::config::Mode;
use crate::domain::component::{ComponentHandle, ComponentSource};
use crate::domain::error::ComponentError;

/// Owned map from canonical component key to its loaded definition.
///
/// Deliberately not process-global: each loader owns its cache, and test
/// harnesses instantiate independent ones.
#[derive(Default)]
pub struct ComponentCache {
    entries: DashMap<PathBuf, Arc<dyn ComponentHandle>>,
}

impl ComponentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }
}

/// Resolves component identifiers to ready-to-render handles, applying the
/// reload policy.
///
/// Outside production mode a cached entry is dropped before every load
/// attempt, so repeated requests observe the component's current source. In
/// production mode entries are never evicted and the first loaded definition
/// is reused for the life of the process.
pub struct ComponentLoader {
    source: Arc<dyn ComponentSource>,
    cache: ComponentCache,
    mode: Mode,
}

impl ComponentLoader {
    pub fn new(source: Arc<dyn ComponentSource>, mode: Mode) -> Self {
        Self {
            source,
            cache: ComponentCache::new(),
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cache(&self) -> &ComponentCache {
        &self.cache
    }

    /// Obtain a handle for `id`, loading or reloading per the eviction
    /// policy. Resolution and load failures propagate unchanged; translating
    /// them into the wire shape is the invoker's job.
    pub fn load(&self, id: &str) -> Result<Arc<dyn ComponentHandle>, ComponentError> {
        let key = self.source.locate(id)?;

        // The entry guard holds the map shard for the duration of a reload,
        // so eviction and repopulation appear atomic to concurrent callers of
        // the same key; no caller observes a half-evicted state.
        match self.cache.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if self.mode.is_production() {
                    counter!("ponte_cache_hit_total").increment(1);
                    return Ok(Arc::clone(occupied.get()));
                }

                // Stale by default outside production: the cached definition
                // is dropped before the load attempt, so a failed reload
                // leaves the entry absent rather than serving old source.
                counter!("ponte_cache_evict_total").increment(1);
                debug!(
                    target: "ponte::loader",
                    component = id,
                    key = %occupied.key().display(),
                    "evicting cached component for reload"
                );
                match self.source.load(id, occupied.key()) {
                    Ok(handle) => {
                        occupied.insert(Arc::clone(&handle));
                        Ok(handle)
                    }
                    Err(err) => {
                        occupied.remove();
                        Err(err)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                counter!("ponte_cache_miss_total").increment(1);
                let handle = self.source.load(id, vacant.key())?;
                debug!(
                    target: "ponte::loader",
                    component = id,
                    key = %vacant.key().display(),
                    "loaded component"
                );
                vacant.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }
}
