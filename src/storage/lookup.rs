//! Verse lookup backed by the core dataset

use crate::canon::{VerseId, VerseRef};
use crate::decoder::VerseLookup;
use crate::storage::federation::DatasetFederation;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const MIN_CACHE_SIZE: NonZeroUsize = NonZeroUsize::MIN;

/// Resolves ids to references through core rows, with an LRU cache in front
pub struct CoreVerseLookup {
    federation: Arc<DatasetFederation>,
    cache: Mutex<LruCache<VerseId, VerseRef>>,
}

impl CoreVerseLookup {
    pub fn new(federation: Arc<DatasetFederation>, cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_size).unwrap_or(MIN_CACHE_SIZE);
        Self {
            federation,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached references
    pub fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl VerseLookup for CoreVerseLookup {
    fn lookup(&self, id: VerseId) -> Option<VerseRef> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&id) {
                return Some(hit.clone());
            }
        }

        match self.federation.verse_ref(id) {
            Ok(Some(verse_ref)) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(id, verse_ref.clone());
                }
                Some(verse_ref)
            }
            Ok(None) => {
                log::warn!("Verse id {} has no row in core", id);
                None
            }
            Err(e) => {
                log::warn!("Failed to look up verse id {}: {}", id, e);
                None
            }
        }
    }
}
