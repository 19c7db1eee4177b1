//! Bounded LRU cache of committed election results.

use std::sync::Arc;

use parking_lot::Mutex;
use schnellru::ByLength;
use schnellru::LruMap;

use crate::election::ElectionResult;

/// Height-keyed LRU of shared results. The committee's outer lock orders
/// writers; the internal mutex keeps MRU promotion sound for concurrent
/// readers holding that lock shared.
pub struct ResultCache {
    results: Mutex<LruMap<u64, Arc<ElectionResult>, ByLength>>,
}

impl ResultCache {
    /// Creates a cache holding at most `capacity` results (minimum 1).
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            results: Mutex::new(LruMap::new(ByLength::new(capacity.max(1)))),
        }
    }

    /// Inserts or overwrites the result at `height`, promoting it to MRU.
    pub fn insert(&self, height: u64, result: Arc<ElectionResult>) {
        self.results.lock().insert(height, result);
    }

    /// Returns the cached result at `height`, promoting it to MRU.
    #[must_use]
    pub fn get(&self, height: u64) -> Option<Arc<ElectionResult>> {
        self.results.lock().get(&height).cloned()
    }
}
