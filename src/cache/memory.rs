//! In-process LRU tier
//!
//! One mutex guards the map and its recency order together, so there is never
//! a window where they disagree.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::key::CacheKey;
use crate::syntax::HighlightResult;

/// Entry-bounded, strictly least-recently-used cache of highlight results
pub struct MemoryCache {
    entries: Mutex<LruCache<CacheKey, Arc<HighlightResult>>>,
}

impl MemoryCache {
    /// Create a tier holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Look up a key, marking it most recently used on a hit
    pub fn get(&self, key: &CacheKey) -> Option<Arc<HighlightResult>> {
        self.entries.lock().get(key).cloned()
    }

    /// Insert or replace; evicts the least recently used entry when full
    pub fn set(&self, key: CacheKey, value: Arc<HighlightResult>) {
        if let Some((evicted, _)) = self.entries.lock().push(key, value) {
            if evicted != key {
                tracing::trace!("Memory tier evicted {:?}", evicted);
            }
        }
    }

    /// Check presence without touching recency
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::LanguageId;
    use crate::theme::Palette;
    use std::path::Path;
    use std::time::UNIX_EPOCH;

    fn key(name: &str) -> CacheKey {
        CacheKey::derive(Path::new(name), UNIX_EPOCH, "dark", LanguageId::PlainText)
    }

    fn value(text: &str) -> Arc<HighlightResult> {
        Arc::new(HighlightResult::new(
            LanguageId::PlainText,
            text.to_string(),
            Vec::new(),
            Palette::default(),
        ))
    }

    #[test]
    fn test_get_and_set() {
        let cache = MemoryCache::new(4);
        assert!(cache.get(&key("a")).is_none());
        cache.set(key("a"), value("A"));
        assert_eq!(cache.get(&key("a")).unwrap().text, "A");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = MemoryCache::new(2);
        cache.set(key("a"), value("A"));
        cache.set(key("b"), value("B"));
        // Touch a so b becomes the eviction candidate
        assert!(cache.get(&key("a")).is_some());
        cache.set(key("c"), value("C"));

        assert!(cache.contains(&key("a")));
        assert!(!cache.contains(&key("b")));
        assert!(cache.contains(&key("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_set_existing_updates_value_and_recency() {
        let cache = MemoryCache::new(2);
        cache.set(key("a"), value("A1"));
        cache.set(key("b"), value("B"));
        cache.set(key("a"), value("A2"));
        cache.set(key("c"), value("C"));

        assert_eq!(cache.get(&key("a")).unwrap().text, "A2");
        assert!(!cache.contains(&key("b")));
    }

    #[test]
    fn test_clear_and_zero_capacity() {
        let cache = MemoryCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.set(key("a"), value("A"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access_stays_bounded() {
        let cache = Arc::new(MemoryCache::new(8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let k = key(&format!("{}-{}", t, i % 16));
                        cache.set(k, value("x"));
                        let _ = cache.get(&k);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 8);
    }
}
