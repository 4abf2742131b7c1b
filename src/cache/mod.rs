//! Two-tier highlight cache
//!
//! ```text
//! get: key → MemoryCache ─hit→ return
//!               └miss→ DiskCache ─hit→ promote to memory → return
//!                          └miss→ None
//! set: key → MemoryCache (now) + DiskCache (queued)
//! ```
//!
//! If the disk directory cannot be used at startup the cache runs memory-only
//! for the rest of the process; that is logged once, not per request.

mod disk;
mod key;
mod memory;

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

pub use disk::{CacheError, DiskCache, DiskCacheConfig, DiskStats, FORMAT_VERSION};
pub use key::{is_valid_name, CacheKey, KEY_HEX_LEN};
pub use memory::MemoryCache;

use crate::syntax::{HighlightResult, LanguageId};

/// Which tier served a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTier {
    Memory,
    Disk,
}

impl CacheTier {
    pub fn name(&self) -> &'static str {
        match self {
            CacheTier::Memory => "memory",
            CacheTier::Disk => "disk",
        }
    }
}

/// Facade over the memory and disk tiers
pub struct HighlightCache {
    memory: MemoryCache,
    disk: Option<DiskCache>,
}

impl HighlightCache {
    /// Build the cache, falling back to memory-only if the disk tier cannot
    /// be opened
    pub fn new(memory_entries: usize, disk: Option<DiskCacheConfig>) -> Self {
        let disk = disk.and_then(|config| {
            let dir = config.dir.clone();
            match DiskCache::open(config) {
                Ok(disk) => Some(disk),
                Err(e) if e.is_unexpected() => {
                    tracing::error!(
                        "Disk highlight cache could not be set up at {}, continuing memory-only: {}",
                        dir.display(),
                        e
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        "Disk highlight cache unavailable at {}, continuing memory-only: {}",
                        dir.display(),
                        e
                    );
                    None
                }
            }
        });
        Self {
            memory: MemoryCache::new(memory_entries),
            disk,
        }
    }

    pub fn memory_only(memory_entries: usize) -> Self {
        Self::new(memory_entries, None)
    }

    /// Whether results survive this process
    pub fn is_persistent(&self) -> bool {
        self.disk.is_some()
    }

    pub fn get(
        &self,
        path: &Path,
        modified: SystemTime,
        theme_id: &str,
        language: LanguageId,
    ) -> Option<Arc<HighlightResult>> {
        let key = CacheKey::derive(path, modified, theme_id, language);
        self.lookup(&key).map(|(value, _)| value)
    }

    pub fn set(
        &self,
        path: &Path,
        modified: SystemTime,
        theme_id: &str,
        language: LanguageId,
        value: Arc<HighlightResult>,
    ) {
        let key = CacheKey::derive(path, modified, theme_id, language);
        self.insert(key, value);
    }

    /// Memory first, then disk with promotion on a disk hit
    pub fn lookup(&self, key: &CacheKey) -> Option<(Arc<HighlightResult>, CacheTier)> {
        if let Some(value) = self.memory.get(key) {
            return Some((value, CacheTier::Memory));
        }

        let value = Arc::new(self.disk.as_ref()?.get(key)?);
        self.memory.set(*key, Arc::clone(&value));
        Some((value, CacheTier::Disk))
    }

    /// Store in memory now and queue the disk write
    pub fn insert(&self, key: CacheKey, value: Arc<HighlightResult>) {
        self.memory.set(key, Arc::clone(&value));
        if let Some(disk) = &self.disk {
            disk.set(key, value);
        }
    }

    /// Empty both tiers
    pub fn clear(&self) -> Result<(), CacheError> {
        self.memory.clear();
        if let Some(disk) = &self.disk {
            disk.clear()?;
        }
        Ok(())
    }

    /// Wait for queued disk writes
    pub fn flush(&self) {
        if let Some(disk) = &self.disk {
            disk.flush();
        }
    }

    /// `(entries, bytes)` of the disk tier, or `None` when memory-only
    pub fn disk_stats(&self) -> Option<DiskStats> {
        let disk = self.disk.as_ref()?;
        match disk.stats() {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("Failed to read disk cache stats: {}", e);
                None
            }
        }
    }

    pub fn memory(&self) -> &MemoryCache {
        &self.memory
    }

    pub fn disk(&self) -> Option<&DiskCache> {
        self.disk.as_ref()
    }
}
