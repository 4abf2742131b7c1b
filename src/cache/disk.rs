//! Durable, cross-process disk tier
//!
//! One file per key, named by the key's 64-char hex encoding, in a directory
//! every glance process of the user resolves identically. There is no
//! cross-process lock, so every mutation is a single atomic filesystem
//! operation:
//! - writes go to a uniquely named temp file and are renamed into place
//! - reads that hit a corrupt file delete it and report a miss
//! - the cleanup sweep tolerates entries vanishing under it
//!
//! Writes are deferred to a background writer thread; `set` only enqueues.
//! Recency is the file modification time, bumped on every successful read.
//!
//! # File format
//!
//! ```text
//! "GLHL" | format version (u32 LE) | JSON-encoded HighlightResult
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

use thiserror::Error;

use super::key::{is_valid_name, CacheKey};
use crate::syntax::HighlightResult;

const MAGIC: &[u8; 4] = b"GLHL";

/// Bumped whenever the encoded shape of [`HighlightResult`] changes
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 8;

/// Writes queued beyond this are dropped; the entry is recomputed on a later miss
const WRITE_QUEUE_DEPTH: usize = 64;

/// Temp files older than this are leftovers from a killed writer
const STALE_TEMP_AGE: Duration = Duration::from_secs(10 * 60);

/// Errors from the disk tier; none of these reach a preview caller
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create cache directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache directory {} is not usable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("corrupt cache entry: {0}")]
    Corrupt(String),
    #[error("cache entry has format version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("failed to start cache writer thread: {0}")]
    Writer(#[source] io::Error),
}

impl CacheError {
    /// Failures an operator should look at, as opposed to expected degradation
    pub fn is_unexpected(&self) -> bool {
        match self {
            CacheError::CreateDir { source, .. } => source.kind() != io::ErrorKind::AlreadyExists,
            CacheError::Writer(_) => true,
            _ => false,
        }
    }
}

/// Bounds and location of the disk tier
#[derive(Debug, Clone, PartialEq)]
pub struct DiskCacheConfig {
    pub dir: PathBuf,
    pub max_entries: usize,
    pub max_bytes: u64,
    /// Run a cleanup sweep after this many completed writes
    pub cleanup_every: usize,
}

impl DiskCacheConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_entries: 500,
            max_bytes: 64 * 1024 * 1024,
            cleanup_every: 20,
        }
    }
}

/// Entry count and total size of the tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub entries: usize,
    pub total_bytes: u64,
}

enum WriteJob {
    Store {
        key: CacheKey,
        value: Arc<HighlightResult>,
    },
    Flush(Sender<()>),
}

/// Shared by the public handle and the writer thread
struct Store {
    config: DiskCacheConfig,
    writes_since_cleanup: AtomicUsize,
}

/// Handle to the disk tier
pub struct DiskCache {
    store: Arc<Store>,
    jobs: Option<SyncSender<WriteJob>>,
    writer: Option<JoinHandle<()>>,
}

impl DiskCache {
    /// Open the tier, creating its directory and checking it is writable
    ///
    /// Failure here means the caller should run memory-only.
    pub fn open(config: DiskCacheConfig) -> Result<Self, CacheError> {
        fs::create_dir_all(&config.dir).map_err(|source| CacheError::CreateDir {
            path: config.dir.clone(),
            source,
        })?;
        probe_writable(&config.dir)?;

        let store = Arc::new(Store {
            config,
            writes_since_cleanup: AtomicUsize::new(0),
        });

        let (tx, rx) = mpsc::sync_channel(WRITE_QUEUE_DEPTH);
        let worker_store = Arc::clone(&store);
        let writer = std::thread::Builder::new()
            .name("glance-disk-writer".to_string())
            .spawn(move || run_writer(worker_store, rx))
            .map_err(CacheError::Writer)?;

        tracing::debug!("Disk cache opened at {}", store.config.dir.display());
        Ok(Self {
            store,
            jobs: Some(tx),
            writer: Some(writer),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.store.config.dir
    }

    /// Synchronous lookup; corrupt entries are deleted and reported as a miss
    pub fn get(&self, key: &CacheKey) -> Option<HighlightResult> {
        self.get_by_name(&key.to_hex())
    }

    /// Look up an entry by its encoded file name
    ///
    /// Names that are not exactly a 64-char lowercase hex key are rejected
    /// without touching the filesystem.
    pub fn get_by_name(&self, name: &str) -> Option<HighlightResult> {
        let Some(path) = self.store.entry_path(name) else {
            tracing::debug!("Rejected malformed cache key {:?}", name);
            return None;
        };
        self.store.read_entry(&path)
    }

    /// Queue a write; returns without waiting for it to reach disk
    ///
    /// When the queue is full the write is dropped.
    pub fn set(&self, key: CacheKey, value: Arc<HighlightResult>) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        match jobs.try_send(WriteJob::Store { key, value }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Disk cache write queue full; dropping write for {:?}", key);
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Disk cache writer has stopped; dropping write for {:?}", key);
            }
        }
    }

    /// Write an entry on the calling thread
    pub fn store(&self, key: &CacheKey, value: &HighlightResult) -> Result<(), CacheError> {
        self.store.write_entry(key, value)
    }

    /// Block until every write queued before this call has completed
    pub fn flush(&self) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if jobs.send(WriteJob::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    /// Delete every entry; pending writes are flushed first
    ///
    /// Every entry is attempted; the first removal failure is returned after.
    pub fn clear(&self) -> Result<usize, CacheError> {
        self.flush();
        let mut removed = 0;
        let mut first_error = None;
        for entry in self.store.scan()? {
            match remove_tolerant(&entry.path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Could not remove cache entry: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }
        tracing::info!(
            "Cleared {} disk cache entries in {}",
            removed,
            self.dir().display()
        );
        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    pub fn stats(&self) -> Result<DiskStats, CacheError> {
        let entries = self.store.scan()?;
        Ok(DiskStats {
            entries: entries.len(),
            total_bytes: entries.iter().map(|e| e.len).sum(),
        })
    }

    /// Evict oldest-by-access entries until both bounds hold
    pub fn cleanup(&self) -> Result<usize, CacheError> {
        self.store.cleanup()
    }
}

impl Drop for DiskCache {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain its queue and exit
        self.jobs.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::error!("Disk cache writer thread panicked");
            }
        }
    }
}

fn run_writer(store: Arc<Store>, jobs: Receiver<WriteJob>) {
    for job in jobs {
        match job {
            WriteJob::Store { key, value } => {
                if let Err(e) = store.write_entry(&key, &value) {
                    tracing::error!("Failed to write cache entry {:?}: {}", key, e);
                    continue;
                }
                let writes = store.writes_since_cleanup.fetch_add(1, Ordering::Relaxed) + 1;
                if writes >= store.config.cleanup_every.max(1) {
                    store.writes_since_cleanup.store(0, Ordering::Relaxed);
                    if let Err(e) = store.cleanup() {
                        tracing::warn!("Disk cache cleanup failed: {}", e);
                    }
                }
            }
            WriteJob::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    tracing::trace!("Disk cache writer exiting");
}

/// One entry as seen by a directory scan
struct ScannedEntry {
    path: PathBuf,
    len: u64,
    accessed: SystemTime,
}

impl Store {
    fn entry_path(&self, name: &str) -> Option<PathBuf> {
        is_valid_name(name).then(|| self.config.dir.join(name))
    }

    fn read_entry(&self, path: &Path) -> Option<HighlightResult> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match decode(&bytes) {
            Ok(result) => {
                touch(path);
                Some(result)
            }
            Err(CacheError::VersionMismatch { found, expected }) => {
                tracing::debug!(
                    "Discarding cache entry {} with format version {} (current {})",
                    path.display(),
                    found,
                    expected
                );
                let _ = remove_tolerant(path);
                None
            }
            Err(e) => {
                tracing::warn!("Removing corrupt cache entry {}: {}", path.display(), e);
                let _ = remove_tolerant(path);
                None
            }
        }
    }

    fn write_entry(&self, key: &CacheKey, value: &HighlightResult) -> Result<(), CacheError> {
        let name = key.to_hex();
        let path = self
            .entry_path(&name)
            .ok_or_else(|| CacheError::Corrupt(format!("invalid key name {name}")))?;
        let bytes = encode(value)?;

        let temp = self.config.dir.join(temp_name(&name));
        let written = write_file(&temp, &bytes).and_then(|()| fs::rename(&temp, &path));
        if let Err(source) = written {
            let _ = fs::remove_file(&temp);
            return Err(CacheError::Io { path, source });
        }
        tracing::trace!("Stored {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    /// Current valid entries; stale temp files are swept as a side effect
    fn scan(&self) -> Result<Vec<ScannedEntry>, CacheError> {
        let dir = &self.config.dir;
        let read_dir = fs::read_dir(dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;

        let now = SystemTime::now();
        let mut entries = Vec::new();
        for entry in read_dir.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            // Metadata can fail if another process removed the file
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            if is_valid_name(name) {
                entries.push(ScannedEntry {
                    path: entry.path(),
                    len: metadata.len(),
                    accessed: modified,
                });
            } else if name.ends_with(".tmp")
                && now.duration_since(modified).unwrap_or_default() > STALE_TEMP_AGE
            {
                let _ = remove_tolerant(&entry.path());
            }
        }
        Ok(entries)
    }

    fn cleanup(&self) -> Result<usize, CacheError> {
        let entries = self.scan()?;
        Ok(evict_oldest(
            entries,
            self.config.max_entries,
            self.config.max_bytes,
            remove_tolerant,
        ))
    }
}

/// Remove oldest-by-access entries until both bounds hold; returns how many
/// this sweep deleted
///
/// An entry that cannot be removed is skipped and still counts toward the
/// bounds, so the sweep moves on to the next oldest.
fn evict_oldest(
    mut entries: Vec<ScannedEntry>,
    max_entries: usize,
    max_bytes: u64,
    mut remove: impl FnMut(&Path) -> Result<bool, CacheError>,
) -> usize {
    let mut count = entries.len();
    let mut bytes: u64 = entries.iter().map(|e| e.len).sum();
    if count <= max_entries && bytes <= max_bytes {
        return 0;
    }

    entries.sort_by_key(|e| e.accessed);
    let mut removed = 0;
    let mut skipped = 0;
    for entry in entries {
        if count <= max_entries && bytes <= max_bytes {
            break;
        }
        match remove(&entry.path) {
            Ok(deleted) => {
                // Gone already still frees the slot
                count -= 1;
                bytes = bytes.saturating_sub(entry.len);
                if deleted {
                    removed += 1;
                }
            }
            Err(e) => {
                tracing::warn!("Skipping cache entry during cleanup: {}", e);
                skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Disk cache cleanup removed {} entries, skipped {} ({} entries, {} bytes remain)",
        removed,
        skipped,
        count,
        bytes
    );
    removed
}

fn encode(value: &HighlightResult) -> Result<Vec<u8>, CacheError> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + value.text.len() * 2);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    serde_json::to_writer(&mut bytes, value)?;
    Ok(bytes)
}

fn decode(bytes: &[u8]) -> Result<HighlightResult, CacheError> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(CacheError::Corrupt("missing header".to_string()));
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..HEADER_LEN]);
    let found = u32::from_le_bytes(version);
    if found != FORMAT_VERSION {
        return Err(CacheError::VersionMismatch {
            found,
            expected: FORMAT_VERSION,
        });
    }

    let result: HighlightResult = serde_json::from_slice(&bytes[HEADER_LEN..])
        .map_err(|e| CacheError::Corrupt(e.to_string()))?;
    if !result.spans_are_well_formed() {
        return Err(CacheError::Corrupt("spans out of order or bounds".to_string()));
    }
    Ok(result)
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Unique per process and per write, so concurrent writers never share one
fn temp_name(name: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(".{}.{}.{}.tmp", name, std::process::id(), n)
}

/// Best effort: a failed recency bump must not fail the read
fn touch(path: &Path) {
    let bumped = OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(SystemTime::now()));
    if let Err(e) = bumped {
        tracing::trace!("Could not bump mtime of {}: {}", path.display(), e);
    }
}

/// Remove a file, treating "already gone" as success; returns whether this
/// call removed it
fn remove_tolerant(path: &Path) -> Result<bool, CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn probe_writable(dir: &Path) -> Result<(), CacheError> {
    let probe = dir.join(temp_name("probe"));
    let result = write_file(&probe, b"glance").and_then(|()| fs::remove_file(&probe));
    result.map_err(|source| {
        let _ = fs::remove_file(&probe);
        CacheError::Unavailable {
            path: dir.to_path_buf(),
            source,
        }
    })
}
