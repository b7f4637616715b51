//! Per-device reading progress.
//!
//! A single fact per book: "the last page viewed is N", 1-indexed. The store
//! writes through an injected string-keyed capability so that the viewer shell
//! owns the backing store's lifecycle and tests can substitute an in-memory
//! fake. Both operations degrade instead of failing: an unavailable backing
//! store makes `save_page` a no-op and `load_page` return `None`, because
//! resume position is a convenience, never a requirement for reading.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Keys are `progress_` + the exact book id, so distinct ids can never
/// collide. Matches the key layout existing readers already have on disk.
pub const PROGRESS_KEY_PREFIX: &str = "progress_";

/// A string-keyed, string-valued store scoped to the running device.
/// Implementations swallow their own failures; neither operation may error.
pub trait KeyValue: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory implementation, used in tests and as a stand-in when no durable
/// store is available.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKeyValue {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

/// Durable implementation backed by a single JSON object on disk. Every
/// operation reads the file fresh, so independent instances over the same
/// path observe each other's writes. I/O or parse failures degrade to
/// absent/no-op and are logged at `debug`.
#[derive(Debug, Clone)]
pub struct FileKeyValue {
    path: PathBuf,
}

impl FileKeyValue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> HashMap<String, String> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "progress file unreadable");
                return HashMap::new();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(path = %self.path.display(), error = %e, "progress file corrupt");
            HashMap::new()
        })
    }
}

impl KeyValue for FileKeyValue {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        let Ok(bytes) = serde_json::to_vec(&map) else {
            return;
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&self.path, bytes) {
            tracing::debug!(path = %self.path.display(), error = %e, "progress write dropped");
        }
    }
}

/// The progress contract shared by every presentation mode: last write wins,
/// pages are 1-indexed, and anything that is not a valid positive integer in
/// the backing store reads back as absent.
#[derive(Clone)]
pub struct ReadingProgressStore {
    kv: Arc<dyn KeyValue>,
}

impl ReadingProgressStore {
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    fn key(book_id: &str) -> String {
        format!("{PROGRESS_KEY_PREFIX}{book_id}")
    }

    /// Overwrite the stored page for `book_id`. Safe to call on every
    /// page-change event; page 0 is never stored (missing means "no
    /// progress", not zero).
    pub fn save_page(&self, book_id: &str, page: u32) {
        if page == 0 {
            return;
        }
        self.kv.set(&Self::key(book_id), &page.to_string());
    }

    /// The previously saved page, or `None` if nothing was saved or the
    /// stored value is corrupt (non-numeric, zero, negative).
    pub fn load_page(&self, book_id: &str) -> Option<u32> {
        self.kv
            .get(&Self::key(book_id))?
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
    }
}
