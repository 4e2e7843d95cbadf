//! # Parse cache
//!
//! Memoizes parsed documents by exact (content, tags). The cache hands out
//! `Arc`s, so evicting an entry never invalidates a document a caller holds.
//!
//! Documents are computed outside the lock. Two threads missing on the same
//! key may both compute; the first to insert wins and the other thread gets
//! the stored value back, so every caller sees the same `Arc`.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use crate::document::ParsedDocument;
use crate::resolve::Tag;

/// Tags are part of the key verbatim: `#[n]` references are positional, so
/// reordering tags can change the result.
type CacheKey = (String, Vec<Tag>);

pub struct ParseCache {
    entries: Mutex<LruCache<CacheKey, Arc<ParsedDocument>>>,
}

impl ParseCache {
    pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(200).unwrap();

    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    // Recover from poisoned mutex (another thread panicked while holding lock)
    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<ParsedDocument>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key(content: &str, tags: &[Tag]) -> CacheKey {
        (content.to_owned(), tags.to_vec())
    }

    /// Returns the cached document, marking it most recently used.
    pub fn get(&self, content: &str, tags: &[Tag]) -> Option<Arc<ParsedDocument>> {
        self.lock().get(&Self::key(content, tags)).cloned()
    }

    pub fn get_or_compute(
        &self,
        content: &str,
        tags: &[Tag],
        compute: impl FnOnce() -> ParsedDocument,
    ) -> Arc<ParsedDocument> {
        let key = Self::key(content, tags);
        if let Some(hit) = self.lock().get(&key) {
            return Arc::clone(hit);
        }

        log::debug!(
            "parse cache miss: {} bytes, {} tags",
            content.len(),
            tags.len()
        );
        let computed = Arc::new(compute());

        let mut entries = self.lock();
        if let Some(existing) = entries.get(&key) {
            return Arc::clone(existing);
        }
        if let Some((evicted, _)) = entries.push(key, Arc::clone(&computed)) {
            log::debug!("parse cache evicted entry of {} bytes", evicted.0.len());
        }
        computed
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().cap()
    }
}

impl Default for ParseCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
