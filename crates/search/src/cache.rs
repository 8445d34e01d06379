//! Lazily built, atomically replaceable search index
//!
//! `IndexCache` owns the one current [`SearchIndex`] of a process (or of
//! whatever scope the host gives it). Readers get an `Arc` snapshot and keep
//! it for the whole query; a rebuild swaps the pointer without disturbing
//! readers that still hold the previous snapshot.
//!
//! Builds run outside the read/write lock. Only the pointer swap is
//! synchronized, so queries never wait on a build. A separate build mutex
//! keeps concurrent first callers from building more than once.
//!
//! The cache never decides on its own that the index is stale: the host
//! calls [`IndexCache::rebuild`] when its catalogue changes.

use crate::builder::IndexBuilder;
use crate::index::SearchIndex;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use triage_core::{CatalogueSource, IndexConfig, TriageResult};

/// Owner of the current search index
pub struct IndexCache {
    source: Arc<dyn CatalogueSource>,
    builder: IndexBuilder,
    current: RwLock<Option<Arc<SearchIndex>>>,
    build_lock: Mutex<()>,
    generation: AtomicU64,
}

impl IndexCache {
    /// Create an empty cache; nothing is built until first use
    pub fn new(source: Arc<dyn CatalogueSource>, config: IndexConfig) -> Self {
        IndexCache {
            source,
            builder: IndexBuilder::new(config),
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// The current index, building it on first call
    ///
    /// Every later call returns the same `Arc` until [`rebuild`](Self::rebuild)
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Propagates build errors from the first build. Nothing is cached on
    /// failure, so the next call tries again.
    pub fn get_index(&self) -> TriageResult<Arc<SearchIndex>> {
        if let Some(index) = self.current() {
            return Ok(index);
        }

        let _guard = self.build_lock.lock();
        // Another caller may have finished the build while we waited
        if let Some(index) = self.current() {
            return Ok(index);
        }

        tracing::debug!(target: "triage::cache", "Building search index on first use");
        let index = Arc::new(self.builder.build(&self.source.catalogue())?);
        self.install(Arc::clone(&index));
        Ok(index)
    }

    /// Build a fresh index from the source's current catalogue and make it
    /// current
    ///
    /// Snapshots handed out earlier stay valid and unchanged.
    ///
    /// # Errors
    ///
    /// Propagates build errors. The previous index, if any, stays current.
    pub fn rebuild(&self) -> TriageResult<Arc<SearchIndex>> {
        let _guard = self.build_lock.lock();
        let catalogue = self.source.catalogue();
        match self.builder.build(&catalogue) {
            Ok(index) => {
                let index = Arc::new(index);
                self.install(Arc::clone(&index));
                Ok(index)
            }
            Err(e) => {
                tracing::warn!(
                    target: "triage::cache",
                    version = %catalogue.version,
                    error = %e,
                    "Rebuild failed, keeping previous index"
                );
                Err(e)
            }
        }
    }

    /// The current index without building one
    pub fn current(&self) -> Option<Arc<SearchIndex>> {
        self.current.read().clone()
    }

    /// Whether an index has been built
    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }

    /// Number of successful builds so far
    ///
    /// Callers can remember the value and compare later to tell whether the
    /// index was replaced in between. A snapshot obtained from the cache is
    /// never newer than the generation read after it.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Configuration used for every build
    pub fn config(&self) -> &IndexConfig {
        self.builder.config()
    }

    fn install(&self, index: Arc<SearchIndex>) {
        let version = index.version().to_string();
        let mut current = self.current.write();
        let previous = current.replace(index);
        // Bumped under the write guard so a reader never sees the new index
        // with the old generation
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        drop(current);
        tracing::debug!(
            target: "triage::cache",
            version = %version,
            generation,
            replaced = previous.is_some(),
            "Installed search index"
        );
    }
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("config", self.builder.config())
            .field("built", &self.is_built())
            .field("generation", &self.generation())
            .finish()
    }
}
