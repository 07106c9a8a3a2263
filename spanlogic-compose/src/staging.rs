//! Named, ephemeral feature sets and their lifecycle.
//!
//! Every request stages one set per side. Names come from a process-wide counter so two
//! requests never race for the same name, and the store reserves a name atomically on
//! creation. The [`StagedSetGuard`] handed out for each set drops it from the store exactly
//! once, whether the request succeeds, fails, or unwinds.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use spanlogic_core::Feature;

use crate::consts::{DEFAULT_NAME_PREFIX, MAX_NAME_ATTEMPTS};
use crate::errors::StagingError;
use crate::params::Side;
use crate::policy::ExtractionPolicy;

static NEXT_NAME: AtomicU64 = AtomicU64::new(0);

///
/// The anchor-adjusted features of one side of one request.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFeatureSet {
    pub side: Side,
    pub policy: ExtractionPolicy,
    pub features: Vec<Feature>,
}

impl StagedFeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Whether strand filtering is meaningful for this set.
    pub fn has_orientation(&self) -> bool {
        self.policy.has_orientation()
    }
}

///
/// Backing store for staged sets, shared by all requests of a process.
///
pub trait StagingStore: Send + Sync {
    /// Materialize `set` under `name`; fails with `NameInUse` if the name is taken.
    fn create(&self, name: &str, set: Arc<StagedFeatureSet>) -> Result<(), StagingError>;

    fn fetch(&self, name: &str) -> Result<Arc<StagedFeatureSet>, StagingError>;

    fn drop_set(&self, name: &str) -> Result<(), StagingError>;

    fn contains(&self, name: &str) -> bool;

    /// Names of all live staged sets.
    fn names(&self) -> Vec<String>;
}

///
/// A [`StagingStore`] kept in process memory.
///
#[derive(Debug, Default)]
pub struct InMemoryStagingStore {
    sets: Mutex<HashMap<String, Arc<StagedFeatureSet>>>,
}

impl InMemoryStagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<StagedFeatureSet>>>, StagingError> {
        self.sets
            .lock()
            .map_err(|_| StagingError::Backend("staging store lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|sets| sets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StagingStore for InMemoryStagingStore {
    fn create(&self, name: &str, set: Arc<StagedFeatureSet>) -> Result<(), StagingError> {
        let mut sets = self.lock()?;
        if sets.contains_key(name) {
            return Err(StagingError::NameInUse(name.to_string()));
        }
        sets.insert(name.to_string(), set);
        Ok(())
    }

    fn fetch(&self, name: &str) -> Result<Arc<StagedFeatureSet>, StagingError> {
        self.lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| StagingError::Missing(name.to_string()))
    }

    fn drop_set(&self, name: &str) -> Result<(), StagingError> {
        self.lock()?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StagingError::Missing(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.lock()
            .map(|sets| sets.contains_key(name))
            .unwrap_or(false)
    }

    fn names(&self) -> Vec<String> {
        self.lock()
            .map(|sets| sets.keys().cloned().collect())
            .unwrap_or_default()
    }
}

///
/// Generates staged set names: `<prefix>_<pid>_<n>` with `n` from a process-wide counter.
///
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
}

impl Default for NameAllocator {
    fn default() -> Self {
        NameAllocator::new(DEFAULT_NAME_PREFIX)
    }
}

impl NameAllocator {
    pub fn new(prefix: &str) -> Self {
        NameAllocator {
            prefix: prefix.to_string(),
        }
    }

    pub fn allocate(&self) -> String {
        let n = NEXT_NAME.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}_{}", self.prefix, std::process::id(), n)
    }
}

///
/// Allocates names for staged sets and guarantees their release.
///
pub struct StagingLifecycle<'s> {
    store: &'s dyn StagingStore,
    names: NameAllocator,
}

impl<'s> StagingLifecycle<'s> {
    pub fn new(store: &'s dyn StagingStore, names: NameAllocator) -> Self {
        StagingLifecycle { store, names }
    }

    pub fn allocate_name(&self) -> String {
        self.names.allocate()
    }

    ///
    /// Store `set` under a fresh name and return the guard that owns it.
    ///
    /// A name already present in the store (e.g. left behind by an earlier process with the
    /// same pid) is skipped; staging gives up after a bounded number of attempts.
    ///
    pub fn materialize(&self, set: StagedFeatureSet) -> Result<StagedSetGuard<'s>, StagingError> {
        let set = Arc::new(set);
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = self.allocate_name();
            match self.store.create(&name, Arc::clone(&set)) {
                Ok(()) => {
                    debug!(
                        "Staged {} features of side {} as {}",
                        set.len(),
                        set.side,
                        name
                    );
                    return Ok(StagedSetGuard {
                        store: self.store,
                        name,
                        released: false,
                    });
                }
                Err(StagingError::NameInUse(name)) => {
                    debug!("Staged set name {} already taken, retrying", name);
                }
                Err(err) => return Err(err),
            }
        }
        Err(StagingError::NamesExhausted(MAX_NAME_ATTEMPTS))
    }

    pub fn release(&self, guard: StagedSetGuard<'s>) -> Result<(), StagingError> {
        guard.release()
    }
}

///
/// Scoped ownership of one staged set. Releases the set on drop unless
/// [`release`](StagedSetGuard::release) was called.
///
pub struct StagedSetGuard<'s> {
    store: &'s dyn StagingStore,
    name: String,
    released: bool,
}

impl StagedSetGuard<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fetch(&self) -> Result<Arc<StagedFeatureSet>, StagingError> {
        self.store.fetch(&self.name)
    }

    /// Drop the set now, reporting failure to the caller.
    pub fn release(mut self) -> Result<(), StagingError> {
        self.released = true;
        self.store.drop_set(&self.name)?;
        debug!("Released staged set {}", self.name);
        Ok(())
    }
}

impl Drop for StagedSetGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.store.drop_set(&self.name) {
            Ok(()) => debug!("Released staged set {} on early exit", self.name),
            Err(err) => warn!("Failed to release staged set {}: {}", self.name, err),
        }
    }
}
