//! Memo table of hydrated entities.
//!
//! Each name owns a slot. The table lock is only held long enough to find or
//! create a slot; loading runs under the slot lock, so callers racing on the
//! same name wait for a single load while other names proceed.
//!
//! A slot is filled at most once and never cleared. A failed or empty load
//! drops the slot from the table, so only hydrated names stay resident and
//! the next caller tries again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::entity::Entity;

type Slot = Arc<Mutex<Option<Arc<dyn Entity>>>>;

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
  /// Records read from the backing store.
  pub record_reads: u64,
  /// Entities constructed from records.
  pub hydrations: u64,
  /// Lookups answered from memory.
  pub memo_hits: u64,
}

#[derive(Debug, Default)]
struct Counters {
  record_reads: AtomicU64,
  hydrations: AtomicU64,
  memo_hits: AtomicU64,
}

#[derive(Debug, Default)]
pub struct MemoCache {
  slots: Mutex<HashMap<String, Slot>>,
  counters: Counters,
}

/// Lock a mutex, recovering from poisoning. Slots only ever hold nothing or
/// a complete entity, so the data behind a poisoned lock is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached entity for `name`, without loading.
  pub fn get(&self, name: &str) -> Option<Arc<dyn Entity>> {
    let slot = lock(&self.slots).get(name).cloned()?;
    let entity = lock(&slot).clone();
    if entity.is_some() {
      self.counters.memo_hits.fetch_add(1, Ordering::Relaxed);
    }
    entity
  }

  /// Return the entity cached for `name`, or run `load` once to produce it.
  ///
  /// Concurrent callers for the same name block until the first finishes.
  /// `Ok(None)` and errors from `load` are passed through and not cached.
  pub fn get_or_try_load<E, F>(&self, name: &str, load: F) -> Result<Option<Arc<dyn Entity>>, E>
  where
    F: FnOnce() -> Result<Option<Arc<dyn Entity>>, E>,
  {
    loop {
      let slot = Arc::clone(lock(&self.slots).entry(name.to_string()).or_default());
      let mut guard = lock(&slot);

      if let Some(entity) = guard.as_ref() {
        trace!(name, "memo hit");
        self.counters.memo_hits.fetch_add(1, Ordering::Relaxed);
        return Ok(Some(Arc::clone(entity)));
      }

      // A previous load missed and evicted this slot while we waited on it.
      if !self.is_registered(name, &slot) {
        continue;
      }

      let loaded = load();
      match &loaded {
        Ok(Some(entity)) => {
          self.counters.hydrations.fetch_add(1, Ordering::Relaxed);
          *guard = Some(Arc::clone(entity));
        }
        Ok(None) | Err(_) => self.evict_empty(name, &slot),
      }
      return loaded;
    }
  }

  fn is_registered(&self, name: &str, slot: &Slot) -> bool {
    lock(&self.slots).get(name).is_some_and(|current| Arc::ptr_eq(current, slot))
  }

  /// Drop `slot` from the table if it is still the one registered for `name`.
  /// Called with the slot lock held, so no waiter can have filled it.
  fn evict_empty(&self, name: &str, slot: &Slot) {
    let mut slots = lock(&self.slots);
    if slots.get(name).is_some_and(|current| Arc::ptr_eq(current, slot)) {
      slots.remove(name);
    }
  }

  /// Count one read of the backing store.
  pub fn record_read(&self) {
    self.counters.record_reads.fetch_add(1, Ordering::Relaxed);
  }

  pub fn contains(&self, name: &str) -> bool {
    let slot = lock(&self.slots).get(name).cloned();
    slot.is_some_and(|slot| lock(&slot).is_some())
  }

  /// Names with a hydrated entity, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self
      .snapshot()
      .into_iter()
      .filter(|(_, slot)| lock(slot).is_some())
      .map(|(name, _)| name)
      .collect();
    names.sort();
    names
  }

  pub fn len(&self) -> usize {
    self.snapshot().iter().filter(|(_, slot)| lock(slot).is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Copy of the table, so slot locks are never taken under the table lock.
  fn snapshot(&self) -> Vec<(String, Slot)> {
    lock(&self.slots).iter().map(|(name, slot)| (name.clone(), Arc::clone(slot))).collect()
  }

  pub fn stats(&self) -> CacheStats {
    CacheStats {
      record_reads: self.counters.record_reads.load(Ordering::Relaxed),
      hydrations: self.counters.hydrations.load(Ordering::Relaxed),
      memo_hits: self.counters.memo_hits.load(Ordering::Relaxed),
    }
  }
}
