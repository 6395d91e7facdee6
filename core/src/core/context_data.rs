// ritual/src/core/context_data.rs
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state of a single pipeline run.
///
/// Every step handler of a run receives a clone of the same `ContextData`, so a
/// value written by one step (the order subtotal, the processed payment value)
/// is visible to the steps after it. Skeletons build a new one per run.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static> {
  inner: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    Self {
      inner: Arc::new(RwLock::new(data)),
    }
  }

  /// Blocks until shared access is available.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.inner.read()
  }

  /// Blocks until exclusive access is available.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.inner.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.inner.try_read()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.inner.try_write()
  }

  /// Read guard narrowed to one part of the run state,
  /// e.g. `run.map_read(|data| &data.subtotal)`.
  pub fn map_read<U: ?Sized>(&self, select: impl FnOnce(&T) -> &U) -> MappedRwLockReadGuard<'_, U> {
    RwLockReadGuard::map(self.read(), select)
  }

  /// Write guard narrowed to one part of the run state.
  pub fn map_write<U: ?Sized>(&self, select: impl FnOnce(&mut T) -> &mut U) -> MappedRwLockWriteGuard<'_, U> {
    RwLockWriteGuard::map(self.write(), select)
  }

  /// Takes the run state out once the run is over. Moves it when this is the
  /// last handle, clones it otherwise.
  pub fn into_inner(self) -> T
  where
    T: Clone,
  {
    match Arc::try_unwrap(self.inner) {
      Ok(lock) => lock.into_inner(),
      Err(shared) => {
        let data = shared.read().clone();
        data
      }
    }
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
