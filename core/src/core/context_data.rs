// vitrina-saga/src/core/context_data.rs
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared saga context: every step handler and compensator receives a clone
/// pointing at the same data.
///
/// Guards are blocking `parking_lot` guards. Read what you need, drop the
/// guard, then `.await`; never hold one across a suspension point.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.0.try_write()
  }

  /// Read guard narrowed to one part of the context, e.g. `ctx.map_read(|d| &d.title)`.
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Runs `f` under the write lock and returns its result. The lock is
  /// released before this returns, so it is safe to call between awaits.
  pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = self.0.write();
    f(&mut guard)
  }

  /// Number of live handles to this context.
  pub fn handle_count(&self) -> usize {
    Arc::strong_count(&self.0)
  }
}

impl<T: Send + Sync + Clone + 'static> ContextData<T> {
  /// Clones the current data out of the context.
  pub fn snapshot(&self) -> T {
    self.0.read().clone()
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
