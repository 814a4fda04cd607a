//! Shared backing list.
//!
//! The application owns the authoritative items and swaps them wholesale
//! whenever it reloads. Everything that looks at the list (cursors,
//! filters, renderers) holds a clone of the same [`ModelHandle`], so a
//! refresh is visible to all of them at once.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to a list of items.
///
/// ```
/// use lazylist::list::ModelHandle;
///
/// let model = ModelHandle::new(vec!["a".to_string(), "b".to_string()]);
/// let reader = model.clone();
/// model.replace(vec!["c".to_string()]);
/// assert_eq!(reader.len(), 1);
/// assert_eq!(reader.get(0).as_deref(), Some("c"));
/// ```
pub struct ModelHandle<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for ModelHandle<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for ModelHandle<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> fmt::Debug for ModelHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle").field("len", &self.len()).finish()
    }
}

impl<T> ModelHandle<T> {
    /// Wraps `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    // A writer that panicked left a complete Vec behind; keep using it.
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swaps in a freshly loaded list.
    pub fn replace(&self, items: Vec<T>) {
        *self.write() = items;
    }

    /// Mutates the list in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        f(&mut self.write())
    }

    /// Runs `f` over the current items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.read())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Reports whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<T: Clone> ModelHandle<T> {
    /// Clones the item at `idx`.
    pub fn get(&self, idx: usize) -> Option<T> {
        self.read().get(idx).cloned()
    }

    /// Clones the whole list.
    pub fn snapshot(&self) -> Vec<T> {
        self.read().clone()
    }
}
