//! Shared, copy-on-write storage for composite values.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// `Arc`-backed storage for array contents.
///
/// Cloning shares the allocation. [`Heap::make_mut`] detaches the caller's
/// copy before the first write, so a cloned `Value` behaves exactly like a
/// deep copy without paying for one up front.
pub struct Heap<T>(pub(super) Arc<T>);

impl<T> Heap<T> {
    pub(super) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }

    /// Whether two handles share one allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Clone> Heap<T> {
    /// Mutable access, cloning the contents first if they are shared.
    pub fn make_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.0)
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
