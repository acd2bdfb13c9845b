//! Identity types for the property engine.
//!
//! Properties and resolvers live in flat arenas owned by the
//! [`PropertyTree`](crate::property::PropertyTree). The IDs here are newtypes
//! over `u32` that serve as direct indices into those arenas, so resolvers hold
//! indices rather than references and never dangle.

use std::fmt;
use std::marker::PhantomData;

/// Index into the property arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

impl PropertyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index into the resolver list. Also the resolver's position in sweep order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverId(pub u32);

impl ResolverId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ResolverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolverId({})", self.0)
    }
}

/// Typed, copyable reference to a registered property.
///
/// A handle is only minted by registration, so its `T` always matches the
/// stored value type.
pub struct PropertyHandle<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyHandle<T> {
    pub(crate) fn new(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn id(self) -> PropertyId {
        self.id
    }
}

impl<T> Clone for PropertyHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyHandle<T> {}

impl<T> PartialEq for PropertyHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for PropertyHandle<T> {}

impl<T> fmt::Debug for PropertyHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyHandle({})", self.id.0)
    }
}

impl<T> From<PropertyHandle<T>> for PropertyId {
    fn from(handle: PropertyHandle<T>) -> Self {
        handle.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_id() {
        let id = PropertyId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "PropertyId(42)");
    }

    #[test]
    fn test_handle_is_copy_and_erases() {
        let handle: PropertyHandle<f64> = PropertyHandle::new(PropertyId(7));
        let copy = handle;
        assert_eq!(handle, copy);
        assert_eq!(PropertyId::from(copy), PropertyId(7));
    }

    #[test]
    fn test_resolver_id() {
        assert_eq!(ResolverId(3).index(), 3);
    }
}
