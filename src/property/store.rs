//! Flat arena of registered properties plus change tracking.

use crate::property::error::{PropertyError, PropertyResult};
use crate::property::id::{PropertyHandle, PropertyId};
use crate::property::source::SourceInfo;
use crate::property::value::{AnyProperty, Property, PropertyType, PropertyValue};
use serde::Serialize;

/// Serializable view of one registered property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub key: String,
    pub source: SourceInfo,
    pub value: Option<PropertyValue>,
}

/// Owns every property of a node. Properties are never removed, so a
/// `PropertyId` stays valid for the lifetime of the store.
#[derive(Debug, Default)]
pub struct PropertyStore {
    slots: Vec<AnyProperty>,
    /// Properties whose value changed since the last `take_changed`, in
    /// first-change order.
    changed: Vec<PropertyId>,
    changed_flags: Vec<bool>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add a property. Fails if a property with the same key and source
    /// already exists.
    pub fn register<T: PropertyType>(
        &mut self,
        property: Property<T>,
    ) -> PropertyResult<PropertyHandle<T>> {
        if self.find(property.key(), property.source()).is_some() {
            return Err(PropertyError::DuplicateKey {
                key: property.key().to_string(),
                source_info: property.source(),
            });
        }

        let id = PropertyId(self.slots.len() as u32);
        self.slots.push(T::wrap(property));
        self.changed_flags.push(false);
        Ok(PropertyHandle::new(id))
    }

    /// Look up a property by identity.
    pub fn find(&self, key: &str, source: SourceInfo) -> Option<PropertyId> {
        self.slots
            .iter()
            .position(|p| p.key() == key && p.source() == source)
            .map(|idx| PropertyId(idx as u32))
    }

    /// Look up a property by identity and check its value type.
    pub fn handle<T: PropertyType>(
        &self,
        key: &str,
        source: SourceInfo,
    ) -> PropertyResult<PropertyHandle<T>> {
        let id = self
            .find(key, source)
            .ok_or_else(|| PropertyError::UnknownProperty {
                key: key.to_string(),
                source_info: source,
            })?;

        let slot = &self.slots[id.index()];
        if T::unwrap_ref(slot).is_none() {
            return Err(PropertyError::TypeMismatch {
                key: key.to_string(),
                requested: T::TYPE_NAME,
                actual: slot.type_name(),
            });
        }
        Ok(PropertyHandle::new(id))
    }

    pub fn property<T: PropertyType>(&self, handle: PropertyHandle<T>) -> &Property<T> {
        // Handles are only minted for slots of type T.
        match T::unwrap_ref(&self.slots[handle.id().index()]) {
            Some(prop) => prop,
            None => unreachable!("property handle type does not match its slot"),
        }
    }

    fn property_mut<T: PropertyType>(&mut self, handle: PropertyHandle<T>) -> &mut Property<T> {
        match T::unwrap_mut(&mut self.slots[handle.id().index()]) {
            Some(prop) => prop,
            None => unreachable!("property handle type does not match its slot"),
        }
    }

    pub fn get<T: PropertyType>(&self, handle: PropertyHandle<T>) -> PropertyResult<&T> {
        self.property(handle).get()
    }

    pub fn is_valid<T: PropertyType>(&self, handle: PropertyHandle<T>) -> bool {
        self.property(handle).is_valid()
    }

    /// Write a value. Returns `true` and records the property as changed if
    /// the value differs from what was stored.
    pub fn set<T: PropertyType>(&mut self, handle: PropertyHandle<T>, value: T) -> bool {
        let changed = self.property_mut(handle).set(value);
        if changed {
            self.mark_changed(handle.id());
        }
        changed
    }

    /// Copy of every value, to be handed back to `rollback`.
    pub(crate) fn checkpoint(&self) -> Vec<AnyProperty> {
        self.slots.clone()
    }

    /// Return to a checkpoint and forget pending changes.
    pub(crate) fn rollback(&mut self, saved: Vec<AnyProperty>) {
        debug_assert_eq!(saved.len(), self.slots.len());
        self.slots = saved;
        self.take_changed();
    }

    fn mark_changed(&mut self, id: PropertyId) {
        let flag = &mut self.changed_flags[id.index()];
        if !*flag {
            *flag = true;
            self.changed.push(id);
        }
    }

    /// Drain the set of properties changed since the last call.
    pub fn take_changed(&mut self) -> Vec<PropertyId> {
        for id in &self.changed {
            self.changed_flags[id.index()] = false;
        }
        std::mem::take(&mut self.changed)
    }

    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Display name (`key@source`) of a property, for diagnostics.
    pub fn describe(&self, id: PropertyId) -> String {
        self.slots
            .get(id.index())
            .map(|p| p.to_string())
            .unwrap_or_else(|| format!("{}", id))
    }

    pub fn snapshot(&self) -> Vec<PropertySnapshot> {
        self.slots
            .iter()
            .map(|p| PropertySnapshot {
                key: p.key().to_string(),
                source: p.source(),
                value: p.value(),
            })
            .collect()
    }
}
