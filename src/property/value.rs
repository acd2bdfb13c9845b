//! Typed property cells and their type-erased storage form.
//!
//! `Property<T>` is the user-facing typed cell. The engine stores properties
//! of the few supported value types side by side as [`AnyProperty`], a closed
//! enum; [`PropertyType`] maps between the two without dynamic dispatch.

use crate::property::error::{PropertyError, PropertyResult};
use crate::property::source::SourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed, identity-tagged, possibly-unset value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    key: String,
    source: SourceInfo,
    value: Option<T>,
}

impl<T: PartialEq> Property<T> {
    /// Create an unset property.
    pub fn new(key: impl Into<String>, source: SourceInfo) -> Self {
        Self {
            key: key.into(),
            source,
            value: None,
        }
    }

    /// Create a property that starts out set to `value`.
    pub fn with_value(key: impl Into<String>, value: T, source: SourceInfo) -> Self {
        Self {
            key: key.into(),
            source,
            value: Some(value),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> SourceInfo {
        self.source
    }

    /// True once a value has been set.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// Read the value; fails with `NotSet` while unset.
    pub fn get(&self) -> PropertyResult<&T> {
        self.value.as_ref().ok_or_else(|| PropertyError::NotSet {
            key: self.key.clone(),
            source_info: self.source,
        })
    }

    /// Store `value`. Returns `true` if the stored value actually changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value.as_ref() == Some(&value) {
            return false;
        }
        self.value = Some(value);
        true
    }
}

impl<T> fmt::Display for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.source)
    }
}

/// Snapshot of a property value, independent of its static type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Double(f64),
    Size(usize),
    Text(String),
}

impl PropertyValue {
    pub fn as_double(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<usize> {
        match self {
            PropertyValue::Size(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Storage form of a property: one variant per supported value type.
#[derive(Debug, Clone)]
pub enum AnyProperty {
    Double(Property<f64>),
    Size(Property<usize>),
    Text(Property<String>),
}

impl AnyProperty {
    pub fn key(&self) -> &str {
        match self {
            AnyProperty::Double(p) => p.key(),
            AnyProperty::Size(p) => p.key(),
            AnyProperty::Text(p) => p.key(),
        }
    }

    pub fn source(&self) -> SourceInfo {
        match self {
            AnyProperty::Double(p) => p.source(),
            AnyProperty::Size(p) => p.source(),
            AnyProperty::Text(p) => p.source(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            AnyProperty::Double(p) => p.is_valid(),
            AnyProperty::Size(p) => p.is_valid(),
            AnyProperty::Text(p) => p.is_valid(),
        }
    }

    /// Name of the stored value type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyProperty::Double(_) => f64::TYPE_NAME,
            AnyProperty::Size(_) => usize::TYPE_NAME,
            AnyProperty::Text(_) => String::TYPE_NAME,
        }
    }

    pub fn value(&self) -> Option<PropertyValue> {
        match self {
            AnyProperty::Double(p) => p.get().ok().map(|v| PropertyValue::Double(*v)),
            AnyProperty::Size(p) => p.get().ok().map(|v| PropertyValue::Size(*v)),
            AnyProperty::Text(p) => p.get().ok().map(|v| PropertyValue::Text(v.clone())),
        }
    }
}

impl fmt::Display for AnyProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key(), self.source())
    }
}

/// Value types a property may hold.
pub trait PropertyType: Clone + PartialEq + fmt::Debug + Sized + 'static {
    const TYPE_NAME: &'static str;

    fn wrap(property: Property<Self>) -> AnyProperty;

    fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>>;

    fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>>;
}

impl PropertyType for f64 {
    const TYPE_NAME: &'static str = "double";

    fn wrap(property: Property<Self>) -> AnyProperty {
        AnyProperty::Double(property)
    }

    fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>> {
        match any {
            AnyProperty::Double(p) => Some(p),
            _ => None,
        }
    }

    fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>> {
        match any {
            AnyProperty::Double(p) => Some(p),
            _ => None,
        }
    }
}

impl PropertyType for usize {
    const TYPE_NAME: &'static str = "size_t";

    fn wrap(property: Property<Self>) -> AnyProperty {
        AnyProperty::Size(property)
    }

    fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>> {
        match any {
            AnyProperty::Size(p) => Some(p),
            _ => None,
        }
    }

    fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>> {
        match any {
            AnyProperty::Size(p) => Some(p),
            _ => None,
        }
    }
}

impl PropertyType for String {
    const TYPE_NAME: &'static str = "string";

    fn wrap(property: Property<Self>) -> AnyProperty {
        AnyProperty::Text(property)
    }

    fn unwrap_ref(any: &AnyProperty) -> Option<&Property<Self>> {
        match any {
            AnyProperty::Text(p) => Some(p),
            _ => None,
        }
    }

    fn unwrap_mut(any: &mut AnyProperty) -> Option<&mut Property<Self>> {
        match any {
            AnyProperty::Text(p) => Some(p),
            _ => None,
        }
    }
}
