//! Reactive property engine.
//!
//! Nodes declare typed properties and resolvers that keep them consistent.
//! Writing a property starts a resolution pass that fires every resolver
//! watching it, collects what those resolvers changed, and repeats until
//! nothing changes.
//!
//! # Design
//!
//! - **Arena storage** - properties live in a flat `Vec` owned by the
//!   `PropertyTree`; resolvers hold `PropertyHandle<T>` indices, never
//!   references.
//! - **Closed value set** - `AnyProperty` is an enum over the supported value
//!   types (`f64`, `usize`, `String`); typed access goes through
//!   `PropertyType` instead of trait objects.
//! - **Worklist resolution** - passes are iterative with a sweep bound, so a
//!   non-terminating resolver set is reported as an error instead of
//!   overflowing the stack.
//! - **Deterministic order** - resolvers run in registration order within a
//!   sweep.

pub mod error;
pub mod id;
pub mod source;
pub mod store;
pub mod tree;
pub mod value;

pub use error::{PropertyError, PropertyResult};
pub use id::{PropertyHandle, PropertyId, ResolverId};
pub use source::{
    SourceInfo, SourceKind, PROP_KEY_MTU, PROP_KEY_SAMP_RATE, PROP_KEY_SCALING,
    PROP_KEY_TICK_RATE, PROP_KEY_TYPE,
};
pub use store::{PropertySnapshot, PropertyStore};
pub use tree::{PropertyTree, ResolveReport, ResolverContext, ResolverFn};
pub use value::{AnyProperty, Property, PropertyType, PropertyValue};
