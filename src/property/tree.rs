//! Resolver registry and the fixed-point resolution pass.
//!
//! A resolution pass is an explicit worklist loop:
//!
//! ```text
//! worklist = properties just written
//! loop while worklist is non-empty:
//!     for each resolver, in registration order:
//!         fire it if one of its triggers is in the worklist
//!     worklist = properties whose value actually changed during the sweep
//! ```
//!
//! Writes that store an equal value do not count as changes, which is what
//! lets idempotent resolvers reach a fixed point. A pass that is still
//! producing changes after `max_iterations` sweeps fails with
//! [`PropertyError::Convergence`].
//!
//! The tree is generic over the node state `S` that resolvers act on (for the
//! transmit streamer: its backend and MTU ceiling). The state is passed into
//! each pass rather than captured, so resolver closures only hold property
//! handles and plain values.

use crate::property::error::{PropertyError, PropertyResult};
use crate::property::id::{PropertyHandle, PropertyId, ResolverId};
use crate::property::source::SourceInfo;
use crate::property::store::{PropertySnapshot, PropertyStore};
use crate::property::value::{Property, PropertyType};
use serde::Serialize;

/// Resolver body. Returns an error only for genuine failures of whatever the
/// resolver drives; an unset input is expected and should be skipped.
pub type ResolverFn<S> =
    Box<dyn FnMut(&mut ResolverContext<'_, S>) -> anyhow::Result<()> + Send + 'static>;

struct Resolver<S> {
    name: String,
    triggers: Vec<PropertyId>,
    outputs: Vec<PropertyId>,
    func: ResolverFn<S>,
}

/// What a resolution pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Number of sweeps over the resolver list.
    pub sweeps: usize,
    /// Number of resolver invocations across all sweeps.
    pub invocations: usize,
    /// Number of property values changed by resolvers.
    pub writes: usize,
}

impl ResolveReport {
    /// True if the pass did not run anything.
    pub fn is_noop(&self) -> bool {
        self.sweeps == 0
    }

    fn absorb(&mut self, other: ResolveReport) {
        self.sweeps += other.sweeps;
        self.invocations += other.invocations;
        self.writes += other.writes;
    }
}

/// View handed to a resolver while it runs.
///
/// Reads are unrestricted. Writes are limited to the outputs the resolver
/// declared at registration; anything else is recorded as a violation and
/// fails the pass even if the resolver discards the returned error.
pub struct ResolverContext<'a, S> {
    store: &'a mut PropertyStore,
    state: &'a mut S,
    resolver: &'a str,
    outputs: &'a [PropertyId],
    violation: Option<PropertyError>,
}

impl<'a, S> ResolverContext<'a, S> {
    pub fn resolver_name(&self) -> &str {
        self.resolver
    }

    pub fn is_valid<T: PropertyType>(&self, handle: PropertyHandle<T>) -> bool {
        self.store.is_valid(handle)
    }

    pub fn get<T: PropertyType>(&self, handle: PropertyHandle<T>) -> PropertyResult<&T> {
        self.store.get(handle)
    }

    /// The current value, or `None` while unset.
    pub fn value<T: PropertyType>(&self, handle: PropertyHandle<T>) -> Option<T> {
        self.store.get(handle).ok().cloned()
    }

    /// Write a declared output. Returns whether the value changed.
    pub fn set<T: PropertyType>(
        &mut self,
        handle: PropertyHandle<T>,
        value: T,
    ) -> PropertyResult<bool> {
        if !self.outputs.contains(&handle.id()) {
            let resolver = self.resolver.to_string();
            let property = self.store.describe(handle.id());
            self.violation
                .get_or_insert_with(|| PropertyError::UndeclaredWrite {
                    resolver: resolver.clone(),
                    property: property.clone(),
                });
            return Err(PropertyError::UndeclaredWrite { resolver, property });
        }
        Ok(self.store.set(handle, value))
    }

    pub fn state(&self) -> &S {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        self.state
    }
}

/// Property set of one node plus the resolvers that keep it consistent.
pub struct PropertyTree<S> {
    store: PropertyStore,
    resolvers: Vec<Resolver<S>>,
    max_iterations: usize,
}

impl<S> PropertyTree<S> {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            store: PropertyStore::new(),
            resolvers: Vec::new(),
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub fn num_resolvers(&self) -> usize {
        self.resolvers.len()
    }

    pub fn register_property<T: PropertyType>(
        &mut self,
        property: Property<T>,
    ) -> PropertyResult<PropertyHandle<T>> {
        tracing::trace!("Registering property {}", property);
        self.store.register(property)
    }

    /// Register a resolver.
    ///
    /// `triggers` are the properties whose changes fire it; an empty trigger
    /// list fires it on every sweep. `outputs` are the only properties it may
    /// write.
    pub fn add_property_resolver<F>(
        &mut self,
        name: impl Into<String>,
        triggers: impl IntoIterator<Item = PropertyId>,
        outputs: impl IntoIterator<Item = PropertyId>,
        func: F,
    ) -> ResolverId
    where
        F: FnMut(&mut ResolverContext<'_, S>) -> anyhow::Result<()> + Send + 'static,
    {
        let mut triggers: Vec<PropertyId> = triggers.into_iter().collect();
        triggers.sort();
        triggers.dedup();
        let mut outputs: Vec<PropertyId> = outputs.into_iter().collect();
        outputs.sort();
        outputs.dedup();
        debug_assert!(
            triggers
                .iter()
                .chain(outputs.iter())
                .all(|id| id.index() < self.store.len()),
            "resolver references a property that is not registered"
        );

        let id = ResolverId(self.resolvers.len() as u32);
        self.resolvers.push(Resolver {
            name: name.into(),
            triggers,
            outputs,
            func: Box::new(func),
        });
        id
    }

    pub fn get<T: PropertyType>(&self, handle: PropertyHandle<T>) -> PropertyResult<&T> {
        self.store.get(handle)
    }

    pub fn is_valid<T: PropertyType>(&self, handle: PropertyHandle<T>) -> bool {
        self.store.is_valid(handle)
    }

    pub fn handle<T: PropertyType>(
        &self,
        key: &str,
        source: SourceInfo,
    ) -> PropertyResult<PropertyHandle<T>> {
        self.store.handle(key, source)
    }

    pub fn snapshot(&self) -> Vec<PropertySnapshot> {
        self.store.snapshot()
    }

    /// Write a property and resolve until nothing changes. Writing the value
    /// already stored is a no-op and runs no resolvers.
    pub fn set<T: PropertyType>(
        &mut self,
        handle: PropertyHandle<T>,
        value: T,
        state: &mut S,
    ) -> PropertyResult<ResolveReport> {
        if self.store.get(handle).ok() == Some(&value) {
            return Ok(ResolveReport::default());
        }
        let saved = self.store.checkpoint();
        self.store.set(handle, value);
        let seeds = self.store.take_changed();
        match self.run_pass(state, seeds, false) {
            Ok(report) => Ok(report),
            Err(e) => {
                // A rejected value must not look stored to the next `set`.
                self.store.rollback(saved);
                Err(e)
            }
        }
    }

    /// Initial pass: every resolver runs once, then changes propagate as usual.
    pub fn init_props(&mut self, state: &mut S) -> PropertyResult<ResolveReport> {
        let seeds = self.store.take_changed();
        self.run_pass(state, seeds, true)
    }

    fn run_pass(
        &mut self,
        state: &mut S,
        worklist: Vec<PropertyId>,
        run_all: bool,
    ) -> PropertyResult<ResolveReport> {
        let result = self.resolve(state, worklist, run_all);
        if result.is_err() && self.store.has_changes() {
            // Writes of the failed pass must not seed the next one.
            let dropped = self.store.take_changed();
            tracing::debug!("Discarding {} pending changes of failed pass", dropped.len());
        }
        result
    }

    fn resolve(
        &mut self,
        state: &mut S,
        mut worklist: Vec<PropertyId>,
        mut run_all: bool,
    ) -> PropertyResult<ResolveReport> {
        let mut report = ResolveReport::default();
        let mut dirty = vec![false; self.store.len()];

        while run_all || !worklist.is_empty() {
            if report.sweeps >= self.max_iterations {
                let pending = worklist.iter().map(|id| self.store.describe(*id)).collect();
                tracing::error!(
                    "Property resolution did not converge after {} sweeps",
                    report.sweeps
                );
                return Err(PropertyError::Convergence {
                    iterations: report.sweeps,
                    pending,
                });
            }

            dirty.iter_mut().for_each(|d| *d = false);
            for id in &worklist {
                dirty[id.index()] = true;
            }

            let sweep = self.sweep(state, &dirty, run_all)?;
            report.absorb(sweep);

            run_all = false;
            worklist = self.store.take_changed();
            report.writes += worklist.len();
        }

        tracing::debug!(
            "Resolution converged: {} sweeps, {} invocations, {} writes",
            report.sweeps,
            report.invocations,
            report.writes
        );
        Ok(report)
    }

    fn sweep(
        &mut self,
        state: &mut S,
        dirty: &[bool],
        run_all: bool,
    ) -> PropertyResult<ResolveReport> {
        let mut report = ResolveReport {
            sweeps: 1,
            ..Default::default()
        };

        for resolver in self.resolvers.iter_mut() {
            let Resolver {
                name,
                triggers,
                outputs,
                func,
            } = resolver;

            let fire = run_all
                || triggers.is_empty()
                || triggers.iter().any(|t| dirty[t.index()]);
            if !fire {
                continue;
            }

            tracing::trace!("Calling resolver for {}", name);
            report.invocations += 1;

            let mut ctx = ResolverContext {
                store: &mut self.store,
                state: &mut *state,
                resolver: name.as_str(),
                outputs: outputs.as_slice(),
                violation: None,
            };
            let result = func(&mut ctx);
            if let Some(violation) = ctx.violation.take() {
                return Err(violation);
            }
            result.map_err(|source| PropertyError::Resolver {
                resolver: name.clone(),
                source,
            })?;
        }

        Ok(report)
    }
}

impl<S> std::fmt::Debug for PropertyTree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyTree")
            .field("properties", &self.store.len())
            .field("resolvers", &self.resolvers.len())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
