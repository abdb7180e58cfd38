//! Diagnostic observers for dependency graph construction.
//!
//! This module provides hooks for observing what the tree builder does while
//! it walks constructor signatures: which nodes it creates, which constructor
//! it picks for a type, which parameters it cannot match, and where it cuts a
//! cycle. Useful for explaining why an expected edge is missing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::{ConstructorInfo, ParameterInfo};
use crate::descriptors::ServiceDescriptor;
use crate::key::TypeKey;

/// Observer trait for tree-building events.
///
/// Observer calls are made synchronously from the depth-first traversal.
/// Keep implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_di_viz::{BuildObserver, ServiceDescriptor, TreeBuilder, TypeCatalog, TypeKey};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct CycleCollector {
///     cycles: Mutex<Vec<String>>,
/// }
///
/// impl BuildObserver for CycleCollector {
///     fn node_created(&self, _descriptor: &ServiceDescriptor, _depth: usize) {}
///
///     fn cycle_detected(&self, ty: &TypeKey, _depth: usize) {
///         self.cycles.lock().unwrap().push(ty.display_name());
///     }
/// }
///
/// let catalog = TypeCatalog::new();
/// let collector = Arc::new(CycleCollector::default());
/// let builder = TreeBuilder::new(&catalog).with_observer(collector.clone());
/// # let _ = builder;
/// ```
pub trait BuildObserver: Send + Sync {
    /// Called for every node, roots included (`depth == 0`).
    fn node_created(&self, descriptor: &ServiceDescriptor, depth: usize);

    /// Called when the traversal reaches a type already on the current path.
    fn cycle_detected(&self, ty: &TypeKey, depth: usize);

    /// Called once a constructor has been picked for `ty`.
    fn constructor_selected(&self, ty: &TypeKey, constructor: &ConstructorInfo) {
        let _ = (ty, constructor);
    }

    /// Called when `ty` is unknown or has no public constructor.
    fn no_constructor(&self, ty: &TypeKey) {
        let _ = ty;
    }

    /// Called for each parameter that rules out a candidate constructor of `ty`.
    fn parameter_unmatched(&self, ty: &TypeKey, parameter: &ParameterInfo) {
        let _ = (ty, parameter);
    }
}

/// Container for registered observers.
///
/// Designed to have no overhead beyond an emptiness check when no observers
/// are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn BuildObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn BuildObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn node_created(&self, descriptor: &ServiceDescriptor, depth: usize) {
        for observer in &self.observers {
            observer.node_created(descriptor, depth);
        }
    }

    #[inline]
    pub(crate) fn cycle_detected(&self, ty: &TypeKey, depth: usize) {
        for observer in &self.observers {
            observer.cycle_detected(ty, depth);
        }
    }

    #[inline]
    pub(crate) fn constructor_selected(&self, ty: &TypeKey, constructor: &ConstructorInfo) {
        for observer in &self.observers {
            observer.constructor_selected(ty, constructor);
        }
    }

    #[inline]
    pub(crate) fn no_constructor(&self, ty: &TypeKey) {
        for observer in &self.observers {
            observer.no_constructor(ty);
        }
    }

    #[inline]
    pub(crate) fn parameter_unmatched(&self, ty: &TypeKey, parameter: &ParameterInfo) {
        for observer in &self.observers {
            observer.parameter_unmatched(ty, parameter);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Node and cycle events are logged at `debug`, constructor decisions at
/// `trace`. Every event carries the observer's `prefix` field so output from
/// several trees can be told apart.
///
/// # Examples
///
/// ```
/// use ferrous_di_viz::{LoggingObserver, TreeBuilder, TypeCatalog};
/// use std::sync::Arc;
///
/// let catalog = TypeCatalog::new();
/// let builder = TreeBuilder::new(&catalog)
///     .with_observer(Arc::new(LoggingObserver::with_prefix("startup")));
/// # let _ = builder;
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { prefix: "[ferrous-di-viz]".to_string() }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildObserver for LoggingObserver {
    fn node_created(&self, descriptor: &ServiceDescriptor, depth: usize) {
        tracing::debug!(
            prefix = %self.prefix,
            service = %descriptor.service_type,
            implementation = %descriptor.implementation_description(),
            lifetime = %descriptor.lifetime,
            depth,
            "node created"
        );
    }

    fn cycle_detected(&self, ty: &TypeKey, depth: usize) {
        tracing::debug!(prefix = %self.prefix, ty = %ty.full_name(), depth, "cycle cut");
    }

    fn constructor_selected(&self, ty: &TypeKey, constructor: &ConstructorInfo) {
        tracing::trace!(
            prefix = %self.prefix,
            ty = %ty.full_name(),
            parameters = constructor.parameters.len(),
            "constructor selected"
        );
    }

    fn no_constructor(&self, ty: &TypeKey) {
        tracing::trace!(prefix = %self.prefix, ty = %ty.full_name(), "no usable constructor");
    }

    fn parameter_unmatched(&self, ty: &TypeKey, parameter: &ParameterInfo) {
        tracing::trace!(
            prefix = %self.prefix,
            ty = %ty.full_name(),
            parameter = %parameter.name,
            parameter_type = %parameter.ty.full_name(),
            "constructor rejected: parameter has no registration"
        );
    }
}

/// Observer that counts traversal events.
pub struct MetricsObserver {
    pub node_count: AtomicU64,
    pub cycle_count: AtomicU64,
    pub unmatched_parameter_count: AtomicU64,
    pub max_depth: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            node_count: AtomicU64::new(0),
            cycle_count: AtomicU64::new(0),
            unmatched_parameter_count: AtomicU64::new(0),
            max_depth: AtomicU64::new(0),
        }
    }

    /// Total nodes created, roots included.
    pub fn node_count(&self) -> u64 {
        self.node_count.load(Ordering::Relaxed)
    }

    /// Number of times the cycle guard cut a path.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::Relaxed)
    }

    pub fn unmatched_parameter_count(&self) -> u64 {
        self.unmatched_parameter_count.load(Ordering::Relaxed)
    }

    /// Deepest node depth seen (roots are depth 0).
    pub fn max_depth(&self) -> u64 {
        self.max_depth.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.node_count.store(0, Ordering::Relaxed);
        self.cycle_count.store(0, Ordering::Relaxed);
        self.unmatched_parameter_count.store(0, Ordering::Relaxed);
        self.max_depth.store(0, Ordering::Relaxed);
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildObserver for MetricsObserver {
    fn node_created(&self, _descriptor: &ServiceDescriptor, depth: usize) {
        self.node_count.fetch_add(1, Ordering::Relaxed);
        self.max_depth.fetch_max(depth as u64, Ordering::Relaxed);
    }

    fn cycle_detected(&self, _ty: &TypeKey, _depth: usize) {
        self.cycle_count.fetch_add(1, Ordering::Relaxed);
    }

    fn parameter_unmatched(&self, _ty: &TypeKey, _parameter: &ParameterInfo) {
        self.unmatched_parameter_count.fetch_add(1, Ordering::Relaxed);
    }
}
