//! Reconstruction of constructor-dependency edges.
//!
//! For every registration the builder picks the constructor the container
//! would most likely call (the public one with the most parameters that can
//! all be satisfied by some registration), resolves each parameter to the
//! first matching registration, and recurses into that registration's
//! effective implementation type.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::{ConstructorInfo, ParameterInfo, TypeCatalog};
use crate::observer::{BuildObserver, Observers};
use crate::{ServiceDescriptor, TypeKey};

use super::ServiceNode;

// Types on the current root-to-node path. Each branch gets its own copy so
// siblings never see each other's entries.
type VisitedTypes = HashSet<TypeKey>;

/// Builds the dependency forest for a list of registrations.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey};
///
/// let clock = TypeKey::new("App", "IClock");
/// let clock_impl = TypeKey::new("App", "SystemClock");
/// let scheduler = TypeKey::new("App", "Scheduler");
///
/// let catalog = TypeCatalog::new()
///     .with_type(TypeDescriptor::new(clock_impl.clone()).with_public_constructor([]))
///     .with_type(TypeDescriptor::new(scheduler.clone()).with_public_constructor([clock.clone()]));
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(clock.clone(), clock_impl).add_self_scoped(scheduler);
///
/// let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
/// assert_eq!(roots.len(), 2);
/// assert!(roots[0].dependencies().is_empty());
/// assert_eq!(roots[1].dependencies()[0].service_type(), &clock);
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder<'a> {
    catalog: &'a TypeCatalog,
    observers: Observers,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog, observers: Observers::new() }
    }

    /// Attaches an observer notified of every traversal decision.
    pub fn with_observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Builds one root node per registration, in input order.
    ///
    /// Only registrations with an explicit implementation type get their
    /// dependencies discovered at the root level; instance and factory
    /// registrations stay childless roots.
    pub fn build_tree(&self, services: &[Arc<ServiceDescriptor>]) -> Vec<ServiceNode> {
        let mut roots = Vec::with_capacity(services.len());

        for descriptor in services {
            let mut node = ServiceNode::new(descriptor.clone());
            if self.observers.has_observers() {
                self.observers.node_created(descriptor, 0);
            }

            if let Some(implementation) = descriptor.implementation_type() {
                self.build_dependencies(&mut node, implementation, services, &VisitedTypes::new(), 0);
            }

            roots.push(node);
        }

        roots
    }

    fn build_dependencies(
        &self,
        parent: &mut ServiceNode,
        ty: &TypeKey,
        services: &[Arc<ServiceDescriptor>],
        visited: &VisitedTypes,
        depth: usize,
    ) {
        if visited.contains(ty) {
            if self.observers.has_observers() {
                self.observers.cycle_detected(ty, depth);
            }
            return;
        }

        let mut path = visited.clone();
        path.insert(ty.clone());

        let Some(constructor) = self.select_constructor(ty, services) else {
            if self.observers.has_observers() {
                self.observers.no_constructor(ty);
            }
            return;
        };

        if self.observers.has_observers() {
            self.observers.constructor_selected(ty, &constructor);
        }

        for parameter in &constructor.parameters {
            // Selection already checked every parameter.
            let Some(dependency) = find_matching_descriptor(services, &parameter.ty) else {
                continue;
            };

            let mut child = ServiceNode::new(dependency.clone());
            if self.observers.has_observers() {
                self.observers.node_created(dependency, depth + 1);
            }

            if let Some(implementation) = dependency.effective_implementation_type() {
                self.build_dependencies(&mut child, implementation, services, &path, depth + 1);
            }

            parent.push_dependency(child);
        }
    }

    /// The constructor the container would call for `ty`.
    ///
    /// Among public instance constructors whose every parameter matches some
    /// registration, returns the one with the most parameters; on a tie the
    /// first in declaration order wins. Returns `None` when `ty` is unknown to
    /// the catalog or no public constructor qualifies.
    ///
    /// Observers hear about every parameter that rules a candidate out.
    pub fn select_constructor(&self, ty: &TypeKey, services: &[Arc<ServiceDescriptor>]) -> Option<ConstructorInfo> {
        let descriptor = self.catalog.describe(ty)?;

        let mut selected: Option<&ConstructorInfo> = None;
        for candidate in descriptor.public_constructors() {
            let mut unmatched = unmatched_parameters(candidate, services).peekable();
            if unmatched.peek().is_some() {
                if self.observers.has_observers() {
                    unmatched.for_each(|parameter| self.observers.parameter_unmatched(ty, parameter));
                }
                continue;
            }
            if selected.map_or(true, |best| candidate.parameters.len() > best.parameters.len()) {
                selected = Some(candidate);
            }
        }

        selected.cloned()
    }
}

/// First registration, in input order, whose service type satisfies `parameter_type`.
pub fn find_matching_descriptor<'s>(
    services: &'s [Arc<ServiceDescriptor>],
    parameter_type: &TypeKey,
) -> Option<&'s Arc<ServiceDescriptor>> {
    services
        .iter()
        .find(|descriptor| parameter_type.matches_generically(&descriptor.service_type))
}

fn unmatched_parameters<'c>(
    constructor: &'c ConstructorInfo,
    services: &'c [Arc<ServiceDescriptor>],
) -> impl Iterator<Item = &'c ParameterInfo> + 'c {
    constructor
        .parameters
        .iter()
        .filter(move |parameter| find_matching_descriptor(services, &parameter.ty).is_none())
}
