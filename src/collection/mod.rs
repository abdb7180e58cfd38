//! Service collection module.
//!
//! This module contains the `ServiceCollection` type, an ordered snapshot of
//! registrations in the shape a Microsoft.Extensions.DependencyInjection-style
//! container exposes them.

use std::sync::Arc;

use crate::{ImplementationSource, Lifetime, ServiceDescriptor, TypeKey};

/// Ordered list of service registrations.
///
/// Registration order is preserved and duplicate service types are kept;
/// the graph builder resolves a parameter to the first matching registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ServiceCollection, TypeKey, Lifetime};
///
/// let repo = TypeKey::new("App.Data", "IUserRepository");
/// let repo_impl = TypeKey::new("App.Data", "SqlUserRepository");
/// let clock = TypeKey::new("App.Infrastructure", "SystemClock");
///
/// let mut services = ServiceCollection::new();
/// services
///     .add_scoped(repo, repo_impl)
///     .add_self_singleton(clock);
///
/// assert_eq!(services.len(), 2);
/// assert_eq!(services.descriptors()[0].lifetime, Lifetime::Scoped);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<Arc<ServiceDescriptor>>,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor.
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(Arc::new(descriptor));
        self
    }

    // ----- Implementation Type Registrations -----

    /// Registers `implementation` as a new instance per resolution of `service`.
    pub fn add_transient(&mut self, service: TypeKey, implementation: TypeKey) -> &mut Self {
        self.add_type(service, implementation, Lifetime::Transient)
    }

    /// Registers `implementation` as one instance per scope for `service`.
    pub fn add_scoped(&mut self, service: TypeKey, implementation: TypeKey) -> &mut Self {
        self.add_type(service, implementation, Lifetime::Scoped)
    }

    /// Registers `implementation` as the application-wide instance of `service`.
    pub fn add_singleton(&mut self, service: TypeKey, implementation: TypeKey) -> &mut Self {
        self.add_type(service, implementation, Lifetime::Singleton)
    }

    /// Registers a concrete type as itself, transient.
    pub fn add_self_transient(&mut self, ty: TypeKey) -> &mut Self {
        self.add_type(ty.clone(), ty, Lifetime::Transient)
    }

    /// Registers a concrete type as itself, scoped.
    pub fn add_self_scoped(&mut self, ty: TypeKey) -> &mut Self {
        self.add_type(ty.clone(), ty, Lifetime::Scoped)
    }

    /// Registers a concrete type as itself, singleton.
    pub fn add_self_singleton(&mut self, ty: TypeKey) -> &mut Self {
        self.add_type(ty.clone(), ty, Lifetime::Singleton)
    }

    fn add_type(&mut self, service: TypeKey, implementation: TypeKey, lifetime: Lifetime) -> &mut Self {
        self.add(ServiceDescriptor::with_type(service, implementation, lifetime))
    }

    // ----- Instance Registrations -----

    /// Registers a pre-built singleton whose runtime type is `runtime_type`.
    pub fn add_singleton_instance(&mut self, service: TypeKey, runtime_type: TypeKey) -> &mut Self {
        self.add(ServiceDescriptor::with_instance(service, runtime_type))
    }

    // ----- Factory Registrations -----

    /// Registers a transient factory with an optional declared return type.
    pub fn add_transient_factory(&mut self, service: TypeKey, return_type: Option<TypeKey>) -> &mut Self {
        self.add_factory(service, return_type, Lifetime::Transient)
    }

    /// Registers a scoped factory with an optional declared return type.
    pub fn add_scoped_factory(&mut self, service: TypeKey, return_type: Option<TypeKey>) -> &mut Self {
        self.add_factory(service, return_type, Lifetime::Scoped)
    }

    /// Registers a singleton factory with an optional declared return type.
    pub fn add_singleton_factory(&mut self, service: TypeKey, return_type: Option<TypeKey>) -> &mut Self {
        self.add_factory(service, return_type, Lifetime::Singleton)
    }

    fn add_factory(&mut self, service: TypeKey, return_type: Option<TypeKey>, lifetime: Lifetime) -> &mut Self {
        self.add(ServiceDescriptor::new(
            service,
            ImplementationSource::Factory { return_type },
            lifetime,
        ))
    }

    // ----- Introspection -----

    /// All registrations, in registration order.
    pub fn descriptors(&self) -> &[Arc<ServiceDescriptor>] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ServiceDescriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl FromIterator<ServiceDescriptor> for ServiceCollection {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl Extend<ServiceDescriptor> for ServiceCollection {
    fn extend<I: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: I) {
        self.descriptors.extend(iter.into_iter().map(Arc::new));
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a Arc<ServiceDescriptor>;
    type IntoIter = std::slice::Iter<'a, Arc<ServiceDescriptor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_order_and_duplicates_kept() {
        let service = TypeKey::new("App", "IFoo");
        let mut services = ServiceCollection::new();
        services
            .add_transient(service.clone(), TypeKey::new("App", "FooV1"))
            .add_singleton(service.clone(), TypeKey::new("App", "FooV2"));

        assert_eq!(services.len(), 2);
        assert_eq!(services.descriptors()[0].implementation_type().unwrap().name(), "FooV1");
        assert_eq!(services.descriptors()[1].implementation_type().unwrap().name(), "FooV2");
    }

    #[test]
    fn test_instance_and_factory_registrations() {
        let service = TypeKey::new("App", "IClock");
        let mut services = ServiceCollection::new();
        services
            .add_singleton_instance(service.clone(), TypeKey::new("App", "FixedClock"))
            .add_scoped_factory(service.clone(), None);

        let descriptors = services.descriptors();
        assert_eq!(descriptors[0].lifetime, Lifetime::Singleton);
        assert_eq!(descriptors[0].implementation_type(), None);
        assert_eq!(descriptors[1].lifetime, Lifetime::Scoped);
        assert_eq!(descriptors[1].effective_implementation_type(), None);
    }

    #[test]
    fn test_collect_from_descriptors() {
        let foo = TypeKey::new("App", "Foo");
        let services: ServiceCollection = vec![
            ServiceDescriptor::with_type(foo.clone(), foo.clone(), Lifetime::Transient),
            ServiceDescriptor::with_instance(foo.clone(), foo),
        ]
        .into_iter()
        .collect();

        assert_eq!(services.len(), 2);
        assert!(!services.is_empty());
    }
}
