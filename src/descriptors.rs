//! Service descriptors: the registrations the dependency graph is built from.

use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// How a registration produces its service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplementationSource {
    /// The container instantiates this concrete type
    Type(TypeKey),
    /// A pre-built object; only its runtime type is known here
    Instance {
        runtime_type: TypeKey,
    },
    /// A user factory; its declared return type, when the host reports one
    Factory {
        return_type: Option<TypeKey>,
    },
}

/// Service descriptor for a single registration.
///
/// Descriptors are read-only once handed to the graph builder; nodes keep a
/// shared reference to them rather than a copy.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ServiceDescriptor, TypeKey, Lifetime};
///
/// let service = TypeKey::new("App.Services", "IFooService");
/// let implementation = TypeKey::new("App.Services", "FooService");
///
/// let typed = ServiceDescriptor::with_type(service.clone(), implementation.clone(), Lifetime::Scoped);
/// assert_eq!(typed.implementation_type(), Some(&implementation));
/// assert_eq!(typed.effective_implementation_type(), Some(&implementation));
///
/// let instance = ServiceDescriptor::with_instance(service.clone(), implementation.clone());
/// assert_eq!(instance.lifetime, Lifetime::Singleton);
/// assert_eq!(instance.implementation_type(), None);
/// assert_eq!(instance.effective_implementation_type(), Some(&implementation));
///
/// let factory = ServiceDescriptor::with_factory(service, None, Lifetime::Transient);
/// assert_eq!(factory.effective_implementation_type(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Requested contract type, possibly an open generic definition
    pub service_type: TypeKey,
    pub implementation: ImplementationSource,
    pub lifetime: Lifetime,
}

impl ServiceDescriptor {
    pub fn new(service_type: TypeKey, implementation: ImplementationSource, lifetime: Lifetime) -> Self {
        Self { service_type, implementation, lifetime }
    }

    /// Registration of a concrete implementation type.
    pub fn with_type(service_type: TypeKey, implementation_type: TypeKey, lifetime: Lifetime) -> Self {
        Self::new(service_type, ImplementationSource::Type(implementation_type), lifetime)
    }

    /// Registration of a pre-built instance. Instances are always singletons.
    pub fn with_instance(service_type: TypeKey, runtime_type: TypeKey) -> Self {
        Self::new(service_type, ImplementationSource::Instance { runtime_type }, Lifetime::Singleton)
    }

    /// Registration of a factory with an optional declared return type.
    pub fn with_factory(service_type: TypeKey, return_type: Option<TypeKey>, lifetime: Lifetime) -> Self {
        Self::new(service_type, ImplementationSource::Factory { return_type }, lifetime)
    }

    /// Explicit implementation type; `None` for instance and factory registrations.
    pub fn implementation_type(&self) -> Option<&TypeKey> {
        match &self.implementation {
            ImplementationSource::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// The concrete type that would be instantiated: the implementation type,
    /// else the instance's runtime type, else the factory's declared return type.
    pub fn effective_implementation_type(&self) -> Option<&TypeKey> {
        match &self.implementation {
            ImplementationSource::Type(ty) => Some(ty),
            ImplementationSource::Instance { runtime_type } => Some(runtime_type),
            ImplementationSource::Factory { return_type } => return_type.as_ref(),
        }
    }

    /// Implementation as shown by formatters: `FooService`, `Instance of Foo`
    /// or `Unknown` when a factory's return type is not known.
    pub fn implementation_description(&self) -> String {
        match &self.implementation {
            ImplementationSource::Type(ty) => ty.display_name(),
            ImplementationSource::Factory { return_type: Some(ty) } => ty.display_name(),
            ImplementationSource::Instance { runtime_type } => {
                format!("Instance of {}", runtime_type.display_name())
            }
            ImplementationSource::Factory { return_type: None } => "Unknown".to_string(),
        }
    }

    /// One-line description: `IFoo -> Foo (Scoped)`, or `Foo (Scoped)` when the
    /// service is registered as itself.
    pub fn description(&self) -> String {
        let service = self.service_type.display_name();
        let implementation = self.implementation_description();
        if service == implementation {
            format!("{} ({})", service, self.lifetime)
        } else {
            format!("{} -> {} ({})", service, implementation, self.lifetime)
        }
    }
}
