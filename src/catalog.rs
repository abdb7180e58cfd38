//! Constructor metadata for implementation types.
//!
//! The [`TypeCatalog`] stands in for runtime reflection: it answers "which
//! constructors does this type expose, and with which parameter types" for
//! every implementation type the host describes to it.

use std::collections::HashMap;

use crate::key::TypeKey;

/// Constructor accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Callable by the container
    Public,
    /// Private, protected or internal; never picked by the container
    NonPublic,
}

/// A single constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub ty: TypeKey,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, ty: TypeKey) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Constructor signature as reported for a type.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ConstructorInfo, TypeKey, Visibility};
///
/// let repo = TypeKey::new("App.Data", "IUserRepository");
/// let ctor = ConstructorInfo::public([repo.clone()]);
/// assert_eq!(ctor.visibility, Visibility::Public);
/// assert_eq!(ctor.parameter_types().collect::<Vec<_>>(), vec![&repo]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorInfo {
    pub visibility: Visibility,
    /// Static type initializer; never a candidate for instantiation
    pub is_static: bool,
    pub parameters: Vec<ParameterInfo>,
}

impl ConstructorInfo {
    /// Public instance constructor; parameters are named `arg0`, `arg1`, ...
    pub fn public(parameter_types: impl IntoIterator<Item = TypeKey>) -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: false,
            parameters: parameter_types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParameterInfo::new(format!("arg{}", i), ty))
                .collect(),
        }
    }

    /// Non-public instance constructor.
    pub fn non_public(parameter_types: impl IntoIterator<Item = TypeKey>) -> Self {
        Self {
            visibility: Visibility::NonPublic,
            ..Self::public(parameter_types)
        }
    }

    /// Public instance constructor with named parameters.
    pub fn with_parameters(parameters: impl IntoIterator<Item = ParameterInfo>) -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: false,
            parameters: parameters.into_iter().collect(),
        }
    }

    /// Whether the container could invoke this constructor at all.
    pub fn is_public_instance(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_static
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeKey> {
        self.parameters.iter().map(|p| &p.ty)
    }

    fn substitute(&self, arguments: &[TypeKey]) -> Self {
        Self {
            visibility: self.visibility,
            is_static: self.is_static,
            parameters: self
                .parameters
                .iter()
                .map(|p| ParameterInfo::new(p.name.clone(), p.ty.substitute(arguments)))
                .collect(),
        }
    }
}

/// Type together with its constructors, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    pub constructors: Vec<ConstructorInfo>,
}

impl TypeDescriptor {
    pub fn new(key: TypeKey) -> Self {
        Self { key, constructors: Vec::new() }
    }

    /// Adds a constructor; declaration order is the tie-break order used when
    /// two candidates have the same number of parameters.
    pub fn with_constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Shorthand for a public constructor over `parameter_types`.
    pub fn with_public_constructor(self, parameter_types: impl IntoIterator<Item = TypeKey>) -> Self {
        self.with_constructor(ConstructorInfo::public(parameter_types))
    }

    /// Public, non-static constructors in declaration order.
    pub fn public_constructors(&self) -> impl Iterator<Item = &ConstructorInfo> {
        self.constructors.iter().filter(|c| c.is_public_instance())
    }
}

/// Lookup table of type descriptors.
///
/// Closed generic types need not be described one by one: when asked about
/// `Logger<Foo>` and only `Logger<>` is known, the catalog returns the
/// definition's constructors with `Foo` substituted for the type parameter.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{TypeCatalog, TypeDescriptor, TypeKey};
///
/// let factory = TypeKey::new("Microsoft.Extensions.Logging", "ILoggerFactory");
/// let logger = TypeKey::open_generic("Microsoft.Extensions.Logging", "Logger", 1);
///
/// let mut catalog = TypeCatalog::new();
/// catalog.register(TypeDescriptor::new(logger.clone()).with_public_constructor([factory.clone()]));
///
/// let closed = logger.make_generic([TypeKey::new("App", "Foo")]);
/// let described = catalog.describe(&closed).unwrap();
/// assert_eq!(described.key, closed);
/// assert_eq!(described.constructors[0].parameters[0].ty, factory);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<TypeKey, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any earlier one for the same key.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.key.clone(), descriptor);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Describes `key`, falling back to its generic definition for closed types.
    pub fn describe(&self, key: &TypeKey) -> Option<TypeDescriptor> {
        if let Some(descriptor) = self.types.get(key) {
            return Some(descriptor.clone());
        }

        if !key.is_generic_type() {
            return None;
        }

        let definition = self.types.get(&key.generic_definition()?)?;
        let arguments = key.generic_arguments();
        Some(TypeDescriptor {
            key: key.clone(),
            constructors: definition
                .constructors
                .iter()
                .map(|c| c.substitute(arguments))
                .collect(),
        })
    }
}
