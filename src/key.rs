//! Type identity for the dependency graph.
//!
//! Rust has no runtime reflection over another ecosystem's types, so the
//! graph works on explicit, structural type keys. A [`TypeKey`] names a type
//! by namespace, simple name and generic shape; two keys are the same type
//! exactly when they are structurally equal.

use std::fmt;
use std::sync::Arc;

/// Generic shape of a type key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenericShape {
    /// Plain, non-generic type such as `FooService`
    NonGeneric,
    /// Open generic type definition such as `ILogger<>`
    Definition {
        /// Number of type parameters
        arity: usize,
    },
    /// Closed generic instantiation such as `ILogger<FooService>`
    Closed(Vec<TypeKey>),
    /// Generic type parameter such as the `T` inside `Logger<T>(ILoggerFactory, IOptions<T>)`
    Parameter {
        /// Zero-based position in the declaring definition's parameter list
        position: usize,
    },
}

/// Key identifying a type in registrations and constructor signatures.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::TypeKey;
///
/// let foo = TypeKey::new("MyApp.Services", "FooService");
/// let open_logger = TypeKey::open_generic("Microsoft.Extensions.Logging", "ILogger", 1);
/// let closed_logger = open_logger.make_generic([foo.clone()]);
///
/// assert_eq!(foo.namespace(), Some("MyApp.Services"));
/// assert_eq!(open_logger.display_name(), "ILogger<>");
/// assert_eq!(closed_logger.display_name(), "ILogger<FooService>");
/// assert_eq!(closed_logger.generic_definition(), Some(open_logger.clone()));
/// assert!(closed_logger.matches_generically(&open_logger));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    namespace: Option<Arc<str>>,
    name: Arc<str>,
    shape: GenericShape,
}

impl TypeKey {
    /// Non-generic type inside a namespace.
    pub fn new(namespace: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        let namespace = namespace.as_ref();
        Self {
            namespace: (!namespace.is_empty()).then(|| Arc::from(namespace)),
            name: Arc::from(name.as_ref()),
            shape: GenericShape::NonGeneric,
        }
    }

    /// Non-generic type without a namespace.
    pub fn global(name: impl AsRef<str>) -> Self {
        Self::new("", name)
    }

    /// Splits a dotted full name such as `MyApp.Services.FooService` on its
    /// last dot into namespace and simple name.
    ///
    /// ```rust
    /// use ferrous_di_viz::TypeKey;
    ///
    /// let key = TypeKey::from_full_name("MyApp.Services.FooService");
    /// assert_eq!(key, TypeKey::new("MyApp.Services", "FooService"));
    /// assert_eq!(TypeKey::from_full_name("Foo").namespace(), None);
    /// ```
    pub fn from_full_name(full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::global(full_name),
        }
    }

    /// Open generic type definition with `arity` type parameters.
    pub fn open_generic(namespace: impl AsRef<str>, name: impl AsRef<str>, arity: usize) -> Self {
        Self {
            shape: GenericShape::Definition { arity },
            ..Self::new(namespace, name)
        }
    }

    /// Closed generic instantiation.
    pub fn closed_generic(
        namespace: impl AsRef<str>,
        name: impl AsRef<str>,
        arguments: impl IntoIterator<Item = TypeKey>,
    ) -> Self {
        Self {
            shape: GenericShape::Closed(arguments.into_iter().collect()),
            ..Self::new(namespace, name)
        }
    }

    /// Generic type parameter, used inside an open definition's constructor signatures.
    pub fn generic_parameter(name: impl AsRef<str>, position: usize) -> Self {
        Self {
            namespace: None,
            name: Arc::from(name.as_ref()),
            shape: GenericShape::Parameter { position },
        }
    }

    /// Closes this type over `arguments`, keeping namespace and name.
    pub fn make_generic(&self, arguments: impl IntoIterator<Item = TypeKey>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            shape: GenericShape::Closed(arguments.into_iter().collect()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &GenericShape {
        &self.shape
    }

    /// True for open generic type definitions (`ILogger<>`).
    pub fn is_generic_type_definition(&self) -> bool {
        matches!(self.shape, GenericShape::Definition { .. })
    }

    /// True for closed generic instantiations (`ILogger<Foo>`).
    pub fn is_generic_type(&self) -> bool {
        matches!(self.shape, GenericShape::Closed(_))
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.shape, GenericShape::Parameter { .. })
    }

    /// Type arguments of a closed instantiation; empty for every other shape.
    pub fn generic_arguments(&self) -> &[TypeKey] {
        match &self.shape {
            GenericShape::Closed(arguments) => arguments,
            _ => &[],
        }
    }

    /// Open definition a closed instantiation was built from.
    ///
    /// Returns `None` for non-generic types and parameters, and the key itself
    /// for an open definition.
    pub fn generic_definition(&self) -> Option<TypeKey> {
        match &self.shape {
            GenericShape::Closed(arguments) => Some(Self {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                shape: GenericShape::Definition { arity: arguments.len() },
            }),
            GenericShape::Definition { .. } => Some(self.clone()),
            GenericShape::NonGeneric | GenericShape::Parameter { .. } => None,
        }
    }

    /// Whether a parameter of type `self` is satisfied by a registration for `registered`.
    ///
    /// True on an exact match, or when `registered` is an open generic
    /// definition and `self` is a closed instantiation of it.
    pub fn matches_generically(&self, registered: &TypeKey) -> bool {
        if self == registered {
            return true;
        }

        registered.is_generic_type_definition()
            && self.is_generic_type()
            && self.generic_definition().as_ref() == Some(registered)
    }

    /// Replaces every generic parameter at position `i` with `arguments[i]`.
    ///
    /// Parameters whose position is out of range are left untouched.
    pub fn substitute(&self, arguments: &[TypeKey]) -> TypeKey {
        match &self.shape {
            GenericShape::Parameter { position } => match arguments.get(*position) {
                Some(argument) => argument.clone(),
                None => self.clone(),
            },
            GenericShape::Closed(inner) => Self {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                shape: GenericShape::Closed(inner.iter().map(|a| a.substitute(arguments)).collect()),
            },
            GenericShape::NonGeneric | GenericShape::Definition { .. } => self.clone(),
        }
    }

    /// Human-readable name with generic arguments, e.g. `List<List<Foo>>`.
    pub fn display_name(&self) -> String {
        self.to_string()
    }

    /// Namespace-qualified display name.
    pub fn full_name(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!("{}.{}", namespace, self),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            GenericShape::NonGeneric | GenericShape::Parameter { .. } => f.write_str(&self.name),
            GenericShape::Definition { arity } => {
                write!(f, "{}<{}>", self.name, ",".repeat(arity.saturating_sub(1)))
            }
            GenericShape::Closed(arguments) => {
                write!(f, "{}<", self.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_def() -> TypeKey {
        TypeKey::open_generic("Microsoft.Extensions.Logging", "ILogger", 1)
    }

    #[test]
    fn test_exact_match() {
        let a = TypeKey::new("App", "A");
        assert!(a.matches_generically(&TypeKey::new("App", "A")));
        assert!(!a.matches_generically(&TypeKey::new("Other", "A")));
    }

    #[test]
    fn test_closed_matches_open_definition() {
        let closed = logger_def().make_generic([TypeKey::new("App", "Foo")]);
        assert!(closed.matches_generically(&logger_def()));
        // Direction matters: an open parameter is not satisfied by a closed registration.
        assert!(!logger_def().matches_generically(&closed));
    }

    #[test]
    fn test_arity_must_agree() {
        let two_args = TypeKey::closed_generic(
            "Microsoft.Extensions.Logging",
            "ILogger",
            [TypeKey::global("int"), TypeKey::global("string")],
        );
        assert!(!two_args.matches_generically(&logger_def()));
    }

    #[test]
    fn test_closed_does_not_match_other_closed() {
        let foo = logger_def().make_generic([TypeKey::new("App", "Foo")]);
        let bar = logger_def().make_generic([TypeKey::new("App", "Bar")]);
        assert!(!foo.matches_generically(&bar));
    }

    #[test]
    fn test_display_names() {
        let foo = TypeKey::new("App", "Foo");
        let list = TypeKey::open_generic("System.Collections.Generic", "List", 1);
        let nested = list.make_generic([list.make_generic([list.make_generic([foo.clone()])])]);
        assert_eq!(nested.display_name(), "List<List<List<Foo>>>");

        let dict = TypeKey::open_generic("System.Collections.Generic", "Dictionary", 2);
        assert_eq!(dict.display_name(), "Dictionary<,>");
        assert_eq!(
            dict.make_generic([TypeKey::global("string"), foo]).display_name(),
            "Dictionary<string, Foo>"
        );
        assert_eq!(list.full_name(), "System.Collections.Generic.List<>");
    }

    #[test]
    fn test_substitute_nested_parameters() {
        let t = TypeKey::generic_parameter("T", 0);
        let options = TypeKey::open_generic("Microsoft.Extensions.Options", "IOptions", 1);
        let signature = options.make_generic([t]);

        let foo = TypeKey::new("App", "FooOptions");
        let substituted = signature.substitute(&[foo.clone()]);
        assert_eq!(substituted, options.make_generic([foo]));
    }

    #[test]
    fn test_empty_namespace_is_none() {
        assert_eq!(TypeKey::global("int").namespace(), None);
        assert_eq!(TypeKey::new("", "int"), TypeKey::global("int"));
    }
}
