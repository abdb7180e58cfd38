//! "Is this my own code" filtering.

use crate::key::TypeKey;

/// Predicate selecting the host application's own types by namespace prefix.
///
/// Framework registrations (logging, options, hosting) usually dominate a
/// container; reports can restrict themselves to the types for which
/// `is_user_type` holds.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{TypeKey, TypeRelevance};
///
/// let relevance = TypeRelevance::from_root_namespace("Shop.Web.Api");
/// assert_eq!(relevance.prefix(), "Shop");
///
/// assert!(relevance.is_user_type(&TypeKey::new("Shop.Orders", "OrderService")));
/// assert!(!relevance.is_user_type(&TypeKey::new("Microsoft.Extensions.Logging", "ILoggerFactory")));
/// assert!(!relevance.is_user_type(&TypeKey::global("int")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRelevance {
    prefix: String,
}

impl TypeRelevance {
    /// Matches namespaces starting with `prefix` verbatim.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Uses the first dot-separated segment of the application's namespace.
    pub fn from_root_namespace(namespace: &str) -> Self {
        Self::new(namespace.split('.').next().unwrap_or_default())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `ty` belongs to the application. Types without a namespace never do.
    pub fn is_user_type(&self, ty: &TypeKey) -> bool {
        ty.namespace()
            .map_or(false, |namespace| namespace.starts_with(&self.prefix))
    }
}
