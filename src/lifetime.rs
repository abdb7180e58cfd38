//! Service lifetime definitions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Service lifetimes as declared by a registration.
///
/// The lifetime plays no part in building the dependency forest; it is carried
/// through so formatters can show it next to each service.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::Lifetime;
///
/// assert_eq!(Lifetime::Singleton.to_string(), "Singleton");
/// assert_eq!(Lifetime::Scoped.to_string(), "Scoped");
/// assert_eq!(Lifetime::Transient.to_string(), "Transient");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lifetime {
    /// Single instance per root provider, created once and shared everywhere
    Singleton,
    /// Single instance per scope
    Scoped,
    /// New instance per resolution
    Transient,
}

impl Lifetime {
    /// Name of the lifetime as printed by the tree view.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
