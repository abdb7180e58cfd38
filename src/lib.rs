//! # ferrous-di-viz
//!
//! Dependency graph reconstruction and reporting for service registries in the
//! style of Microsoft.Extensions.DependencyInjection.
//!
//! A registry is an ordered list of registrations, each mapping a requested
//! service type to an implementation type, a pre-built instance, or a factory.
//! Given the registrations and a [`TypeCatalog`] describing the constructors
//! of the implementation types, the [`TreeBuilder`] works out which
//! registration each constructor parameter would be satisfied by and builds a
//! forest with one root per registration.
//!
//! ## Features
//!
//! - **Greedy constructor selection**: the public constructor with the most resolvable parameters wins
//! - **Open generics**: an `ILogger<>` registration satisfies an `ILogger<Foo>` parameter
//! - **Cycle safe**: a type is never expanded twice on the same path, while diamonds stay intact
//! - **Reports**: namespace-grouped tree view, DOT, usage ranking, unused services, deep chains
//! - **Graph export**: DOT and Mermaid always; JSON and YAML with the `graph-export` feature
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_di_viz::{DependencyTree, ServiceCollection, TypeCatalog, TypeDescriptor, TypeKey};
//!
//! let a = TypeKey::new("App", "IServiceA");
//! let a_impl = TypeKey::new("App", "ServiceA");
//! let b = TypeKey::new("App", "IServiceB");
//! let b_impl = TypeKey::new("App", "ServiceB");
//!
//! // What the container would see through reflection
//! let catalog = TypeCatalog::new()
//!     .with_type(TypeDescriptor::new(a_impl.clone()).with_public_constructor([]))
//!     .with_type(TypeDescriptor::new(b_impl.clone()).with_public_constructor([a.clone()]));
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_transient(a.clone(), a_impl)
//!     .add_scoped(b, b_impl);
//!
//! let tree = DependencyTree::new(services.descriptors(), &catalog);
//! let view = tree.generate_tree_view(false);
//! assert!(view.contains("IServiceB -> ServiceB (Scoped)\n  IServiceA -> ServiceA (Transient)\n"));
//!
//! assert_eq!(tree.most_used_services(5), vec![(a, 1)]);
//! ```
//!
//! ## Open Generics
//!
//! ```rust
//! use ferrous_di_viz::{ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey};
//!
//! let logger = TypeKey::open_generic("Logging", "ILogger", 1);
//! let logger_impl = TypeKey::open_generic("Logging", "Logger", 1);
//! let orders = TypeKey::new("Shop", "OrderService");
//!
//! let catalog = TypeCatalog::new()
//!     .with_type(TypeDescriptor::new(logger_impl.clone()).with_public_constructor([]))
//!     .with_type(
//!         TypeDescriptor::new(orders.clone())
//!             .with_public_constructor([logger.make_generic([orders.clone()])]),
//!     );
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(logger.clone(), logger_impl).add_self_scoped(orders);
//!
//! let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
//! assert_eq!(roots[1].dependencies()[0].service_type(), &logger);
//! ```
//!
//! ## Observing the Build
//!
//! Attach a [`LoggingObserver`] to get `tracing` events for every node,
//! constructor choice and cut cycle, or a [`MetricsObserver`] for counters.

// Module declarations
pub mod catalog;
pub mod collection;
pub mod config;
pub mod dependency_tree;
pub mod depth;
pub mod descriptors;
pub mod error;
pub mod graph_export;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod relevance;
pub mod tree;
pub mod usage;
pub mod viewer;

// Re-exports
pub use catalog::{ConstructorInfo, ParameterInfo, TypeCatalog, TypeDescriptor, Visibility};
pub use collection::ServiceCollection;
pub use config::{ConfigProvider, ConfigSource, ConfigValue, EnvironmentConfigSource, MemoryConfigSource, VisualizerConfig};
pub use dependency_tree::DependencyTree;
pub use depth::{DependencyChains, DepthAnalyser};
pub use descriptors::{ImplementationSource, ServiceDescriptor};
pub use error::{VizError, VizResult};
pub use graph_export::{
    DefaultGraphExporter, DependencyGraph, DependencyType, DotExporter, ExportFormat, ExportOptions, GraphEdge,
    GraphExporter, GraphMetadata, GraphNode,
};
pub use key::{GenericShape, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{BuildObserver, LoggingObserver, MetricsObserver};
pub use relevance::TypeRelevance;
pub use tree::{find_matching_descriptor, ServiceNode, TreeBuilder};
pub use usage::UsageCalculator;
pub use viewer::{TreeStyle, TreeViewer};
