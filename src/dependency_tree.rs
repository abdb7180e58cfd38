//! One-stop entry point bundling the builder and every report.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::catalog::TypeCatalog;
use crate::config::VisualizerConfig;
use crate::depth::{DependencyChains, DepthAnalyser};
use crate::error::VizResult;
use crate::graph_export::{
    DefaultGraphExporter, DependencyGraph, DotExporter, ExportFormat, ExportOptions, GraphExporter,
};
use crate::key::TypeKey;
use crate::observer::BuildObserver;
use crate::relevance::TypeRelevance;
use crate::tree::{ServiceNode, TreeBuilder};
use crate::usage::UsageCounts;
use crate::viewer::TreeViewer;
use crate::ServiceDescriptor;

/// The dependency forest of a service registry, plus reports over it.
///
/// The forest is built once, in the constructor; every report reads the
/// same immutable roots.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{DependencyTree, ServiceCollection, TypeCatalog, TypeDescriptor, TypeKey};
///
/// let repo = TypeKey::new("Shop.Data", "IOrderRepository");
/// let repo_impl = TypeKey::new("Shop.Data", "SqlOrderRepository");
/// let orders = TypeKey::new("Shop.Orders", "OrderService");
///
/// let catalog = TypeCatalog::new()
///     .with_type(TypeDescriptor::new(repo_impl.clone()).with_public_constructor([]))
///     .with_type(TypeDescriptor::new(orders.clone()).with_public_constructor([repo.clone()]));
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped(repo.clone(), repo_impl).add_self_scoped(orders.clone());
///
/// let tree = DependencyTree::new(services.descriptors(), &catalog);
/// assert_eq!(tree.roots().len(), 2);
/// assert_eq!(tree.most_used_services(1), vec![(repo, 1)]);
/// assert!(tree.generate_tree_view(false).contains("OrderService (Scoped)\n  IOrderRepository -> SqlOrderRepository (Scoped)\n"));
/// ```
#[derive(Debug)]
pub struct DependencyTree {
    roots: Vec<ServiceNode>,
    config: VisualizerConfig,
    viewer: TreeViewer,
    relevance: TypeRelevance,
    usage: OnceCell<UsageCounts>,
}

impl DependencyTree {
    /// Builds the forest with default settings.
    pub fn new(services: &[Arc<ServiceDescriptor>], catalog: &TypeCatalog) -> Self {
        Self::with_config(services, catalog, VisualizerConfig::default())
    }

    /// Builds the forest; `config` drives the rendering and user-code filter.
    pub fn with_config(services: &[Arc<ServiceDescriptor>], catalog: &TypeCatalog, config: VisualizerConfig) -> Self {
        Self::from_builder(TreeBuilder::new(catalog), services, config)
    }

    /// Builds the forest with an observer attached to the builder.
    pub fn with_observer(
        services: &[Arc<ServiceDescriptor>],
        catalog: &TypeCatalog,
        config: VisualizerConfig,
        observer: Arc<dyn BuildObserver>,
    ) -> Self {
        Self::from_builder(TreeBuilder::new(catalog).with_observer(observer), services, config)
    }

    fn from_builder(builder: TreeBuilder<'_>, services: &[Arc<ServiceDescriptor>], config: VisualizerConfig) -> Self {
        let roots = builder.build_tree(services);
        tracing::debug!(registrations = services.len(), roots = roots.len(), "dependency forest built");

        Self {
            roots,
            viewer: config.viewer(),
            relevance: config.relevance(),
            config,
            usage: OnceCell::new(),
        }
    }

    /// One root per registration, in registration order.
    pub fn roots(&self) -> &[ServiceNode] {
        &self.roots
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn relevance(&self) -> &TypeRelevance {
        &self.relevance
    }

    /// Tree view grouped by namespace; with `only_user_code`, roots outside
    /// the configured namespace prefix are left out.
    pub fn generate_tree_view(&self, only_user_code: bool) -> String {
        self.viewer.generate_tree_view(&self.roots, self.filter(only_user_code))
    }

    /// Tree view honouring the configured `only_user_code` default.
    pub fn tree_view(&self) -> String {
        self.generate_tree_view(self.config.only_user_code)
    }

    /// Service types most often requested by other services, highest first.
    pub fn most_used_services(&self, count: usize) -> Vec<(TypeKey, usize)> {
        self.usage().most_used(count)
    }

    /// User-code registrations that no other service depends on.
    pub fn unused_services(&self) -> Vec<TypeKey> {
        self.usage().unused(&self.roots, &self.relevance)
    }

    /// Times `ty` is depended upon across the forest.
    pub fn usage_count(&self, ty: &TypeKey) -> usize {
        self.usage().count(ty)
    }

    // Shared by every usage report; the forest never changes after construction.
    fn usage(&self) -> &UsageCounts {
        self.usage.get_or_init(|| UsageCounts::from_forest(&self.roots))
    }

    /// Roots sitting on a chain of at least `min_depth` nodes.
    pub fn registration_chains_by_depth(&self, min_depth: usize, only_user_code: bool) -> DependencyChains<'_> {
        DepthAnalyser::with_viewer(self.viewer.clone()).registration_chains_by_depth(
            &self.roots,
            min_depth,
            self.filter(only_user_code),
        )
    }

    /// The forest in Graphviz DOT syntax, one statement per node occurrence.
    pub fn export_dot(&self, only_user_code: bool) -> String {
        DotExporter::new().export_to_dot(&self.roots, self.filter(only_user_code))
    }

    /// Distinct types and edges, filtered by the configured `only_user_code` default.
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_forest(&self.roots, self.filter(self.config.only_user_code))
    }

    /// Flattened graph rendered with [`DefaultGraphExporter`].
    pub fn export(&self, format: ExportFormat) -> VizResult<String> {
        self.export_with(&DefaultGraphExporter, format, &ExportOptions::default())
    }

    /// Flattened graph rendered with a caller-supplied exporter.
    pub fn export_with(
        &self,
        exporter: &dyn GraphExporter,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> VizResult<String> {
        exporter.export(&self.dependency_graph(), format, options)
    }

    fn filter(&self, only_user_code: bool) -> Option<&TypeRelevance> {
        only_user_code.then_some(&self.relevance)
    }
}
