//! Filtering roots by the length of their dependency chains.

use crate::relevance::TypeRelevance;
use crate::tree::ServiceNode;
use crate::viewer::TreeViewer;

/// Roots whose dependency chains reach a minimum length, plus their rendering.
#[derive(Debug, Clone)]
pub struct DependencyChains<'n> {
    /// Matching roots, in forest order.
    pub roots: Vec<&'n ServiceNode>,
    /// Tree view of `roots`.
    pub rendered: String,
}

impl DependencyChains<'_> {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }
}

/// Finds registrations sitting on top of long constructor chains.
///
/// Chain length is counted in nodes, so a root on its own is a chain of one;
/// a `min_depth` of 0 or 1 therefore selects every root.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{DepthAnalyser, ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey};
///
/// let repo = TypeKey::new("App", "Repository");
/// let service = TypeKey::new("App", "OrderService");
/// let catalog = TypeCatalog::new()
///     .with_type(TypeDescriptor::new(repo.clone()).with_public_constructor([]))
///     .with_type(TypeDescriptor::new(service.clone()).with_public_constructor([repo.clone()]));
///
/// let mut services = ServiceCollection::new();
/// services.add_self_scoped(repo).add_self_scoped(service.clone());
/// let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
///
/// let chains = DepthAnalyser::new().registration_chains_by_depth(&roots, 2, None);
/// assert_eq!(chains.len(), 1);
/// assert_eq!(chains.roots[0].service_type(), &service);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DepthAnalyser {
    viewer: TreeViewer,
}

impl DepthAnalyser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders results with `viewer` instead of the default layout.
    pub fn with_viewer(viewer: TreeViewer) -> Self {
        Self { viewer }
    }

    /// Collects every root with a path of at least `min_depth` nodes.
    ///
    /// When `relevance` is given, non-user roots are skipped and paths stop at
    /// the first non-user child.
    pub fn registration_chains_by_depth<'n>(
        &self,
        roots: &'n [ServiceNode],
        min_depth: usize,
        relevance: Option<&TypeRelevance>,
    ) -> DependencyChains<'n> {
        let selected: Vec<&ServiceNode> = roots
            .iter()
            .filter(|root| is_relevant(root, relevance))
            .filter(|root| reaches_depth(root, 1, min_depth, relevance))
            .collect();

        let rendered = self.viewer.generate_tree_view(selected.iter().copied(), None);

        DependencyChains { roots: selected, rendered }
    }
}

fn is_relevant(node: &ServiceNode, relevance: Option<&TypeRelevance>) -> bool {
    relevance.map_or(true, |r| r.is_user_type(node.service_type()))
}

fn reaches_depth(node: &ServiceNode, length: usize, min_depth: usize, relevance: Option<&TypeRelevance>) -> bool {
    if length >= min_depth {
        return true;
    }

    node.dependencies()
        .iter()
        .filter(|child| is_relevant(child, relevance))
        .any(|child| reaches_depth(child, length + 1, min_depth, relevance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey};

    fn forest() -> Vec<ServiceNode> {
        // Framework.Clock <- App.Scheduler <- App.Jobs
        let clock = TypeKey::new("Framework", "Clock");
        let scheduler = TypeKey::new("App", "Scheduler");
        let jobs = TypeKey::new("App", "Jobs");

        let catalog = TypeCatalog::new()
            .with_type(TypeDescriptor::new(clock.clone()).with_public_constructor([]))
            .with_type(TypeDescriptor::new(scheduler.clone()).with_public_constructor([clock.clone()]))
            .with_type(TypeDescriptor::new(jobs.clone()).with_public_constructor([scheduler.clone()]));

        let mut services = ServiceCollection::new();
        services
            .add_self_singleton(clock)
            .add_self_scoped(scheduler)
            .add_self_transient(jobs);

        TreeBuilder::new(&catalog).build_tree(services.descriptors())
    }

    fn names(chains: &DependencyChains<'_>) -> Vec<String> {
        chains.roots.iter().map(|n| n.service_type_name()).collect()
    }

    #[test]
    fn test_min_depth_counts_nodes() {
        let roots = forest();
        let analyser = DepthAnalyser::new();

        assert_eq!(analyser.registration_chains_by_depth(&roots, 0, None).len(), 3);
        assert_eq!(analyser.registration_chains_by_depth(&roots, 1, None).len(), 3);
        assert_eq!(names(&analyser.registration_chains_by_depth(&roots, 2, None)), ["Scheduler", "Jobs"]);
        assert_eq!(names(&analyser.registration_chains_by_depth(&roots, 3, None)), ["Jobs"]);
        assert!(analyser.registration_chains_by_depth(&roots, 4, None).is_empty());
    }

    #[test]
    fn test_user_code_stops_at_framework_children() {
        let roots = forest();
        let relevance = TypeRelevance::new("App");
        let analyser = DepthAnalyser::new();

        // Jobs -> Scheduler is two user nodes; Clock no longer counts.
        let chains = analyser.registration_chains_by_depth(&roots, 2, Some(&relevance));
        assert_eq!(names(&chains), ["Jobs"]);

        let all_user_roots = analyser.registration_chains_by_depth(&roots, 1, Some(&relevance));
        assert_eq!(names(&all_user_roots), ["Scheduler", "Jobs"]);
    }

    #[test]
    fn test_rendered_view_covers_selected_roots() {
        let roots = forest();
        let chains = DepthAnalyser::new().registration_chains_by_depth(&roots, 3, None);

        assert!(chains.rendered.starts_with("Namespace: App\n"));
        assert!(chains.rendered.contains("Jobs (Transient)\n  Scheduler (Scoped)\n    Clock (Singleton)\n"));
        assert!(!chains.rendered.contains("Namespace: Framework"));
    }
}
