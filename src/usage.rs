//! Dependency usage statistics.

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::key::TypeKey;
use crate::relevance::TypeRelevance;
use crate::tree::ServiceNode;

/// How often each service type is depended upon across a forest.
///
/// A type counts once per occurrence as a child node, so a service pulled in
/// on three different paths counts three times. The counts are computed on
/// first use and cached.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey, UsageCalculator};
///
/// let a = TypeKey::new("App", "A");
/// let b = TypeKey::new("App", "B");
/// let catalog = TypeCatalog::new()
///     .with_type(TypeDescriptor::new(a.clone()).with_public_constructor([]))
///     .with_type(TypeDescriptor::new(b.clone()).with_public_constructor([a.clone()]));
///
/// let mut services = ServiceCollection::new();
/// services.add_self_transient(a.clone()).add_self_transient(b);
/// let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
///
/// let usage = UsageCalculator::new(&roots);
/// assert_eq!(usage.most_used_services(5), vec![(a, 1)]);
/// ```
#[derive(Debug)]
pub struct UsageCalculator<'a> {
    roots: &'a [ServiceNode],
    usage: OnceCell<UsageCounts>,
}

/// Child-occurrence counts for one forest.
#[derive(Debug, Default)]
pub(crate) struct UsageCounts {
    // First-seen order, so equal counts keep a stable ranking.
    order: Vec<TypeKey>,
    counts: HashMap<TypeKey, usize>,
}

impl UsageCounts {
    pub(crate) fn from_forest(roots: &[ServiceNode]) -> Self {
        let mut usage = Self::default();
        for root in roots {
            usage.traverse(root);
        }
        usage
    }

    fn record(&mut self, ty: &TypeKey) {
        match self.counts.get_mut(ty) {
            Some(count) => *count += 1,
            None => {
                self.order.push(ty.clone());
                self.counts.insert(ty.clone(), 1);
            }
        }
    }

    fn traverse(&mut self, node: &ServiceNode) {
        for dependency in node.dependencies() {
            self.record(dependency.service_type());
            self.traverse(dependency);
        }
    }

    pub(crate) fn most_used(&self, count: usize) -> Vec<(TypeKey, usize)> {
        let mut ranked: Vec<(TypeKey, usize)> = self
            .order
            .iter()
            .map(|ty| (ty.clone(), self.counts[ty]))
            .collect();
        // Stable sort: ties keep first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(count);
        ranked
    }

    /// `roots` must be the forest these counts were taken from.
    pub(crate) fn unused(&self, roots: &[ServiceNode], relevance: &TypeRelevance) -> Vec<TypeKey> {
        let mut unused: Vec<TypeKey> = Vec::new();
        for root in roots {
            let ty = root.service_type();
            if self.counts.contains_key(ty) || unused.contains(ty) {
                continue;
            }
            unused.push(ty.clone());
        }

        unused.retain(|ty| relevance.is_user_type(ty));
        unused
    }

    pub(crate) fn count(&self, ty: &TypeKey) -> usize {
        self.counts.get(ty).copied().unwrap_or(0)
    }
}

impl<'a> UsageCalculator<'a> {
    pub fn new(roots: &'a [ServiceNode]) -> Self {
        Self { roots, usage: OnceCell::new() }
    }

    /// The `count` most depended-upon service types, highest first.
    pub fn most_used_services(&self, count: usize) -> Vec<(TypeKey, usize)> {
        self.calculate().most_used(count)
    }

    /// Root service types no other service depends on, limited to user types.
    ///
    /// Each type is reported once, in root order.
    pub fn unused_services(&self, relevance: &TypeRelevance) -> Vec<TypeKey> {
        self.calculate().unused(self.roots, relevance)
    }

    /// Times `ty` appears as a dependency; zero if never.
    pub fn usage_count(&self, ty: &TypeKey) -> usize {
        self.calculate().count(ty)
    }

    fn calculate(&self) -> &UsageCounts {
        self.usage.get_or_init(|| UsageCounts::from_forest(self.roots))
    }
}
