//! Dependency forest: nodes and the builder that produces them.

mod builder;

pub use builder::{find_matching_descriptor, TreeBuilder};

use std::sync::Arc;

use crate::{Lifetime, ServiceDescriptor, TypeKey};

/// One occurrence of a registration in the dependency forest.
///
/// The same registration shows up as a separate node on every path that
/// reaches it; nodes are never shared. The descriptor itself is shared with
/// the originating `ServiceCollection`, not copied.
#[derive(Debug, Clone)]
pub struct ServiceNode {
    descriptor: Arc<ServiceDescriptor>,
    dependencies: Vec<ServiceNode>,
}

impl ServiceNode {
    pub(crate) fn new(descriptor: Arc<ServiceDescriptor>) -> Self {
        Self { descriptor, dependencies: Vec::new() }
    }

    pub fn descriptor(&self) -> &Arc<ServiceDescriptor> {
        &self.descriptor
    }

    /// Resolved constructor dependencies, in constructor parameter order.
    pub fn dependencies(&self) -> &[ServiceNode] {
        &self.dependencies
    }

    pub fn service_type(&self) -> &TypeKey {
        &self.descriptor.service_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.descriptor.lifetime
    }

    pub fn service_type_name(&self) -> String {
        self.descriptor.service_type.display_name()
    }

    pub fn implementation_description(&self) -> String {
        self.descriptor.implementation_description()
    }

    /// True when both nodes wrap the very same registration.
    pub fn same_registration(&self, other: &ServiceNode) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor)
    }

    /// Number of nodes on the longest path starting here (a leaf has height 1).
    pub fn height(&self) -> usize {
        1 + self.dependencies.iter().map(ServiceNode::height).max().unwrap_or(0)
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_size(&self) -> usize {
        1 + self.dependencies.iter().map(ServiceNode::subtree_size).sum::<usize>()
    }

    pub(crate) fn push_dependency(&mut self, child: ServiceNode) {
        self.dependencies.push(child);
    }
}
