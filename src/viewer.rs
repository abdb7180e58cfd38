//! Text rendering of the dependency forest.

use std::collections::BTreeMap;

use crate::relevance::TypeRelevance;
use crate::tree::ServiceNode;

/// Layout of nested dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TreeStyle {
    /// Children indented by a fixed number of spaces per level
    #[default]
    Indented,
    /// Children drawn with `├──`/`└──` connectors
    BoxDrawing,
}

/// Renders root nodes grouped by the namespace of their service type.
///
/// Groups are sorted by namespace, with types outside any namespace first;
/// within a group, roots keep their registration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{ServiceCollection, TreeBuilder, TreeViewer, TypeCatalog, TypeDescriptor, TypeKey};
///
/// let foo = TypeKey::new("App.Services", "IFooService");
/// let foo_impl = TypeKey::new("App.Services", "FooService");
/// let catalog = TypeCatalog::new().with_type(TypeDescriptor::new(foo_impl.clone()).with_public_constructor([]));
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(foo, foo_impl);
/// let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
///
/// let view = TreeViewer::new().generate_tree_view(&roots, None);
/// assert_eq!(
///     view,
///     format!("Namespace: App.Services\n{}\nIFooService -> FooService (Singleton)\n\n", "-".repeat(50))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeViewer {
    style: TreeStyle,
    indent_width: usize,
    separator_width: usize,
}

impl TreeViewer {
    pub fn new() -> Self {
        Self {
            style: TreeStyle::Indented,
            indent_width: 2,
            separator_width: 50,
        }
    }

    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Spaces per nesting level in [`TreeStyle::Indented`].
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Length of the dashed rule under each namespace header.
    pub fn with_separator_width(mut self, width: usize) -> Self {
        self.separator_width = width;
        self
    }

    pub fn style(&self) -> TreeStyle {
        self.style
    }

    /// Renders `nodes`, keeping only user types when `relevance` is given.
    pub fn generate_tree_view<'n, I>(&self, nodes: I, relevance: Option<&TypeRelevance>) -> String
    where
        I: IntoIterator<Item = &'n ServiceNode>,
    {
        let mut groups: BTreeMap<Option<&str>, Vec<&ServiceNode>> = BTreeMap::new();
        for node in nodes {
            if relevance.map_or(false, |r| !r.is_user_type(node.service_type())) {
                continue;
            }
            groups.entry(node.service_type().namespace()).or_default().push(node);
        }

        let mut output = String::new();
        for (namespace, group) in groups {
            output.push_str(&format!("Namespace: {}\n", namespace.unwrap_or("<global>")));
            output.push_str(&"-".repeat(self.separator_width));
            output.push('\n');

            for node in group {
                match self.style {
                    TreeStyle::Indented => self.append_indented(&mut output, node, 0),
                    TreeStyle::BoxDrawing => {
                        output.push_str(&node.descriptor().description());
                        output.push('\n');
                        self.append_connected(&mut output, node, "");
                    }
                }
            }

            output.push('\n');
        }

        output
    }

    fn append_indented(&self, output: &mut String, node: &ServiceNode, depth: usize) {
        output.push_str(&" ".repeat(depth * self.indent_width));
        output.push_str(&node.descriptor().description());
        output.push('\n');

        for child in node.dependencies() {
            self.append_indented(output, child, depth + 1);
        }
    }

    fn append_connected(&self, output: &mut String, node: &ServiceNode, prefix: &str) {
        let count = node.dependencies().len();
        for (i, child) in node.dependencies().iter().enumerate() {
            let last = i + 1 == count;
            output.push_str(prefix);
            output.push_str(if last { "└── " } else { "├── " });
            output.push_str(&child.descriptor().description());
            output.push('\n');

            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            self.append_connected(output, child, &child_prefix);
        }
    }
}

impl Default for TreeViewer {
    fn default() -> Self {
        Self::new()
    }
}
