//! Graph export of the dependency forest.
//!
//! Two surfaces live here. [`DotExporter`] writes the forest as-is, one DOT
//! statement per node occurrence, which mirrors the text tree view. The
//! [`DependencyGraph`] model flattens the forest into distinct service types
//! and distinct edges so it can be handed to visualization tools as DOT,
//! Mermaid, JSON or YAML.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::relevance::TypeRelevance;
use crate::tree::ServiceNode;

/// Graph version written into [`GraphMetadata`].
pub const GRAPH_FORMAT_VERSION: &str = "1.0.0";

/// Replaces every character outside `[A-Za-z0-9_]` with `_` so a type name
/// can be used as a bare DOT identifier.
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Writes the forest in Graphviz DOT syntax, node occurrence by occurrence.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::{DotExporter, ServiceCollection, TreeBuilder, TypeCatalog, TypeDescriptor, TypeKey};
///
/// let a = TypeKey::new("App", "A");
/// let b = TypeKey::new("App", "B");
/// let catalog = TypeCatalog::new()
///     .with_type(TypeDescriptor::new(a.clone()).with_public_constructor([]))
///     .with_type(TypeDescriptor::new(b.clone()).with_public_constructor([a.clone()]));
///
/// let mut services = ServiceCollection::new();
/// services.add_self_transient(b);
/// services.add_self_transient(a);
/// let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
///
/// let dot = DotExporter::new().export_to_dot(&roots[..1], None);
/// assert_eq!(dot, "digraph DependencyTree {\n  B [label=\"B\"];\n  B -> A;\n  A [label=\"A\"];\n}\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DotExporter;

impl DotExporter {
    pub fn new() -> Self {
        Self
    }

    /// Exports `nodes`, keeping only user roots when `relevance` is given.
    pub fn export_to_dot<'n, I>(&self, nodes: I, relevance: Option<&TypeRelevance>) -> String
    where
        I: IntoIterator<Item = &'n ServiceNode>,
    {
        let mut output = String::from("digraph DependencyTree {\n");

        for node in nodes {
            if relevance.map_or(false, |r| !r.is_user_type(node.service_type())) {
                continue;
            }
            Self::export_node(&mut output, node);
        }

        output.push_str("}\n");
        output
    }

    fn export_node(output: &mut String, node: &ServiceNode) {
        let label = node.service_type_name();
        let id = sanitize_node_name(&label);
        output.push_str(&format!("  {} [label=\"{}\"];\n", id, label));

        for dependency in node.dependencies() {
            let dependency_id = sanitize_node_name(&dependency.service_type_name());
            output.push_str(&format!("  {} -> {};\n", id, dependency_id));
            Self::export_node(output, dependency);
        }
    }
}

/// A distinct service type in the flattened graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Unique identifier for this node
    pub id: String,
    /// Display name of the service type
    pub type_name: String,
    /// Namespace-qualified name of the service type
    pub full_name: String,
    /// Lifetime of the first registration seen for this type
    pub lifetime: Lifetime,
    /// What the registration supplies, e.g. `FooService` or `Instance of Foo`
    pub implementation: String,
    /// Display names of the types this service was resolved to depend on
    pub dependencies: Vec<String>,
}

/// A distinct dependency relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    /// Source node ID (the service that depends on another)
    pub from: String,
    /// Target node ID (the service being depended upon)
    pub to: String,
    pub dependency_type: DependencyType,
}

/// How a dependency was matched to its registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub enum DependencyType {
    /// Parameter type equals the registered service type
    Required,
    /// Closed parameter type satisfied by an open generic registration
    OpenGeneric,
}

/// Graph-level summary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphMetadata {
    /// Number of registrations (forest roots) exported
    pub registration_count: usize,
    /// Number of distinct service types in the graph
    pub service_count: usize,
    pub edge_count: usize,
    pub singleton_count: usize,
    pub scoped_count: usize,
    pub transient_count: usize,
    /// Whether the distinct edges form at least one cycle
    pub has_circular_dependencies: bool,
    /// Export timestamp
    pub exported_at: String,
    /// Export format version
    pub version: String,
}

/// The forest flattened into distinct nodes and edges.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl DependencyGraph {
    /// Flattens `roots`, keeping only user roots when `relevance` is given.
    ///
    /// Nodes and edges appear in depth-first discovery order. Lifetime counts
    /// are taken over the exported registrations.
    pub fn from_forest(roots: &[ServiceNode], relevance: Option<&TypeRelevance>) -> Self {
        let mut flattener = Flattener::default();
        let mut registration_count = 0;
        let (mut singleton_count, mut scoped_count, mut transient_count) = (0, 0, 0);

        for root in roots {
            if relevance.map_or(false, |r| !r.is_user_type(root.service_type())) {
                continue;
            }

            registration_count += 1;
            match root.lifetime() {
                Lifetime::Singleton => singleton_count += 1,
                Lifetime::Scoped => scoped_count += 1,
                Lifetime::Transient => transient_count += 1,
            }
            flattener.visit(root);
        }

        let has_circular_dependencies = flattener.has_cycle();
        let Flattener { nodes, edges, .. } = flattener;

        let metadata = GraphMetadata {
            registration_count,
            service_count: nodes.len(),
            edge_count: edges.len(),
            singleton_count,
            scoped_count,
            transient_count,
            has_circular_dependencies,
            exported_at: exported_at(),
            version: GRAPH_FORMAT_VERSION.to_string(),
        };

        Self { nodes, edges, metadata }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_by_type_name(&self, type_name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.type_name == type_name)
    }
}

#[derive(Default)]
struct Flattener {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    ids: HashMap<TypeKey, usize>,
    seen_edges: HashSet<(usize, usize)>,
}

impl Flattener {
    fn visit(&mut self, node: &ServiceNode) -> usize {
        let from = self.node_index(node);

        for dependency in node.dependencies() {
            let to = self.visit(dependency);
            if !self.seen_edges.insert((from, to)) {
                continue;
            }

            let dependency_type = if dependency.service_type().is_generic_type_definition() {
                DependencyType::OpenGeneric
            } else {
                DependencyType::Required
            };
            self.edges.push(GraphEdge {
                from: self.nodes[from].id.clone(),
                to: self.nodes[to].id.clone(),
                dependency_type,
            });

            let name = self.nodes[to].type_name.clone();
            if !self.nodes[from].dependencies.contains(&name) {
                self.nodes[from].dependencies.push(name);
            }
        }

        from
    }

    fn node_index(&mut self, node: &ServiceNode) -> usize {
        if let Some(&index) = self.ids.get(node.service_type()) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            id: format!("service_{}", index),
            type_name: node.service_type_name(),
            full_name: node.service_type().full_name(),
            lifetime: node.lifetime(),
            implementation: node.implementation_description(),
            dependencies: Vec::new(),
        });
        self.ids.insert(node.service_type().clone(), index);
        index
    }

    fn has_cycle(&self) -> bool {
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for &(from, to) in &self.seen_edges {
            adjacency[from].push(to);
        }

        // 0 = unvisited, 1 = on stack, 2 = done
        let mut state = vec![0u8; self.nodes.len()];
        (0..self.nodes.len()).any(|start| state[start] == 0 && Self::dfs(start, &adjacency, &mut state))
    }

    fn dfs(index: usize, adjacency: &[Vec<usize>], state: &mut [u8]) -> bool {
        state[index] = 1;
        for &next in &adjacency[index] {
            if state[next] == 1 || (state[next] == 0 && Self::dfs(next, adjacency, state)) {
                return true;
            }
        }
        state[index] = 2;
        false
    }
}

fn exported_at() -> String {
    #[cfg(feature = "graph-export")]
    {
        chrono::Utc::now().to_rfc3339()
    }
    #[cfg(not(feature = "graph-export"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string()
    }
}

/// Graph export configuration options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Append the lifetime to DOT node labels
    pub include_lifetimes: bool,
    /// Restrict DOT and Mermaid output to these type names (empty = all)
    pub type_filter: HashSet<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_lifetimes: true,
            type_filter: HashSet::new(),
        }
    }
}

impl ExportOptions {
    fn includes(&self, node: &GraphNode) -> bool {
        self.type_filter.is_empty() || self.type_filter.contains(&node.type_name)
    }

    fn included_ids<'g>(&self, graph: &'g DependencyGraph) -> HashSet<&'g str> {
        graph
            .nodes
            .iter()
            .filter(|node| self.includes(node))
            .map(|node| node.id.as_str())
            .collect()
    }
}

/// Export formats supported for dependency graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format for web UIs and APIs
    Json,
    /// YAML format for human-readable output
    Yaml,
    /// DOT format for Graphviz visualization
    Dot,
    /// Mermaid format for documentation
    Mermaid,
    /// Format handled by a custom [`GraphExporter`]
    Custom(&'static str),
}

impl FromStr for ExportFormat {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "mermaid" => Ok(ExportFormat::Mermaid),
            _ => Err(VizError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Graph exporter for generating dependency visualizations.
///
/// Implement this to support formats beyond the built-in ones, typically
/// by handling [`ExportFormat::Custom`] and delegating the rest to
/// [`DefaultGraphExporter`].
pub trait GraphExporter {
    /// Exports the dependency graph in the specified format.
    fn export(&self, graph: &DependencyGraph, format: ExportFormat, options: &ExportOptions) -> VizResult<String>;
}

/// Built-in exporter for DOT, Mermaid, JSON and YAML.
///
/// JSON and YAML need the `graph-export` feature; without it they fail with
/// [`VizError::FeatureDisabled`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGraphExporter;

impl GraphExporter for DefaultGraphExporter {
    fn export(&self, graph: &DependencyGraph, format: ExportFormat, options: &ExportOptions) -> VizResult<String> {
        match format {
            ExportFormat::Json => self.export_json(graph),
            ExportFormat::Yaml => self.export_yaml(graph),
            ExportFormat::Dot => Ok(self.export_dot(graph, options)),
            ExportFormat::Mermaid => Ok(self.export_mermaid(graph, options)),
            ExportFormat::Custom(name) => Err(VizError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl DefaultGraphExporter {
    fn export_json(&self, graph: &DependencyGraph) -> VizResult<String> {
        #[cfg(feature = "graph-export")]
        {
            serde_json::to_string_pretty(graph).map_err(|e| VizError::Serialization(e.to_string()))
        }
        #[cfg(not(feature = "graph-export"))]
        {
            let _ = graph;
            Err(VizError::FeatureDisabled("graph-export"))
        }
    }

    fn export_yaml(&self, graph: &DependencyGraph) -> VizResult<String> {
        #[cfg(feature = "graph-export")]
        {
            serde_yaml::to_string(graph).map_err(|e| VizError::Serialization(e.to_string()))
        }
        #[cfg(not(feature = "graph-export"))]
        {
            let _ = graph;
            Err(VizError::FeatureDisabled("graph-export"))
        }
    }

    fn export_dot(&self, graph: &DependencyGraph, options: &ExportOptions) -> String {
        let included = options.included_ids(graph);
        let mut output = String::new();
        output.push_str("digraph DependencyGraph {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box];\n\n");

        for node in graph.nodes.iter().filter(|n| included.contains(n.id.as_str())) {
            let color = match node.lifetime {
                Lifetime::Singleton => "lightblue",
                Lifetime::Scoped => "lightgreen",
                Lifetime::Transient => "lightyellow",
            };
            let label = if options.include_lifetimes {
                format!("{}\\n({})", node.type_name, node.lifetime)
            } else {
                node.type_name.clone()
            };

            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor={}, style=filled];\n",
                node.id, label, color
            ));
        }

        output.push('\n');

        for edge in graph.edges.iter().filter(|e| included.contains(e.from.as_str()) && included.contains(e.to.as_str())) {
            let style = match edge.dependency_type {
                DependencyType::Required => "solid",
                DependencyType::OpenGeneric => "dashed",
            };
            output.push_str(&format!("  \"{}\" -> \"{}\" [style={}];\n", edge.from, edge.to, style));
        }

        output.push_str("}\n");
        output
    }

    fn export_mermaid(&self, graph: &DependencyGraph, options: &ExportOptions) -> String {
        let included = options.included_ids(graph);
        let mut output = String::new();
        output.push_str("graph TD\n");

        for node in graph.nodes.iter().filter(|n| included.contains(n.id.as_str())) {
            output.push_str(&format!("  {}[\"{}\"]\n", node.id, node.type_name));
        }

        for edge in graph.edges.iter().filter(|e| included.contains(e.from.as_str()) && included.contains(e.to.as_str())) {
            let arrow = match edge.dependency_type {
                DependencyType::Required => "-->",
                DependencyType::OpenGeneric => "-.->",
            };
            output.push_str(&format!("  {} {} {}\n", edge.from, arrow, edge.to));
        }

        output.push_str("\n  classDef singleton fill:#e1f5fe\n");
        output.push_str("  classDef scoped fill:#e8f5e8\n");
        output.push_str("  classDef transient fill:#fff3e0\n");

        for node in graph.nodes.iter().filter(|n| included.contains(n.id.as_str())) {
            let class = match node.lifetime {
                Lifetime::Singleton => "singleton",
                Lifetime::Scoped => "scoped",
                Lifetime::Transient => "transient",
            };
            output.push_str(&format!("  class {} {}\n", node.id, class));
        }

        output
    }
}
