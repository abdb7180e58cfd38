use ferrous_di_viz::{
    DependencyTree, ServiceCollection, TypeCatalog, TypeDescriptor, TypeKey, VisualizerConfig,
};

const NS: &str = "DepthAnalyserTests";

fn ty(name: &str) -> TypeKey {
    TypeKey::new(NS, name)
}

fn create_test_services() -> (ServiceCollection, TypeCatalog) {
    let catalog = TypeCatalog::new()
        .with_type(TypeDescriptor::new(ty("ServiceA")).with_public_constructor([]))
        .with_type(TypeDescriptor::new(ty("ServiceB")).with_public_constructor([ty("IServiceA")]))
        .with_type(TypeDescriptor::new(ty("ServiceC")).with_public_constructor([ty("IServiceA"), ty("IServiceB")]))
        .with_type(TypeDescriptor::new(ty("ServiceD")).with_public_constructor([ty("IServiceC")]));

    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("IServiceA"), ty("ServiceA"))
        .add_scoped(ty("IServiceB"), ty("ServiceB"))
        .add_singleton(ty("IServiceC"), ty("ServiceC"))
        .add_self_transient(ty("ServiceD"));

    (services, catalog)
}

fn chain_roots(tree: &DependencyTree, min_depth: usize, only_user_code: bool) -> Vec<String> {
    tree.registration_chains_by_depth(min_depth, only_user_code)
        .roots
        .iter()
        .map(|n| n.service_type_name())
        .collect()
}

#[test]
fn test_chains_basic_functionality() {
    let (services, catalog) = create_test_services();
    let tree = DependencyTree::new(services.descriptors(), &catalog);

    let result = tree.registration_chains_by_depth(2, false);

    assert!(!result.is_empty());
    assert!(!result.rendered.trim().is_empty());
    assert!(result.roots.iter().any(|n| n.service_type() == &ty("ServiceD")));
}

#[test]
fn test_min_depth_zero_and_one_select_every_root() {
    let (services, catalog) = create_test_services();
    let tree = DependencyTree::new(services.descriptors(), &catalog);

    for min_depth in [0, 1] {
        assert_eq!(tree.registration_chains_by_depth(min_depth, false).len(), 4, "min_depth {}", min_depth);
    }
}

#[test]
fn test_depth_thresholds() {
    let (services, catalog) = create_test_services();
    let tree = DependencyTree::new(services.descriptors(), &catalog);

    // Longest paths: A=1, B=2, C=3 (C->B->A), D=4 (D->C->B->A)
    assert_eq!(chain_roots(&tree, 2, false), ["IServiceB", "IServiceC", "ServiceD"]);
    assert_eq!(chain_roots(&tree, 3, false), ["IServiceC", "ServiceD"]);
    assert_eq!(chain_roots(&tree, 4, false), ["ServiceD"]);
    assert!(chain_roots(&tree, 5, false).is_empty());
}

#[test]
fn test_rendered_view_matches_tree_view_of_selection() {
    let (services, catalog) = create_test_services();
    let tree = DependencyTree::new(services.descriptors(), &catalog);

    let result = tree.registration_chains_by_depth(4, false);
    let expected = format!(
        "Namespace: {}\n{}\nServiceD (Transient)\n  IServiceC -> ServiceC (Singleton)\n    IServiceA -> ServiceA (Transient)\n    IServiceB -> ServiceB (Scoped)\n      IServiceA -> ServiceA (Transient)\n\n",
        NS,
        "-".repeat(50)
    );
    assert_eq!(result.rendered, expected);
}

#[test]
fn test_only_user_code_restricts_roots_and_paths() {
    let (mut services, mut catalog) = create_test_services();
    // A framework service sitting between the user's root and its dependency.
    let cache = TypeKey::new("Microsoft.Extensions.Caching", "IMemoryCache");
    let cache_impl = TypeKey::new("Microsoft.Extensions.Caching", "MemoryCache");
    catalog.register(TypeDescriptor::new(cache_impl.clone()).with_public_constructor([ty("IServiceC")]));
    catalog.register(TypeDescriptor::new(ty("CachedService")).with_public_constructor([cache.clone()]));
    services.add_singleton(cache, cache_impl).add_self_scoped(ty("CachedService"));

    let config = VisualizerConfig {
        user_namespace_prefix: NS.to_string(),
        ..VisualizerConfig::default()
    };
    let tree = DependencyTree::with_config(services.descriptors(), &catalog, config);

    // Without filtering, the cached service reaches depth 5 through the cache.
    assert!(chain_roots(&tree, 5, false).contains(&"CachedService".to_string()));

    // With filtering, the framework root disappears and the path stops at the cache.
    let user_only = chain_roots(&tree, 1, true);
    assert!(!user_only.contains(&"IMemoryCache".to_string()));
    assert_eq!(user_only.len(), 5);
    assert!(!chain_roots(&tree, 2, true).contains(&"CachedService".to_string()));
}
