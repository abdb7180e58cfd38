use ferrous_di_viz::{
    ConstructorInfo, Lifetime, MetricsObserver, ServiceCollection, ServiceNode, TreeBuilder, TypeCatalog,
    TypeDescriptor, TypeKey,
};
use std::sync::Arc;

const NS: &str = "DependencyInjection.Visualization.Tests";

fn ty(name: &str) -> TypeKey {
    TypeKey::new(NS, name)
}

/// Constructors of the fake services used throughout this file.
fn fake_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(TypeDescriptor::new(ty("TestService")).with_public_constructor([]))
        .with_type(TypeDescriptor::new(ty("OtherService")).with_public_constructor([]))
        .with_type(TypeDescriptor::new(ty("DependentService")).with_public_constructor([ty("ITestService")]))
        .with_type(
            TypeDescriptor::new(ty("MultiDependentService"))
                .with_public_constructor([ty("ITestService"), ty("IOtherService")]),
        )
        .with_type(TypeDescriptor::new(ty("CircularA")).with_public_constructor([ty("ICircularB")]))
        .with_type(TypeDescriptor::new(ty("CircularB")).with_public_constructor([ty("ICircularA")]))
        .with_type(
            TypeDescriptor::new(ty("NoConstructorService"))
                .with_constructor(ConstructorInfo::non_public([ty("ITestService")])),
        )
        .with_type(
            TypeDescriptor::new(ty("MultiConstructorService"))
                .with_public_constructor([])
                .with_public_constructor([ty("ITestService")])
                .with_public_constructor([ty("ITestService"), ty("IOtherService")]),
        )
}

fn build(services: &ServiceCollection) -> Vec<ServiceNode> {
    let catalog = fake_catalog();
    TreeBuilder::new(&catalog).build_tree(services.descriptors())
}

fn find<'a>(roots: &'a [ServiceNode], implementation: &str) -> &'a ServiceNode {
    let implementation = ty(implementation);
    let matches: Vec<&ServiceNode> = roots
        .iter()
        .filter(|n| n.descriptor().implementation_type() == Some(&implementation))
        .collect();
    assert_eq!(matches.len(), 1, "expected exactly one root for {}", implementation);
    matches[0]
}

fn implementations(node: &ServiceNode) -> Vec<String> {
    node.dependencies()
        .iter()
        .filter_map(|d| d.descriptor().implementation_type().map(|t| t.name().to_string()))
        .collect()
}

#[test]
fn test_empty_collection_gives_empty_forest() {
    let roots = build(&ServiceCollection::new());
    assert!(roots.is_empty());
}

#[test]
fn test_single_service_without_dependencies() {
    let mut services = ServiceCollection::new();
    services.add_transient(ty("ITestService"), ty("TestService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].descriptor().implementation_type(), Some(&ty("TestService")));
    assert!(roots[0].dependencies().is_empty());
}

#[test]
fn test_service_with_one_dependency() {
    let mut services = ServiceCollection::new();
    // Both are registered directly, so both are roots.
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("IDependentService"), ty("DependentService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 2);
    let dependent = find(&roots, "DependentService");
    assert_eq!(implementations(dependent), ["TestService"]);
}

#[test]
fn test_service_with_multiple_dependencies() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("IOtherService"), ty("OtherService"))
        .add_transient(ty("IMultiDependentService"), ty("MultiDependentService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 3);
    let multi = find(&roots, "MultiDependentService");
    assert_eq!(implementations(multi), ["TestService", "OtherService"]);
}

#[test]
fn test_circular_dependency_is_cut() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ICircularA"), ty("CircularA"))
        .add_transient(ty("ICircularB"), ty("CircularB"));

    let roots = build(&services);

    assert_eq!(roots.len(), 2);
    let a = find(&roots, "CircularA");
    let b = find(&roots, "CircularB");
    assert_eq!(implementations(a), ["CircularB"]);
    assert_eq!(implementations(b), ["CircularA"]);

    // A -> B -> A, where the second A is not expanded again.
    assert_eq!(a.height(), 3);
    assert!(a.dependencies()[0].dependencies()[0].dependencies().is_empty());
}

#[test]
fn test_no_suitable_constructor_gives_childless_root() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("INoConstructorService"), ty("NoConstructorService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 2);
    assert!(find(&roots, "NoConstructorService").dependencies().is_empty());
}

#[test]
fn test_greediest_resolvable_constructor_wins() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("IOtherService"), ty("OtherService"))
        .add_transient(ty("IMultiConstructorService"), ty("MultiConstructorService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 3);
    let multi = find(&roots, "MultiConstructorService");
    assert_eq!(implementations(multi), ["TestService", "OtherService"]);
}

#[test]
fn test_greedy_falls_back_when_largest_is_unresolvable() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("IMultiConstructorService"), ty("MultiConstructorService"));

    let roots = build(&services);

    let multi = find(&roots, "MultiConstructorService");
    assert_eq!(implementations(multi), ["TestService"]);
}

#[test]
fn test_diamond_is_not_pruned_across_branches() {
    // D(B, C), B(A), C(A): A appears under both B and C.
    let (a, b, c, d) = (ty("A"), ty("B"), ty("C"), ty("D"));
    let catalog = TypeCatalog::new()
        .with_type(TypeDescriptor::new(a.clone()).with_public_constructor([]))
        .with_type(TypeDescriptor::new(b.clone()).with_public_constructor([a.clone()]))
        .with_type(TypeDescriptor::new(c.clone()).with_public_constructor([a.clone()]))
        .with_type(TypeDescriptor::new(d.clone()).with_public_constructor([b.clone(), c.clone()]));

    let mut services = ServiceCollection::new();
    services
        .add_self_transient(a.clone())
        .add_self_transient(b)
        .add_self_transient(c)
        .add_self_transient(d);

    let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
    let d_node = &roots[3];

    assert_eq!(d_node.dependencies().len(), 2);
    for branch in d_node.dependencies() {
        assert_eq!(branch.dependencies().len(), 1);
        assert_eq!(branch.dependencies()[0].service_type(), &a);
    }
    assert_eq!(d_node.subtree_size(), 5);
}

#[test]
fn test_open_generic_registration_satisfies_closed_parameter() {
    let logger = TypeKey::open_generic("Microsoft.Extensions.Logging", "ILogger", 1);
    let logger_impl = TypeKey::open_generic("Microsoft.Extensions.Logging", "Logger", 1);
    let factory = TypeKey::new("Microsoft.Extensions.Logging", "ILoggerFactory");
    let factory_impl = TypeKey::new("Microsoft.Extensions.Logging", "LoggerFactory");
    let foo = ty("Foo");

    let catalog = TypeCatalog::new()
        .with_type(TypeDescriptor::new(factory_impl.clone()).with_public_constructor([]))
        .with_type(TypeDescriptor::new(logger_impl.clone()).with_public_constructor([factory.clone()]))
        .with_type(TypeDescriptor::new(foo.clone()).with_public_constructor([logger.make_generic([foo.clone()])]));

    let mut services = ServiceCollection::new();
    services
        .add_singleton(factory.clone(), factory_impl)
        .add_singleton(logger.clone(), logger_impl)
        .add_self_scoped(foo);

    let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
    let foo_node = &roots[2];

    assert_eq!(foo_node.dependencies().len(), 1);
    let logger_node = &foo_node.dependencies()[0];
    assert_eq!(logger_node.service_type(), &logger);
    assert_eq!(logger_node.lifetime(), Lifetime::Singleton);
    assert_eq!(logger_node.dependencies()[0].service_type(), &factory);
}

#[test]
fn test_closed_generic_parameter_without_registration_is_unresolvable() {
    let options = TypeKey::open_generic("Microsoft.Extensions.Options", "IOptions", 1);
    let foo = ty("Foo");
    let settings = ty("Settings");

    let catalog = TypeCatalog::new().with_type(
        TypeDescriptor::new(foo.clone())
            .with_public_constructor([])
            .with_public_constructor([options.make_generic([settings])]),
    );

    let mut services = ServiceCollection::new();
    services.add_self_transient(foo);

    let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
    assert!(roots[0].dependencies().is_empty());
}

#[test]
fn test_instance_and_factory_roots_have_no_children() {
    let a = ty("A");
    let catalog = TypeCatalog::new().with_type(TypeDescriptor::new(a.clone()).with_public_constructor([ty("IClock")]));

    let mut services = ServiceCollection::new();
    services
        .add_singleton_instance(ty("IClock"), ty("SystemClock"))
        .add_scoped_factory(ty("IAFactory"), Some(a.clone()))
        .add_transient_factory(ty("IUnknown"), None);

    let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());

    assert_eq!(roots.len(), 3);
    assert!(roots.iter().all(|root| root.dependencies().is_empty()));
    assert_eq!(roots[0].implementation_description(), "Instance of SystemClock");
    assert_eq!(roots[2].implementation_description(), "Unknown");
}

#[test]
fn test_factory_child_expands_through_return_type() {
    // Only roots need an explicit implementation type; children may use the
    // factory's declared return type.
    let (a, svc, clock) = (ty("A"), ty("Svc"), ty("IClock"));
    let catalog = TypeCatalog::new()
        .with_type(TypeDescriptor::new(a.clone()).with_public_constructor([clock.clone()]))
        .with_type(TypeDescriptor::new(svc.clone()).with_public_constructor([ty("IA")]));

    let mut services = ServiceCollection::new();
    services
        .add_singleton_instance(clock.clone(), ty("SystemClock"))
        .add_scoped_factory(ty("IA"), Some(a))
        .add_self_scoped(svc);

    let roots = TreeBuilder::new(&catalog).build_tree(services.descriptors());
    let svc_node = &roots[2];

    assert_eq!(svc_node.dependencies()[0].service_type(), &ty("IA"));
    assert_eq!(svc_node.dependencies()[0].dependencies()[0].service_type(), &clock);
}

#[test]
fn test_first_matching_registration_wins() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("ITestService"), ty("OtherService"))
        .add_transient(ty("IDependentService"), ty("DependentService"));

    let roots = build(&services);

    assert_eq!(roots.len(), 3);
    assert_eq!(implementations(&roots[2]), ["TestService"]);
    assert!(roots[2].dependencies()[0].same_registration(&roots[0]));
}

#[test]
fn test_metrics_observer_counts_nodes() {
    let mut services = ServiceCollection::new();
    services
        .add_transient(ty("ITestService"), ty("TestService"))
        .add_transient(ty("IOtherService"), ty("OtherService"))
        .add_transient(ty("IMultiDependentService"), ty("MultiDependentService"));

    let catalog = fake_catalog();
    let metrics = Arc::new(MetricsObserver::new());
    let roots = TreeBuilder::new(&catalog)
        .with_observer(metrics.clone())
        .build_tree(services.descriptors());

    let total: usize = roots.iter().map(ServiceNode::subtree_size).sum();
    assert_eq!(metrics.node_count(), total as u64);
    assert_eq!(metrics.max_depth(), 1);
    assert_eq!(metrics.cycle_count(), 0);
}
