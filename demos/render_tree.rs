/// Example: Rendering the dependency forest of a small web application
///
/// Builds the registry a typical ASP.NET-style host would contain (user
/// services plus logging and options plumbing), then prints every report.
///
/// Run with `RUST_LOG=ferrous_di_viz=debug` to see the builder's trace, and
/// with `DI_VIZ_TREE_STYLE=box` or `DI_VIZ_ONLY_USER_CODE=true` to change the
/// output.

use ferrous_di_viz::{
    DependencyTree, ExportFormat, LoggingObserver, ServiceCollection, TypeCatalog, TypeDescriptor, TypeKey,
    VisualizerConfig, VizResult,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ===== Type catalog =====

fn catalog(app: &str) -> TypeCatalog {
    let logging = "Microsoft.Extensions.Logging";
    let options = "Microsoft.Extensions.Options";

    let logger = TypeKey::open_generic(logging, "ILogger", 1);
    let ioptions = TypeKey::open_generic(options, "IOptions", 1);

    let orders = TypeKey::new(format!("{}.Orders", app), "OrderService");
    let payments = TypeKey::new(format!("{}.Payments", app), "PaymentGateway");

    TypeCatalog::new()
        .with_type(TypeDescriptor::new(TypeKey::new(logging, "LoggerFactory")).with_public_constructor([]))
        .with_type(
            TypeDescriptor::new(TypeKey::open_generic(logging, "Logger", 1))
                .with_public_constructor([TypeKey::new(logging, "ILoggerFactory")]),
        )
        .with_type(TypeDescriptor::new(TypeKey::open_generic(options, "OptionsManager", 1)).with_public_constructor([]))
        .with_type(TypeDescriptor::new(TypeKey::new(format!("{}.Data", app), "SqlOrderRepository")).with_public_constructor([
            ioptions.make_generic([TypeKey::new(format!("{}.Data", app), "DatabaseOptions")]),
        ]))
        .with_type(
            TypeDescriptor::new(payments.clone())
                .with_public_constructor([])
                .with_public_constructor([logger.make_generic([payments.clone()])]),
        )
        .with_type(TypeDescriptor::new(orders.clone()).with_public_constructor([
            TypeKey::new(format!("{}.Data", app), "IOrderRepository"),
            TypeKey::new(format!("{}.Payments", app), "IPaymentGateway"),
            logger.make_generic([orders.clone()]),
        ]))
}

// ===== Registrations =====

fn services(app: &str) -> ServiceCollection {
    let logging = "Microsoft.Extensions.Logging";
    let options = "Microsoft.Extensions.Options";

    let mut services = ServiceCollection::new();
    services
        .add_singleton(TypeKey::new(logging, "ILoggerFactory"), TypeKey::new(logging, "LoggerFactory"))
        .add_singleton(TypeKey::open_generic(logging, "ILogger", 1), TypeKey::open_generic(logging, "Logger", 1))
        .add_singleton(TypeKey::open_generic(options, "IOptions", 1), TypeKey::open_generic(options, "OptionsManager", 1))
        .add_scoped(
            TypeKey::new(format!("{}.Data", app), "IOrderRepository"),
            TypeKey::new(format!("{}.Data", app), "SqlOrderRepository"),
        )
        .add_singleton(
            TypeKey::new(format!("{}.Payments", app), "IPaymentGateway"),
            TypeKey::new(format!("{}.Payments", app), "PaymentGateway"),
        )
        .add_self_scoped(TypeKey::new(format!("{}.Orders", app), "OrderService"))
        .add_singleton_instance(TypeKey::global("TimeProvider"), TypeKey::global("SystemTimeProvider"));
    services
}

fn main() -> VizResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = "Shop";
    let mut config = VisualizerConfig::from_env()?;
    if config.user_namespace_prefix.is_empty() {
        config.user_namespace_prefix = app.to_string();
    }

    let services = services(app);
    let catalog = catalog(app);
    let tree = DependencyTree::with_observer(
        services.descriptors(),
        &catalog,
        config,
        Arc::new(LoggingObserver::with_prefix("render_tree")),
    );

    println!("=== Dependency tree ===\n");
    print!("{}", tree.tree_view());

    println!("=== Most used services ===");
    for (ty, count) in tree.most_used_services(5) {
        println!("{:>3}  {}", count, ty);
    }

    println!("\n=== Unused services ===");
    for ty in tree.unused_services() {
        println!("  {}", ty.full_name());
    }

    let chains = tree.registration_chains_by_depth(3, true);
    println!("\n=== Chains of depth 3 or more ({} roots) ===\n", chains.len());
    print!("{}", chains.rendered);

    println!("=== Graphviz ===\n");
    print!("{}", tree.export_dot(true));

    println!("\n=== Mermaid ===\n");
    print!("{}", tree.export(ExportFormat::Mermaid)?);

    match tree.export(ExportFormat::Json) {
        Ok(json) => println!("\n=== JSON ===\n{}", json),
        Err(e) => println!("\n{}", e),
    }

    Ok(())
}
