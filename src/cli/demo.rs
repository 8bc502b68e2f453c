// Walkthrough of propagation, thresholds and filters on a routed setup

use super::output;
use crate::destination::StreamDestination;
use crate::error::Result;
use crate::filter::FuncNameFilter;
use crate::level::Level;
use crate::logger::{Logger, Registry};
use crate::router::LogRouter;
use std::sync::Arc;

pub fn run(router: &LogRouter) -> Result<()> {
    let registry = Registry::new();
    let root = registry.root();
    root.set_level(Level::Info);
    root.add_destination(Arc::new(StreamDestination::stderr()));

    output::print_info("app.demo propagates to root, which prints to stderr");
    let app = registry.get_logger("app.demo");
    let host = "10.0.0.175";
    let port = 8080;
    crate::error!(app, "error to connect to {}:{}", host, port)?;

    output::print_info("Records from foo() are filtered out on app.demo");
    app.add_filter(FuncNameFilter::new("foo"));
    foo(&app)?;
    bar(&app)?;

    let client_name = "app.network.client";
    output::print_info(&format!(
        "{} is routed to {} with propagation off",
        client_name,
        router.resolve(client_name).display()
    ));
    let client = router.get_logger(&registry, client_name, Level::Debug)?;
    crate::error!(client, "do you see me?")?;

    output::print_info("Raising the threshold to CRITICAL suppresses later ERROR records");
    client.set_level(Level::Critical);
    crate::error!(client, "now you see me?")?;
    crate::critical!(client, "critical records still pass")?;

    output::print_info("Disabling DEBUG globally");
    registry.disable(Level::Debug);
    crate::debug!(app, "never written")?;

    registry.flush_all()?;
    output::print_success_msg("Demo finished");
    Ok(())
}

fn foo(logger: &Logger) -> Result<()> {
    crate::warning!(logger, "message from foo")
}

fn bar(logger: &Logger) -> Result<()> {
    crate::warning!(logger, "message from bar")
}
