use logroute::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // Internal diagnostics go to stderr, controlled by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = Cli::run() {
        cli::report_error(&e);
        std::process::exit(1);
    }
}
