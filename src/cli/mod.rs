// CLI module - User-facing command-line interface

mod demo;
mod output;

use crate::config::LogRouteConfig;
use crate::error::{LogRouteError, Result};
use crate::level::Level;
use crate::logger::Registry;
use crate::record::{CallSite, LogRecord};
use crate::router::LogRouter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// logroute - route named loggers to rotating log files
#[derive(Parser)]
#[command(name = "logroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml or .json); the built-in table is used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which log file each logger name routes to
    Resolve {
        /// Dotted logger names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the configured routes
    Routes,

    /// Validate the configuration
    Check,

    /// Write one message through a routed logger
    Emit {
        /// Dotted logger name
        name: String,

        /// Message body
        message: String,

        /// Severity of the message
        #[arg(short, long, default_value = "INFO")]
        level: Level,

        /// Logger threshold (defaults to the configured level)
        #[arg(short, long)]
        threshold: Option<Level>,
    },

    /// Walk through propagation, level and filter behaviour
    Demo,
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        cli.execute()
    }

    /// Execute the parsed command
    fn execute(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.command {
            Commands::Resolve { names } => {
                let router = config.build_router()?;
                output::print_resolutions(router.routes(), names);
                Ok(())
            }

            Commands::Routes => {
                let router = config.build_router()?;
                output::print_route_table(router.routes());
                let rotation = router.rotation();
                output::print_info(&format!(
                    "Rotation every {} day(s), keeping {}",
                    config.rotation.interval_days,
                    match rotation.backup_count {
                        0 => "all backups".to_string(),
                        n => format!("{} backup(s)", n),
                    }
                ));
                Ok(())
            }

            Commands::Check => {
                config.build_router()?;
                output::print_success_msg(&format!(
                    "Configuration is valid ({} routes)",
                    config.routes.len()
                ));
                Ok(())
            }

            Commands::Emit {
                name,
                message,
                level,
                threshold,
            } => {
                let router = config.build_router()?;
                emit(&router, name, *level, threshold.unwrap_or(config.level), message)
            }

            Commands::Demo => {
                let router = config.build_router()?;
                demo::run(&router)
            }
        }
    }

    fn load_config(&self) -> Result<LogRouteConfig> {
        match &self.config {
            Some(path) => LogRouteConfig::from_file(path),
            None => Ok(LogRouteConfig::default()),
        }
    }
}

/// Write one record through a freshly routed logger
fn emit(router: &LogRouter, name: &str, level: Level, threshold: Level, message: &str) -> Result<()> {
    let registry = Registry::new();
    let logger = router.get_logger(&registry, name, threshold)?;

    if !logger.is_enabled_for(level) {
        output::print_info(&format!(
            "{} message dropped: logger {} threshold is {}",
            level, name, threshold
        ));
        return Ok(());
    }

    let record = LogRecord::new(name, level, CallSite::unknown(), message);
    logger.emit_record(&record)?;
    output::print_success_msg(&format!(
        "Wrote {} message to {}",
        level,
        router.resolve(name).display()
    ));
    Ok(())
}

/// Print an error through the CLI's error style
pub fn report_error(error: &LogRouteError) {
    output::print_error(&error.to_string());
}
