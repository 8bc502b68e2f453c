// Output formatting and display for CLI

use crate::router::RouteTable;
use colored::*;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a success message
pub fn print_success_msg(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a formatted table of routes
pub fn print_route_table(routes: &RouteTable) {
    #[derive(Tabled)]
    struct RouteRow {
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Log File")]
        path: String,
    }

    let rows: Vec<RouteRow> = routes
        .entries()
        .into_iter()
        .map(|(key, path)| RouteRow {
            key: key.to_string(),
            path: path.display().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);
    println!(
        "{}",
        format!("Total: {} route(s)", routes.len()).dimmed().italic()
    );
}

/// Print how each logger name resolves
pub fn print_resolutions(routes: &RouteTable, names: &[String]) {
    #[derive(Tabled)]
    struct ResolutionRow {
        #[tabled(rename = "Logger")]
        name: String,
        #[tabled(rename = "Matched Key")]
        key: String,
        #[tabled(rename = "Log File")]
        path: String,
    }

    let rows: Vec<ResolutionRow> = names
        .iter()
        .map(|name| ResolutionRow {
            name: name.clone(),
            key: routes.resolve_key(name).to_string(),
            path: routes.resolve(name).display().to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);
}
