use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::executor::block_on;
use serde::Serialize;
use url::Url;

use super::table::RouteTable;
use crate::router::{NavigateOptions, NavigationOutcome, Router};
use crate::runtime_config::RouterConfig;

/// Command-line interface for navrouter
///
/// Inspects route table files: which route a location resolves to, and what
/// the flattened table looks like after groups are applied.
#[derive(Parser)]
#[command(name = "navrouter")]
#[command(about = "navrouter route table inspector", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a location against a route table and print the match as JSON
    Match {
        /// Path to the route table (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,

        /// Initial location; defaults to NAVROUTER_INITIAL_URL
        #[arg(long)]
        base: Option<Url>,

        /// Destination to navigate to (path, relative or absolute URL)
        location: String,
    },
    /// Print the flattened route table in registration order
    List {
        /// Path to the route table (YAML or TOML)
        #[arg(short, long)]
        routes: PathBuf,
    },
}

/// JSON report printed by `match`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchReport {
    pub url: String,
    pub pattern: String,
    pub name: String,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

/// Build an in-memory router for `table` and navigate to `location`.
///
/// # Errors
///
/// Registration and navigation errors, or a destination that leaves the
/// application's origin.
pub fn run_match(table: &RouteTable, config: &RouterConfig, location: &str) -> Result<MatchReport> {
    let router: Router<String> = Router::with_config(config);
    table.register(&router)?;

    match block_on(router.navigate(location, NavigateOptions::new()))? {
        NavigationOutcome::Left(url) => {
            anyhow::bail!("Destination {url} is outside the application origin")
        }
        NavigationOutcome::Routed | NavigationOutcome::Superseded => {}
    }

    let state = router.state();
    let route = state
        .current_route
        .ok_or_else(|| anyhow::anyhow!("No route committed for {location}"))?;
    Ok(MatchReport {
        url: state.url.map(|u| u.to_string()).unwrap_or_default(),
        pattern: route.pattern().to_string(),
        name: route.payload().clone(),
        params: state.params.into_iter().collect(),
        query: state.query.into_iter().collect(),
    })
}

/// Flatten `table` into `(pattern, name, guard count)` rows.
///
/// # Errors
///
/// Registration errors.
pub fn run_list(table: &RouteTable) -> Result<Vec<(String, String, usize)>> {
    let router: Router<String> = Router::with_config(&RouterConfig::default());
    table.register(&router)?;
    Ok(router
        .routes()
        .iter()
        .map(|r| {
            (
                r.pattern().to_string(),
                r.payload().clone(),
                r.middleware().len(),
            )
        })
        .collect())
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The route table cannot be read or parsed
/// - A pattern in the table cannot be compiled
/// - The location cannot be resolved to a route
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Match {
            routes,
            base,
            location,
        } => {
            let table = RouteTable::load(&routes)?;
            let mut config = RouterConfig::from_env();
            if let Some(base) = base {
                config.initial_url = base;
            }
            let report = run_match(&table, &config, &location)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::List { routes } => {
            let table = RouteTable::load(&routes)?;
            for (pattern, name, guards) in run_list(&table)? {
                println!("[route] {pattern} -> {name} (guards: {guards})");
            }
            Ok(())
        }
    }
}
