//! # CLI Module
//!
//! Command-line tooling for route tables.
//!
//! ## Commands
//!
//! ### `match`
//!
//! Resolve a location against a route table file:
//!
//! ```bash
//! navrouter match --routes routes.yaml /users/42?tab=posts
//! ```
//!
//! Prints the committed pattern, route name, params and query as JSON, or
//! exits non-zero with `No route matches location ...` /
//! `No route is valid for location ...`.
//!
//! Options:
//! - `--routes <FILE>` - Route table (YAML, or TOML by `.toml` extension)
//! - `--base <URL>` - Initial location (default: `NAVROUTER_INITIAL_URL`)
//!
//! ### `list`
//!
//! Print the flattened table (group prefixes and shared guards applied):
//!
//! ```bash
//! navrouter list --routes routes.yaml
//! ```

mod commands;
mod table;


pub use commands::{run_cli, run_list, run_match, Cli, Commands, MatchReport};
pub use table::{RouteTable, TableEntry};
