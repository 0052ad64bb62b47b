//! Route table files.
//!
//! A route table lists routes and groups in registration order. Each route
//! carries a name (its payload). Setting `reject: true` on a route or group
//! attaches a guard that always rejects, which is handy for checking
//! fallback behaviour.
//!
//! ```yaml
//! routes:
//!   - pattern: /users/:id
//!     name: user
//!   - prefix: /admin
//!     reject: true
//!     routes:
//!       - pattern: /settings
//!         name: admin_settings
//!   - pattern: "*"
//!     name: not_found
//! ```
//!
//! TOML files (`.toml`) use the same shape.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::middleware::{self, SharedMiddleware};
use crate::router::{RouteGroup, Router};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<TableEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TableEntry {
    Group {
        prefix: String,
        #[serde(default)]
        reject: bool,
        #[serde(default)]
        routes: Vec<TableEntry>,
    },
    Route {
        pattern: String,
        name: String,
        #[serde(default)]
        reject: bool,
    },
}

fn guards(reject: bool) -> Vec<SharedMiddleware<String>> {
    if reject {
        vec![middleware::deny()]
    } else {
        Vec::new()
    }
}

impl RouteTable {
    /// Load a table from a YAML or TOML file (by extension).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let table = if is_toml {
            Self::from_toml(&raw)
        } else {
            Self::from_yaml(&raw)
        };
        table.with_context(|| format!("Invalid route table {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Register every entry on `router`, in file order.
    pub fn register(&self, router: &Router<String>) -> Result<()> {
        for entry in &self.routes {
            match entry {
                TableEntry::Route {
                    pattern,
                    name,
                    reject,
                } => {
                    router.add(pattern, guards(*reject), name.clone())?;
                }
                TableEntry::Group {
                    prefix,
                    reject,
                    routes,
                } => {
                    let group = router.group(prefix, guards(*reject));
                    register_group(&group, routes)?;
                }
            }
        }
        Ok(())
    }
}

fn register_group(group: &RouteGroup<String>, entries: &[TableEntry]) -> Result<()> {
    for entry in entries {
        match entry {
            TableEntry::Route {
                pattern,
                name,
                reject,
            } => {
                group.add(pattern, guards(*reject), name.clone())?;
            }
            TableEntry::Group {
                prefix,
                reject,
                routes,
            } => {
                register_group(&group.group(prefix, guards(*reject)), routes)?;
            }
        }
    }
    Ok(())
}
