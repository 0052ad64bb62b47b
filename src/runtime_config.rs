//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for in-memory routers (the CLI,
//! tests, and hosts without a platform history of their own).
//!
//! ## Environment Variables
//!
//! ### `NAVROUTER_INITIAL_URL`
//!
//! Absolute URL of the initial history entry. Relative destinations are
//! resolved against it, and its scheme and host decide which destinations
//! count as same-origin.
//!
//! Default: `http://localhost/`
//!
//! ### `NAVROUTER_HISTORY_LIMIT`
//!
//! Maximum number of session history entries kept; the oldest are dropped
//! beyond it. Unset or `0` means unbounded.
//!
//! ## Usage
//!
//! ```rust
//! use navrouter::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! let history = config.memory_history();
//! # let _ = history;
//! ```

use std::env;
use std::sync::Arc;

use url::Url;

use crate::history::MemoryHistory;
use crate::router::Router;

pub const DEFAULT_INITIAL_URL: &str = "http://localhost/";

/// Router configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Location of the first history entry
    pub initial_url: Url,
    /// Cap on session history entries (`None` = unbounded)
    pub history_limit: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            initial_url: default_initial_url(),
            history_limit: None,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables. Invalid values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let initial_url = lookup("NAVROUTER_INITIAL_URL")
            .and_then(|val| Url::parse(&val).ok())
            .filter(|url| url.has_host())
            .unwrap_or_else(default_initial_url);
        let history_limit = lookup("NAVROUTER_HISTORY_LIMIT")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0);
        RouterConfig {
            initial_url,
            history_limit,
        }
    }

    /// A fresh in-memory history starting at `initial_url`.
    pub fn memory_history(&self) -> MemoryHistory {
        MemoryHistory::with_limit(self.initial_url.clone(), self.history_limit)
    }
}

impl<T: 'static> Router<T> {
    /// A router over a fresh [`MemoryHistory`] built from `config`.
    #[must_use]
    pub fn with_config(config: &RouterConfig) -> Self {
        Router::new(Arc::new(config.memory_history()))
    }
}

#[allow(clippy::expect_used)]
fn default_initial_url() -> Url {
    Url::parse(DEFAULT_INITIAL_URL).expect("default initial URL is valid")
}
