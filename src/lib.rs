//! # navrouter
//!
//! **navrouter** is a minimal client-side router for single-page applications: a route
//! table, URL-to-route matching with parameter extraction, history integration, and an
//! async middleware (guard) pipeline run before a route is committed.
//!
//! ## Architecture
//!
//! - **[`router`]** - Route table, `:name` pattern compiler, navigation engine and resolver
//! - **[`middleware`]** - Route guards and the context they receive
//! - **[`history`]** - Platform history boundary and an in-memory implementation
//! - **[`events`]** - `beforeRouteChange` / `afterRouteChange` notifications
//! - **[`links`]** - Link-click interception for hosts
//! - **[`runtime_config`]** - Environment-based configuration
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - Route table inspection tool
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Router
//!     participant History
//!     participant Guards as Middleware Chain
//!     participant Listeners
//!
//!     Host->>Router: navigate("/users/42", push)
//!     Router->>Router: Substitute :params, resolve URL
//!     alt Other origin or external
//!         Router->>History: assign(url)
//!         Router-->>Host: Left(url)
//!     end
//!     Router->>History: push_state / replace_state
//!     Router->>Listeners: beforeRouteChange(url)
//!     Router->>Router: Scan routes in registration order
//!     loop Each candidate
//!         Router->>Guards: run chain with bound params
//!         alt Rejected / failed
//!             Guards-->>Router: next candidate
//!         end
//!     end
//!     Router->>Router: Commit route, params, query, meta
//!     Router->>Listeners: afterRouteChange(route)
//!     Router-->>Host: Routed
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use futures::executor::block_on;
//! use navrouter::history::MemoryHistory;
//! use navrouter::middleware;
//! use navrouter::router::{NavigateOptions, Router};
//!
//! let history = Arc::new(MemoryHistory::new("http://app.test/".parse().unwrap()));
//! let router = Router::new(history);
//!
//! router.add("/", vec![], "home").unwrap();
//! let admin = router.group("/admin", vec![middleware::deny()]);
//! admin.add("/users", vec![], "admin_users").unwrap();
//! router.add_catch_all("not_found").unwrap();
//!
//! block_on(router.navigate("/admin/users", NavigateOptions::new())).unwrap();
//! assert_eq!(*router.current_route().unwrap().payload(), "not_found");
//! ```
//!
//! ## Runtime Considerations
//!
//! Navigation is `async` because guards may suspend, but the router assumes a
//! cooperative single-threaded host (a UI event loop): guard futures are not
//! `Send`. Any executor works; the tests use `futures::executor::block_on`.

pub mod cli;
pub mod error;
pub mod events;
pub mod history;
pub mod links;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;

pub use error::RouterError;
pub use events::{ListenerId, RouteEvent, RouterEvent};
pub use history::{History, MemoryHistory, Meta, NavigationState, PopStateEvent};
pub use links::{LinkClick, LinkDisposition};
pub use middleware::{Middleware, MiddlewareResult, NavigationContext};
pub use router::{
    NavigateOptions, NavigationOutcome, NavigationType, Params, Query, Resolution, Route,
    RouteDef, Router,
};
