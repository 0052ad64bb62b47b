//! # Router Module
//!
//! Route table, path matching and the navigation state machine.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Keeping an ordered table of routes (pattern, middleware chain, payload)
//! - Compiling `:name` patterns into anchored matchers
//! - Turning a destination into a history write plus a route resolution
//! - Running each candidate's middleware chain and backtracking on rejection
//! - Notifying listeners before and after a route change
//!
//! ## Architecture
//!
//! Resolution is a two-phase process:
//!
//! 1. **Candidate scan**: every route is tested in registration order. A
//!    catch-all (`*`) route is always a candidate; any other route is a
//!    candidate if its compiled pattern matches the whole target path.
//!
//! 2. **Guard walk**: candidates are tried first to last. Each candidate's
//!    parameters are bound, then its middleware runs sequentially. The first
//!    candidate whose chain accepts is committed; a rejected candidate is
//!    skipped in favour of the next one.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use futures::executor::block_on;
//! use navrouter::history::MemoryHistory;
//! use navrouter::router::{NavigateOptions, Router};
//!
//! let history = Arc::new(MemoryHistory::new("http://app.test/".parse().unwrap()));
//! let router = Router::new(history);
//! router.add("/users/:id", vec![], "user_page").unwrap();
//! router.add_catch_all("not_found").unwrap();
//!
//! block_on(router.navigate("/users/42", NavigateOptions::new())).unwrap();
//! assert_eq!(*router.current_route().unwrap().payload(), "user_page");
//! assert_eq!(router.param("id").as_deref(), Some("42"));
//! ```

mod core;
pub mod pattern;
mod registry;

pub use core::{
    NavigateOptions, NavigationOutcome, NavigationType, Params, Query, Resolution, Router,
    RouterState,
};
pub use registry::{Route, RouteDef, RouteGroup, RouteRegistry};
