//! # Middleware Module
//!
//! Route guards that run before a navigation is committed.
//!
//! A route carries an ordered chain of middleware. When the resolver tries a
//! candidate route it calls each middleware in turn with a
//! [`NavigationContext`] and awaits the result:
//!
//! - `Ok(true)` continues with the next middleware
//! - `Ok(false)` rejects the candidate
//! - `Err(_)` or a panic rejects the candidate
//!
//! A rejected candidate is discarded and the resolver moves on to the next
//! candidate. An empty chain accepts unconditionally.

mod core;

pub use core::{
    allow, deny, from_fn, from_fn_sync, Middleware, MiddlewareResult, NavigationContext,
    SharedMiddleware, SyncMiddleware,
};
