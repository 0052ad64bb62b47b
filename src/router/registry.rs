//! Route table: registered routes, definitions for bulk registration, and
//! prefix groups.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::pattern::{self, CompiledPattern};
use super::Router;
use crate::error::RouterError;
use crate::middleware::SharedMiddleware;

/// A registered route: its declarative pattern, guard chain and payload.
///
/// Routes are immutable once registered and shared between the registry,
/// the router state and event listeners.
pub struct Route<T> {
    pattern: String,
    matcher: Option<CompiledPattern>,
    middleware: Vec<SharedMiddleware<T>>,
    payload: T,
}

impl<T> Route<T> {
    /// Build a route, compiling its pattern unless it is the catch-all.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the pattern cannot be compiled.
    pub fn new(
        pattern: impl Into<String>,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<Self, RouterError> {
        let pattern = pattern.into();
        let matcher = if pattern::is_catch_all(&pattern) {
            None
        } else {
            Some(pattern::compile(&pattern)?)
        };
        Ok(Self {
            pattern,
            matcher,
            middleware,
            payload,
        })
    }

    /// The declarative pattern as registered (`*` for the catch-all).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[must_use]
    pub fn middleware(&self) -> &[SharedMiddleware<T>] {
        &self.middleware
    }

    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.matcher.is_none()
    }

    /// The compiled matcher; `None` for the catch-all.
    #[must_use]
    pub fn matcher(&self) -> Option<&CompiledPattern> {
        self.matcher.as_ref()
    }

    /// Placeholder names in declaration order (empty for the catch-all).
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        self.matcher
            .as_ref()
            .map(CompiledPattern::param_names)
            .unwrap_or_default()
    }
}

impl<T> fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("middleware_count", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// A route waiting to be registered, used by `add_many`.
pub struct RouteDef<T> {
    pub pattern: String,
    pub middleware: Vec<SharedMiddleware<T>>,
    pub payload: T,
}

impl<T> RouteDef<T> {
    #[must_use]
    pub fn new(pattern: impl Into<String>, payload: T) -> Self {
        Self {
            pattern: pattern.into(),
            middleware: Vec::new(),
            payload,
        }
    }

    /// A catch-all definition with no middleware.
    #[must_use]
    pub fn catch_all(payload: T) -> Self {
        Self::new(pattern::CATCH_ALL, payload)
    }

    /// Append one guard to the chain.
    #[must_use]
    pub fn with(mut self, middleware: SharedMiddleware<T>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Append several guards to the chain, in order.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Vec<SharedMiddleware<T>>) -> Self {
        self.middleware.extend(middleware);
        self
    }
}

/// Ordered, append-only list of routes.
pub struct RouteRegistry<T> {
    routes: Vec<Arc<Route<T>>>,
}

impl<T> Default for RouteRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Append a route after every route registered so far.
    pub fn push(&mut self, route: Route<T>) -> Arc<Route<T>> {
        debug!(
            pattern = %route.pattern,
            middleware_count = route.middleware.len(),
            position = self.routes.len(),
            "route registered"
        );
        let route = Arc::new(route);
        self.routes.push(Arc::clone(&route));
        route
    }

    /// Routes in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Route<T>>> {
        self.routes.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Registration handle that prefixes every pattern and prepends shared
/// middleware to every chain. Obtained from [`Router::group`].
///
/// The catch-all pattern `*` is registered unprefixed. Groups nest: prefixes
/// and middleware chains concatenate outer to inner.
pub struct RouteGroup<T> {
    router: Router<T>,
    prefix: String,
    middleware: Vec<SharedMiddleware<T>>,
}

impl<T: 'static> RouteGroup<T> {
    pub(crate) fn new(
        router: Router<T>,
        prefix: String,
        middleware: Vec<SharedMiddleware<T>>,
    ) -> Self {
        Self {
            router,
            prefix,
            middleware,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped_pattern(&self, pattern: &str) -> String {
        if pattern::is_catch_all(pattern) {
            pattern.to_string()
        } else {
            format!("{}{}", self.prefix, pattern)
        }
    }

    fn scoped_chain(&self, middleware: Vec<SharedMiddleware<T>>) -> Vec<SharedMiddleware<T>> {
        let mut chain = self.middleware.clone();
        chain.extend(middleware);
        chain
    }

    /// Register a route under this group.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the prefixed pattern cannot be compiled.
    pub fn add(
        &self,
        pattern: &str,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<&Self, RouterError> {
        self.router.register(
            self.scoped_pattern(pattern),
            self.scoped_chain(middleware),
            payload,
        )?;
        Ok(self)
    }

    /// Same as [`RouteGroup::add`].
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add`].
    pub fn add_one(
        &self,
        pattern: &str,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<&Self, RouterError> {
        self.add(pattern, middleware, payload)
    }

    /// Register a catch-all guarded by the group's shared middleware.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the catch-all is not compiled.
    pub fn add_catch_all(&self, payload: T) -> Result<&Self, RouterError> {
        self.add(pattern::CATCH_ALL, Vec::new(), payload)
    }

    /// Register each definition in order. Stops at the first invalid pattern;
    /// definitions before it stay registered.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] for the first definition that fails.
    pub fn add_many<I>(&self, routes: I) -> Result<&Self, RouterError>
    where
        I: IntoIterator<Item = RouteDef<T>>,
    {
        for def in routes {
            self.add(&def.pattern, def.middleware, def.payload)?;
        }
        Ok(self)
    }

    /// Nested group: `prefix` is appended to this group's prefix and
    /// `middleware` runs after this group's shared middleware.
    #[must_use]
    pub fn group(&self, prefix: &str, middleware: Vec<SharedMiddleware<T>>) -> RouteGroup<T> {
        RouteGroup::new(
            self.router.clone(),
            format!("{}{}", self.prefix, prefix),
            self.scoped_chain(middleware),
        )
    }
}
