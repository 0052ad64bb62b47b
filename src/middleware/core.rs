use std::future::Future;
use std::sync::Arc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use url::Url;

use crate::history::Meta;
use crate::router::{Params, Route, Router};

/// Outcome of one guard step.
///
/// `Ok(true)` lets the chain continue, `Ok(false)` rejects the candidate
/// route, and `Err(_)` rejects it as well (the failure is logged).
pub type MiddlewareResult = anyhow::Result<bool>;

/// Shared handle to a registered middleware.
pub type SharedMiddleware<T> = Arc<dyn Middleware<T>>;

/// Everything a guard can see about the candidate it is deciding on.
///
/// The context is owned so that guards may move it into the future they
/// return. `params` are the candidate's bound path parameters; they are only
/// committed to the router state if the whole chain accepts.
pub struct NavigationContext<T> {
    /// Router handle; guards may inspect it or start a redirect.
    pub router: Router<T>,
    /// The candidate route.
    pub route: Arc<Route<T>>,
    /// Absolute target URL.
    pub url: Url,
    /// Path parameters bound for this candidate.
    pub params: Params,
    /// Navigation metadata carried by the history entry.
    pub meta: Meta,
}

impl<T> Clone for NavigationContext<T> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            route: Arc::clone(&self.route),
            url: self.url.clone(),
            params: self.params.clone(),
            meta: self.meta.clone(),
        }
    }
}

impl<T> NavigationContext<T> {
    /// Get a bound path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A guard run before a route is committed.
///
/// Every guard is awaited, so a synchronous check is simply a future that is
/// ready immediately. Guards run strictly one after another in registration
/// order; the first one that does not return `Ok(true)` rejects the route.
pub trait Middleware<T>: Send + Sync {
    fn call(&self, ctx: NavigationContext<T>) -> LocalBoxFuture<'static, MiddlewareResult>;
}

impl<T, F, Fut> Middleware<T> for F
where
    F: Fn(NavigationContext<T>) -> Fut + Send + Sync,
    Fut: Future<Output = MiddlewareResult> + 'static,
{
    fn call(&self, ctx: NavigationContext<T>) -> LocalBoxFuture<'static, MiddlewareResult> {
        (self)(ctx).boxed_local()
    }
}

/// Guard built from a synchronous check, see [`from_fn_sync`].
pub struct SyncMiddleware<F> {
    check: F,
}

impl<T, F> Middleware<T> for SyncMiddleware<F>
where
    F: Fn(&NavigationContext<T>) -> MiddlewareResult + Send + Sync,
{
    fn call(&self, ctx: NavigationContext<T>) -> LocalBoxFuture<'static, MiddlewareResult> {
        future::ready((self.check)(&ctx)).boxed_local()
    }
}

/// Wrap an async guard into a shareable middleware.
///
/// ```rust
/// use navrouter::middleware::{from_fn, NavigationContext};
///
/// let needs_id = from_fn(|ctx: NavigationContext<&'static str>| async move {
///     Ok(ctx.param("id").is_some())
/// });
/// # let _ = needs_id;
/// ```
pub fn from_fn<T, F, Fut>(f: F) -> SharedMiddleware<T>
where
    T: 'static,
    F: Fn(NavigationContext<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult> + 'static,
{
    Arc::new(f)
}

/// Wrap a synchronous guard into a shareable middleware.
pub fn from_fn_sync<T, F>(check: F) -> SharedMiddleware<T>
where
    T: 'static,
    F: Fn(&NavigationContext<T>) -> MiddlewareResult + Send + Sync + 'static,
{
    Arc::new(SyncMiddleware { check })
}

/// A guard that always accepts.
pub fn allow<T: 'static>() -> SharedMiddleware<T> {
    from_fn_sync(|_| Ok(true))
}

/// A guard that always rejects.
pub fn deny<T: 'static>() -> SharedMiddleware<T> {
    from_fn_sync(|_| Ok(false))
}
