//! Router core: the route table owner, navigation engine and resolver.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use regex::Captures;
use tracing::{debug, info, warn};
use url::Url;

use super::pattern::{self, CaptureVec, PLACEHOLDER};
use super::registry::{Route, RouteDef, RouteGroup, RouteRegistry};
use crate::error::RouterError;
use crate::events::{EventHub, ListenerId, RouteEvent, RouterEvent};
use crate::history::{History, Meta, NavigationState};
use crate::middleware::{NavigationContext, SharedMiddleware};

/// Path parameters bound by the matched pattern, by placeholder name.
pub type Params = HashMap<String, String>;

/// Query string of the location at resolution time. Later duplicate keys
/// overwrite earlier ones.
pub type Query = HashMap<String, String>;

/// How a navigation touches session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationType {
    /// Add a new history entry
    #[default]
    Push,
    /// Overwrite the current history entry
    Replace,
    /// Resolve without writing history (back/forward recovery)
    Internal,
    /// Leave the application with a full top-level navigation
    External,
}

impl NavigationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NavigationType::Push => "push",
            NavigationType::Replace => "replace",
            NavigationType::Internal => "internal",
            NavigationType::External => "external",
        }
    }

    /// Parse a navigation type name (`push`, `replace`, `internal`,
    /// `external`). Unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "push" => Some(NavigationType::Push),
            "replace" => Some(NavigationType::Replace),
            "internal" => Some(NavigationType::Internal),
            "external" => Some(NavigationType::External),
            _ => None,
        }
    }
}

impl fmt::Display for NavigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options accepted by [`Router::navigate`].
#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
    pub kind: NavigationType,
    /// Values substituted for `:name` tokens in the destination
    pub params: HashMap<String, String>,
    /// Stored in the history entry and exposed as [`Router::meta`]
    pub meta: Meta,
}

impl NavigateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: NavigationType) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn replace() -> Self {
        Self::new().kind(NavigationType::Replace)
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

/// Result of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A route was accepted and committed to the router state
    Committed,
    /// A route was accepted, but a later navigation started meanwhile; the
    /// state was left to the later one
    Superseded,
}

/// Result of a successful [`Router::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Routed in-page and committed
    Routed,
    /// Routed in-page, but overtaken by a later navigation
    Superseded,
    /// Left the application with a top-level navigation to this URL
    Left(Url),
}

impl From<Resolution> for NavigationOutcome {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Committed => NavigationOutcome::Routed,
            Resolution::Superseded => NavigationOutcome::Superseded,
        }
    }
}

/// The committed routing state.
///
/// Every field is replaced as a whole on each successful resolution.
pub struct RouterState<T> {
    pub current_route: Option<Arc<Route<T>>>,
    pub params: Params,
    pub query: Query,
    pub meta: Meta,
    pub url: Option<Url>,
}

impl<T> Default for RouterState<T> {
    fn default() -> Self {
        Self {
            current_route: None,
            params: Params::new(),
            query: Query::new(),
            meta: Meta::new(),
            url: None,
        }
    }
}

impl<T> Clone for RouterState<T> {
    fn clone(&self) -> Self {
        Self {
            current_route: self.current_route.as_ref().map(Arc::clone),
            params: self.params.clone(),
            query: self.query.clone(),
            meta: self.meta.clone(),
            url: self.url.clone(),
        }
    }
}

impl<T> fmt::Debug for RouterState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterState")
            .field("current_route", &self.current_route)
            .field("params", &self.params)
            .field("query", &self.query)
            .field("meta", &self.meta)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .finish()
    }
}

struct Inner<T> {
    registry: RwLock<RouteRegistry<T>>,
    state: RwLock<RouterState<T>>,
    events: EventHub<T>,
    history: Arc<dyn History>,
    latest_ticket: AtomicU64,
}

/// A structurally matching route waiting for its guard chain.
struct Candidate<T> {
    route: Arc<Route<T>>,
    /// Raw captures; `None` for the catch-all
    captures: Option<CaptureVec>,
}

impl<T> Candidate<T> {
    fn bind_params(&self) -> Params {
        let mut params = Params::with_capacity(self.route.param_names().len());
        if let Some(values) = &self.captures {
            for (name, value) in self.route.param_names().iter().zip(values) {
                params.insert(name.clone(), value.clone());
            }
        }
        params
    }
}

/// Client-side router.
///
/// A cheap, cloneable handle: clones share the same route table, state,
/// listeners and history. Construct one per application (or per test); there
/// is no global instance.
///
/// Navigation and resolution are async because route middleware may suspend.
/// Overlapping navigations are not queued: a middleware may itself navigate
/// (a redirect), which a queue would deadlock. Instead every resolution takes
/// a ticket, and only the most recently started one may commit its result.
pub struct Router<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Router<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.inner.registry.read().len())
            .field("state", &*self.inner.state.read())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Router<T> {
    /// Create a router over a host history.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use navrouter::{history::MemoryHistory, router::Router};
    ///
    /// let history = Arc::new(MemoryHistory::new("http://app.test/".parse().unwrap()));
    /// let router: Router<&'static str> = Router::new(history);
    /// assert!(router.current_route().is_none());
    /// ```
    pub fn new<H: History + 'static>(history: Arc<H>) -> Self {
        let history: Arc<dyn History> = history;
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(RouteRegistry::new()),
                state: RwLock::new(RouterState::default()),
                events: EventHub::new(),
                history,
                latest_ticket: AtomicU64::new(0),
            }),
        }
    }

    /// The host history this router writes to.
    #[must_use]
    pub fn history(&self) -> &Arc<dyn History> {
        &self.inner.history
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    pub(crate) fn register(
        &self,
        pattern: String,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<Arc<Route<T>>, RouterError> {
        let route = Route::new(pattern, middleware, payload)?;
        Ok(self.inner.registry.write().push(route))
    }

    /// Register a route. Candidates are tried in registration order.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if the pattern cannot be compiled.
    pub fn add(
        &self,
        pattern: &str,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<&Self, RouterError> {
        self.register(pattern.to_string(), middleware, payload)?;
        Ok(self)
    }

    /// Same as [`Router::add`].
    ///
    /// # Errors
    ///
    /// See [`Router::add`].
    pub fn add_one(
        &self,
        pattern: &str,
        middleware: Vec<SharedMiddleware<T>>,
        payload: T,
    ) -> Result<&Self, RouterError> {
        self.add(pattern, middleware, payload)
    }

    /// Register a catch-all route (pattern `*`) with no middleware.
    ///
    /// The catch-all is tried in registration order like any other route;
    /// register it last to use it as a fallback.
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
            self.register(def.pattern, def.middleware, def.payload)?;
        }
        Ok(self)
    }

    /// Start a group whose routes share `prefix` and `middleware`.
    ///
    /// `router.group("/admin", vec![auth]).add("/users", vec![], page)` is
    /// the same as `router.add("/admin/users", vec![auth], page)`.
    #[must_use]
    pub fn group(&self, prefix: &str, middleware: Vec<SharedMiddleware<T>>) -> RouteGroup<T> {
        RouteGroup::new(self.clone(), prefix.to_string(), middleware)
    }

    /// Registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<Route<T>>> {
        self.inner.registry.read().snapshot()
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    /// The committed route, if any resolution has succeeded.
    #[must_use]
    pub fn current_route(&self) -> Option<Arc<Route<T>>> {
        self.inner.state.read().current_route.as_ref().map(Arc::clone)
    }

    #[must_use]
    pub fn params(&self) -> Params {
        self.inner.state.read().params.clone()
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.inner.state.read().params.get(name).cloned()
    }

    #[must_use]
    pub fn query(&self) -> Query {
        self.inner.state.read().query.clone()
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.inner.state.read().query.get(name).cloned()
    }

    #[must_use]
    pub fn meta(&self) -> Meta {
        self.inner.state.read().meta.clone()
    }

    /// URL of the committed resolution.
    #[must_use]
    pub fn current_url(&self) -> Option<Url> {
        self.inner.state.read().url.clone()
    }

    /// Snapshot of the whole committed state.
    #[must_use]
    pub fn state(&self) -> RouterState<T> {
        self.inner.state.read().clone()
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Subscribe to a route event. Listeners run synchronously in
    /// registration order and may call back into the router.
    pub fn on<F>(&self, event: RouteEvent, listener: F) -> ListenerId
    where
        F: Fn(&RouterEvent<'_, T>) + Send + Sync + 'static,
    {
        self.inner.events.on(event, listener)
    }

    /// Subscribe by event name. Unknown names are ignored and yield `None`.
    pub fn on_named<F>(&self, name: &str, listener: F) -> Option<ListenerId>
    where
        F: Fn(&RouterEvent<'_, T>) + Send + Sync + 'static,
    {
        RouteEvent::from_name(name).map(|event| self.on(event, listener))
    }

    /// Unsubscribe. Returns whether a listener was removed.
    pub fn off(&self, event: RouteEvent, id: ListenerId) -> bool {
        self.inner.events.off(event, id)
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Navigate to `destination`, relative to the current location unless it
    /// is absolute.
    ///
    /// Cross-origin destinations (scheme or host differ) and
    /// [`NavigationType::External`] leave the application through
    /// [`History::assign`] without resolving. Otherwise the history entry is
    /// written according to the navigation type and the route is resolved.
    ///
    /// # Errors
    ///
    /// - [`RouterError::MalformedDestination`] if the destination is not a URL
    /// - [`RouterError::NoRouteMatches`] / [`RouterError::NoValidRoute`] from
    ///   resolution
    pub async fn navigate(
        &self,
        destination: &str,
        options: NavigateOptions,
    ) -> Result<NavigationOutcome, RouterError> {
        let destination = substitute_params(destination, &options.params);
        let current = self.inner.history.location();
        let url = Url::options()
            .base_url(Some(&current))
            .parse(&destination)
            .map_err(|e| RouterError::MalformedDestination {
                destination: destination.to_string(),
                reason: e.to_string(),
            })?;

        if options.kind == NavigationType::External || !same_origin(&url, &current) {
            info!(
                url = %url,
                navigation_type = %options.kind,
                "Leaving application with top-level navigation"
            );
            self.inner.history.assign(&url);
            return Ok(NavigationOutcome::Left(url));
        }

        debug!(
            url = %url,
            navigation_type = %options.kind,
            "Navigating in-page"
        );
        let state = NavigationState::new(url, options.meta);
        match options.kind {
            NavigationType::Push => self.inner.history.push_state(state.clone()),
            NavigationType::Replace => self.inner.history.replace_state(state.clone()),
            NavigationType::Internal | NavigationType::External => {}
        }

        Ok(self.resolve(Some(state)).await?.into())
    }

    /// Platform back/forward hook: resolve the state recovered from the
    /// native event without writing history.
    ///
    /// # Errors
    ///
    /// See [`Router::resolve`].
    pub async fn pop_state(
        &self,
        state: Option<NavigationState>,
    ) -> Result<Resolution, RouterError> {
        self.resolve(state).await
    }

    /// Resolve `state` (or the current location when `None`) to a route.
    ///
    /// Candidates are the catch-all routes plus the routes whose pattern
    /// matches the target path, in registration order. Each candidate's
    /// middleware chain runs in turn; the first candidate whose chain
    /// accepts is committed and `AfterRouteChange` is fired.
    ///
    /// # Errors
    ///
    /// - [`RouterError::NoRouteMatches`] if there is no candidate
    /// - [`RouterError::NoValidRoute`] if every candidate was rejected
    pub async fn resolve(&self, state: Option<NavigationState>) -> Result<Resolution, RouterError> {
        let ticket = self.inner.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let (url, meta) = match state {
            Some(state) => (state.url, state.meta),
            None => (self.inner.history.location(), Meta::new()),
        };
        let path = url.path().to_string();

        self.inner.events.trigger(&RouterEvent::BeforeRouteChange(&url));

        let candidates = self.candidates(&path);
        if candidates.is_empty() {
            warn!(path = %path, "No route matches location");
            return Err(RouterError::NoRouteMatches { path });
        }
        debug!(
            path = %path,
            candidates = candidates.len(),
            "Resolving route candidates"
        );

        for candidate in &candidates {
            let params = candidate.bind_params();
            let ctx = NavigationContext {
                router: self.clone(),
                route: Arc::clone(&candidate.route),
                url: url.clone(),
                params: params.clone(),
                meta: meta.clone(),
            };
            if !run_chain(ctx).await {
                debug!(
                    path = %path,
                    route_pattern = %candidate.route.pattern(),
                    "Route candidate rejected"
                );
                continue;
            }

            if self.inner.latest_ticket.load(Ordering::SeqCst) != ticket {
                info!(
                    path = %path,
                    route_pattern = %candidate.route.pattern(),
                    "Route accepted but superseded by a later navigation"
                );
                return Ok(Resolution::Superseded);
            }

            let query: Query = self
                .inner
                .history
                .location()
                .query_pairs()
                .into_owned()
                .collect();
            info!(
                path = %path,
                route_pattern = %candidate.route.pattern(),
                path_params = ?params,
                query_params = ?query,
                "Route changed"
            );
            *self.inner.state.write() = RouterState {
                current_route: Some(Arc::clone(&candidate.route)),
                params,
                query,
                meta,
                url: Some(url),
            };
            self.inner
                .events
                .trigger(&RouterEvent::AfterRouteChange(&candidate.route));
            return Ok(Resolution::Committed);
        }

        warn!(
            path = %path,
            candidates = candidates.len(),
            "Every route candidate was rejected"
        );
        Err(RouterError::NoValidRoute { path })
    }

    fn candidates(&self, path: &str) -> Vec<Candidate<T>> {
        self.routes()
            .into_iter()
            .filter_map(|route| {
                let captures = match route.matcher() {
                    None => None,
                    Some(matcher) => Some(matcher.captures(path)?),
                };
                Some(Candidate { route, captures })
            })
            .collect()
    }
}

/// Run a candidate's guard chain. `true` if every guard accepted.
async fn run_chain<T: 'static>(ctx: NavigationContext<T>) -> bool {
    let route = Arc::clone(&ctx.route);
    for (step, middleware) in route.middleware().iter().enumerate() {
        let pending = match panic::catch_unwind(AssertUnwindSafe(|| middleware.call(ctx.clone()))) {
            Ok(pending) => pending,
            Err(payload) => {
                warn!(
                    route_pattern = %route.pattern(),
                    step,
                    panic_message = %panic_message(payload.as_ref()),
                    "Route middleware panicked"
                );
                return false;
            }
        };
        match AssertUnwindSafe(pending).catch_unwind().await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => {
                debug!(route_pattern = %route.pattern(), step, "Route middleware rejected");
                return false;
            }
            Ok(Err(error)) => {
                warn!(
                    route_pattern = %route.pattern(),
                    step,
                    error = %error,
                    "Route middleware failed"
                );
                return false;
            }
            Err(payload) => {
                warn!(
                    route_pattern = %route.pattern(),
                    step,
                    panic_message = %panic_message(payload.as_ref()),
                    "Route middleware panicked"
                );
                return false;
            }
        }
    }
    true
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// Replace `:name` tokens in `destination` with percent-encoded values.
/// Tokens without a value are left as they are.
pub(crate) fn substitute_params<'a>(
    destination: &'a str,
    params: &HashMap<String, String>,
) -> Cow<'a, str> {
    if params.is_empty() {
        return Cow::Borrowed(destination);
    }
    PLACEHOLDER.replace_all(destination, |caps: &Captures<'_>| {
        let token = &caps[0];
        match params.get(&token[1..]) {
            Some(value) => urlencoding::encode(value).into_owned(),
            None => token.to_string(),
        }
    })
}

fn same_origin(url: &Url, current: &Url) -> bool {
    url.scheme() == current.scheme() && url.host_str() == current.host_str()
}
