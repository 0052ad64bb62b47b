//! Route-change notifications.
//!
//! A minimal publish/subscribe hub. Listeners are kept per event in
//! registration order and invoked synchronously in that order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::router::Route;

/// Events fired by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteEvent {
    /// Fired before candidate routes are evaluated, with the target URL.
    BeforeRouteChange,
    /// Fired after a route has been committed, with that route.
    AfterRouteChange,
}

impl RouteEvent {
    /// Event name as used by hosts (`beforeRouteChange`, `afterRouteChange`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RouteEvent::BeforeRouteChange => "beforeRouteChange",
            RouteEvent::AfterRouteChange => "afterRouteChange",
        }
    }

    /// Look an event up by name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "beforeRouteChange" => Some(RouteEvent::BeforeRouteChange),
            "afterRouteChange" => Some(RouteEvent::AfterRouteChange),
            _ => None,
        }
    }
}

impl fmt::Display for RouteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to listeners.
pub enum RouterEvent<'a, T> {
    BeforeRouteChange(&'a Url),
    AfterRouteChange(&'a Arc<Route<T>>),
}

impl<T> RouterEvent<'_, T> {
    #[must_use]
    pub fn kind(&self) -> RouteEvent {
        match self {
            RouterEvent::BeforeRouteChange(_) => RouteEvent::BeforeRouteChange,
            RouterEvent::AfterRouteChange(_) => RouteEvent::AfterRouteChange,
        }
    }
}

pub type Listener<T> = Arc<dyn Fn(&RouterEvent<'_, T>) + Send + Sync>;

/// Handle returned by [`EventHub::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registry<T> {
    listeners: HashMap<RouteEvent, Vec<(ListenerId, Listener<T>)>>,
    next_id: u64,
}

/// Listener table shared by a router and its clones.
///
/// All methods take `&self`. Listeners are invoked with no lock held, so a
/// listener may subscribe, unsubscribe or navigate re-entrantly.
pub struct EventHub<T> {
    registry: Mutex<Registry<T>>,
}

impl<T> Default for EventHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventHub<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                listeners: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Append `listener` to the listeners of `event`.
    pub fn on<F>(&self, event: RouteEvent, listener: F) -> ListenerId
    where
        F: Fn(&RouterEvent<'_, T>) + Send + Sync + 'static,
        T: 'static,
    {
        let listener: Listener<T> = Arc::new(listener);
        let mut registry = self.registry.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.entry(event).or_default().push((id, listener));
        id
    }

    /// Remove the listener registered under `id`. Returns whether one was
    /// removed; unknown ids and events are a no-op.
    pub fn off(&self, event: RouteEvent, id: ListenerId) -> bool {
        let mut registry = self.registry.lock();
        let Some(list) = registry.listeners.get_mut(&event) else {
            return false;
        };
        match list.iter().position(|(lid, _)| *lid == id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Invoke every listener of the event's kind, in registration order.
    ///
    /// The listener list is snapshotted first: listeners added or removed
    /// during delivery take effect from the next trigger.
    pub fn trigger(&self, event: &RouterEvent<'_, T>) {
        let listeners: Vec<Listener<T>> = self
            .registry
            .lock()
            .listeners
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(event);
        }
    }
}
