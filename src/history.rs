//! # History Module
//!
//! The platform boundary of the router: the current location, session history
//! entries, and full top-level navigation.
//!
//! A host embeds the router by implementing [`History`] over its platform
//! (for a browser: `location`, `history.pushState`, `history.replaceState` and
//! `location.assign`) and by forwarding every native back/forward event to
//! [`Router::pop_state`](crate::router::Router::pop_state) with the state
//! recovered from the event.
//!
//! [`MemoryHistory`] is an in-process implementation with the same entry
//! semantics, used by the CLI, tests, and non-browser hosts.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Arbitrary navigation metadata stored with a history entry.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// The payload persisted into a history entry so back/forward navigation
/// can recover it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Absolute URL of the entry
    pub url: Url,
    /// Metadata passed to `navigate`
    #[serde(default)]
    pub meta: Meta,
}

impl NavigationState {
    #[must_use]
    pub fn new(url: Url, meta: Meta) -> Self {
        Self { url, meta }
    }
}

/// What a native back/forward navigation delivers: the state object of the
/// entry that became current (absent for entries the router did not write).
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    pub state: Option<NavigationState>,
}

/// Host platform history.
pub trait History: Send + Sync {
    /// The current absolute location.
    fn location(&self) -> Url;

    /// Add a new entry with `state`, making `state.url` the visible address.
    fn push_state(&self, state: NavigationState);

    /// Overwrite the current entry with `state`.
    fn replace_state(&self, state: NavigationState);

    /// Full top-level navigation to `url`, leaving the in-page router.
    fn assign(&self, url: &Url);
}

struct Entry {
    url: Url,
    state: Option<NavigationState>,
}

struct Inner {
    entries: Vec<Entry>,
    index: usize,
    assigned: Vec<Url>,
}

/// Session history kept in memory.
///
/// Starts with one stateless entry for the initial URL. Pushing drops any
/// forward entries. With a limit set, the oldest entries are discarded once
/// the stack grows past it.
pub struct MemoryHistory {
    inner: Mutex<Inner>,
    limit: Option<usize>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial: Url) -> Self {
        Self::with_limit(initial, None)
    }

    #[must_use]
    pub fn with_limit(initial: Url, limit: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: vec![Entry {
                    url: initial,
                    state: None,
                }],
                index: 0,
                assigned: Vec::new(),
            }),
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Number of entries in the session history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Always false: there is at least the initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Position of the current entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.inner.lock().index
    }

    /// The state stored in the current entry.
    #[must_use]
    pub fn state(&self) -> Option<NavigationState> {
        let inner = self.inner.lock();
        inner.entries[inner.index].state.clone()
    }

    /// URLs passed to [`History::assign`], oldest first.
    #[must_use]
    pub fn assigned(&self) -> Vec<Url> {
        self.inner.lock().assigned.clone()
    }

    /// Move one entry back. `None` if already at the oldest entry.
    pub fn back(&self) -> Option<PopStateEvent> {
        self.go(-1)
    }

    /// Move one entry forward. `None` if already at the newest entry.
    pub fn forward(&self) -> Option<PopStateEvent> {
        self.go(1)
    }

    /// Move `delta` entries through the history. `None` if the target is out
    /// of range or `delta` is zero; otherwise the event the platform would
    /// deliver for the new current entry.
    pub fn go(&self, delta: isize) -> Option<PopStateEvent> {
        let mut inner = self.inner.lock();
        let target = inner.index.checked_add_signed(delta)?;
        if delta == 0 || target >= inner.entries.len() {
            return None;
        }
        inner.index = target;
        let entry = &inner.entries[target];
        debug!(url = %entry.url, index = target, "history traversal");
        Some(PopStateEvent {
            state: entry.state.clone(),
        })
    }

    fn push_entry(&self, entry: Entry) {
        let mut inner = self.inner.lock();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(entry);
        inner.index = inner.entries.len() - 1;
        if let Some(limit) = self.limit {
            let excess = inner.entries.len().saturating_sub(limit);
            if excess > 0 {
                inner.entries.drain(..excess);
                inner.index -= excess;
            }
        }
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Url {
        let inner = self.inner.lock();
        inner.entries[inner.index].url.clone()
    }

    fn push_state(&self, state: NavigationState) {
        self.push_entry(Entry {
            url: state.url.clone(),
            state: Some(state),
        });
    }

    fn replace_state(&self, state: NavigationState) {
        let mut inner = self.inner.lock();
        let index = inner.index;
        inner.entries[index] = Entry {
            url: state.url.clone(),
            state: Some(state),
        };
    }

    /// Records `url` as a page load outside the application. The session
    /// entries and the current location are left as they are.
    fn assign(&self, url: &Url) {
        debug!(url = %url, "top-level navigation");
        self.inner.lock().assigned.push(url.clone());
    }
}
