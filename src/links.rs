//! Link interception.
//!
//! Hosts hook click events on anchor-like elements and hand them to
//! [`Router::follow_link`]. The router decides whether the default browser
//! navigation must be suppressed and, if so, performs the navigation itself.

use tracing::debug;

use crate::error::RouterError;
use crate::router::{NavigateOptions, NavigationOutcome, NavigationType, Router};

/// A click on a link: its `href` and the optional explicit navigation type
/// annotated on the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClick {
    pub href: String,
    pub kind: Option<NavigationType>,
}

impl LinkClick {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            kind: None,
        }
    }

    /// Build from raw element attributes. An unrecognised type annotation is
    /// ignored, as if absent.
    #[must_use]
    pub fn from_attributes(href: impl Into<String>, type_attr: Option<&str>) -> Self {
        Self {
            href: href.into(),
            kind: type_attr.and_then(NavigationType::parse),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: NavigationType) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// What the host should do with the original click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDisposition {
    /// Let the platform perform its default navigation; the router was not
    /// involved
    PassThrough,
    /// Default navigation must be suppressed; the router navigated
    Intercepted(NavigationOutcome),
}

impl LinkDisposition {
    /// Whether the host must call `preventDefault` on the click.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, LinkDisposition::Intercepted(_))
    }
}

impl<T: 'static> Router<T> {
    /// Handle a link click.
    ///
    /// Links explicitly typed `external` pass through untouched. Every other
    /// link is routed with `navigate(href, { type })`; cross-origin hrefs
    /// still leave the application through the history's top-level
    /// navigation.
    ///
    /// # Errors
    ///
    /// Any error from [`Router::navigate`].
    pub async fn follow_link(&self, click: &LinkClick) -> Result<LinkDisposition, RouterError> {
        if click.kind == Some(NavigationType::External) {
            debug!(href = %click.href, "External link passed through");
            return Ok(LinkDisposition::PassThrough);
        }
        let options = NavigateOptions::new().kind(click.kind.unwrap_or_default());
        let outcome = self.navigate(&click.href, options).await?;
        Ok(LinkDisposition::Intercepted(outcome))
    }
}
