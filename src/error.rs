use std::fmt;

/// Router error
///
/// Returned by registration, navigation and resolution. No router state is
/// mutated when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The navigation destination cannot be resolved to a URL
    MalformedDestination {
        /// The destination as passed to `navigate` (after param substitution)
        destination: String,
        /// Parser message
        reason: String,
    },
    /// No registered pattern (including a catch-all) matches the target path
    NoRouteMatches {
        /// The target path
        path: String,
    },
    /// Every structurally matching candidate was rejected by its middleware
    NoValidRoute {
        /// The target path
        path: String,
    },
    /// A route pattern could not be compiled into a matcher
    InvalidPattern {
        /// The declarative pattern
        pattern: String,
        /// Regex engine message
        reason: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::MalformedDestination {
                destination,
                reason,
            } => {
                write!(
                    f,
                    "Navigation error: destination '{}' cannot be resolved to a URL ({})",
                    destination, reason
                )
            }
            RouterError::NoRouteMatches { path } => {
                write!(f, "No route matches location '{}'", path)
            }
            RouterError::NoValidRoute { path } => {
                write!(f, "No route is valid for location '{}'", path)
            }
            RouterError::InvalidPattern { pattern, reason } => {
                write!(
                    f,
                    "Route pattern error: '{}' cannot be compiled ({})",
                    pattern, reason
                )
            }
        }
    }
}

impl std::error::Error for RouterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_location() {
        let err = RouterError::NoRouteMatches {
            path: "/nowhere".to_string(),
        };
        assert_eq!(err.to_string(), "No route matches location '/nowhere'");

        let err = RouterError::NoValidRoute {
            path: "/admin".to_string(),
        };
        assert_eq!(err.to_string(), "No route is valid for location '/admin'");
    }

    #[test]
    fn test_malformed_destination_display() {
        let err = RouterError::MalformedDestination {
            destination: "http://[::1".to_string(),
            reason: "invalid IPv6 address".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://[::1"));
        assert!(msg.contains("invalid IPv6 address"));
    }
}
