//! Path pattern compiler.
//!
//! Route patterns are literal path text with `:name` placeholders, e.g.
//! `/users/:id/posts/:post-id`. A placeholder name is made of ASCII letters,
//! digits, `-` and `_`. Each placeholder matches exactly one path segment
//! (any run of characters other than `/`); everything else matches literally.
//!
//! The catch-all pattern [`CATCH_ALL`] is never compiled: the resolver treats
//! it as an unconditional match.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::error::RouterError;

/// Pattern that matches every path.
pub const CATCH_ALL: &str = "*";

/// Maximum number of captured segments before heap allocation.
/// Client routes rarely carry more than a handful of placeholders.
pub const MAX_INLINE_CAPTURES: usize = 8;

/// Raw capture values of one match, in placeholder order.
pub type CaptureVec = SmallVec<[String; MAX_INLINE_CAPTURES]>;

/// Regex fragment substituted for every placeholder.
const SEGMENT_CAPTURE: &str = "([^/]+)";

#[allow(clippy::expect_used)]
pub(crate) static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i):[a-z0-9\-_]+").expect("placeholder regex is valid"));

/// A compiled route pattern: an anchored matcher plus the ordered names of
/// its placeholders.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Ordered placeholder names, left to right.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    #[cfg(test)]
    pub(crate) fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` against the pattern and return the raw captured
    /// segments in placeholder order, or `None` if it does not match.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<CaptureVec> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    #[cfg(test)]
    pub(crate) fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compile a declarative pattern into an anchored matcher.
///
/// The pattern is split on its placeholders, each literal fragment is
/// escaped, and the fragments are joined with a single-segment capture.
///
/// # Errors
///
/// Returns [`RouterError::InvalidPattern`] if the resulting regex is rejected
/// by the regex engine (for example when it exceeds the size limit).
///
/// # Example
///
/// ```rust
/// use navrouter::router::pattern::compile;
///
/// let compiled = compile("/users/:id").unwrap();
/// assert_eq!(compiled.param_names(), ["id"]);
/// assert_eq!(compiled.captures("/users/42").unwrap().as_slice(), ["42"]);
/// assert!(compiled.captures("/users/42/edit").is_none());
/// ```
pub fn compile(pattern: &str) -> Result<CompiledPattern, RouterError> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    for (i, fragment) in PLACEHOLDER.split(pattern).enumerate() {
        if i > 0 {
            source.push_str(SEGMENT_CAPTURE);
        }
        source.push_str(&regex::escape(fragment));
    }
    source.push('$');

    let regex = Regex::new(&source).map_err(|e| RouterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(CompiledPattern {
        regex,
        param_names: extract_param_names(pattern),
    })
}

/// Placeholder names of `pattern`, in left-to-right order.
#[must_use]
pub fn extract_param_names(pattern: &str) -> Vec<String> {
    PLACEHOLDER
        .find_iter(pattern)
        .map(|m| m.as_str()[1..].to_string())
        .collect()
}

/// Whether `pattern` is the catch-all pattern.
#[inline]
#[must_use]
pub fn is_catch_all(pattern: &str) -> bool {
    pattern == CATCH_ALL
}
