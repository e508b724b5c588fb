//! Cache-Control header values for served images.
//!
//! Builds the directives attached to profile image responses and parses them
//! back, so callers and tests can reason about a response's cacheability.
//!
//! # Example
//!
//! ```rust
//! use profile_image::render::CacheControl;
//! use std::time::Duration;
//!
//! let cc = CacheControl::public_max_age(Duration::from_secs(3600));
//! assert_eq!(cc.to_header_value(), "public, max-age=3600");
//! assert_eq!(CacheControl::parse("public, max-age=3600"), cc);
//! ```

use std::time::Duration;

/// Cache-Control directives relevant to image responses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Response can be cached by any cache (public directive)
    pub public: bool,

    /// Response must not be stored by shared caches (private directive)
    pub private: bool,

    /// Freshness lifetime (max-age directive)
    pub max_age: Option<Duration>,

    /// Response must be revalidated before use (no-cache directive)
    pub no_cache: bool,

    /// Response must not be stored at all (no-store directive)
    pub no_store: bool,

    /// Stale responses must be revalidated (must-revalidate directive)
    pub must_revalidate: bool,
}

impl CacheControl {
    /// Directives for a cacheable image
    pub fn public_max_age(max_age: Duration) -> Self {
        Self {
            public: true,
            max_age: Some(max_age),
            ..Self::default()
        }
    }

    /// Directives forcing a fresh fetch on every request
    pub fn no_caching() -> Self {
        Self {
            no_cache: true,
            no_store: true,
            must_revalidate: true,
            ..Self::default()
        }
    }

    /// Directives for redirects: store but always revalidate
    pub fn revalidate() -> Self {
        Self {
            no_cache: true,
            ..Self::default()
        }
    }

    /// Parse a Cache-Control header value. Unknown directives are ignored.
    pub fn parse(header_value: &str) -> Self {
        let mut result = Self::default();

        for directive in header_value.split(',') {
            let directive = directive.trim().to_lowercase();
            if directive.is_empty() {
                continue;
            }

            if let Some((name, value)) = directive.split_once('=') {
                if name.trim() == "max-age" {
                    if let Ok(secs) = value.trim().trim_matches('"').parse::<u64>() {
                        result.max_age = Some(Duration::from_secs(secs));
                    }
                }
            } else {
                match directive.as_str() {
                    "public" => result.public = true,
                    "private" => result.private = true,
                    "no-cache" => result.no_cache = true,
                    "no-store" => result.no_store = true,
                    "must-revalidate" => result.must_revalidate = true,
                    _ => {}
                }
            }
        }

        result
    }

    /// Render as a header value, directives in a fixed order
    pub fn to_header_value(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.public {
            parts.push("public".to_string());
        }
        if self.private {
            parts.push("private".to_string());
        }
        if let Some(max_age) = self.max_age {
            parts.push(format!("max-age={}", max_age.as_secs()));
        }
        if self.no_cache {
            parts.push("no-cache".to_string());
        }
        if self.no_store {
            parts.push("no-store".to_string());
        }
        if self.must_revalidate {
            parts.push("must-revalidate".to_string());
        }
        parts.join(", ")
    }

    /// Whether a browser may reuse the response without revalidating
    pub fn allows_reuse(&self) -> bool {
        !self.no_store && !self.no_cache && self.max_age.map_or(false, |age| !age.is_zero())
    }
}
