//! Route decision
//!
//! Maps a request path to the behavior that serves it. Matching is exact or
//! prefix based and evaluated in a fixed order; the first match wins.

use super::path::{decode_path, normalize_path};

/// Path of the analysis endpoint
pub const ANALYSIS_PATH: &str = "/v1/parsey-universal-full";

/// Paths redirected to the documentation index
pub const REDIRECT_PATHS: [&str; 3] = ["/", "/v1", "/v1/swagger"];

/// Prefix of documentation assets
pub const DOCS_PREFIX: &str = "/v1/swagger/";

/// Documentation entry page
pub const DOCS_INDEX: &str = "/v1/swagger/index.html";

/// What to do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Invoke the analysis engine
    Analysis,
    /// `303 See Other` to the target
    Redirect(&'static str),
    /// Serve a file below the documentation root
    StaticFile(String),
    NotFound,
}

impl Route {
    /// Decide the route for a raw request path
    ///
    /// Escapes are decoded first, so an encoded `..` or `/` is resolved
    /// like a literal one.
    pub fn resolve(path: &str) -> Self {
        let path = normalize_path(&decode_path(path));

        if path == ANALYSIS_PATH {
            return Self::Analysis;
        }

        if REDIRECT_PATHS.contains(&path.as_str()) {
            return Self::Redirect(DOCS_INDEX);
        }

        match path.strip_prefix(DOCS_PREFIX) {
            Some(sub_path) if !sub_path.is_empty() => Self::StaticFile(sub_path.to_string()),
            _ => Self::NotFound,
        }
    }
}
