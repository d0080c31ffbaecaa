//! Routing module
//!
//! Path normalization and the pure path-to-route decision.

pub mod path;
pub mod route;

pub use path::{decode_path, normalize_path};
pub use route::{Route, ANALYSIS_PATH, DOCS_INDEX, DOCS_PREFIX, REDIRECT_PATHS};
