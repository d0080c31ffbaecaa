//! Request path normalization
//!
//! Collapses repeated separators and resolves `.`/`..` segments so that a
//! path can never climb above `/`.

use percent_encoding::percent_decode_str;

/// Decode percent-escapes in a request path
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Normalize a request path
///
/// The result always starts with `/` and never ends with one, except for
/// the root itself.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut normalized = String::with_capacity(path.len());
    for segment in &segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
