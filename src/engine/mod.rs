//! Analysis engine module
//!
//! The engine turns raw text plus a language tag into a CoNLL-U document.
//! It lives outside this service; `Analyzer` is the seam the HTTP layer
//! talks to and `ProcessAnalyzer` drives a parser executable.

#[cfg(test)]
pub mod mock;
mod process;

pub use process::ProcessAnalyzer;

use std::io;
use thiserror::Error;

/// Errors raised by an analysis engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed text or unsupported language; the message is shown to the client
    #[error("{0}")]
    Validation(String),

    #[error("failed to start engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("engine produced output that is not valid UTF-8")]
    InvalidOutput,
}

/// A text-analysis engine
///
/// Calls are synchronous and may block; callers on the async runtime move
/// them to the blocking pool.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &[u8], language: &str) -> Result<String, EngineError>;
}
