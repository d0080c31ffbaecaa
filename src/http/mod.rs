//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from routing.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_413_response, build_500_response, build_empty_response,
    build_file_response, build_see_other_response, build_text_response,
};
