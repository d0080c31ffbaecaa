//! HTTP front end for the Parsey Universal dependency parser.
//!
//! `POST /v1/parsey-universal-full` runs the parser on the request body and
//! returns CoNLL-U; `/v1/swagger/` serves the API documentation. Every
//! response carries permissive CORS headers.

pub mod config;
pub mod engine;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
