//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Error and warning logging
//! - File-based logging support
//!
//! There is no per-request access log.

pub mod writer;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.info_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{}", writer::stamp(message)),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{}", writer::stamp(message)),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info(&format!("{} started", config.http.server_name));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    match config.server.workers {
        Some(workers) => write_info(&format!("Worker threads: {workers}")),
        None => write_info("Worker threads: default (CPU cores)"),
    }
    write_info(&format!("Documentation root: {}", config.docs.root));
    write_info(&format!(
        "Engine: {} {}",
        config.engine.command,
        config.engine.args.join(" ")
    ));
    write_info("======================================");
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Unexpected failure surfaced from the handler chain (answered with 500)
pub fn log_handler_failure(method: &hyper::Method, path: &str, err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] {method} {path} failed: {err}"));
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("[SIGNAL] {signal} received, shutting down"));
}
