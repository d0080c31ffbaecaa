// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub docs: DocsConfig,
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Info log file path (optional, stdout if not set)
    #[serde(default)]
    pub info_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Documentation assets served under `/v1/swagger/`
#[derive(Debug, Deserialize, Clone)]
pub struct DocsConfig {
    pub root: String,
}

/// External analysis engine invocation
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Program to run for each analysis request
    pub command: String,
    /// Arguments; the token `{lang}` is replaced by the language tag
    #[serde(default)]
    pub args: Vec<String>,
    /// Accepted language tags, empty means the engine decides
    #[serde(default)]
    pub languages: Vec<String>,
    pub default_language: String,
    /// Exit status the engine uses to report rejected input
    pub validation_exit_code: i32,
}
