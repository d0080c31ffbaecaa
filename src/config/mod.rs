// Configuration module entry point
// Loads the layered configuration (defaults, config file, environment)

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{
    Config, DocsConfig, EngineConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error: defaults and `PARSEY_*` environment
    /// variables still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PARSEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("engine.args")
                    .with_list_parse_key("engine.languages"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "parsey-server")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("docs.root", "swagger")?
            .set_default("engine.command", "parsey")?
            .set_default("engine.args", vec!["--language", "{lang}"])?
            .set_default("engine.languages", Vec::<String>::new())?
            .set_default("engine.default_language", "en")?
            .set_default("engine.validation_exit_code", 2)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
