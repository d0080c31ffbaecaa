use clap::Parser;
use parsey_server::engine::{Analyzer, ProcessAnalyzer};
use parsey_server::{config, handler, logger, server};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Parser)]
#[command(name = "parsey-server", version, about = "HTTP front end for the Parsey Universal parser")]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    // Tokio runtime sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let engine: Arc<dyn Analyzer> = Arc::new(ProcessAnalyzer::from_config(&cfg.engine));
    let app = Arc::new(handler::with_cors(handler::Router::from_config(&cfg, engine)));

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    logger::log_server_start(&addr, &cfg);
    if !Path::new(&cfg.docs.root).is_dir() {
        logger::log_warning(&format!(
            "Documentation root '{}' is not a directory; /v1/swagger/ will answer 404",
            cfg.docs.root
        ));
    }

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(
            listener,
            app,
            cfg.performance.clone(),
            shutdown,
        ))
        .await;

    Ok(())
}
