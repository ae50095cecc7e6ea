use std::sync::Arc;

mod config;
mod fixtures;
mod handler;
mod http;
mod logger;
mod server;

/// Config file loaded when no path is given (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, worker threads from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.resolve_socket_addr().await?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    println!("Serving on {}  (CTRL+C to stop)", state.site.root_url());
    logger::log_server_start(&addr, &state.config);

    server::start_server_loop(listener, state, signals).await;

    println!("\nShutting down.");
    Ok(())
}
