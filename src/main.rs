use clap::Parser;
use std::sync::Arc;

mod cli;
mod config;
mod error;
mod handler;
mod http;
mod images;
mod logger;
mod qr;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;
    logger::init(&cfg.logging).map_err(|e| format!("Failed to initialize logging: {e}"))?;

    match cli.command.unwrap_or(cli::Command::Serve) {
        cli::Command::Serve => serve(cfg),
        cli::Command::Prune { minutes } => cli::run_prune(&cfg, minutes, &mut std::io::stdout()),
        cli::Command::List { ext } => cli::run_list(&cfg, ext.as_deref(), &mut std::io::stdout()),
    }
}

fn serve(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    // Tokio runtime, thread count from `server.workers` (default: CPU cores)
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

    let state = Arc::new(config::AppState::new(cfg)?);
    let signals = Arc::new(server::signal::SignalHandler::new());
    server::signal::start_signal_handler(Arc::clone(&signals))?;

    if let Some(every) = state.config.images.prune_interval() {
        images::janitor::spawn_prune_task(
            Arc::clone(&state.images),
            every,
            state.config.images.max_age(),
            Arc::clone(&signals),
        );
    }

    logger::log_server_start(&addr, &state.config);

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(listener, state, signals))
        .await
}
