//! voxroute CLI and REST API entry point.
//!
//! Binary name: `voxroute`
//!
//! Loads configuration, initializes tracing, then dispatches to the requested
//! command or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;
use voxroute_core::classify::AgentClassifier;
use voxroute_core::nlp::RuleLemmatizer;
use voxroute_infra::config::{load_config, resolve_config_path};
use voxroute_observe::tracing_setup::{LogOptions, init_tracing, shutdown_tracing};
use voxroute_types::config::GlobalConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = load_config(&config_path)
        .await
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let log_options = LogOptions::from_verbosity(cli.verbose, cli.quiet)
        .with_json(config.logging.json)
        .with_otel(config.logging.otel)
        .with_log_file(config.logging.log_file.clone());
    init_tracing(&log_options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, mut config: GlobalConfig) -> anyhow::Result<()> {
    match cli.command {
        // Offline: no database, no backend
        Commands::Classify { text } => {
            let classifier = AgentClassifier::new(RuleLemmatizer::new(), config.keywords);
            cli::classify::classify(&classifier, &text.join(" "), cli.json)?;
        }

        Commands::History { session_id, limit } => {
            let state = AppState::init(&config).await?;
            cli::history::show_history(&state, session_id, limit, cli.json).await?;
        }

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = AppState::init(&config).await?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(%addr, "voxroute API listening");
            if !cli.quiet {
                println!(
                    "  {} voxroute API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
