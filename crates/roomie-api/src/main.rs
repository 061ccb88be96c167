//! Roomie CLI, REST API and relay entry point.
//!
//! Binary name: `roomie`
//!
//! Parses CLI arguments, loads configuration from the data directory, then
//! either starts the server or runs a client command against it.

mod cli;
mod http;
mod state;

use std::path::{Path, PathBuf};

use clap::Parser;

use cli::{Cli, Commands};
use roomie_infra::config::{load_config, resolve_data_dir};
use roomie_infra::rest::HttpMessageStore;
use roomie_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use roomie_types::config::RoomieConfig;
use roomie_types::message::MessageId;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;
    if let Some(url) = &cli.url {
        config.client.base_url = url.clone();
    }

    let result = run(cli, data_dir, config).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, data_dir: PathBuf, mut config: RoomieConfig) -> anyhow::Result<()> {
    if let Commands::Serve { port, host } = cli.command {
        if let Some(port) = port {
            config.server.port = port;
        }
        if let Some(host) = host {
            config.server.host = host;
        }
        return serve(&data_dir, config).await;
    }

    let client = HttpMessageStore::from_config(&config.client)?;
    match cli.command {
        Commands::Participant { command } => {
            cli::participant::handle_participant_command(command, &client, cli.json).await?;
        }
        Commands::Send { from, to, content } => {
            cli::message::handle_send(&client, from, to, content, cli.json).await?;
        }
        Commands::History { viewer, counterpart } => {
            cli::message::handle_history(&client, viewer, counterpart, cli.json).await?;
        }
        Commands::Conversations { user } => {
            cli::message::handle_conversations(&client, user, cli.json).await?;
        }
        Commands::Read { id, reader } => {
            cli::message::handle_read(&client, MessageId(id), reader, cli.json).await?;
        }
        Commands::Serve { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(data_dir: &Path, config: RoomieConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::init(data_dir, config).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, data_dir = %data_dir.display(), "roomie server starting");
    println!(
        "  {} Roomie listening on {} (relay at {})",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan(),
        console::style(format!("ws://{addr}/ws")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("roomie server stopped");
    println!("\n  Server stopped.");
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
