//! Chatrelay CLI and HTTP API entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, initializes tracing, the database and the completion
//! client, then dispatches to a command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use console::style;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    chatrelay_observe::tracing_setup::init_tracing(cli.log_filter(), enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    chatrelay_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host, .. } => {
            let state = AppState::init().await?;
            tracing::info!(
                model = %state.config.model,
                failure_policy = %state.config.failure_policy,
                timeout_secs = state.config.request_timeout_secs,
                "Relay configured"
            );
            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;

            if !cli.quiet {
                println!();
                println!(
                    "  {} Chatrelay listening on {}",
                    style("*").green().bold(),
                    style(format!("http://{addr}")).cyan()
                );
                println!("  Press Ctrl+C to stop.");
                println!();
            }
            tracing::info!(%addr, "HTTP server started");

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            db_pool.close().await;
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Send {
            session_id,
            message,
        } => {
            let state = AppState::init().await?;
            cli::chat::send_message(&state, &session_id, &message, cli.json).await?;
            state.db_pool.close().await;
        }

        Commands::History { session_id } => {
            let (_config, db_pool) = state::open_store().await?;
            let reader = chatrelay_core::chat::history::HistoryReader::new(
                chatrelay_infra::sqlite::turn::SqliteMessageStore::new(db_pool.clone()),
            );
            let entries = reader.get_history(&session_id).await?;
            cli::history::print_history(&session_id, &entries, cli.json)?;
            db_pool.close().await;
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

    tracing::info!("Shutdown signal received");
}
