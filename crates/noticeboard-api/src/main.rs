//! Noticeboard CLI and REST adapter entry point.
//!
//! Binary name: `nboard`
//!
//! Parses CLI arguments, initializes the store and configuration, then
//! dispatches to an operator command, the console chat, or the REST adapter.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use noticeboard_observe::tracing_setup::{
    TracingOptions, default_filter, init_tracing, shutdown_tracing,
};
use noticeboard_types::chat::{ActorId, ChatId};

use cli::{Cli, Commands, RecordsCommand};
use http::server::Board;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "nboard", &mut std::io::stdout());
        return Ok(());
    }

    let options = TracingOptions {
        otel: cli.otel,
        default_filter: default_filter(cli.verbose, cli.quiet).to_string(),
        json: false,
    };
    if let Err(e) = init_tracing(&options) {
        eprintln!("warning: tracing setup failed: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.data_dir.clone()).await?;

    match cli.command {
        Commands::Chat { chat, actor } => {
            cli::chat::loop_runner::run_chat_loop(&state, ChatId(chat), ActorId(actor)).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;

            if state.config.http.api_token.is_none() {
                tracing::warn!("http.api_token is not set, the API accepts every request");
            }

            println!(
                "  {} Noticeboard API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let board = Board::start(state.clone());
            let router = http::router::build_router(board.state.clone());

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            let accepted = board.stop().await;
            tracing::info!(accepted, "server stopped");
            println!("\n  Server stopped.");
        }

        Commands::Records { action } => match action {
            RecordsCommand::List { section } => {
                cli::records::list_records(&state, section, cli.json).await?;
            }
            RecordsCommand::Show { id } => {
                cli::records::show_record(&state, id, cli.json).await?;
            }
            RecordsCommand::Add {
                section,
                body,
                details,
            } => {
                cli::records::add_record(&state, section, body, details, cli.json).await?;
            }
            RecordsCommand::SetDetails { id, details } => {
                cli::records::set_details(&state, id, details, cli.json).await?;
            }
            RecordsCommand::Replace { id, body, details } => {
                cli::records::replace_record(&state, id, body, details, cli.json).await?;
            }
            RecordsCommand::Delete { id } => {
                cli::records::delete_record(&state, id, cli.json).await?;
            }
        },

        Commands::Sections => {
            cli::sections::list_sections(&state, cli.json).await?;
        }

        Commands::Completions { .. } => {}
    }

    state.db_pool.close().await;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
