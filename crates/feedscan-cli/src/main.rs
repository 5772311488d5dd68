mod scrape;

use clap::{Parser, Subcommand};
use feedscan_core::ScrapeMode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedscan")]
#[command(about = "Profile feed scraper with engagement metrics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the latest posts of a profile
    Scrape {
        /// Profile handle, with or without a leading `@`
        handle: String,
        /// Rotate identity, require a session and collect comment detail
        #[arg(long)]
        deep: bool,
    },
    /// Shorthand for `scrape --deep`
    DeepScan { handle: String },
    /// Rotate the outbound identity now, ignoring the cooldown
    Rotate,
    /// Print the effective configuration (secrets redacted)
    Config,
}

fn scrape_mode(deep: bool) -> ScrapeMode {
    if deep {
        ScrapeMode::Deep
    } else {
        ScrapeMode::Standard
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = feedscan_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    match &cli.command {
        Commands::Scrape { handle, deep } => {
            scrape::run_scrape(&config, handle, scrape_mode(*deep), &cancel).await
        }
        Commands::DeepScan { handle } => {
            scrape::run_scrape(&config, handle, ScrapeMode::Deep, &cancel).await
        }
        Commands::Rotate => scrape::run_rotate(&config, &cancel).await,
        Commands::Config => {
            println!("{config:#?}");
            Ok(())
        }
    }
}

/// Cancels `token` on Ctrl-C (or SIGTERM on Unix).
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, cancelling in-flight work");
    token.cancel();
}
