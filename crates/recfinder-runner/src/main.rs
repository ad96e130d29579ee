//! `recfinder` binary.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use recfinder_client::ClientConfig;
use recfinder_runner::{id_export, init_tracing, lookup, range_export, Cli, Command, RunnerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider was already installed");
    }

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match RunnerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to initialize logging: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, config).await {
        error!("Critical error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: RunnerConfig) -> anyhow::Result<()> {
    let client_config = ClientConfig::from_env().context("loading API configuration")?;

    match command {
        Command::Range { start, end, output } => {
            let summary = range_export::run(client_config, &start, &end, &output).await?;
            info!(?summary, output = %output.display(), "Range export finished");
            if let Some(reason) = summary.aborted {
                warn!(%reason, "Pagination stopped early; output is partial");
            }
        }
        Command::Ids {
            input,
            output,
            limit,
        } => {
            let max = limit.unwrap_or(config.max_identifiers);
            let summary = id_export::run(client_config, &input, &output, max)
                .await
                .with_context(|| format!("exporting identifiers from {}", input.display()))?;
            info!(?summary, output = %output.display(), "Identifier export finished");
        }
        Command::Conversation { conversation_id } => {
            match lookup::conversation(client_config, &conversation_id).await? {
                Some(details) => println!("{}", serde_json::to_string_pretty(&details)?),
                None => warn!(%conversation_id, "Conversation details unavailable"),
            }
        }
        Command::Status {
            conversation_id,
            recording_id,
        } => {
            let status =
                lookup::recording_status(client_config, &conversation_id, &recording_id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
