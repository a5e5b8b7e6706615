//! Jejak CLI - Expedition bookings for Jejak Langkah from the terminal
//!
//! Registration, ticket lookup, admin status edits, and cloud reconciliation
//! against the operator's spreadsheet endpoint.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::resolve_db_path;
use crate::commands::RegisterArgs;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jejak=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Register {
            name,
            whatsapp,
            email,
            address,
            mountain,
            category,
            package,
            start_date,
            climber_code,
            identity,
        } => {
            commands::run_register(
                RegisterArgs {
                    name,
                    whatsapp,
                    email,
                    address,
                    mountain,
                    category,
                    package,
                    start_date,
                    climber_code,
                    identity,
                },
                &db_path,
            )
            .await?;
        }
        Commands::Ticket { query } => commands::run_ticket(&query, &db_path).await?,
        Commands::List { limit, json } => commands::run_list(limit, json, &db_path).await?,
        Commands::Search { query, json } => commands::run_search(&query, json, &db_path).await?,
        Commands::Status { command } => commands::run_status(command, &db_path).await?,
        Commands::Sync => commands::run_sync(&db_path).await?,
        Commands::Watch { interval } => commands::run_watch(interval, &db_path).await?,
        Commands::Export {
            format,
            output,
            stdout,
        } => commands::run_export(format, output.as_deref(), stdout, &db_path).await?,
        Commands::Config { command } => commands::run_config(command, &db_path).await?,
        Commands::Completions { shell, output } => {
            commands::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
