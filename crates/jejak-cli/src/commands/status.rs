use std::path::Path;

use jejak_core::{Error as CoreError, Status};

use crate::cli::StatusCommands;
use crate::commands::common::{open_database, parse_registration_id};
use crate::error::CliError;

pub async fn run_status(command: StatusCommands, db_path: &Path) -> Result<(), CliError> {
    match command {
        StatusCommands::Set { id, status } => run_status_set(&id, &status, db_path).await,
        StatusCommands::Toggle { id } => run_status_toggle(&id, db_path).await,
    }
}

async fn run_status_set(id: &str, status: &str, db_path: &Path) -> Result<(), CliError> {
    let registration_id = parse_registration_id(id)?;
    let status: Status = status.parse()?;

    let db = open_database(db_path).await?;
    let updated = db
        .update_status(registration_id, status)
        .await
        .map_err(|error| match error {
            CoreError::NotFound(_) => CliError::RegistrationNotFound(id.to_string()),
            other => CliError::Core(other),
        })?;

    println!(
        "{} {} -> {}",
        updated.id, updated.data.full_name, updated.status
    );
    Ok(())
}

async fn run_status_toggle(id: &str, db_path: &Path) -> Result<(), CliError> {
    let registration_id = parse_registration_id(id)?;

    let db = open_database(db_path).await?;
    let updated = db
        .toggle_status(registration_id)
        .await
        .map_err(|error| match error {
            CoreError::NotFound(_) => CliError::RegistrationNotFound(id.to_string()),
            other => CliError::Core(other),
        })?;

    println!(
        "{} {} -> {}",
        updated.id, updated.data.full_name, updated.status
    );
    Ok(())
}
