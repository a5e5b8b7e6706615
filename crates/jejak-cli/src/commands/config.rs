use std::path::Path;

use jejak_core::util::{is_http_url, normalize_text_option};
use jejak_core::Settings;

use crate::cli::ConfigCommands;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_config(command: ConfigCommands, db_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(db_path).await,
        ConfigCommands::Set {
            script_url,
            spreadsheet_id,
            admin_phone,
            admin_email,
            clear_endpoint,
        } => {
            run_config_set(
                script_url,
                spreadsheet_id,
                admin_phone,
                admin_email,
                clear_endpoint,
                db_path,
            )
            .await
        }
    }
}

async fn run_config_show(db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let settings = db.load_settings().await?;

    print_settings(&settings);
    Ok(())
}

async fn run_config_set(
    script_url: Option<String>,
    spreadsheet_id: Option<String>,
    admin_phone: Option<String>,
    admin_email: Option<String>,
    clear_endpoint: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let mut settings = db.load_settings().await?;

    if clear_endpoint {
        settings.script_url = None;
        settings.spreadsheet_id = None;
    }

    if let Some(url) = normalize_text_option(script_url) {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "script URL must include http:// or https://".to_string(),
            ));
        }
        settings.script_url = Some(url);
    }
    if let Some(id) = normalize_text_option(spreadsheet_id) {
        settings.spreadsheet_id = Some(id);
    }
    if let Some(phone) = normalize_text_option(admin_phone) {
        settings.admin_phone = phone;
    }
    if let Some(email) = normalize_text_option(admin_email) {
        settings.admin_email = email;
    }

    db.save_settings(&settings).await?;

    println!("Settings saved");
    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!(
        "script_url     : {}",
        settings.script_url.as_deref().unwrap_or("<unset>")
    );
    println!(
        "spreadsheet_id : {}",
        settings.spreadsheet_id.as_deref().unwrap_or("<unset>")
    );
    println!("admin_phone    : {}", settings.admin_phone);
    println!("admin_email    : {}", settings.admin_email);
    println!(
        "cloud sync     : {}",
        if settings.is_sync_configured() {
            "configured"
        } else {
            "not configured"
        }
    );
}
