use std::path::Path;

use crate::commands::common::{format_timestamp, open_database};
use crate::error::CliError;

pub async fn run_ticket(query: &str, db_path: &Path) -> Result<(), CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::EmptyField("Ticket query"));
    }

    let db = open_database(db_path).await?;

    // A miss is a user-facing message, not an error path.
    let Some(registration) = db.find_ticket(query).await? else {
        println!("Ticket not found. Please check your booking id or WhatsApp number.");
        return Ok(());
    };

    let settings = db.load_settings().await?;

    println!("E-Ticket {}", registration.id);
    println!("  Registered : {}", format_timestamp(registration.id.as_millis()));
    println!("  Name       : {}", registration.data.full_name);
    println!("  WhatsApp   : {}", registration.data.whatsapp);
    println!("  Mountain   : {}", registration.data.mountain);
    println!(
        "  Trip       : {} / {} starting {}",
        registration.data.package_category,
        registration.data.trip_package,
        registration.data.start_date
    );
    if let Some(code) = &registration.data.climber_code {
        println!("  Permit     : {code}");
    }
    println!("  Status     : {}", registration.status);
    println!(
        "  Identity   : {}",
        if registration.data.identity_image.is_some() {
            "attached"
        } else {
            "none"
        }
    );
    println!();
    println!(
        "Operator contact: {} / {}",
        settings.admin_phone, settings.admin_email
    );

    Ok(())
}
