use std::path::Path;

use crate::commands::common::{
    format_registration_lines, open_database, registration_to_list_item, RegistrationListItem,
};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let registrations = db.list_registrations(limit, 0).await?;

    if as_json {
        let json_items = registrations
            .iter()
            .map(registration_to_list_item)
            .collect::<Vec<RegistrationListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if registrations.is_empty() {
        println!("No local registrations yet. Create one with `jejak register`.");
    } else {
        for line in format_registration_lines(&registrations) {
            println!("{line}");
        }
    }

    Ok(())
}
