use std::path::Path;

use jejak_core::reconciler;

use crate::commands::common::{
    format_registration_lines, merged_view, normalize_search_query, open_database,
    reconciler_for, registration_to_list_item, RegistrationListItem,
};
use crate::error::CliError;

pub async fn run_search(query: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let normalized_query = normalize_search_query(query)?;

    let db = open_database(db_path).await?;
    let recon = reconciler_for(&db).await?;

    // Best-effort: pull the remote set when configured, search what we have
    // otherwise.
    recon.refresh().await;

    let merged = merged_view(&db, &recon).await?;
    let matches = reconciler::filter(&merged, &normalized_query);

    if as_json {
        let json_items = matches
            .iter()
            .map(registration_to_list_item)
            .collect::<Vec<RegistrationListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if matches.is_empty() {
        println!("No registrations match '{normalized_query}'.");
    } else {
        for line in format_registration_lines(&matches) {
            println!("{line}");
        }
    }

    Ok(())
}
