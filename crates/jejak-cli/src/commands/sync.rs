use std::path::Path;

use jejak_core::stats::status_counts;

use crate::commands::common::{
    format_registration_lines, format_timestamp, mark_remote_synced, merged_view, open_database,
    reconciler_for,
};
use crate::error::CliError;

const SUMMARY_ROWS: usize = 10;

pub async fn run_sync(db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let settings = db.load_settings().await?;
    if !settings.is_sync_configured() {
        return Err(CliError::SyncNotConfigured);
    }

    let recon = reconciler_for(&db).await?;

    // Manual path: unlike the background poller, failures surface here.
    let remote = recon.try_refresh().await?;
    let confirmed = mark_remote_synced(&db, &recon).await?;

    if let Some(arrival) = recon.take_arrival().await {
        println!("New entry: {} ({})", arrival.full_name, arrival.id);
    }

    let status = recon.status().await;
    println!(
        "Fetched {} remote records at {}",
        remote.len(),
        status
            .last_sync
            .map_or_else(|| "-".to_string(), format_timestamp)
    );
    if confirmed > 0 {
        println!("Confirmed {confirmed} local registrations as synced");
    }

    let merged = merged_view(&db, &recon).await?;
    let counts = status_counts(&merged);
    println!(
        "Merged view: {} total, {} verified, {} pending",
        counts.total, counts.verified, counts.pending
    );

    for line in format_registration_lines(&merged[..merged.len().min(SUMMARY_ROWS)]) {
        println!("{line}");
    }
    if merged.len() > SUMMARY_ROWS {
        println!("... and {} more (use `jejak export`)", merged.len() - SUMMARY_ROWS);
    }

    Ok(())
}
