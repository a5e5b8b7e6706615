use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use jejak_core::reconciler::{spawn_poller, Reconciler};

use crate::commands::common::{format_timestamp, mark_remote_synced, open_database};
use crate::error::CliError;

pub async fn run_watch(interval_secs: u64, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let settings = db.load_settings().await?;
    if !settings.is_sync_configured() {
        return Err(CliError::SyncNotConfigured);
    }

    let recon = Arc::new(Reconciler::new(settings)?);
    let period = Duration::from_secs(interval_secs.max(1));
    let handle = spawn_poller(Arc::clone(&recon), period);

    println!(
        "Polling the cloud every {}s. Press Ctrl-C to stop.",
        period.as_secs()
    );

    let mut last_sync_seen: Option<i64> = None;
    let mut last_error_seen: Option<String> = None;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                if let Some(arrival) = recon.take_arrival().await {
                    println!("New entry: {} ({})", arrival.full_name, arrival.id);
                }

                let status = recon.status().await;
                if status.last_sync != last_sync_seen {
                    last_sync_seen = status.last_sync;
                    let count = recon.remote_records().await.len();
                    let confirmed = mark_remote_synced(&db, &recon).await?;
                    let when = status
                        .last_sync
                        .map_or_else(|| "-".to_string(), format_timestamp);
                    if confirmed > 0 {
                        println!("Synced {count} remote records at {when} ({confirmed} confirmed locally)");
                    } else {
                        println!("Synced {count} remote records at {when}");
                    }
                }
                if status.last_error != last_error_seen {
                    if let Some(error) = &status.last_error {
                        println!("Sync error (stale data kept): {error}");
                    }
                    last_error_seen = status.last_error;
                }
            }
        }
    }

    // Single-shot teardown; an in-flight refresh finishes first.
    handle.stop().await;
    println!("Watch stopped");

    Ok(())
}
