use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use jejak_core::reconciler::Reconciler;
use jejak_core::services::DatabaseService;
use jejak_core::{Registration, RegistrationId};
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct RegistrationListItem {
    pub id: String,
    pub registered_at: String,
    pub relative_time: String,
    pub full_name: String,
    pub whatsapp: String,
    pub email: String,
    pub mountain: String,
    pub package_category: String,
    pub trip_package: String,
    pub start_date: String,
    pub status: String,
    pub synced: bool,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("JEJAK_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| panic!("Failed to resolve CLI data directory"))
        .join("jejak")
        .join("jejak.db")
}

pub async fn open_database(path: &Path) -> Result<DatabaseService, CliError> {
    tracing::debug!("Using local database at {}", path.display());
    Ok(DatabaseService::open_path(path.to_path_buf()).await?)
}

/// Build a reconciler seeded with the persisted settings.
pub async fn reconciler_for(service: &DatabaseService) -> Result<Reconciler, CliError> {
    let settings = service.load_settings().await?;
    Ok(Reconciler::new(settings)?)
}

/// Merged remote + local view, newest first.
pub async fn merged_view(
    service: &DatabaseService,
    reconciler: &Reconciler,
) -> Result<Vec<Registration>, CliError> {
    let local = service.list_all_registrations().await?;
    Ok(reconciler.merged_with(&local).await)
}

/// Flag local records whose ids the remote set now contains.
pub async fn mark_remote_synced(
    service: &DatabaseService,
    reconciler: &Reconciler,
) -> Result<usize, CliError> {
    let remote_ids = reconciler.remote_ids().await;
    let confirmed: Vec<RegistrationId> = service
        .list_all_registrations()
        .await?
        .into_iter()
        .filter(|record| !record.synced && remote_ids.contains(&record.id))
        .map(|record| record.id)
        .collect();

    if !confirmed.is_empty() {
        service.mark_synced(&confirmed).await?;
    }
    Ok(confirmed.len())
}

pub fn format_registration_lines(registrations: &[Registration]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    registrations
        .iter()
        .map(|registration| {
            let id = registration.id.to_string();
            let name = text_preview(&registration.data.full_name, 24);
            let mountain = text_preview(&registration.data.mountain, 18);
            let status = registration.status.to_string();
            let relative_time = format_relative_time(registration.id.as_millis(), now_ms);

            format!("{id:<14}  {name:<24}  {mountain:<18}  {status:<8}  {relative_time}")
        })
        .collect()
}

pub fn registration_to_list_item(registration: &Registration) -> RegistrationListItem {
    let now_ms = Utc::now().timestamp_millis();

    RegistrationListItem {
        id: registration.id.to_string(),
        registered_at: format_timestamp(registration.id.as_millis()),
        relative_time: format_relative_time(registration.id.as_millis(), now_ms),
        full_name: registration.data.full_name.clone(),
        whatsapp: registration.data.whatsapp.clone(),
        email: registration.data.email.clone(),
        mountain: registration.data.mountain.clone(),
        package_category: registration.data.package_category.clone(),
        trip_package: registration.data.trip_package.clone(),
        start_date: registration.data.start_date.clone(),
        status: registration.status.to_string(),
        synced: registration.synced,
    }
}

pub fn text_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_registration_id(raw: &str) -> Result<RegistrationId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidRegistrationId(raw.to_string()))
}
