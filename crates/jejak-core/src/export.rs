//! Merged-view export helpers shared by the operator clients.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::Registration;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Serializable registration representation used in exports.
///
/// Identity-image payloads are reduced to an attached/none marker; a base64
/// blob has no place in a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRegistration {
    pub id: String,
    pub registered_at: String,
    pub full_name: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub mountain: String,
    pub package_category: String,
    pub trip_package: String,
    pub start_date: String,
    pub climber_code: String,
    pub status: String,
    pub identity: String,
    pub synced: bool,
}

/// Convert a registration into an export record.
#[must_use]
pub fn registration_to_export_item(registration: &Registration) -> ExportRegistration {
    let registered_at = registration.id.created_at().map_or_else(
        || registration.id.to_string(),
        |instant| instant.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    ExportRegistration {
        id: registration.id.to_string(),
        registered_at,
        full_name: registration.data.full_name.clone(),
        whatsapp: registration.data.whatsapp.clone(),
        email: registration.data.email.clone(),
        address: registration.data.address.clone(),
        mountain: registration.data.mountain.clone(),
        package_category: registration.data.package_category.clone(),
        trip_package: registration.data.trip_package.clone(),
        start_date: registration.data.start_date.clone(),
        climber_code: registration.data.climber_code.clone().unwrap_or_default(),
        status: registration.status.to_string(),
        identity: if registration.data.identity_image.is_some() {
            "attached".to_string()
        } else {
            "none".to_string()
        },
        synced: registration.synced,
    }
}

/// Render registrations as pretty-printed JSON.
pub fn render_json_export(registrations: &[Registration]) -> serde_json::Result<String> {
    let items = registrations
        .iter()
        .map(registration_to_export_item)
        .collect::<Vec<ExportRegistration>>();
    serde_json::to_string_pretty(&items)
}

const CSV_HEADER: &str = "id,registered_at,full_name,whatsapp,email,address,mountain,\
package_category,trip_package,start_date,climber_code,status,identity,synced";

/// Render registrations as CSV with a header row.
#[must_use]
pub fn render_csv_export(registrations: &[Registration]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{CSV_HEADER}");

    for registration in registrations {
        let item = registration_to_export_item(registration);
        let fields = [
            item.id,
            item.registered_at,
            item.full_name,
            item.whatsapp,
            item.email,
            item.address,
            item.mountain,
            item.package_category,
            item.trip_package,
            item.start_date,
            item.climber_code,
            item.status,
            item.identity,
            item.synced.to_string(),
        ];

        let line = fields
            .iter()
            .map(|field| csv_escape(field))
            .collect::<Vec<String>>()
            .join(",");
        let _ = writeln!(output, "{line}");
    }

    output
}

/// Render registrations based on the selected export format.
pub fn render_export(
    registrations: &[Registration],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(registrations),
        ExportFormat::Csv => Ok(render_csv_export(registrations)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    let date = chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map_or_else(|| timestamp_ms.to_string(), |dt| dt.format("%Y-%m-%d").to_string());
    format!("jejak-langkah-data-{date}.{}", format.extension())
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
