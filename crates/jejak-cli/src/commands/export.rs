use std::path::Path;

use jejak_core::export::{render_export, suggested_export_file_name, ExportFormat};
use jejak_core::util::timestamp_millis_now;

use crate::commands::common::{merged_view, open_database, reconciler_for};
use crate::error::CliError;

pub async fn run_export(
    format: crate::cli::ExportFormat,
    output_path: Option<&Path>,
    to_stdout: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let format = match format {
        crate::cli::ExportFormat::Json => ExportFormat::Json,
        crate::cli::ExportFormat::Csv => ExportFormat::Csv,
    };

    let db = open_database(db_path).await?;
    let recon = reconciler_for(&db).await?;

    // The export contract receives the merged, unfiltered sequence; pull the
    // freshest remote set we can get first.
    recon.refresh().await;
    let merged = merged_view(&db, &recon).await?;

    let rendered = render_export(&merged, format)?;

    if to_stdout {
        println!("{rendered}");
        return Ok(());
    }

    let path = output_path.map_or_else(
        || {
            std::path::PathBuf::from(suggested_export_file_name(
                format,
                timestamp_millis_now(),
            ))
        },
        Path::to_path_buf,
    );

    std::fs::write(&path, rendered)?;
    println!("{}", path.display());

    Ok(())
}
