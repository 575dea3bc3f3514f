//! Tabular rendering of a [`CollectionReport`].

use std::path::{Path, PathBuf};

use teetimes_core::CollectionReport;

use crate::csv::write_row;
use crate::error::SinkError;

const BASE_HEADER: [&str; 4] = [
    "facility_name",
    "facility_id",
    "first_tee_time",
    "last_tee_time",
];
const ERROR_COLUMN: &str = "error";

/// Renders the report as CSV text with a leading byte-order mark.
///
/// The `error` column is present only when the report contains a failure.
#[must_use]
pub fn render_report_csv(report: &CollectionReport) -> String {
    let with_error = report.has_failures();
    let mut out = String::from("\u{feff}");

    let mut header: Vec<&str> = BASE_HEADER.to_vec();
    if with_error {
        header.push(ERROR_COLUMN);
    }
    write_row(&mut out, &header);

    for result in &report.results {
        let (first, last) = result.outcome.time_columns();
        let mut row = vec![
            result.facility.name.as_str(),
            result.facility.id.as_str(),
            first,
            last,
        ];
        if with_error {
            row.push(result.outcome.error_reason().unwrap_or(""));
        }
        write_row(&mut out, &row);
    }

    out
}

/// Writes the report to `path`, replacing any previous file only once the
/// new content is fully written.
///
/// # Errors
///
/// Returns [`SinkError::Write`] if the temporary file cannot be written or
/// renamed into place.
pub async fn write_report_csv(report: &CollectionReport, path: &Path) -> Result<(), SinkError> {
    write_atomic(path, &render_report_csv(report)).await
}

pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<(), SinkError> {
    let write_err = |source| SinkError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
