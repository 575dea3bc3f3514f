//! Report sink: persist the finished report once, then hand it to a notifier.

mod csv_report;
mod notify;

use std::path::Path;

use teetimes_core::CollectionReport;

pub use csv_report::{render_report_csv, write_report_csv};
pub use notify::{
    ConfiguredNotifier, LogNotifier, Notification, Notifier, RelayNotifier, REPORT_BODY,
    REPORT_SUBJECT,
};

/// What happened to a report after collection finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub written: bool,
    pub notified: bool,
}

/// Builds the notification for a report rendered as `csv`.
#[must_use]
pub fn report_notification(
    report: &CollectionReport,
    attachment_name: &str,
    csv: String,
) -> Notification {
    Notification {
        subject: REPORT_SUBJECT.to_owned(),
        body: format!("{REPORT_BODY}\n\n{}", report.summary_line()),
        attachment_name: attachment_name.to_owned(),
        attachment: csv,
    }
}

/// Writes the report to `output_path` and then notifies.
///
/// Failures are logged and reflected in the returned status; the report
/// itself is unaffected. Notification is skipped when the write fails.
pub async fn deliver_report<N>(
    report: &CollectionReport,
    output_path: &Path,
    notifier: Option<&N>,
) -> DeliveryStatus
where
    N: Notifier,
{
    let csv = render_report_csv(report);
    let mut status = DeliveryStatus::default();

    if let Err(e) = csv_report::write_atomic(output_path, &csv).await {
        tracing::error!(run_id = %report.run_id, error = %e, "report write failed");
        return status;
    }
    status.written = true;
    tracing::info!(
        run_id = %report.run_id,
        path = %output_path.display(),
        rows = report.len(),
        "report written"
    );

    let Some(notifier) = notifier else {
        return status;
    };

    let attachment_name = output_path
        .file_name()
        .map_or_else(|| "results.csv".to_owned(), |n| n.to_string_lossy().into_owned());
    let notification = report_notification(report, &attachment_name, csv);
    match notifier.notify(&notification).await {
        Ok(()) => status.notified = true,
        Err(e) => tracing::error!(run_id = %report.run_id, error = %e, "report notification failed"),
    }
    status
}
