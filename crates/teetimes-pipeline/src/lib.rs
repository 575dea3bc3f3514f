//! Concurrent tee-time collection: facility ingestion, a bounded worker pool
//! over a [`PageRenderer`](teetimes_scraper::PageRenderer), ordered result
//! aggregation and report delivery.

pub mod aggregate;
pub mod cancel;
mod csv;
pub mod error;
pub mod run;
pub mod scheduler;
pub mod settings;
pub mod sink;
pub mod source;
pub mod worker;

pub use aggregate::ReportBuilder;
pub use cancel::CancelSignal;
pub use error::SinkError;
pub use run::{run_collection, CompletedRun};
pub use scheduler::collect_all;
pub use settings::CollectSettings;
pub use sink::{
    deliver_report, render_report_csv, report_notification, write_report_csv, ConfiguredNotifier,
    DeliveryStatus, LogNotifier, Notification, Notifier, RelayNotifier,
};
pub use source::{parse_facilities, read_facilities};
pub use worker::{collect_facility, CANCELLED_REASON};
