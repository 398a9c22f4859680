mod csv;
mod service;

pub use csv::{render_csv, CsvExport};
pub use service::{KpiReport, ReportService};
