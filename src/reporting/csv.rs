use std::fmt::Write as _;

use crate::analytics::{ChartPoint, Timeframe};
use crate::models::Metric;

/// A rendered CSV document plus the filename it should be served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Render chart points as CSV with a metric-specific value column.
pub fn render_csv(metric: Metric, timeframe: Timeframe, points: &[ChartPoint]) -> CsvExport {
    let mut content = String::with_capacity(16 + points.len() * 16);
    content.push_str("Date,");
    content.push_str(metric.csv_header());
    content.push('\n');
    for point in points {
        writeln!(content, "{},{}", point.time.format("%Y-%m-%d"), point.value)
            .expect("writing to a String cannot fail");
    }
    CsvExport {
        filename: format!("{}-{}.csv", metric.file_stem(), timeframe.as_str()),
        content,
    }
}
