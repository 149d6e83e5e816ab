//! CSV export of the financial table

use anyhow::{Context, Result};

use crate::models::MetricRow;

/// Download name for a symbol's financial table
pub fn csv_file_name(symbol: &str) -> String {
    format!("{}_financial_data.csv", symbol)
}

/// Serialize rows as `Metric,Value` CSV, header included even when empty
pub fn financial_csv(rows: &[MetricRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(["Metric", "Value"])?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
