//! CSV export of the ledger.
//!
//! Rows are written in insertion order, never re-sorted. Quoting follows
//! RFC 4180 through the `csv` writer: a field is quoted only when it contains
//! a delimiter, quote or line break, and embedded quotes are doubled.

use crate::{
    core::{record::BillingRecord, report},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Number of columns in every row.
pub const CSV_COLUMNS: usize = 10;

/// Header row, in column order. The amount column names the currency.
#[must_use]
pub fn csv_headers(currency_symbol: &str) -> [String; CSV_COLUMNS] {
    [
        "Date".to_string(),
        "Customer Name".to_string(),
        "Quantity (kg)".to_string(),
        "Cover Size".to_string(),
        format!("Amount ({currency_symbol})"),
        "Status".to_string(),
        "Manufacturer".to_string(),
        "Payment Mode".to_string(),
        "Print Type".to_string(),
        "Print Details".to_string(),
    ]
}

/// A rendered export ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, e.g. `billing-records-2024-01-15.csv`
    pub filename: String,
    /// Document body
    pub content: String,
}

/// File name for an export produced on `today`.
#[must_use]
pub fn export_filename(today: NaiveDate) -> String {
    format!("billing-records-{}.csv", today.format("%Y-%m-%d"))
}

/// Serializes records to CSV: a header line followed by one line per record.
///
/// Lines are separated by `\n`.
pub fn records_to_csv(records: &[BillingRecord], currency_symbol: &str) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(csv_headers(currency_symbol))?;

    for record in records {
        writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.customer_name.clone(),
            record.quantity.to_string(),
            record.cover_size.clone(),
            record.amount.to_string(),
            record.status.as_str().to_string(),
            record.manufacturer.clone(),
            record.payment_mode.clone(),
            record
                .print_type
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            report::format_print_details(record),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let mut content = String::from_utf8(bytes)?;
    // rows are joined by newlines; no trailing terminator
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

/// Builds the export document, or `None` when there is nothing to export.
pub fn export_records(
    records: &[BillingRecord],
    today: NaiveDate,
    currency_symbol: &str,
) -> Result<Option<CsvExport>> {
    if records.is_empty() {
        return Ok(None);
    }

    Ok(Some(CsvExport {
        filename: export_filename(today),
        content: records_to_csv(records, currency_symbol)?,
    }))
}
