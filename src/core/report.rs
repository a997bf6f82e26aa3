//! Display formatting for ledger output.
//!
//! Everything here is pure string formatting over records and summaries, so the
//! bot layer and the CSV export share one rendering of amounts, dates and print
//! details.

use crate::{
    core::{
        ledger::{Summary, View},
        record::{BillingRecord, PrintType},
    },
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

/// Shown in place of print details for plain covers.
pub const NO_PRINT_DETAILS: &str = "–";

/// Longest text field shown in a record line, in characters.
pub const MAX_FIELD_CHARS: usize = 64;

/// Room kept at the end of a listing for the "…and N more" line.
const HIDDEN_NOTE_RESERVE: usize = 32;

/// Formats an amount with a currency symbol and exactly two decimals.
///
/// # Returns
/// Formatted string like "₹500.00"
#[must_use]
pub fn format_currency(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

/// Formats a date day/month/year without zero padding, e.g. "15/1/2024".
#[must_use]
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Upper-cases the first character and leaves the rest untouched.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Cuts `value` to at most `max_chars` characters, ending in `…` when shortened.
#[must_use]
pub fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Print details column for a record.
///
/// Printed covers with both details render as "Single, Four"; every other
/// record renders [`NO_PRINT_DETAILS`].
#[must_use]
pub fn format_print_details(record: &BillingRecord) -> String {
    match (record.print_type, &record.print_sides, &record.colors) {
        (Some(PrintType::Print), Some(sides), Some(colors)) => {
            format!("{}, {}", capitalize(sides), capitalize(colors))
        }
        _ => NO_PRINT_DETAILS.to_string(),
    }
}

/// One listing line for a record.
///
/// Format: `#id | date | customer | qty kg | size | amount | status | Manufacturer | Payment | print`
///
/// Text fields are clipped to [`MAX_FIELD_CHARS`].
#[must_use]
pub fn format_record_line(record: &BillingRecord, currency_symbol: &str) -> String {
    format!(
        "#{} | {} | {} | {} kg | {} | {} | {} | {} | {} | {}",
        record.id,
        format_display_date(record.date),
        clip(&record.customer_name, MAX_FIELD_CHARS),
        record.quantity,
        clip(&record.cover_size, MAX_FIELD_CHARS),
        format_currency(currency_symbol, record.amount),
        record.status.as_str(),
        clip(&capitalize(&record.manufacturer), MAX_FIELD_CHARS),
        clip(&capitalize(&record.payment_mode), MAX_FIELD_CHARS),
        clip(&format_print_details(record), MAX_FIELD_CHARS),
    )
}

/// Shown when a view has no records.
pub const EMPTY_LISTING: &str =
    "No records found. Add your first billing record with `/add_bill` to get started.";

/// Renders up to `limit` view rows, one per line, noting how many were left out.
///
/// The result never exceeds `max_chars` characters: rows stop early once the
/// next one would not fit and count towards the hidden rows instead.
pub fn format_listing(
    view: &View<'_>,
    currency_symbol: &str,
    limit: usize,
    max_chars: usize,
) -> Result<String> {
    if view.is_empty() {
        return Ok(EMPTY_LISTING.to_string());
    }

    let budget = max_chars.saturating_sub(HIDDEN_NOTE_RESERVE);
    let mut listing = String::new();
    let mut used = 0;
    let mut shown = 0;
    for record in view.iter().take(limit) {
        let line = format_record_line(record, currency_symbol);
        let line_chars = line.chars().count() + 1;
        if used + line_chars > budget {
            break;
        }
        writeln!(&mut listing, "{line}")?;
        used += line_chars;
        shown += 1;
    }

    let hidden = view.len() - shown;
    if hidden > 0 {
        writeln!(&mut listing, "…and {hidden} more")?;
    }

    Ok(listing.trim_end().to_string())
}

/// Two-line paid/due summary.
#[must_use]
pub fn format_summary(summary: &Summary, currency_symbol: &str) -> String {
    format!(
        "Total Paid: {}\nTotal Due: {}",
        format_currency(currency_symbol, summary.total_paid),
        format_currency(currency_symbol, summary.total_due)
    )
}
