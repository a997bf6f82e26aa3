//! Billing record model.
//!
//! A record is one order in the ledger. Records are created from a
//! [`NewBillingRecord`] (everything except the id) and never edited afterwards.
//! The serialized field names keep the camelCase keys already present in
//! stored ledgers, so older blobs without print details still load.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Payment state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, poise::ChoiceParameter)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Settled
    #[name = "paid"]
    Paid,
    /// Outstanding
    #[name = "due"]
    Due,
}

impl Status {
    /// Lowercase name used in storage, search and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Due => "due",
        }
    }
}

/// Whether the cover is plain or printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, poise::ChoiceParameter)]
#[serde(rename_all = "lowercase")]
pub enum PrintType {
    /// No printing
    #[name = "plain"]
    Plain,
    /// Printed cover, needs sides and colors
    #[name = "print"]
    Print,
}

impl PrintType {
    /// Lowercase name used in storage, search and export.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Print => "print",
        }
    }
}

/// A stored billing ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    /// Unique identifier, assigned by the ledger
    pub id: i64,
    /// Order date
    pub date: NaiveDate,
    /// Customer name
    pub customer_name: String,
    /// Quantity in kilograms; `null` in stored JSON loads as NaN
    #[serde(deserialize_with = "number_or_nan")]
    pub quantity: f64,
    /// Cover size label
    pub cover_size: String,
    /// Billed amount; `null` in stored JSON loads as NaN
    #[serde(deserialize_with = "number_or_nan")]
    pub amount: f64,
    /// Paid or due
    pub status: Status,
    /// Manufacturer label
    pub manufacturer: String,
    /// Payment mode label
    pub payment_mode: String,
    /// Plain or printed; absent on records created before print tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_type: Option<PrintType>,
    /// Printed sides, only for printed covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_sides: Option<String>,
    /// Print colors, only for printed covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<String>,
}

/// Input for a new record. Everything a [`BillingRecord`] has except the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillingRecord {
    /// Order date
    pub date: NaiveDate,
    /// Customer name
    pub customer_name: String,
    /// Quantity in kilograms
    pub quantity: f64,
    /// Cover size label
    pub cover_size: String,
    /// Billed amount
    pub amount: f64,
    /// Paid or due
    pub status: Status,
    /// Manufacturer label
    pub manufacturer: String,
    /// Payment mode label
    pub payment_mode: String,
    /// Plain or printed
    pub print_type: Option<PrintType>,
    /// Printed sides
    pub print_sides: Option<String>,
    /// Print colors
    pub colors: Option<String>,
}

impl NewBillingRecord {
    /// Checks the record and turns it into a stored record with the given id.
    ///
    /// Text fields are trimmed. Print sides and colors are dropped unless the
    /// print type is [`PrintType::Print`], in which case both are required.
    ///
    /// # Errors
    /// * [`Error::InvalidAmount`] / [`Error::InvalidQuantity`] for NaN or infinite numbers
    /// * [`Error::EmptyField`] for a blank customer name
    /// * [`Error::MissingPrintDetails`] for a printed cover without sides or colors
    pub fn into_record(self, id: i64) -> Result<BillingRecord> {
        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        if !self.quantity.is_finite() {
            return Err(Error::InvalidQuantity {
                quantity: self.quantity,
            });
        }

        let customer_name = self.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(Error::EmptyField {
                field: "customerName",
            });
        }

        let (print_sides, colors) = if self.print_type == Some(PrintType::Print) {
            match (non_blank(self.print_sides), non_blank(self.colors)) {
                (Some(sides), Some(colors)) => (Some(sides), Some(colors)),
                _ => return Err(Error::MissingPrintDetails),
            }
        } else {
            (None, None)
        };

        Ok(BillingRecord {
            id,
            date: self.date,
            customer_name,
            quantity: self.quantity,
            cover_size: self.cover_size.trim().to_string(),
            amount: self.amount,
            status: self.status,
            manufacturer: self.manufacturer.trim().to_string(),
            payment_mode: self.payment_mode.trim().to_string(),
            print_type: self.print_type,
            print_sides,
            colors,
        })
    }
}

/// Parses an ISO `YYYY-MM-DD` date as entered by a user.
///
/// # Errors
/// Returns [`Error::InvalidDate`] if the input is not a valid calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Older ledgers stored unparseable numbers as NaN, which JSON writes as `null`.
fn number_or_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BillingRecord {
    /// Case-insensitive substring match over the searchable fields.
    ///
    /// `needle_lower` must already be lowercase. An empty needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }

        let contains = |haystack: &str| haystack.to_lowercase().contains(needle_lower);

        contains(&self.customer_name)
            || contains(&self.cover_size)
            || contains(&self.manufacturer)
            || contains(&self.payment_mode)
            || self.print_type.is_some_and(|p| contains(p.as_str()))
            || contains(self.status.as_str())
            || contains(&self.date.format("%Y-%m-%d").to_string())
            || contains(&self.amount.to_string())
    }
}
