//! Shared test utilities for the billing ledger.
//!
//! Helpers for an in-memory database and for records with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        ledger::Ledger,
        record::{BillingRecord, NewBillingRecord, Status},
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses an ISO date, panicking on bad test input.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// A new record with sensible defaults.
///
/// # Defaults
/// * `customer_name`: "Acme"
/// * `quantity`: 10.0
/// * `cover_size`: "L"
/// * `manufacturer`: "acme-mfg"
/// * `payment_mode`: "cash"
/// * no print details
pub fn sample_new_record(date_str: &str, status: Status, amount: f64) -> NewBillingRecord {
    NewBillingRecord {
        date: date(date_str),
        customer_name: "Acme".to_string(),
        quantity: 10.0,
        cover_size: "L".to_string(),
        amount,
        status,
        manufacturer: "acme-mfg".to_string(),
        payment_mode: "cash".to_string(),
        print_type: None,
        print_sides: None,
        colors: None,
    }
}

/// A stored record with the given id and the defaults of [`sample_new_record`].
pub fn sample_record(id: i64, date_str: &str, status: Status, amount: f64) -> BillingRecord {
    sample_new_record(date_str, status, amount)
        .into_record(id)
        .unwrap()
}

/// An in-memory ledger over `records`, not backed by storage.
pub fn ledger_with(records: Vec<BillingRecord>) -> Ledger {
    Ledger::from_records("billingRecords", records)
}
