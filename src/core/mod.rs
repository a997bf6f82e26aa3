//! Core business logic - framework-agnostic ledger, record, export and formatting.

/// CSV export of the ledger
pub mod export;
/// Ledger store, views and summaries
pub mod ledger;
/// Billing record model and validation
pub mod record;
/// Display formatting for amounts, dates and rows
pub mod report;
/// Key-value storage substrate
pub mod storage;
