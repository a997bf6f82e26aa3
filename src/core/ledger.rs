//! Ledger store and view.
//!
//! The [`Ledger`] owns the whole billing collection in memory, in insertion
//! order. It is loaded once from the key-value store and rewritten in full after
//! every mutation. Views, summaries and exports are computed on demand from the
//! in-memory collection and never touch storage.

use crate::{
    core::{
        export::{self, CsvExport},
        record::{BillingRecord, NewBillingRecord, Status},
        storage,
    },
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::ConnectionTrait;
use tracing::{debug, error, info, warn};

/// Hands out strictly increasing, time-shaped record ids.
///
/// Each id is the current time in milliseconds, bumped past the previous id
/// when two records land in the same millisecond (or the clock goes back).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Starts after `last`, typically the largest id already stored.
    #[must_use]
    pub const fn starting_after(last: i64) -> Self {
        Self { last }
    }

    /// Next id given the current time in milliseconds.
    pub fn next_id(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

/// Status selector for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum StatusFilter {
    /// Every record
    #[name = "all"]
    All,
    /// Only paid records
    #[name = "paid"]
    Paid,
    /// Only due records
    #[name = "due"]
    Due,
}

impl StatusFilter {
    /// Whether a record with `status` passes this filter.
    #[must_use]
    pub fn matches(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Paid => status == Status::Paid,
            Self::Due => status == Status::Due,
        }
    }
}

/// Paid and due totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Sum of amounts with status paid
    pub total_paid: f64,
    /// Sum of amounts with status due
    pub total_due: f64,
}

impl Summary {
    /// Paid plus due.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total_paid + self.total_due
    }
}

/// A filtered, searched projection of the ledger, newest date first.
///
/// Borrowed from the ledger; iterate it as many times as needed.
#[derive(Debug, Clone)]
pub struct View<'a> {
    records: Vec<&'a BillingRecord>,
}

impl<'a> View<'a> {
    /// Iterates the records in display order.
    pub fn iter(&self) -> impl Iterator<Item = &'a BillingRecord> + '_ {
        self.records.iter().copied()
    }

    /// Number of records in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, 'v> IntoIterator for &'v View<'a> {
    type Item = &'a BillingRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a BillingRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}

/// Suffix of the key that keeps a stored blob which could not be fully read.
pub const BACKUP_KEY_SUFFIX: &str = ".unreadable";

/// Key under which the unreadable blob stored at `storage_key` is preserved.
#[must_use]
pub fn backup_key(storage_key: &str) -> String {
    format!("{storage_key}{BACKUP_KEY_SUFFIX}")
}

/// The billing ledger: the record collection plus where it is persisted.
#[derive(Debug)]
pub struct Ledger {
    storage_key: String,
    records: Vec<BillingRecord>,
    ids: IdGenerator,
    /// Raw stored blob that lost records on load, copied aside before the first write
    unreadable: Option<String>,
}

impl Ledger {
    /// An empty ledger persisting under `storage_key`.
    #[must_use]
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self::from_records(storage_key, Vec::new())
    }

    /// A ledger over already-loaded records. Ids continue after the largest one.
    #[must_use]
    pub fn from_records(storage_key: impl Into<String>, records: Vec<BillingRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id).max().unwrap_or_default();
        Self {
            storage_key: storage_key.into(),
            records,
            ids: IdGenerator::starting_after(last_id),
            unreadable: None,
        }
    }

    /// Loads the ledger stored under `storage_key`.
    ///
    /// A missing key or unreadable storage yields an empty ledger. Records that
    /// fail to decode are skipped one by one, and malformed JSON skips them all.
    /// Whenever something was skipped the raw blob is copied to
    /// [`backup_key`] before the first write replaces it. Failures are logged
    /// and never returned.
    pub async fn load<C>(db: &C, storage_key: &str) -> Self
    where
        C: ConnectionTrait,
    {
        let stored = match storage::read_value(db, storage_key).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(storage_key, "Failed to read stored billing records: {}", e);
                None
            }
        };

        let Some(json) = stored else {
            info!(storage_key, count = 0, "Loaded billing records");
            return Self::new(storage_key);
        };

        let (records, skipped) = decode_records(storage_key, &json);
        info!(storage_key, count = records.len(), skipped, "Loaded billing records");

        let mut ledger = Self::from_records(storage_key, records);
        if skipped > 0 {
            ledger.unreadable = Some(json);
        }
        ledger
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&BillingRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Validates and appends a record, then persists the whole collection.
    ///
    /// If persisting fails the append is undone and the error returned.
    pub async fn add<C>(&mut self, db: &C, new_record: NewBillingRecord) -> Result<BillingRecord>
    where
        C: ConnectionTrait,
    {
        // only a valid record consumes an id
        let mut ids = self.ids;
        let id = ids.next_id(Utc::now().timestamp_millis());
        let record = new_record.into_record(id)?;
        self.ids = ids;

        self.records.push(record.clone());
        if let Err(e) = self.persist(db).await {
            self.records.pop();
            error!(id, "Failed to persist new billing record: {}", e);
            return Err(e);
        }

        info!(
            id,
            customer = %record.customer_name,
            amount = record.amount,
            status = record.status.as_str(),
            "Added billing record"
        );
        Ok(record)
    }

    /// Removes the record with `id` and persists the result.
    ///
    /// Removing an id that is not present changes nothing and returns `None`.
    /// If persisting fails the record is put back and the error returned.
    pub async fn remove<C>(&mut self, db: &C, id: i64) -> Result<Option<BillingRecord>>
    where
        C: ConnectionTrait,
    {
        let position = self.records.iter().position(|r| r.id == id);
        let removed = position.map(|index| (index, self.records.remove(index)));

        if let Err(e) = self.persist(db).await {
            if let Some((index, record)) = removed {
                self.records.insert(index, record);
            }
            error!(id, "Failed to persist billing record removal: {}", e);
            return Err(e);
        }

        match &removed {
            Some(_) => info!(id, "Removed billing record"),
            None => debug!(id, "No billing record to remove"),
        }
        Ok(removed.map(|(_, record)| record))
    }

    /// Records passing `filter` and matching `search`, newest date first.
    ///
    /// Search is a case-insensitive substring match of the term as given; an
    /// empty term matches everything. Records sharing a date keep their
    /// insertion order.
    #[must_use]
    pub fn view(&self, filter: StatusFilter, search: &str) -> View<'_> {
        let needle = search.to_lowercase();

        let mut records: Vec<&BillingRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r.status))
            .filter(|r| r.matches_search(&needle))
            .collect();
        // stable: equal dates stay in insertion order
        records.sort_by(|a, b| b.date.cmp(&a.date));

        debug!(?filter, search, matched = records.len(), "Built ledger view");
        View { records }
    }

    /// Paid and due totals over the whole ledger.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.records
            .iter()
            .fold(Summary::default(), |mut summary, record| {
                match record.status {
                    Status::Paid => summary.total_paid += record.amount,
                    Status::Due => summary.total_due += record.amount,
                }
                summary
            })
    }

    /// CSV export of every record in insertion order, or `None` if the ledger is empty.
    ///
    /// The amount column header carries `currency_symbol`.
    pub fn export_csv(
        &self,
        today: NaiveDate,
        currency_symbol: &str,
    ) -> Result<Option<CsvExport>> {
        let export = export::export_records(&self.records, today, currency_symbol)?;
        if let Some(export) = &export {
            info!(filename = %export.filename, rows = self.records.len(), "Exported billing records");
        }
        Ok(export)
    }

    async fn persist<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        if let Some(raw) = &self.unreadable {
            let key = backup_key(&self.storage_key);
            storage::write_value(db, &key, raw.clone()).await?;
            warn!(backup_key = %key, "Preserved unreadable billing records before overwriting");
            self.unreadable = None;
        }

        let json = serde_json::to_string(&self.records)?;
        storage::write_value(db, &self.storage_key, json).await
    }
}

/// Decodes a stored blob record by record.
///
/// Returns the readable records and how many entries were skipped. Malformed
/// JSON counts as one skipped entry.
fn decode_records(storage_key: &str, json: &str) -> (Vec<BillingRecord>, usize) {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(json) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(storage_key, "Stored billing records are malformed, starting empty: {}", e);
            return (Vec::new(), 1);
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<BillingRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(storage_key, index, "Skipping unreadable billing record: {}", e);
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::record::PrintType;
    use crate::errors::Error;
    use crate::test_utils::*;
    use std::collections::HashSet;

    const KEY: &str = "billingRecords";

    fn ids(view: &View<'_>) -> Vec<i64> {
        view.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_id_generator_is_strictly_increasing() {
        let mut ids = IdGenerator::default();
        assert_eq!(ids.next_id(1000), 1000);
        // same millisecond
        assert_eq!(ids.next_id(1000), 1001);
        // clock went backwards
        assert_eq!(ids.next_id(900), 1002);
        assert_eq!(ids.next_id(5000), 5000);
    }

    #[test]
    fn test_id_generator_starts_after_existing() {
        let mut ids = IdGenerator::starting_after(10_000);
        assert_eq!(ids.next_id(50), 10_001);
    }

    #[tokio::test]
    async fn test_load_missing_key_is_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let ledger = Ledger::load(&db, KEY).await;
        assert!(ledger.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_malformed_json_is_empty() -> Result<()> {
        let db = setup_test_db().await?;
        storage::write_value(&db, KEY, "{not json".to_string()).await?;

        let mut ledger = Ledger::load(&db, KEY).await;
        assert!(ledger.is_empty());

        // the first write keeps the old blob aside
        ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 1.0))
            .await?;
        assert_eq!(
            storage::read_value(&db, &backup_key(KEY)).await?.as_deref(),
            Some("{not json")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_load_keeps_records_with_null_numbers() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = r#"[
            {"id":1,"date":"2024-01-15","customerName":"Good","quantity":5,"coverSize":"L",
             "amount":100,"status":"paid","manufacturer":"m","paymentMode":"cash"},
            {"id":2,"date":"2024-01-16","customerName":"Blank","quantity":5,"coverSize":"L",
             "amount":null,"status":"due","manufacturer":"m","paymentMode":"cash"}
        ]"#;
        storage::write_value(&db, KEY, blob.to_string()).await?;

        let mut ledger = Ledger::load(&db, KEY).await;
        assert_eq!(ledger.len(), 2);
        assert!(ledger.get(2).unwrap().amount.is_nan());

        ledger
            .add(&db, sample_new_record("2024-01-17", Status::Due, 1.0))
            .await?;
        let stored = storage::read_value(&db, KEY).await?.unwrap();
        assert!(stored.contains("Good"));
        assert!(stored.contains("Blank"));

        let reloaded = Ledger::load(&db, KEY).await;
        assert_eq!(reloaded.len(), 3);
        // nothing was lost, so nothing is backed up
        assert_eq!(storage::read_value(&db, &backup_key(KEY)).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_skips_unreadable_records_and_backs_up_blob() -> Result<()> {
        let db = setup_test_db().await?;
        let blob = r#"[
            {"id":1,"date":"2024-01-15","customerName":"Good","quantity":5,"coverSize":"L",
             "amount":100,"status":"paid","manufacturer":"m","paymentMode":"cash"},
            {"id":"two","date":"someday"}
        ]"#;
        storage::write_value(&db, KEY, blob.to_string()).await?;

        let mut ledger = Ledger::load(&db, KEY).await;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].customer_name, "Good");

        ledger.remove(&db, 999).await?;
        assert_eq!(
            storage::read_value(&db, &backup_key(KEY)).await?.as_deref(),
            Some(blob)
        );
        let stored = storage::read_value(&db, KEY).await?.unwrap();
        assert!(stored.contains("Good"));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_without_table_is_empty() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let ledger = Ledger::load(&db, KEY).await;
        assert!(ledger.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);

        ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 500.0))
            .await?;
        let mut printed = sample_new_record("2024-01-16", Status::Paid, 300.0);
        printed.print_type = Some(PrintType::Print);
        printed.print_sides = Some("double".to_string());
        printed.colors = Some("two".to_string());
        ledger.add(&db, printed).await?;
        ledger
            .add(&db, sample_new_record("2024-01-14", Status::Paid, 42.25))
            .await?;

        let reloaded = Ledger::load(&db, KEY).await;
        assert_eq!(reloaded.records(), ledger.records());
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_unique() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);

        for _ in 0..25 {
            ledger
                .add(&db, sample_new_record("2024-01-15", Status::Due, 1.0))
                .await?;
        }

        let unique: HashSet<i64> = ledger.records().iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), ledger.len());
        Ok(())
    }

    #[tokio::test]
    async fn test_reloaded_ledger_keeps_ids_increasing() -> Result<()> {
        let db = setup_test_db().await?;
        let far_future = sample_record(i64::MAX / 2, "2024-01-15", Status::Due, 1.0);
        storage::write_value(&db, KEY, serde_json::to_string(&vec![far_future])?).await?;

        let mut ledger = Ledger::load(&db, KEY).await;
        let added = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 1.0))
            .await?;
        assert_eq!(added.id, i64::MAX / 2 + 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_record_without_persisting() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);

        let result = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, f64::NAN))
            .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert!(ledger.is_empty());
        assert_eq!(storage::read_value(&db, KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_input_does_not_consume_an_id() -> Result<()> {
        let db = setup_test_db().await?;
        let far_future = sample_record(i64::MAX / 2, "2024-01-15", Status::Due, 1.0);
        let mut ledger = ledger_with(vec![far_future]);

        let rejected = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, f64::INFINITY))
            .await;
        assert!(rejected.is_err());

        let added = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 1.0))
            .await?;
        assert_eq!(added.id, i64::MAX / 2 + 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rolls_back_when_storage_fails() -> Result<()> {
        // no tables created, so every write fails
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let mut ledger = Ledger::new(KEY);

        let result = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 10.0))
            .await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(ledger.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_and_idempotence() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);
        let first = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 500.0))
            .await?;
        let second = ledger
            .add(&db, sample_new_record("2024-01-16", Status::Paid, 300.0))
            .await?;

        let removed = ledger.remove(&db, first.id).await?;
        assert_eq!(removed, Some(first.clone()));
        let after_once = ledger.records().to_vec();

        assert_eq!(ledger.remove(&db, first.id).await?, None);
        assert_eq!(ledger.records(), after_once.as_slice());
        assert_eq!(ledger.records(), &[second]);

        let reloaded = Ledger::load(&db, KEY).await;
        assert_eq!(reloaded.records(), after_once.as_slice());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);
        ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 500.0))
            .await?;

        assert_eq!(ledger.remove(&db, 12345).await?, None);
        assert_eq!(ledger.len(), 1);
        Ok(())
    }

    #[test]
    fn test_view_filter_by_status() {
        let ledger = ledger_with(vec![
            sample_record(1, "2024-01-01", Status::Paid, 10.0),
            sample_record(2, "2024-01-02", Status::Due, 20.0),
            sample_record(3, "2024-01-03", Status::Paid, 30.0),
        ]);

        let paid = ledger.view(StatusFilter::Paid, "");
        assert!(paid.iter().all(|r| r.status == Status::Paid));
        assert_eq!(paid.len(), 2);

        let due = ledger.view(StatusFilter::Due, "");
        assert_eq!(ids(&due), vec![2]);

        let all = ledger.view(StatusFilter::All, "");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_view_search_is_case_insensitive() {
        let mut other = sample_record(2, "2024-01-02", Status::Due, 75.0);
        other.customer_name = "Bharat Traders".to_string();
        other.manufacturer = "Kohinoor".to_string();
        other.payment_mode = "upi".to_string();

        let ledger = ledger_with(vec![sample_record(1, "2024-01-01", Status::Paid, 10.0), other]);

        assert_eq!(ids(&ledger.view(StatusFilter::All, "BHARAT")), vec![2]);
        assert_eq!(ids(&ledger.view(StatusFilter::All, "kohi")), vec![2]);
        assert_eq!(ids(&ledger.view(StatusFilter::All, "UPI")), vec![2]);
        assert_eq!(ids(&ledger.view(StatusFilter::All, "75")), vec![2]);
        assert_eq!(ids(&ledger.view(StatusFilter::All, "2024-01-01")), vec![1]);
        assert!(ledger.view(StatusFilter::All, "nobody").is_empty());
        assert!(ledger.view(StatusFilter::Paid, "bharat").is_empty());
    }

    #[test]
    fn test_view_search_keeps_surrounding_spaces() {
        let mut other = sample_record(2, "2024-01-02", Status::Due, 75.0);
        other.customer_name = "Bharat Traders".to_string();
        let ledger = ledger_with(vec![sample_record(1, "2024-01-01", Status::Paid, 10.0), other]);

        // " traders" only matches where a space precedes it
        assert_eq!(ids(&ledger.view(StatusFilter::All, " traders")), vec![2]);
        // a lone space is a literal term, not an empty one
        assert_eq!(ids(&ledger.view(StatusFilter::All, " ")), vec![2]);
    }

    #[test]
    fn test_view_sorts_newest_first_and_is_stable() {
        let ledger = ledger_with(vec![
            sample_record(1, "2024-01-10", Status::Paid, 1.0),
            sample_record(2, "2024-03-01", Status::Paid, 1.0),
            sample_record(3, "2024-01-10", Status::Due, 1.0),
            sample_record(4, "2023-12-31", Status::Due, 1.0),
            sample_record(5, "2024-01-10", Status::Paid, 1.0),
        ]);

        let view = ledger.view(StatusFilter::All, "");
        assert_eq!(ids(&view), vec![2, 1, 3, 5, 4]);
        // restartable
        assert_eq!((&view).into_iter().count(), 5);
        // underlying order untouched
        let stored: Vec<i64> = ledger.records().iter().map(|r| r.id).collect();
        assert_eq!(stored, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_summary_additivity() {
        let ledger = ledger_with(vec![
            sample_record(1, "2024-01-01", Status::Paid, 100.5),
            sample_record(2, "2024-01-02", Status::Due, 20.25),
            sample_record(3, "2024-01-03", Status::Paid, 30.0),
        ]);

        let summary = ledger.summary();
        assert_eq!(summary.total_paid, 130.5);
        assert_eq!(summary.total_due, 20.25);
        let all: f64 = ledger.records().iter().map(|r| r.amount).sum();
        assert_eq!(summary.total(), all);
    }

    #[test]
    fn test_export_empty_is_none() -> Result<()> {
        let ledger = Ledger::new(KEY);
        assert_eq!(ledger.export_csv(date("2024-01-15"), "₹")?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_example() -> Result<()> {
        let db = setup_test_db().await?;
        let mut ledger = Ledger::new(KEY);

        ledger
            .add(&db, sample_new_record("2024-01-15", Status::Due, 500.0))
            .await?;
        assert_eq!(ledger.summary().total_due, 500.0);

        let paid = ledger
            .add(&db, sample_new_record("2024-01-15", Status::Paid, 300.0))
            .await?;
        let summary = ledger.summary();
        assert_eq!(summary.total_paid, 300.0);
        assert_eq!(summary.total_due, 500.0);

        let view = ledger.view(StatusFilter::Paid, "");
        assert_eq!(ids(&view), vec![paid.id]);

        let export = ledger.export_csv(date("2024-01-20"), "₹")?.unwrap();
        assert_eq!(export.filename, "billing-records-2024-01-20.csv");
        assert_eq!(export.content.lines().count(), 3);
        Ok(())
    }
}
