//! Key-value storage substrate.
//!
//! The ledger only needs two primitives: read the string stored under a key and
//! overwrite it. Both go through the `kv_entries` table; a write replaces the
//! whole value in one statement.

use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

/// Reads the value stored under `key`.
///
/// # Returns
/// * `Ok(Some(value))` - The key exists
/// * `Ok(None)` - Nothing has been written under this key
pub async fn read_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let entry = KvEntry::find()
        .filter(kv_entry::Column::Key.eq(key))
        .one(db)
        .await?;

    Ok(entry.map(|e| e.value))
}

/// Writes `value` under `key`, replacing any previous value.
pub async fn write_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = KvEntry::find()
        .filter(kv_entry::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(entry) = existing {
        let mut active_model: kv_entry::ActiveModel = entry.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_entry.insert(db).await?;
    }

    tracing::trace!(key, "Stored value");
    Ok(())
}
