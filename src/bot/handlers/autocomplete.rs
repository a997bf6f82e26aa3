//! Autocomplete handlers for Discord slash command parameters.
//!
//! Cover size, manufacturer and payment mode are open text fields. Suggestions
//! come from the values already used in the ledger so entries stay consistent.

use crate::{
    bot::BotData,
    core::record::BillingRecord,
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Distinct values containing `partial` (case-insensitive), sorted, capped at 25.
#[must_use]
pub fn matching_values<'a, I>(values: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = values
        .into_iter()
        .filter(|value| !value.is_empty() && value.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .collect();

    matching.sort();
    matching.dedup();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

async fn suggest(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
    field: fn(&BillingRecord) -> &str,
) -> Vec<String> {
    let ledger = ctx.data().ledger.read().await;
    matching_values(ledger.records().iter().map(field), partial)
}

/// Suggests cover sizes already present in the ledger.
pub async fn autocomplete_cover_size(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, partial, |r| r.cover_size.as_str()).await
}

/// Suggests manufacturers already present in the ledger.
pub async fn autocomplete_manufacturer(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, partial, |r| r.manufacturer.as_str()).await
}

/// Suggests payment modes already present in the ledger.
pub async fn autocomplete_payment_mode(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, partial, |r| r.payment_mode.as_str()).await
}

/// Suggests customer names already present in the ledger.
pub async fn autocomplete_customer(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    suggest(ctx, partial, |r| r.customer_name.as_str()).await
}
