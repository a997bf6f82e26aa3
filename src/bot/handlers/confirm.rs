//! Confirmation prompt for destructive actions.
//!
//! Sends a message with confirm/cancel buttons and waits for the invoking user
//! to press one. Only the command author's press counts; no press within the
//! timeout is treated as cancel.

use crate::{bot::BotData, errors::{Error, Result}};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// How long to wait for a button press
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Asks the author to confirm `prompt`.
///
/// # Returns
/// * `Ok(true)` - The confirm button was pressed
/// * `Ok(false)` - Cancel was pressed or the prompt timed out
pub async fn confirm(
    ctx: poise::Context<'_, BotData, Error>,
    prompt: String,
    confirm_label: &str,
) -> Result<bool> {
    let ctx_id = ctx.id();
    let confirm_id = format!("{ctx_id}-confirm");
    let cancel_id = format!("{ctx_id}-cancel");

    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(&confirm_id)
            .label(confirm_label)
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(&cancel_id)
            .label("Cancel")
            .style(serenity::ButtonStyle::Secondary),
    ]);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(prompt)
                .components(vec![buttons]),
        )
        .await?;

    let prefix = ctx_id.to_string();
    let press = serenity::ComponentInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(CONFIRM_TIMEOUT)
        .filter(move |press| press.data.custom_id.starts_with(&prefix))
        .await;

    let confirmed = press
        .as_ref()
        .is_some_and(|press| press.data.custom_id == confirm_id);

    if let Some(press) = press {
        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::Acknowledge,
            )
            .await?;
    } else {
        tracing::debug!(ctx_id, "Confirmation timed out");
    }

    // drop the buttons so the prompt cannot be answered twice
    let outcome = if confirmed { "Confirmed." } else { "Cancelled." };
    reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .content(outcome)
                .components(Vec::new()),
        )
        .await?;

    Ok(confirmed)
}
