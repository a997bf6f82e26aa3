//! Billing Discord commands - add, list, summarize, export and delete records.
//!
//! Each command reads or mutates the shared [`Ledger`](crate::core::ledger::Ledger)
//! through the lock in [`BotData`]. Input problems (bad dates, NaN amounts, a
//! printed cover without details) are answered in the channel instead of
//! surfacing as command errors.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, confirm},
        },
        core::{
            ledger::StatusFilter,
            record::{self, NewBillingRecord, PrintType, Status},
            report,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    const EMBED_COLOR: u32 = 0x0034_98DB;
    /// Discord's embed description limit, less the code fence around the listing.
    const LISTING_MAX_CHARS: usize = 4096 - "```\n\n```".len();

    /// Whether an error is the user's input rather than a system failure.
    fn is_input_error(error: &Error) -> bool {
        matches!(
            error,
            Error::InvalidAmount { .. }
                | Error::InvalidQuantity { .. }
                | Error::InvalidDate { .. }
                | Error::EmptyField { .. }
                | Error::MissingPrintDetails
        )
    }

    /// Adds a billing record to the ledger.
    ///
    /// The date defaults to today. Printed covers need both sides and colors;
    /// for plain covers those fields are ignored.
    #[allow(clippy::too_many_arguments)] // one parameter per form field
    #[poise::command(slash_command)]
    pub async fn add_bill(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Customer name"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
        #[description = "Quantity in kg"] quantity: f64,
        #[description = "Cover size"]
        #[autocomplete = "autocomplete::autocomplete_cover_size"]
        cover_size: String,
        #[description = "Billed amount"] amount: f64,
        #[description = "Payment status"] status: Status,
        #[description = "Manufacturer"]
        #[autocomplete = "autocomplete::autocomplete_manufacturer"]
        manufacturer: String,
        #[description = "Payment mode"]
        #[autocomplete = "autocomplete::autocomplete_payment_mode"]
        payment_mode: String,
        #[description = "Order date (YYYY-MM-DD), defaults to today"] date: Option<String>,
        #[description = "Plain or printed cover"] print_type: Option<PrintType>,
        #[description = "Printed sides (required for printed covers)"] print_sides: Option<String>,
        #[description = "Print colors (required for printed covers)"] colors: Option<String>,
    ) -> Result<()> {
        let date = match date.as_deref() {
            Some(value) => match record::parse_date(value) {
                Ok(date) => date,
                Err(e) => {
                    ctx.say(format!("❌ {e}")).await?;
                    return Ok(());
                }
            },
            None => chrono::Local::now().date_naive(),
        };

        let new_record = NewBillingRecord {
            date,
            customer_name: customer,
            quantity,
            cover_size,
            amount,
            status,
            manufacturer,
            payment_mode,
            print_type,
            print_sides,
            colors,
        };

        let data = ctx.data();
        let result = data.ledger.write().await.add(&data.database, new_record).await;

        match result {
            Ok(stored) => {
                ctx.say(format!(
                    "✅ Added record\n`{}`",
                    report::format_record_line(&stored, &data.settings.currency_symbol)
                ))
                .await?;
                Ok(())
            }
            Err(e) if is_input_error(&e) => {
                ctx.say(format!("❌ {e}")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Lists billing records, newest first.
    ///
    /// Filter by status and search across customer, cover size, manufacturer,
    /// payment mode, print type, status, date and amount.
    #[poise::command(slash_command)]
    pub async fn bills(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Show all, paid or due records"] status: Option<StatusFilter>,
        #[description = "Search text"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let filter = status.unwrap_or(StatusFilter::All);
        let search = search.unwrap_or_default();

        let (listing, shown_of) = {
            let ledger = data.ledger.read().await;
            let view = ledger.view(filter, &search);
            let listing = report::format_listing(
                &view,
                &data.settings.currency_symbol,
                data.settings.page_size,
                LISTING_MAX_CHARS,
            )?;
            (listing, (view.len(), ledger.len()))
        };

        let embed = serenity::CreateEmbed::default()
            .title("🧾 Billing Records")
            .description(format!("```\n{listing}\n```"))
            .color(EMBED_COLOR)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} of {} record{}",
                shown_of.0,
                shown_of.1,
                if shown_of.1 == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the total paid and total due.
    #[poise::command(slash_command)]
    pub async fn summary(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let summary = data.ledger.read().await.summary();
        let symbol = &data.settings.currency_symbol;

        let embed = serenity::CreateEmbed::default()
            .title("📊 Billing Summary")
            .color(EMBED_COLOR)
            .field(
                "Total Paid",
                report::format_currency(symbol, summary.total_paid),
                true,
            )
            .field(
                "Total Due",
                report::format_currency(symbol, summary.total_due),
                true,
            );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Exports every record as a CSV file.
    #[poise::command(slash_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let today = chrono::Local::now().date_naive();
        let export = data
            .ledger
            .read()
            .await
            .export_csv(today, &data.settings.currency_symbol)?;

        let Some(export) = export else {
            ctx.say("No data to export").await?;
            return Ok(());
        };

        let rows = export.content.lines().count().saturating_sub(1);
        let attachment =
            serenity::CreateAttachment::bytes(export.content.into_bytes(), export.filename);

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📎 Exported {rows} record{}", if rows == 1 { "" } else { "s" }))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }

    /// Deletes a billing record after confirmation.
    #[poise::command(slash_command)]
    pub async fn delete_bill(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Record id (shown as #id in /bills)"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let symbol = &data.settings.currency_symbol;

        let line = data
            .ledger
            .read()
            .await
            .get(id)
            .map(|record| report::format_record_line(record, symbol));

        let Some(line) = line else {
            ctx.say(format!("❌ No record with id {id}.")).await?;
            return Ok(());
        };

        let prompt = format!("Are you sure you want to delete this record?\n`{line}`");
        if !confirm::confirm(ctx, prompt, "Delete").await? {
            info!(id, "Record deletion cancelled");
            return Ok(());
        }

        let removed = data.ledger.write().await.remove(&data.database, id).await?;
        let reply = if removed.is_some() {
            format!("🗑️ Deleted record #{id}.")
        } else {
            format!("Record #{id} was already deleted.")
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
