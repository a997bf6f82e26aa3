//! General Discord commands - ping and help.
//! These commands don't touch the ledger.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Billing Ledger Help**\n\
        Here is a summary of all available commands.\n\n\
        **Records**\n\
        • `/add_bill <customer> <quantity> <cover_size> <amount> <status> <manufacturer> <payment_mode> [date] [print_type] [print_sides] [colors]` - Adds a billing record. Printed covers need sides and colors.\n\
        • `/bills [status] [search]` - Lists records, newest first, filtered by status and search text.\n\
        • `/delete_bill <id>` - Deletes a record after confirmation.\n\n\
        **Reports**\n\
        • `/summary` - Shows total paid and total due.\n\
        • `/export` - Downloads every record as a CSV file.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
