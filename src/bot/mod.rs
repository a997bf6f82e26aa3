//! Bot layer - Discord-specific interface and command handlers
//!
//! Slash commands stand in for the billing form, the status filter and search
//! box, the CSV download and the delete confirmation. All ledger logic lives in
//! [`crate::core`]; this layer only parses input and renders replies.

/// Discord command implementations (billing, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, confirmation)
pub mod handlers;

use crate::{
    config::ledger::LedgerSettings,
    core::ledger::Ledger,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
///
/// The ledger sits behind a read-write lock: listings and totals share it,
/// adds and deletes hold the write lock across the append and the storage write.
pub struct BotData {
    /// Database connection backing the key-value store
    pub database: DatabaseConnection,
    /// The billing ledger
    pub ledger: RwLock<Ledger>,
    /// Display and storage settings
    pub settings: LedgerSettings,
}

impl BotData {
    /// Creates a new `BotData` instance from a connection and an already loaded ledger.
    #[must_use]
    pub fn new(database: DatabaseConnection, ledger: Ledger, settings: LedgerSettings) -> Self {
        Self {
            database,
            ledger: RwLock::new(ledger),
            settings,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers the slash commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::add_bill(),
                commands::bills(),
                commands::summary(),
                commands::export(),
                commands::delete_bill(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;

    Ok(())
}
