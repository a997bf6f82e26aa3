use billing_ledger::{
    bot::{self, BotData},
    config,
    core::ledger::Ledger,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file so RUST_LOG and DATABASE_URL can come from it
    dotenv().ok(); // non-fatal, env vars can be set externally

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 3. Ledger settings from config.toml (defaults if absent)
    let settings = config::ledger::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?
        .ledger;
    info!(?settings, "Loaded ledger settings");

    // 4. Database and key-value table
    let database = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&database)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Load the ledger once; it is rewritten after every change
    let ledger = Ledger::load(&database, &settings.storage_key).await;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(database, ledger, settings)).await
}
