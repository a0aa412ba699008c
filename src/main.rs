use chrono::Local;
use dotenvy::dotenv;
use restaurant_pos::{
    config::{catalog, database},
    core::{report, seed},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed the catalog if a config file is present
    match catalog::load_default_config()? {
        Some(config) => {
            seed::seed_catalog(&db, &config)
                .await
                .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        }
        None => info!(
            "No catalog file at {}, skipping seeding.",
            catalog::config_path()
        ),
    }

    // 5. Report on today's business
    let summary = report::daily_summary(&db, Local::now().date_naive()).await?;
    info!("{}", report::format_daily_summary(&summary));

    Ok(())
}
