use dotenvy::dotenv;
use fridge_macros::{
    config::{catalog, database},
    core::{expiration::local_today, meal, product, report, settings},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Settings and catalog seed
    settings::ensure_default_settings(&db).await?;
    let catalog = catalog::load_default_catalog()?;
    let seeded = product::seed_default_products(&db, &catalog)
        .await
        .inspect_err(|e| error!("Failed to seed product catalog: {}", e))?;
    if seeded > 0 {
        info!("Seeded {} products", seeded);
    }

    // 5. Daily rollover, never fatal
    let today = local_today();
    let purged = meal::run_daily_cleanup(&db, today).await;
    info!(
        "Daily cleanup removed {} meal(s); next rollover in {:?}",
        purged,
        meal::duration_until_next_local_midnight(&chrono::Local::now())
    );

    // 6. Print today's summary
    let summary = report::generate_daily_summary(&db, today).await?;
    let products = product::product_map(&db).await?;
    println!("{}", report::render_daily_summary(&summary, &products));

    Ok(())
}
