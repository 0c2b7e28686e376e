use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use store::{KvStore, MemoryKvStore, PgKvStore};

use earlybird_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting Early Bird API v{}", env!("CARGO_PKG_VERSION"));

    // Select the key-value store backend
    let kv: Arc<dyn KvStore> = match config.store.backend.as_str() {
        "postgres" => {
            let pool = store::postgres::create_pool(&config.store.pg_config()).await?;

            info!("Running store migrations...");
            sqlx::migrate!("../store/src/migrations").run(&pool).await?;
            info!("Migrations completed");

            jobs::spawn_pool_metrics(
                pool.clone(),
                tokio_util::sync::CancellationToken::new(),
            );

            Arc::new(PgKvStore::new(pool))
        }
        _ => {
            info!("Using the in-memory store backend (data is not durable)");
            Arc::new(MemoryKvStore::new())
        }
    };

    // Build application
    let app = app::create_app(config.clone(), kv);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
