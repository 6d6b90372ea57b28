use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use fable_api::database::postgres::PgStore;
use fable_api::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::new(Arc::new(PgStore::new(pool)));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("fable-api listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
