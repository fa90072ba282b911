//! Server entry point: load config, connect, ensure schema, optionally seed, serve.

use book_service::{app, seed_books, AppState, BookStore, Config, PgBookStore, LISTEN_ADDR};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("book_service=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.database.clone())
        .await
        .map_err(|e| format!("could not connect to database: {}", e))?;

    let store = PgBookStore::new(pool);
    store
        .ensure_schema()
        .await
        .map_err(|e| format!("could not migrate database: {}", e))?;

    if config.seed {
        seed_books(&store)
            .await
            .map_err(|e| format!("could not insert sample books: {}", e))?;
    }

    let state = AppState::new(store);
    let listener = TcpListener::bind(LISTEN_ADDR)
        .await
        .map_err(|e| format!("could not start server: {}", e))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
