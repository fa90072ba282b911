//! Book service: CRUD over a single `books` table exposed as a small JSON HTTP API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Config, LISTEN_ADDR};
pub use error::{ApiError, ConfigError, StoreError};
pub use model::Book;
pub use routes::{book_routes, common_routes, common_routes_with_ready};
pub use state::AppState;
pub use store::{seed_books, BookStore, MemoryBookStore, PgBookStore};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Full application router: book API plus health/readiness/version, with per-request tracing spans.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(book_routes(state))
        .layer(TraceLayer::new_for_http())
}
