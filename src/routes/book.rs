//! Book CRUD routes under `/api`.

use crate::handlers::book::{create, delete as delete_handler, list, read};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

/// Largest accepted request body, enforced by the body extractor.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn book_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/create_books", post(create))
        .route("/delete_book/:id", delete(delete_handler))
        .route("/get_books/:id", get(read))
        .route("/books", get(list))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));
    Router::new().nest("/api", api).with_state(state)
}
