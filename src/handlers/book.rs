//! Book handlers: create, delete, get by id, list.

use crate::error::ApiError;
use crate::model::Book;
use crate::response::{message_only, with_data};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    response::IntoResponse,
};
use serde_json::Value;

pub const MSG_CREATED: &str = "book has been added";
pub const MSG_DELETED: &str = "book deleted successfully";
pub const MSG_FETCHED_ONE: &str = "book fetched successfully";
pub const MSG_FETCHED_MANY: &str = "books fetched successfully";

pub const ERR_CREATE: &str = "could not create book";
pub const ERR_DELETE: &str = "could not delete book";
pub const ERR_GET_ONE: &str = "could not get the book";
pub const ERR_GET_MANY: &str = "could not get books";

/// Content-Type is not checked: any body that decodes to a JSON object of the book shape is accepted.
fn decode_book(body: &[u8]) -> Result<Book, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::malformed("body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| ApiError::malformed(e.to_string()))
}

/// A non-integer id answers with the endpoint's usual failure message.
fn parse_id(id_str: &str, message: &str) -> Result<i64, ApiError> {
    id_str.parse().map_err(|_| ApiError::invalid_id(message, id_str))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map_err(ApiError::from)?;
    let book = decode_book(&body)?;
    let id = state
        .store
        .create(&book)
        .await
        .map_err(|e| ApiError::store(ERR_CREATE, &e))?;
    tracing::debug!(id, "book created");
    Ok(message_only(MSG_CREATED))
}

/// Succeeds whether or not a row existed.
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id_str, ERR_DELETE)?;
    let removed = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::store(ERR_DELETE, &e))?;
    tracing::debug!(id, removed, "book delete");
    Ok(message_only(MSG_DELETED))
}

/// Not-found and store failures both answer 400; they are only told apart in the log.
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id_str, ERR_GET_ONE)?;
    let book = state.store.get_by_id(id).await.map_err(|e| {
        if e.is_not_found() {
            tracing::debug!(id, "book not found");
        }
        ApiError::store(ERR_GET_ONE, &e)
    })?;
    Ok(with_data(MSG_FETCHED_ONE, book))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let books = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::store(ERR_GET_MANY, &e))?;
    tracing::debug!(count = books.len(), "books listed");
    Ok(with_data(MSG_FETCHED_MANY, books))
}
