//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success body: `{"message": ..., "data"?: ...}`.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn message_only(message: &'static str) -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::OK, Json(Envelope { message, data: None }))
}

pub fn with_data<T: Serialize>(message: &'static str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            message,
            data: Some(data),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_omits_data() {
        let (status, Json(body)) = message_only("book has been added");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"message": "book has been added"})
        );
    }

    #[test]
    fn with_data_keeps_empty_list() {
        let (_, Json(body)) = with_data("books fetched successfully", Vec::<u8>::new());
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"message": "books fetched successfully", "data": []})
        );
    }
}
