use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use book_service::{app, AppState, Book, BookStore, MemoryBookStore, StoreError};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(MemoryBookStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(b) => {
            req = req.header("content-type", "application/json");
            Body::from(b.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn list_books(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().cloned().unwrap()
}

async fn create(app: &Router, body: &str) -> StatusCode {
    send(app, Method::POST, "/api/create_books", Some(body)).await.0
}

#[tokio::test]
async fn create_then_get_by_id() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/create_books",
        Some(r#"{"author":"A","title":"T","publisher":"P"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "book has been added"}));

    let books = list_books(&app).await;
    assert_eq!(books.len(), 1);
    let id = books[0]["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = send(&app, Method::GET, &format!("/api/get_books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "book fetched successfully");
    assert_eq!(
        body["data"],
        json!({"id": id, "author": "A", "title": "T", "publisher": "P"})
    );
}

#[tokio::test]
async fn create_with_malformed_body_is_422() {
    let app = test_app();
    let (status, body) = send(&app, Method::POST, "/api/create_books", Some("not json")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn create_with_wrong_field_type_is_422() {
    let app = test_app();
    assert_eq!(create(&app, r#"{"title": 7}"#).await, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_accepts_missing_fields_as_empty() {
    let app = test_app();
    assert_eq!(create(&app, r#"{"title":"Only"}"#).await, StatusCode::OK);
    assert_eq!(create(&app, "{}").await, StatusCode::OK);
    let books = list_books(&app).await;
    assert_eq!(books[0]["author"], "");
    assert_eq!(books[0]["title"], "Only");
    assert_eq!(books[1]["publisher"], "");
}

#[tokio::test]
async fn create_ignores_client_id() {
    let app = test_app();
    assert_eq!(create(&app, r#"{"id": 500, "title":"T"}"#).await, StatusCode::OK);
    let books = list_books(&app).await;
    assert_ne!(books[0]["id"], 500);
    let (status, _) = send(&app, Method::GET, "/api/get_books/500", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_create_yields_new_row() {
    let app = test_app();
    let payload = r#"{"author":"A","title":"T","publisher":"P"}"#;
    create(&app, payload).await;
    create(&app, payload).await;
    let books = list_books(&app).await;
    assert_eq!(books.len(), 2);
    assert_ne!(books[0]["id"], books[1]["id"]);
}

#[tokio::test]
async fn list_grows_with_each_create() {
    let app = test_app();
    for n in 1..=4 {
        assert_eq!(create(&app, &format!(r#"{{"title":"B{}"}}"#, n)).await, StatusCode::OK);
        assert_eq!(list_books(&app).await.len(), n);
    }
}

#[tokio::test]
async fn oversized_body_gets_json_error() {
    let app = test_app();
    let title = "x".repeat(book_service::routes::MAX_BODY_BYTES + 1);
    let payload = json!({ "title": title }).to_string();
    let (status, body) = send(&app, Method::POST, "/api/create_books", Some(&payload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().is_some_and(|s| s.contains("length limit exceeded")));
    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn oversized_body_with_content_length_gets_json_error() {
    let app = test_app();
    let payload = "x".repeat(book_service::routes::MAX_BODY_BYTES + 1);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/create_books")
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(Body::from(payload))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn delete_existing_then_get_fails() {
    let app = test_app();
    create(&app, r#"{"title":"Gone"}"#).await;
    let id = list_books(&app).await[0]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/api/delete_book/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "book deleted successfully"}));

    let (status, body) = send(&app, Method::GET, &format!("/api/get_books/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "could not get the book"}));
    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn delete_missing_id_still_succeeds() {
    let app = test_app();
    let (status, body) = send(&app, Method::DELETE, "/api/delete_book/424242", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "book deleted successfully");
}

#[tokio::test]
async fn get_missing_id_is_400() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/get_books/9", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "could not get the book"}));
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/get_books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "could not get the book");
    let (status, body) = send(&app, Method::DELETE, "/api/delete_book/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "could not delete book");
}

#[tokio::test]
async fn empty_list_has_data_array() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "books fetched successfully", "data": []}));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let app = test_app();
    let a = tokio::spawn({
        let app = app.clone();
        async move { create(&app, r#"{"title":"left"}"#).await }
    });
    let b = tokio::spawn({
        let app = app.clone();
        async move { create(&app, r#"{"title":"right"}"#).await }
    });
    assert_eq!(a.await.unwrap(), StatusCode::OK);
    assert_eq!(b.await.unwrap(), StatusCode::OK);

    let books = list_books(&app).await;
    assert_eq!(books.len(), 2);
    assert_ne!(books[0]["id"], books[1]["id"]);
}

/// Store whose every call fails, standing in for a lost connection.
struct DownStore;

#[async_trait]
impl BookStore for DownStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn create(&self, _book: &Book) -> Result<i64, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn create_many_if_empty(&self, _books: &[Book]) -> Result<usize, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn delete_by_id(&self, _id: i64) -> Result<u64, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn get_by_id(&self, _id: i64) -> Result<Book, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn count(&self) -> Result<i64, StoreError> {
        Err(StoreError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn store_failures_map_to_fixed_messages() {
    let app = app(AppState::new(DownStore));
    let cases = [
        (Method::POST, "/api/create_books", Some("{}"), "could not create book"),
        (Method::DELETE, "/api/delete_book/1", None, "could not delete book"),
        (Method::GET, "/api/get_books/1", None, "could not get the book"),
        (Method::GET, "/api/books", None, "could not get books"),
    ];
    for (method, uri, body, message) in cases {
        let (status, resp) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(resp, json!({"error": message}));
    }
}

#[tokio::test]
async fn readiness_reflects_store() {
    let (status, body) = send(&test_app(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let down = app(AppState::new(DownStore));
    let (status, body) = send(&down, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn health_and_version() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "book-service");
}
