//! The Book entity.

use serde::{Deserialize, Serialize};

/// A stored book. `id` is assigned by the store; text fields default to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publisher: String,
}

impl Book {
    pub fn new(author: &str, title: &str, publisher: &str) -> Self {
        Book {
            id: 0,
            author: author.to_string(),
            title: title.to_string(),
            publisher: publisher.to_string(),
        }
    }
}
