//! Storage gateway: the only component that talks to the book table.

mod memory;
mod postgres;
pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

use crate::error::StoreError;
use crate::model::Book;
use async_trait::async_trait;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Make sure the book table exists with every data column. Safe to call on every start.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert one book and return the id the store assigned. `book.id` is ignored.
    async fn create(&self, book: &Book) -> Result<i64, StoreError>;

    /// Insert every book in one atomic step, but only if the table is empty.
    /// Returns the number of rows inserted: `books.len()` or 0. On error nothing is written.
    async fn create_many_if_empty(&self, books: &[Book]) -> Result<usize, StoreError>;

    /// Delete the book with `id`. Returns the number of rows removed (0 or 1).
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;

    /// Every stored book in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Book, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

/// Sample rows inserted by [`seed_books`].
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("John Doe", "Dummy Book 1", "Publisher A"),
        Book::new("Jane Smith", "Dummy Book 2", "Publisher B"),
        Book::new("Alice Johnson", "Dummy Book 3", "Publisher C"),
        Book::new("Bob Brown", "Dummy Book 4", "Publisher D"),
        Book::new("Emma White", "Dummy Book 5", "Publisher E"),
    ]
}

/// Insert the sample books, but only into an empty table. Returns how many rows were inserted.
pub async fn seed_books(store: &dyn BookStore) -> Result<usize, StoreError> {
    let inserted = store.create_many_if_empty(&sample_books()).await?;
    if inserted == 0 {
        tracing::info!("book table not empty, skipping seed");
    } else {
        tracing::info!(inserted, "seeded sample books");
    }
    Ok(inserted)
}
