//! In-process book store used by the tests.

use super::BookStore;
use crate::error::StoreError;
use crate::model::Book;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: Vec<Book>,
}

/// Rows kept in insertion order; ids come from a counter that never reuses a value.
#[derive(Default)]
pub struct MemoryBookStore {
    inner: Mutex<Inner>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave rows half-written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create(&self, book: &Book) -> Result<i64, StoreError> {
        let mut inner = self.lock();
        inner.last_id += 1;
        let id = inner.last_id;
        inner.rows.push(Book { id, ..book.clone() });
        Ok(id)
    }

    async fn create_many_if_empty(&self, books: &[Book]) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        if !inner.rows.is_empty() {
            return Ok(0);
        }
        for book in books {
            inner.last_id += 1;
            let id = inner.last_id;
            inner.rows.push(Book { id, ..book.clone() });
        }
        Ok(books.len())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|b| b.id != id);
        Ok((before - inner.rows.len()) as u64)
    }

    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.lock().rows.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Book, StoreError> {
        self.lock()
            .rows
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().rows.len() as i64)
    }
}
