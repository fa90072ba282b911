//! PostgreSQL-backed book store.

use super::BookStore;
use crate::error::StoreError;
use crate::model::Book;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const TABLE: &str = "books";

/// Data columns; each is reconciled with ADD COLUMN IF NOT EXISTS on startup.
const DATA_COLUMNS: &[&str] = &["author", "title", "publisher"];

const SELECT_COLUMNS: &str =
    "id, COALESCE(author, '') AS author, COALESCE(title, '') AS title, COALESCE(publisher, '') AS publisher";

#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        PgBookStore { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                author TEXT,
                title TEXT,
                publisher TEXT
            )
            "#,
            TABLE
        );
        tracing::debug!(sql = %ddl, "query");
        sqlx::query(&ddl).execute(&self.pool).await?;
        for column in DATA_COLUMNS {
            let alter = format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} TEXT", TABLE, column);
            tracing::debug!(sql = %alter, "query");
            sqlx::query(&alter).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn create(&self, book: &Book) -> Result<i64, StoreError> {
        let sql = format!(
            "INSERT INTO {} (author, title, publisher) VALUES ($1, $2, $3) RETURNING id",
            TABLE
        );
        tracing::debug!(sql = %sql, "query");
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(&book.author)
            .bind(&book.title)
            .bind(&book.publisher)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_many_if_empty(&self, books: &[Book]) -> Result<usize, StoreError> {
        if books.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        // Held until commit: blocks other writers and seeders, not readers.
        let lock = format!("LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE", TABLE);
        tracing::debug!(sql = %lock, "query (tx)");
        sqlx::query(&lock).execute(&mut *tx).await?;

        let exists_sql = format!("SELECT EXISTS (SELECT 1 FROM {})", TABLE);
        tracing::debug!(sql = %exists_sql, "query (tx)");
        let non_empty: bool = sqlx::query_scalar(&exists_sql).fetch_one(&mut *tx).await?;
        if non_empty {
            tx.rollback().await?;
            return Ok(0);
        }

        let mut insert: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} (author, title, publisher) ", TABLE));
        insert.push_values(books, |mut row, book| {
            row.push_bind(&book.author)
                .push_bind(&book.title)
                .push_bind(&book.publisher);
        });
        tracing::debug!(sql = %insert.sql(), rows = books.len(), "query (tx)");
        let result = insert.build().execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected() as usize)
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!("SELECT {} FROM {}", SELECT_COLUMNS, TABLE);
        tracing::debug!(sql = %sql, "query");
        let books = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn get_by_id(&self, id: i64) -> Result<Book, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", SELECT_COLUMNS, TABLE);
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", TABLE);
        tracing::debug!(sql = %sql, "query");
        let n: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(n)
    }
}
