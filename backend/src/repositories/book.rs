//! Book repository for database operations

use super::StoreError;
use async_trait::async_trait;
use bookshelf_shared::Book;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Book record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            user_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for inserting a book
#[derive(Debug, Clone)]
pub struct NewBookRecord {
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

/// Editable book fields. The owner is not among them.
#[derive(Debug, Clone)]
pub struct BookChanges {
    pub title: String,
    pub description: String,
}

/// Persistence of books
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError>;

    async fn insert(&self, book: NewBookRecord) -> Result<Book, StoreError>;

    /// Update title and description, `StoreError::NotFound` if absent
    async fn update(&self, id: Uuid, changes: BookChanges) -> Result<Book, StoreError>;

    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Postgres-backed book repository
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookRepository {
    async fn all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT id, title, description, user_id, created_at, updated_at
            FROM books
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT id, title, description, user_id, created_at, updated_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book.map(Book::from))
    }

    async fn insert(&self, book: NewBookRecord) -> Result<Book, StoreError> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            INSERT INTO books (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, user_id, created_at, updated_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn update(&self, id: Uuid, changes: BookChanges) -> Result<Book, StoreError> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            UPDATE books SET
                title = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Book::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::db::health_check(&self.pool).await
    }
}
