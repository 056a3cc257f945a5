//! Book service
//!
//! Reads are open to any authenticated caller. Updates and deletes first
//! load the book and pass its owner through the `OwnershipGuard`.

use crate::auth::OwnershipGuard;
use crate::error::ApiError;
use crate::repositories::{BookChanges, BookStore, NewBookRecord, StoreError};
use bookshelf_shared::validation::{validate_book_description, validate_book_title};
use bookshelf_shared::{Book, CreateBookRequest, UpdateBookRequest};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Title and description as submitted by the caller
#[derive(Debug, Clone)]
pub struct BookInput {
    pub title: String,
    pub description: String,
}

impl BookInput {
    fn validate(&self) -> Result<(), ApiError> {
        validate_book_title(&self.title)?;
        validate_book_description(&self.description)?;
        Ok(())
    }
}

impl From<CreateBookRequest> for BookInput {
    fn from(req: CreateBookRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description,
        }
    }
}

impl From<UpdateBookRequest> for BookInput {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description,
        }
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("Book not found".to_string())
}

/// Book service
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookStore>,
    guard: OwnershipGuard,
}

impl BookService {
    pub fn new(books: Arc<dyn BookStore>, guard: OwnershipGuard) -> Self {
        Self { books, guard }
    }

    pub async fn all(&self) -> Result<Vec<Book>, ApiError> {
        Ok(self.books.all().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Book, ApiError> {
        self.books.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Create a book owned by `owner_id`
    pub async fn insert(&self, owner_id: Uuid, input: BookInput) -> Result<Book, ApiError> {
        input.validate()?;

        let book = self
            .books
            .insert(NewBookRecord {
                title: input.title,
                description: input.description,
                user_id: owner_id,
            })
            .await?;

        info!(book_id = %book.id, owner = %owner_id, "Book created");
        Ok(book)
    }

    /// Update a book; only its owner may do so
    pub async fn update(
        &self,
        caller_id: Uuid,
        id: Uuid,
        input: BookInput,
    ) -> Result<Book, ApiError> {
        let book = self.find_by_id(id).await?;
        self.guard.ensure_can_edit(caller_id, book.user_id)?;
        input.validate()?;

        let changes = BookChanges {
            title: input.title,
            description: input.description,
        };

        self.books.update(id, changes).await.map_err(|e| match e {
            StoreError::NotFound => not_found(),
            other => other.into(),
        })
    }

    /// Delete a book; only its owner may do so
    pub async fn delete(&self, caller_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let book = self.find_by_id(id).await?;
        self.guard.ensure_can_edit(caller_id, book.user_id)?;

        if !self.books.delete(id).await? {
            return Err(not_found());
        }

        info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryBookStore, UnavailableStore};

    fn setup() -> BookService {
        BookService::new(Arc::new(InMemoryBookStore::new()), OwnershipGuard::new())
    }

    fn input(title: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            description: "A description".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_sets_owner() {
        let service = setup();
        let owner = Uuid::new_v4();

        let book = service.insert(owner, input("Dune")).await.unwrap();

        assert_eq!(book.user_id, owner);
        assert_eq!(service.find_by_id(book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn test_insert_rejects_empty_title() {
        let service = setup();
        let result = service.insert(Uuid::new_v4(), input("   ")).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_owner_can_update() {
        let service = setup();
        let owner = Uuid::new_v4();
        let book = service.insert(owner, input("Dune")).await.unwrap();

        let updated = service
            .update(owner, book.id, input("Dune Messiah"))
            .await
            .unwrap();

        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.user_id, owner);
    }

    #[tokio::test]
    async fn test_non_owner_update_forbidden() {
        let service = setup();
        let owner = Uuid::new_v4();
        let book = service.insert(owner, input("Dune")).await.unwrap();

        let result = service.update(Uuid::new_v4(), book.id, input("Hijacked")).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
        assert_eq!(service.find_by_id(book.id).await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn test_non_owner_delete_forbidden() {
        let service = setup();
        let owner = Uuid::new_v4();
        let book = service.insert(owner, input("Dune")).await.unwrap();

        let result = service.delete(Uuid::new_v4(), book.id).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
        assert!(service.find_by_id(book.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_owner_can_delete() {
        let service = setup();
        let owner = Uuid::new_v4();
        let book = service.insert(owner, input("Dune")).await.unwrap();

        service.delete(owner, book.id).await.unwrap();

        assert!(matches!(
            service.find_by_id(book.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_book_not_found() {
        let service = setup();
        let result = service
            .update(Uuid::new_v4(), Uuid::new_v4(), input("Nothing"))
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    /// Reads succeed, writes fail as if the connection dropped mid-request
    struct ReadOnlyStore(InMemoryBookStore);

    #[async_trait::async_trait]
    impl BookStore for ReadOnlyStore {
        async fn all(&self) -> Result<Vec<Book>, StoreError> {
            self.0.all().await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
            self.0.find_by_id(id).await
        }

        async fn insert(&self, _book: NewBookRecord) -> Result<Book, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }

        async fn update(&self, _id: Uuid, _changes: BookChanges) -> Result<Book, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_update_propagates_store_failure() {
        let service = BookService::new(Arc::new(UnavailableStore), OwnershipGuard::new());

        let result = service
            .update(Uuid::new_v4(), Uuid::new_v4(), input("Dune"))
            .await;

        assert!(matches!(result, Err(ApiError::Store(StoreError::Database(_)))));
    }

    #[tokio::test]
    async fn test_failed_write_after_guard_is_store_error() {
        let memory = InMemoryBookStore::new();
        let owner = Uuid::new_v4();
        let book = memory
            .insert(NewBookRecord {
                title: "Dune".to_string(),
                description: String::new(),
                user_id: owner,
            })
            .await
            .unwrap();
        let service = BookService::new(Arc::new(ReadOnlyStore(memory)), OwnershipGuard::new());

        let updated = service.update(owner, book.id, input("Dune Messiah")).await;
        let deleted = service.delete(owner, book.id).await;

        assert!(matches!(updated, Err(ApiError::Store(StoreError::Database(_)))));
        assert!(matches!(deleted, Err(ApiError::Store(StoreError::Database(_)))));
        assert_eq!(service.find_by_id(book.id).await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn test_all_lists_every_owner() {
        let service = setup();
        service.insert(Uuid::new_v4(), input("One")).await.unwrap();
        service.insert(Uuid::new_v4(), input("Two")).await.unwrap();

        assert_eq!(service.all().await.unwrap().len(), 2);
    }
}
