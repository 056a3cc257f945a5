//! In-memory stores
//!
//! Process-local implementations of the store traits. They back the test
//! suites and mirror the Postgres constraints that matter to the services:
//! unique emails and `NotFound` on updates of missing rows.

use super::{
    BookChanges, BookStore, CredentialStore, NewBookRecord, NewUserRecord, StoreError,
    UserChanges,
};
use async_trait::async_trait;
use bookshelf_shared::{Book, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user store that counts its writes
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    writes: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts and updates so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn insert(&self, user: NewUserRecord) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(record)
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if let Some(email) = &changes.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(user.clone())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory book store
#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<HashMap<Uuid, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn all(&self) -> Result<Vec<Book>, StoreError> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        books.sort_by_key(|b| b.created_at);
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn insert(&self, book: NewBookRecord) -> Result<Book, StoreError> {
        let now = Utc::now();
        let record = Book {
            id: Uuid::new_v4(),
            title: book.title,
            description: book.description,
            user_id: book.user_id,
            created_at: now,
            updated_at: now,
        };
        self.books.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, changes: BookChanges) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or(StoreError::NotFound)?;
        book.title = changes.title;
        book.description = changes.description;
        book.updated_at = Utc::now();
        Ok(book.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.books.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store whose backend is down: every call fails with a database error
#[cfg(test)]
#[derive(Debug, Default)]
pub struct UnavailableStore;

#[cfg(test)]
fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[cfg(test)]
#[async_trait]
impl CredentialStore for UnavailableStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Err(unavailable())
    }

    async fn exists_by_email(&self, _email: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _user: NewUserRecord) -> Result<User, StoreError> {
        Err(unavailable())
    }

    async fn update_by_id(&self, _id: Uuid, _changes: UserChanges) -> Result<User, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

#[cfg(test)]
#[async_trait]
impl BookStore for UnavailableStore {
    async fn all(&self) -> Result<Vec<Book>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Book>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _book: NewBookRecord) -> Result<Book, StoreError> {
        Err(unavailable())
    }

    async fn update(&self, _id: Uuid, _changes: BookChanges) -> Result<Book, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
