//! Data access layer
//!
//! Stores are traits so services can run against Postgres in production and
//! against the in-memory implementations in tests.

pub mod book;
pub mod memory;
pub mod user;

use thiserror::Error;

pub use book::{BookChanges, BookStore, NewBookRecord, PgBookRepository};
pub use memory::{InMemoryBookStore, InMemoryUserStore};
#[cfg(test)]
pub use memory::UnavailableStore;
pub use user::{CredentialStore, NewUserRecord, PgUserRepository, UserChanges};

/// Failure reported by a store
///
/// Stores do not retry; callers see the first failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}
