//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Every service is constructed once here and handed to handlers by
//! reference; nothing is a process-wide global. Tests build the same state
//! over in-memory stores with `AppState::with_stores`.

use crate::auth::{JwtService, OwnershipGuard};
use crate::config::AppConfig;
use crate::repositories::{BookStore, CredentialStore, PgBookRepository, PgUserRepository};
use crate::services::{AuthService, BookService, UserService};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// All fields are designed for cheap cloning across async tasks: stores
/// sit behind `Arc`, and the JWT keys are pre-computed and `Arc`'d.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub auth: AuthService,
    pub users: UserService,
    pub books: BookService,
    /// Used by readiness probes
    credential_store: Arc<dyn CredentialStore>,
}

impl AppState {
    /// Create state backed by Postgres
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgBookRepository::new(db)),
        )
    }

    /// Create state over arbitrary stores
    ///
    /// This pre-computes JWT keys from the config secret; call it once at
    /// startup.
    pub fn with_stores(
        config: AppConfig,
        user_store: Arc<dyn CredentialStore>,
        book_store: Arc<dyn BookStore>,
    ) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            &config.jwt.issuer,
            config.jwt.token_expiry_secs,
        );

        Self {
            auth: AuthService::new(user_store.clone(), jwt.clone()),
            users: UserService::new(user_store.clone()),
            books: BookService::new(book_store, OwnershipGuard::new()),
            config: Arc::new(config),
            jwt,
            credential_store: user_store,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    #[inline]
    pub fn users(&self) -> &UserService {
        &self.users
    }

    #[inline]
    pub fn books(&self) -> &BookService {
        &self.books
    }

    /// Store consulted by the readiness probe
    #[inline]
    pub fn credential_store(&self) -> &dyn CredentialStore {
        self.credential_store.as_ref()
    }
}
