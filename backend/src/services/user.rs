//! User service for profile management
//!
//! The user being read or updated is always the authenticated caller; the
//! id comes from the token, never from the request body.

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{CredentialStore, StoreError, UserChanges};
use bookshelf_shared::validation::{
    normalize_email, validate_email, validate_name, validate_password,
};
use bookshelf_shared::{UpdateUserRequest, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Profile update input; `None` keeps the current value
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email.as_deref().map(normalize_email),
            password: req.password,
        }
    }
}

/// User service
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn CredentialStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn CredentialStore>) -> Self {
        Self { users }
    }

    /// Get user profile
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Update the caller's own profile
    pub async fn update(&self, user_id: Uuid, update: UpdateUser) -> Result<UserProfile, ApiError> {
        let current = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if let Some(name) = &update.name {
            validate_name(name)?;
        }

        // Only a changed email needs the uniqueness check
        let email = match update.email {
            Some(email) if email != current.email => {
                validate_email(&email)?;
                if self.users.exists_by_email(&email).await? {
                    return Err(ApiError::DuplicateEmail);
                }
                Some(email)
            }
            _ => None,
        };

        let password_hash = match update.password {
            Some(password) => {
                validate_password(password.expose_secret())?;
                Some(PasswordService::hash_async(password.expose_secret().clone()).await?)
            }
            None => None,
        };

        let changes = UserChanges {
            name: update.name,
            email,
            password_hash,
        };

        let user = self
            .users
            .update_by_id(user_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => ApiError::DuplicateEmail,
                StoreError::NotFound => ApiError::NotFound("User not found".to_string()),
                other => other.into(),
            })?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user.into())
    }
}
