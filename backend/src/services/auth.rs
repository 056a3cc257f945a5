//! Authentication service: registration, credential checks and login
//!
//! # Anti-enumeration
//!
//! A login against an unknown email and a login with a wrong password both
//! end in `ApiError::Denied`, and both run one password verification, so
//! neither the response nor its timing tells the caller whether the email
//! is registered.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{CredentialStore, NewUserRecord, StoreError, UserChanges};
use bookshelf_shared::validation::{
    normalize_email, validate_email, validate_name, validate_password,
};
use bookshelf_shared::{AuthResponse, RegisterRequest, User, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Registration input, converted from the HTTP request
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: normalize_email(&req.email),
            password: req.password,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn CredentialStore>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Return the user owning these credentials, or `Denied`
    #[instrument(skip(self, password))]
    pub async fn verify_credential(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<User, ApiError> {
        let email = normalize_email(email);
        let plaintext = password.expose_secret().clone();

        let Some(user) = self.users.find_by_email(&email).await? else {
            PasswordService::verify_dummy_async(plaintext).await;
            metrics::counter!("auth_login_total", "outcome" => "denied").increment(1);
            return Err(ApiError::Denied);
        };

        let verified = PasswordService::verify_async(user.password_hash.clone(), plaintext).await;
        if !verified || user.email != email {
            metrics::counter!("auth_login_total", "outcome" => "denied").increment(1);
            return Err(ApiError::Denied);
        }

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        Ok(user)
    }

    /// Create a user after checking the email is free
    ///
    /// Exactly one store write happens on success and none on failure.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, ApiError> {
        validate_name(&new_user.name)?;
        validate_email(&new_user.email)?;
        validate_password(new_user.password.expose_secret())?;

        if self.users.exists_by_email(&new_user.email).await? {
            metrics::counter!("auth_register_total", "outcome" => "duplicate").increment(1);
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash =
            PasswordService::hash_async(new_user.password.expose_secret().clone()).await?;

        let record = NewUserRecord {
            name: new_user.name,
            email: new_user.email,
            password_hash,
        };

        // A concurrent registration can still win between the check and the insert
        let user = self.users.insert(record).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => ApiError::DuplicateEmail,
            other => other.into(),
        })?;

        metrics::counter!("auth_register_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Verify credentials and issue a token
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let user = self.verify_credential(email, password).await?;

        if PasswordService::needs_rehash(&user.password_hash) {
            self.upgrade_hash(&user, password).await;
        }

        self.issue_response(user)
    }

    /// Build the token response handed out after login or registration
    pub fn issue_response(&self, user: User) -> Result<AuthResponse, ApiError> {
        let access_token = self
            .jwt
            .issue(user.id)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to issue token: {}", e)))?;

        Ok(AuthResponse {
            user: UserProfile::from(user),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.token_expiry_secs(),
        })
    }

    /// Replace a legacy digest after a successful login. Failure is logged
    /// and does not affect the login.
    async fn upgrade_hash(&self, user: &User, password: &SecretString) {
        let password_hash =
            match PasswordService::hash_async(password.expose_secret().clone()).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(user_id = %user.id, "Failed to rehash legacy password: {}", e);
                    return;
                }
            };

        let changes = UserChanges {
            password_hash: Some(password_hash),
            ..Default::default()
        };
        match self.users.update_by_id(user.id, changes).await {
            Ok(_) => info!(user_id = %user.id, "Upgraded legacy password hash"),
            Err(e) => warn!(user_id = %user.id, "Failed to store upgraded hash: {}", e),
        }
    }
}
