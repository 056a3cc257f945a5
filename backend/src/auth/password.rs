//! Password hashing using argon2
//!
//! New digests are always Argon2id PHC strings. Digests in bcrypt format,
//! as written by earlier deployments, are still accepted by `verify`.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Request handlers go through
//! `hash_async`/`verify_async`, which run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to produce a digest
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to hash password: {0}")]
    Algorithm(String),

    #[error("Hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Argon2 digest of a password nobody has, used to equalise the work done
/// when a login names an unknown email.
const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$2Tz3YLHhFuEPBzkBuL3B6XW0Q8Lg8sXoSPj7G1a3r1E";

fn is_bcrypt_digest(digest: &str) -> bool {
    digest.starts_with("$2a$") || digest.starts_with("$2b$") || digest.starts_with("$2y$")
}

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
/// It provides resistance against both side-channel and GPU-based attacks.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Algorithm(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String, HashError> {
        tokio::task::spawn_blocking(move || Self::hash(&password)).await?
    }

    /// Verify a password against a stored digest (blocking operation)
    ///
    /// Returns `false` on mismatch and on a digest that cannot be parsed;
    /// the cause is logged, never returned.
    pub fn verify(digest: &str, password: &str) -> bool {
        if is_bcrypt_digest(digest) {
            return match bcrypt::verify(password, digest) {
                Ok(valid) => valid,
                Err(e) => {
                    warn!("Malformed bcrypt digest: {}", e);
                    false
                }
            };
        }

        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Malformed password digest: {}", e);
                return false;
            }
        };

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(e) => {
                debug!("Password verification failed: {}", e);
                false
            }
        }
    }

    /// Verify a password on the blocking thread pool
    ///
    /// A failed join is treated like a failed verification.
    pub async fn verify_async(digest: String, password: String) -> bool {
        match tokio::task::spawn_blocking(move || Self::verify(&digest, &password)).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Burn roughly the cost of one verification and always return `false`
    pub async fn verify_dummy_async(password: String) -> bool {
        Self::verify_async(DUMMY_DIGEST.to_string(), password).await;
        false
    }

    /// Whether a digest was produced by an older scheme and should be replaced
    pub fn needs_rehash(digest: &str) -> bool {
        is_bcrypt_digest(digest)
    }
}
