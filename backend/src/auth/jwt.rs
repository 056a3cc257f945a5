//! JWT token issuance and validation
//!
//! Tokens are HS256-signed and self-contained: nothing is stored server-side,
//! so a token stays usable until it expires.

use bookshelf_shared::TokenError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// JWT claims
///
/// Deserialization fails on a missing claim or a `sub` that is not a UUID,
/// which surfaces as `TokenError::Malformed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    #[inline]
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Uses pre-computed keys to avoid key derivation on every request.
/// Keys are wrapped in Arc for cheap cloning.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    issuer: Arc<str>,
    token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, issuer: &str, token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; a token is expired the second after `exp`
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            issuer: Arc::from(issuer),
            token_expiry_secs,
        }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = Duration::try_seconds(self.token_expiry_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                warn!(
                    token_expiry_secs = self.token_expiry_secs,
                    "Token expiry out of range"
                );
                TokenError::Malformed
            })?;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.to_string(),
        };

        // Encoding HS256 with an in-memory key only fails on serialization,
        // which cannot happen for this claim set
        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding()).map_err(|e| {
            debug!("Failed to encode token: {}", e);
            TokenError::Malformed
        })
    }

    /// Validate a token and return its claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let err = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                };
                debug!(error = %e, "Token rejected");
                err
            })
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }

    #[inline]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
