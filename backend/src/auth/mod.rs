//! Authentication module
//!
//! Provides JWT-based authentication, argon2 password hashing and the
//! ownership guard used before mutating owned resources.

mod guard;
mod jwt;
mod middleware;
mod password;

pub use guard::OwnershipGuard;
pub use jwt::{Claims, JwtKeys, JwtService};
pub use middleware::AuthUser;
pub use password::{HashError, PasswordService};
