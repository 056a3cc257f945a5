//! Bookshelf Shared Library
//!
//! This crate contains the domain models, request/response types and
//! validation helpers shared between the API server and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Book, User};
pub use types::*;
