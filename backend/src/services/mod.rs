//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! stores and the auth primitives. They are built once in `AppState`.

pub mod auth;
pub mod book;
pub mod user;

pub use auth::{AuthService, NewUser};
pub use book::{BookInput, BookService};
pub use user::{UpdateUser, UserService};
