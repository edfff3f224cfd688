//! Database module: the user repository contract and its SQLite backend.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: `UserRepository` over a sqlx SQLite pool

pub mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::user::User;

pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, SqliteUserRepository, connect};

/// Persistence for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Validate, hash and insert `user`, filling in `user.id` on success.
    async fn create(&self, user: &mut User) -> Result<(), StoreError>;

    async fn find(&self, id: i64) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;
}
