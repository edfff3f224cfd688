pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use db::{SqliteUserRepository, UserRepository};
pub use error::{ApiError, StoreError};
pub use types::user::User;
