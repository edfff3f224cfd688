pub mod user;

pub use user::{CreatedUser, Credentials, User, ValidationError};
