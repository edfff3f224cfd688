use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error as ThisError;

use crate::error::StoreError;
use crate::service::password;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email regex must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("email is required")]
    MissingEmail,

    #[error("email is not a valid address")]
    InvalidEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// A registered account.
///
/// `password` is write-only: it is accepted on input, hashed by
/// [`User::before_create`] and never serialized. `encrypted_password` is the
/// persisted argon2 PHC string and is kept out of the serialized form too;
/// callers that need to expose it build their own response type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub encrypted_password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: 0,
            email: email.into(),
            password: password.into(),
            encrypted_password: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        // The plaintext is only required while no hash has been derived yet.
        if self.encrypted_password.is_empty() {
            if self.password.is_empty() {
                return Err(ValidationError::MissingPassword);
            }
            if self.password.chars().count() < MIN_PASSWORD_LEN {
                return Err(ValidationError::PasswordTooShort {
                    min: MIN_PASSWORD_LEN,
                });
            }
        }
        Ok(())
    }

    pub fn before_create(&mut self) -> Result<(), StoreError> {
        if !self.password.is_empty() {
            self.encrypted_password = password::hash_password(&self.password)?;
        }
        Ok(())
    }

    /// Drop the plaintext password. Must run before the user leaves the process.
    pub fn sanitize(&mut self) {
        self.password.clear();
    }

    pub fn compare_password(&self, candidate: &str) -> bool {
        password::verify_password(&self.encrypted_password, candidate)
    }
}

/// Body accepted by both `POST /users` and `POST /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<Credentials> for User {
    fn from(c: Credentials) -> Self {
        User::new(c.email, c.password)
    }
}

/// Registration response. Clients of `POST /users` receive the stored hash.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub email: String,
    pub encrypted_password: String,
}

impl From<User> for CreatedUser {
    fn from(u: User) -> Self {
        Self {
            email: u.email,
            encrypted_password: u.encrypted_password,
        }
    }
}
