//! SQL DDL for the user store.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `email` UNIQUE; the constraint is what resolves concurrent sign-ups
/// - `encrypted_password` argon2 PHC string
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    encrypted_password TEXT NOT NULL
);
"#;
