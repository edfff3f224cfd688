use crate::db::UserRepository;
use crate::db::schema::SQLITE_INIT;
use crate::error::StoreError;
use crate::types::user::User;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool on `database_url`, creating the file if needed, and ping it once.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(connect_opts)
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<User, StoreError> {
        let id: i64 = row.try_get("id")?;
        let email: String = row.try_get("email")?;
        let encrypted_password: String = row.try_get("encrypted_password")?;

        Ok(User {
            id,
            email,
            password: String::new(),
            encrypted_password,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        user.validate()?;

        // argon2 is CPU-bound; keep it off the async workers.
        let mut pending = user.clone();
        let pending = tokio::task::spawn_blocking(move || {
            pending.before_create()?;
            Ok::<_, StoreError>(pending)
        })
        .await
        .map_err(|e| StoreError::Hash(format!("hashing task failed: {e}")))??;

        let result = sqlx::query("INSERT INTO users (email, encrypted_password) VALUES (?, ?)")
            .bind(&pending.email)
            .bind(&pending.encrypted_password)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_insert)?;

        user.id = result.last_insert_rowid();
        user.encrypted_password = pending.encrypted_password;
        debug!(user_id = user.id, "user row inserted");
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<User, StoreError> {
        let row = sqlx::query("SELECT id, email, encrypted_password FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_lookup)?;
        Self::row_to_model(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query("SELECT id, email, encrypted_password FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_lookup)?;
        Self::row_to_model(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::user::ValidationError;

    async fn repo() -> SqliteUserRepository {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        let repo = SqliteUserRepository::new(pool);
        repo.init_schema().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn create_assigns_id_and_hash() {
        let repo = repo().await;
        let mut u = User::new("user@example.test", "password");
        repo.create(&mut u).await.unwrap();

        assert!(u.id > 0);
        assert!(u.encrypted_password.starts_with("$argon2id$"));

        let stored = repo.find(u.id).await.unwrap();
        assert_eq!(stored.email, "user@example.test");
        assert_eq!(stored.encrypted_password, u.encrypted_password);
        assert!(stored.password.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_invalid_user_without_inserting() {
        let repo = repo().await;
        let mut u = User::new("user@example.test", "short");
        let err = repo.create(&mut u).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::PasswordTooShort { .. })
        ));
        assert!(matches!(
            repo.find_by_email("user@example.test").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = repo().await;
        repo.create(&mut User::new("user@example.test", "password"))
            .await
            .unwrap();
        let err = repo
            .create(&mut User::new("user@example.test", "password2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn lookups_report_not_found() {
        let repo = repo().await;
        assert!(matches!(repo.find(1).await, Err(StoreError::NotFound)));
        assert!(matches!(
            repo.find_by_email("nobody@example.test").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn find_by_email_returns_comparable_user() {
        let repo = repo().await;
        let mut u = User::new("user@example.test", "password");
        repo.create(&mut u).await.unwrap();

        let found = repo.find_by_email("user@example.test").await.unwrap();
        assert_eq!(found.id, u.id);
        assert!(found.compare_password("password"));
        assert!(!found.compare_password("wrong-password"));
    }
}
