#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use std::sync::Arc;
use time::Duration;
use tower::ServiceExt;
use winding_tree_server::db::{self, SqliteUserRepository, UserRepository};
use winding_tree_server::error::StoreError;
use winding_tree_server::router::{AppState, app_router};
use winding_tree_server::service::session::SessionManager;
use winding_tree_server::types::user::User;

pub struct TestApp {
    pub router: Router,
    pub key: Key,
}

pub fn sessions() -> SessionManager {
    SessionManager::new(Duration::days(30), false)
}

/// Full router over a private in-memory SQLite database.
pub async fn spawn_app() -> TestApp {
    // One connection: every `sqlite::memory:` connection is its own database.
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("failed to open in-memory sqlite");
    let repo = SqliteUserRepository::new(pool);
    repo.init_schema().await.expect("failed to init schema");
    spawn_app_with(Arc::new(repo))
}

pub fn spawn_app_with(users: Arc<dyn UserRepository>) -> TestApp {
    let key = Key::generate();
    let state = AppState::new(users, sessions(), key.clone());
    TestApp {
        router: app_router(state),
        key,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body was not json")
    }

    /// `name=value` pair from the Set-Cookie header, ready to send back.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).expect("response body was not utf-8"),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.send(post_json(
            "/users",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(post_json(
            "/sessions",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
    }

    pub async fn whoami(&self, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri("/private/whoami");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    /// Mint a valid session cookie for `user_id` without going through login.
    pub fn forge_session(&self, user_id: i64) -> String {
        let jar = sessions().issue(PrivateCookieJar::new(self.key.clone()), user_id);
        let resp = jar.into_response();
        resp.headers()[header::SET_COOKIE]
            .to_str()
            .expect("set-cookie was not ascii")
            .split(';')
            .next()
            .expect("empty set-cookie")
            .to_owned()
    }
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// Repository whose backend is always down.
pub struct FailingRepository;

#[async_trait]
impl UserRepository for FailingRepository {
    async fn create(&self, user: &mut User) -> Result<(), StoreError> {
        user.validate()?;
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find(&self, _id: i64) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
