pub mod sessions;
pub mod users;

use axum::http::StatusCode;

pub use sessions::create_session;
pub use users::{create_user, whoami};

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}
