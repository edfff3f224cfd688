use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{error, info};

use crate::error::{ApiError, StoreError};
use crate::router::AppState;
use crate::types::user::Credentials;

/// POST /sessions -> checks credentials and sets the session cookie.
pub async fn create_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(PrivateCookieJar, StatusCode), ApiError> {
    let Json(credentials) = body.map_err(|_| ApiError::BadRequest)?;

    let user = match state.users.find_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(ApiError::IncorrectEmailOrPassword),
        Err(e) => {
            error!(error = %e, "failed to look up user for login");
            return Err(ApiError::InternalServerError);
        }
    };

    // argon2 verification is as costly as hashing; keep it off the async workers.
    let candidate = credentials.password;
    let (user, matches) = tokio::task::spawn_blocking(move || {
        let matches = user.compare_password(&candidate);
        (user, matches)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "password verification task failed");
        ApiError::InternalServerError
    })?;

    if !matches {
        return Err(ApiError::IncorrectEmailOrPassword);
    }

    info!(user_id = user.id, "session issued");
    Ok((state.sessions.issue(jar, user.id), StatusCode::OK))
}
