use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{debug, error};

use crate::error::{ApiError, StoreError};
use crate::router::AppState;
use crate::types::user::User;

/// The authenticated user for the current request.
///
/// Inserted into request extensions by [`authenticate_user`]; handlers behind
/// that layer take it as an extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::NotAuthenticated)
    }
}

/// Resolve the session cookie and load its user, or reject with 401.
pub async fn authenticate_user(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.sessions.resolve(&jar)?;

    let mut user = match state.users.find(user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            debug!(user_id, "session refers to a missing user");
            return Err(ApiError::NotAuthenticated);
        }
        Err(e) => {
            error!(user_id, error = %e, "failed to load session user");
            return Err(ApiError::NotAuthenticated);
        }
    };
    user.sanitize();

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
