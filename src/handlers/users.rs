use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{error, info};

use crate::error::{ApiError, StoreError};
use crate::middleware::CurrentUser;
use crate::router::AppState;
use crate::types::user::{CreatedUser, Credentials, User};

/// POST /users -> registers a user and echoes its email and password hash.
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<CreatedUser>, ApiError> {
    let Json(credentials) = body.map_err(|_| ApiError::BadRequest)?;
    let mut user = User::from(credentials);

    match state.users.create(&mut user).await {
        Ok(()) => {}
        Err(StoreError::Validation(_) | StoreError::Conflict) => {
            return Err(ApiError::BadRequest);
        }
        Err(e) => {
            error!(error = %e, "failed to create user");
            return Err(ApiError::InternalServerError);
        }
    }

    user.sanitize();
    info!(user_id = user.id, "user registered");
    Ok(Json(CreatedUser::from(user)))
}

/// GET /private/whoami -> the user bound to the session cookie.
pub async fn whoami(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
