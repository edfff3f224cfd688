use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::db::UserRepository;
use crate::handlers;
use crate::middleware::{authenticate_user, log_request, set_request_id};
use crate::service::session::SessionManager;

/// Shared state for all routes. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionManager,
    key: Key,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, sessions: SessionManager, key: Key) -> Self {
        Self {
            users,
            sessions,
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn app_router(state: AppState) -> Router {
    let private = Router::new()
        .route("/whoami", get(handlers::whoami))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_user,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/users", post(handlers::create_user))
        .route("/sessions", post(handlers::create_session))
        .nest("/private", private)
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(set_request_id))
        .with_state(state)
}
