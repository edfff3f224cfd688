pub mod auth;
pub mod logging;
pub mod request_id;

pub use auth::{CurrentUser, authenticate_user};
pub use logging::log_request;
pub use request_id::{RequestId, X_REQUEST_ID, set_request_id};
