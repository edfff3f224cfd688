use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "session";

/// Issues and resolves the stateless session cookie.
///
/// The cookie is encrypted and authenticated with the jar's key, so its value
/// is opaque to the client and any modification makes it unreadable. The only
/// payload is the user id.
#[derive(Debug, Clone)]
pub struct SessionManager {
    max_age: Duration,
    secure: bool,
}

impl SessionManager {
    pub fn new(max_age: Duration, secure: bool) -> Self {
        Self { max_age, secure }
    }

    pub fn issue(&self, jar: PrivateCookieJar, user_id: i64) -> PrivateCookieJar {
        jar.add(self.build_cookie(user_id.to_string()))
    }

    pub fn resolve(&self, jar: &PrivateCookieJar) -> Result<i64, ApiError> {
        jar.get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
            .ok_or(ApiError::NotAuthenticated)
    }

    fn build_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build(Cookie::new(SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.max_age)
            .build()
    }
}
