//! Browser session identification
//!
//! Layouts are keyed by an opaque id kept in a cookie; the cookie is
//! issued on the first response that needs it.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "dashboard_session";

pub struct Session {
    pub id: String,
    is_new: bool,
}

impl Session {
    pub fn from_request(req: &HttpRequest) -> Self {
        match req.cookie(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().trim().is_empty() => Self {
                id: cookie.value().to_string(),
                is_new: false,
            },
            _ => Self {
                id: Uuid::new_v4().to_string(),
                is_new: true,
            },
        }
    }

    /// Set the session cookie if this request had none
    pub fn attach(&self, builder: &mut HttpResponseBuilder) {
        if self.is_new {
            builder.cookie(
                Cookie::build(SESSION_COOKIE, self.id.clone())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish(),
            );
        }
    }
}
