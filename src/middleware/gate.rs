//! Session-scoped authorization gate.
//!
//! A correct PIN submission adds a private (signed + encrypted) cookie; every
//! mutating handler demands a [`Gate`] value extracted from that cookie, so
//! authorization is a per-request capability rather than ambient state.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::error::AppError;

pub const GATE_COOKIE: &str = "gate";
const GATE_VALUE: &str = "open";
const GATE_TTL: Duration = Duration::hours(12);

/// Proof that this session passed PIN verification.
#[derive(Debug, Clone, Copy)]
pub struct Gate;

impl<S> FromRequestParts<S> for Gate
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        if is_open(&jar) {
            Ok(Self)
        } else {
            Err(AppError::Unauthorized.into_response())
        }
    }
}

pub fn is_open(jar: &PrivateCookieJar) -> bool {
    jar.get(GATE_COOKIE).is_some_and(|c| c.value() == GATE_VALUE)
}

/// Open the gate for this session.
pub fn open(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(session_cookie(GATE_COOKIE, GATE_VALUE.to_string(), GATE_TTL))
}

/// Close the gate unconditionally (idempotent).
pub fn close(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(expired_cookie(GATE_COOKIE))
}

pub fn session_cookie(name: &str, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

pub fn expired_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
