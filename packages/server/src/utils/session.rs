use axum::http::{HeaderMap, header::AUTHORIZATION};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::AuthConfig;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Build the HttpOnly cookie set on login.
pub fn session_cookie(token: String, auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(auth.secure_cookie)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::hours(auth.session_ttl_hours))
        .build()
}

/// Add a removal cookie for the session to `jar`.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Session token from the `session` cookie, or from an `Authorization: Bearer` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_owned());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}
