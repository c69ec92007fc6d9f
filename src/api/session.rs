//! Session cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Cookie carrying the identity-service session secret
pub const SESSION_COOKIE: &str = "appwrite-session";

/// Cookie that stores `secret`
pub fn session_cookie(secret: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, secret))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Cookie matching the session cookie's name and path, for removal
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Session secret from the request cookies, if any
pub fn session_secret(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
