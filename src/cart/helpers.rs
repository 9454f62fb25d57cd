//! Session resolution helpers.
//!
//! Every cart belongs to a browser session identified by the `cart_session`
//! cookie. A request without the cookie gets a fresh uuid and the response
//! carries a `Set-Cookie` header so follow-up requests land on the same cart.

use axum::http::{header, HeaderMap};
use axum::response::Response;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "cart_session";

/// Extracts the session id from the request cookies, or mints a new one.
///
/// Returns `(session_id, is_new_session)`; callers must attach the cookie to
/// the response when `is_new_session` is true.
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE) {
                if let Some(value) = parts.next().filter(|v| !v.is_empty()) {
                    return (value.to_string(), false);
                }
            }
        }
    }
    (Uuid::new_v4().simple().to_string(), true)
}

/// Attaches the session cookie to a response when the session is new.
pub fn attach_session_cookie(response: &mut Response, session_id: &str, is_new_session: bool) {
    if !is_new_session {
        return;
    }
    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly");
    if let Ok(value) = cookie.parse() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}
