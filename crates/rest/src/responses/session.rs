//! Session token responses.
//!
//! Successful register, login and password changes answer with the token in
//! the body and in an HttpOnly `token` cookie.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::extractors::TOKEN_COOKIE;

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite=Lax",
        TOKEN_COOKIE, token, max_age_secs
    )
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=none; Path=/; HttpOnly; Max-Age=0", TOKEN_COOKIE)
}

/// `{"success": true, "token": ...}` plus the cookie.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    status: StatusCode,
    token: String,
    cookie: String,
}

impl TokenResponse {
    /// A freshly issued token valid for `max_age_secs`.
    pub fn issued(status: StatusCode, token: String, max_age_secs: i64) -> Self {
        let cookie = session_cookie(&token, max_age_secs);
        Self {
            status,
            token,
            cookie,
        }
    }

    /// The logout response.
    pub fn cleared() -> Self {
        Self {
            status: StatusCode::OK,
            token: "none".to_string(),
            cookie: clear_session_cookie(),
        }
    }
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        let body = Json(json!({"success": true, "token": self.token}));
        let mut response = (self.status, body).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}
