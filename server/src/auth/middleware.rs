use crate::api::ErrorResponse;
use crate::db::DbPool;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::cookie::session_from_cookies;
use super::db::get_user_from_token;
use super::extractor::{AuthUser, SessionToken};

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// The session token from a bearer header, falling back to the session cookie.
/// A malformed Authorization header is an error even when a cookie is present.
fn request_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header")?;
        return auth_str
            .strip_prefix("Bearer ")
            .ok_or("Invalid Authorization header format");
    }

    session_from_cookies(headers).ok_or("Missing Authorization header or session cookie")
}

/// Middleware that requires a valid session for all requests.
/// Apply this to routes that should be protected by default. The resolved
/// user and token are stored in request extensions for the extractors.
pub async fn require_auth(
    State(pool): State<Arc<DbPool>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match request_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(message) => return unauthorized(message),
    };

    let user = match get_user_from_token(&pool, &token).await {
        Some(user) => user,
        None => return unauthorized("Invalid or expired token"),
    };

    request.extensions_mut().insert(AuthUser(user));
    request.extensions_mut().insert(SessionToken(token));

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("moodmingle_session=xyz"));
        assert_eq!(request_token(&headers), Ok("abc"));
    }

    #[test]
    fn test_cookie_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("moodmingle_session=xyz"));
        assert_eq!(request_token(&headers), Ok("xyz"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(request_token(&headers).is_err());
        assert!(request_token(&HeaderMap::new()).is_err());
    }
}
