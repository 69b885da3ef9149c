use crate::api::ErrorResponse;
use crate::models::User;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// The authenticated user, as resolved by [`super::require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The raw token the current request authenticated with.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

fn missing_auth() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(missing_auth)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .ok_or_else(missing_auth)
    }
}
