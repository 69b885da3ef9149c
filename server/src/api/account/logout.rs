use crate::api::ErrorResponse;
use crate::auth::{clear_session_cookie, delete_session, SessionToken};
use crate::db::DbPool;
use crate::get_conn;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    SessionToken(token): SessionToken,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match delete_session(&mut conn, &token) {
        Ok(_) => (
            StatusCode::NO_CONTENT,
            [(header::SET_COOKIE, clear_session_cookie())],
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to log out".to_string(),
                }),
            )
                .into_response()
        }
    }
}
