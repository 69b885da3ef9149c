use crate::api::ErrorResponse;
use crate::auth::{clear_session_cookie, AuthUser};
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{preferences, saved_activities, sessions, users};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/account",
    tag = "account",
    responses(
        (status = 204, description = "Account deleted and signed out everywhere"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // The user row is kept (soft delete); everything hanging off it goes.
    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let now = Utc::now();
        diesel::update(users::table.filter(users::id.eq(user.id)))
            .set((users::deleted_at.eq(Some(now)), users::updated_at.eq(now)))
            .execute(conn)?;
        diesel::delete(sessions::table.filter(sessions::user_id.eq(user.id))).execute(conn)?;
        diesel::delete(preferences::table.filter(preferences::user_id.eq(user.id)))
            .execute(conn)?;
        diesel::delete(saved_activities::table.filter(saved_activities::user_id.eq(user.id)))
            .execute(conn)?;
        Ok(())
    });

    match result {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "Account deleted");
            (
                StatusCode::NO_CONTENT,
                [(header::SET_COOKIE, clear_session_cookie())],
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete account: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete account".to_string(),
                }),
            )
                .into_response()
        }
    }
}
