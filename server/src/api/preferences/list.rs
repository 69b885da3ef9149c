use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Preference;
use crate::schema::preferences;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PreferenceItem {
    pub id: Uuid,
    pub keyword: String,
    pub created_at: DateTime<Utc>,
}

impl From<Preference> for PreferenceItem {
    fn from(p: Preference) -> Self {
        Self {
            id: p.id,
            keyword: p.keyword,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PreferencesResponse {
    pub preferences: Vec<PreferenceItem>,
}

#[utoipa::path(
    get,
    path = "/api/preferences",
    tag = "preferences",
    responses(
        (status = 200, description = "The user's interest keywords, oldest first", body = PreferencesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_preferences(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<Preference> = match preferences::table
        .filter(preferences::user_id.eq(user.id))
        .order((preferences::created_at.asc(), preferences::keyword.asc()))
        .select(Preference::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch preferences: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch preferences".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = PreferencesResponse {
        preferences: rows.into_iter().map(PreferenceItem::from).collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
