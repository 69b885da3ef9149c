use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::SavedActivity;
use crate::schema::saved_activities;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SavedActivityItem {
    pub id: Uuid,
    pub name: String,
    pub genre: String,
    pub location: String,
    pub weather: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivitiesResponse {
    pub activities: Vec<SavedActivityItem>,
}

#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "activities",
    responses(
        (status = 200, description = "Saved activities, newest first", body = ActivitiesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_activities(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<SavedActivity> = match saved_activities::table
        .filter(saved_activities::user_id.eq(user.id))
        .order(saved_activities::created_at.desc())
        .select(SavedActivity::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to fetch saved activities: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch saved activities".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response = ActivitiesResponse {
        activities: rows
            .into_iter()
            .map(|a| SavedActivityItem {
                id: a.id,
                name: a.name,
                genre: a.genre,
                location: a.location,
                weather: a.weather,
                description: a.description,
                created_at: a.created_at,
            })
            .collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
