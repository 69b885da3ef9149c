use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewSavedActivity;
use crate::schema::saved_activities;
use crate::types::ActivityItem;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 255;
const MAX_GENRE_LEN: usize = 100;
const MAX_LOCATION_LEN: usize = 255;
const MAX_WEATHER_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveActivityResponse {
    pub id: Uuid,
}

/// Checks the trimmed fields against the column widths of `saved_activities`.
fn validate_activity(activity: &ActivityItem) -> Result<(), String> {
    if activity.name.trim().is_empty() {
        return Err("Activity name cannot be empty".to_string());
    }

    let limits = [
        ("name", &activity.name, MAX_NAME_LEN),
        ("genre", &activity.genre, MAX_GENRE_LEN),
        ("location", &activity.location, MAX_LOCATION_LEN),
        ("weather", &activity.weather, MAX_WEATHER_LEN),
    ];
    for (field, value, max) in limits {
        if value.trim().chars().count() > max {
            return Err(format!("Activity {} must be at most {} characters", field, max));
        }
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "activities",
    request_body = ActivityItem,
    responses(
        (status = 201, description = "Activity saved", body = SaveActivityResponse),
        (status = 400, description = "Activity name is empty or a field is too long", body = ErrorResponse),
        (status = 409, description = "An activity with this name is already saved", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_activity(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(activity): Json<ActivityItem>,
) -> impl IntoResponse {
    if let Err(error) = validate_activity(&activity) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
    }

    let mut conn = get_conn!(pool);

    let result: Result<Uuid, _> = diesel::insert_into(saved_activities::table)
        .values(NewSavedActivity {
            user_id: user.id,
            name: activity.name.trim(),
            genre: activity.genre.trim(),
            location: activity.location.trim(),
            weather: activity.weather.trim(),
            description: &activity.description,
        })
        .returning(saved_activities::id)
        .get_result(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(SaveActivityResponse { id })).into_response(),
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Activity already saved".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save activity: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save activity".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, genre: &str) -> ActivityItem {
        ActivityItem {
            name: name.to_string(),
            genre: genre.to_string(),
            location: "Downtown".to_string(),
            weather: "Any".to_string(),
            description: "A long description is not limited. ".repeat(50),
        }
    }

    #[test]
    fn test_validate_activity() {
        assert!(validate_activity(&item("Climbing Gym", "Fitness")).is_ok());
        assert_eq!(
            validate_activity(&item("   ", "Fitness")).unwrap_err(),
            "Activity name cannot be empty"
        );
        assert_eq!(
            validate_activity(&item("Climbing Gym", &"g".repeat(101))).unwrap_err(),
            "Activity genre must be at most 100 characters"
        );
    }

    #[test]
    fn test_limits_count_trimmed_chars() {
        let padded = format!("  {}  ", "é".repeat(MAX_GENRE_LEN));
        assert!(validate_activity(&item("Cafe", &padded)).is_ok());

        let mut long_location = item("Cafe", "Food");
        long_location.location = "x".repeat(MAX_LOCATION_LEN + 1);
        assert_eq!(
            validate_activity(&long_location).unwrap_err(),
            "Activity location must be at most 255 characters"
        );
    }
}
