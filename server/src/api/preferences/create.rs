use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewPreference, Preference};
use crate::schema::preferences;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;

use super::list::{PreferenceItem, PreferencesResponse};

const MAX_KEYWORD_LEN: usize = 100;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePreferencesRequest {
    pub keywords: Vec<String>,
}

/// Trimmed, non-blank keywords with case-insensitive duplicates removed,
/// keeping the first spelling seen.
fn distinct_keywords(raw: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/preferences",
    tag = "preferences",
    request_body(content = CreatePreferencesRequest, example = json!({"keywords": ["Hiking", "Board games"]})),
    responses(
        (status = 201, description = "Newly stored keywords; ones already saved are skipped", body = PreferencesResponse),
        (status = 400, description = "No keywords, or a keyword is too long", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_preferences(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreatePreferencesRequest>,
) -> impl IntoResponse {
    let keywords = distinct_keywords(&request.keywords);

    if keywords.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "At least one keyword is required".to_string(),
            }),
        )
            .into_response();
    }
    if keywords.iter().any(|k| k.chars().count() > MAX_KEYWORD_LEN) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Keywords must be at most {} characters", MAX_KEYWORD_LEN),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let rows: Vec<NewPreference> = keywords
        .iter()
        .map(|&keyword| NewPreference {
            user_id: user.id,
            keyword,
        })
        .collect();

    let result: Result<Vec<Preference>, _> = diesel::insert_into(preferences::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .returning(Preference::as_returning())
        .get_results(&mut conn);

    match result {
        Ok(inserted) => (
            StatusCode::CREATED,
            Json(PreferencesResponse {
                preferences: inserted.into_iter().map(PreferenceItem::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to save preferences: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save preferences".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keywords_trims_and_dedupes() {
        let raw = vec![
            " Hiking ".to_string(),
            "hiking".to_string(),
            "".to_string(),
            "Chess".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(distinct_keywords(&raw), vec!["Hiking", "Chess"]);
    }
}
