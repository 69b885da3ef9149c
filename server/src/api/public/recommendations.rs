use crate::api::ErrorResponse;
use crate::types::{RecommendationsBody, RecommendationsRequest};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use moodmingle_core::{RecommendationRequest, RecommendationService};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub recommendations: RecommendationsBody,
}

/// Model failures are not errors here: the response falls back to a fixed
/// catalog and is still a 200.
#[utoipa::path(
    post,
    path = "/api/recommendations",
    tag = "recommendations",
    request_body(
        content = RecommendationsRequest,
        example = json!({"interests": ["Hiking", "Gaming"], "location": "Calgary", "weather": "Sunny", "temperature": 22})
    ),
    responses(
        (status = 200, description = "Recommendations, possibly from the fallback catalog", body = RecommendationsResponse),
        (status = 400, description = "No interests given", body = ErrorResponse)
    )
)]
pub async fn get_recommendations(
    State(recommender): State<Arc<RecommendationService>>,
    Json(req): Json<RecommendationsRequest>,
) -> impl IntoResponse {
    let request: RecommendationRequest = req.into();

    match recommender.generate(&request).await {
        Ok(outcome) => {
            tracing::info!(
                strategy = ?outcome.strategy,
                substituted = outcome.substituted.len(),
                fallback = outcome.used_fallback(),
                "Served recommendations"
            );
            (
                StatusCode::OK,
                Json(RecommendationsResponse {
                    recommendations: outcome.recommendations.into(),
                }),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
