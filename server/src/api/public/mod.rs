pub mod auth;
pub mod health;
pub mod recommendations;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/login", post(auth::login::login))
        .route(
            "/api/recommendations",
            post(recommendations::get_recommendations),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login::login,
        auth::signup::signup,
        health::health,
        recommendations::get_recommendations,
    ),
    components(schemas(
        auth::login::LoginRequest,
        auth::login::LoginResponse,
        auth::signup::SignupRequest,
        auth::signup::SignupResponse,
        health::HealthResponse,
        recommendations::RecommendationsResponse,
        crate::types::RecommendationsRequest,
        crate::types::RecommendationsBody,
    ))
)]
pub struct ApiDoc;
