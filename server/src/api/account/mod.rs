pub mod delete;
pub mod get;
pub mod logout;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for the current account and its session
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/account",
            get(get::get_account).delete(delete::delete_account),
        )
        .route("/api/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_account, delete::delete_account, logout::logout),
    components(schemas(get::AccountResponse))
)]
pub struct ApiDoc;
