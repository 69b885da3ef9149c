pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/preferences endpoints (mounted at /api/preferences)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_preferences).post(create::create_preferences),
        )
        .route("/{id}", delete(delete::delete_preference))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_preferences,
        create::create_preferences,
        delete::delete_preference,
    ),
    components(schemas(
        list::PreferencesResponse,
        list::PreferenceItem,
        create::CreatePreferencesRequest,
    ))
)]
pub struct ApiDoc;
