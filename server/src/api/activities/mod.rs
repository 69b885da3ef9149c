pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/activities endpoints (mounted at /api/activities)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_activities).post(create::save_activity))
        .route("/{id}", delete(delete::delete_activity))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_activities, create::save_activity, delete::delete_activity),
    components(schemas(
        list::ActivitiesResponse,
        list::SavedActivityItem,
        create::SaveActivityResponse,
    ))
)]
pub struct ApiDoc;
