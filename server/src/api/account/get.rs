use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/account",
    tag = "account",
    responses(
        (status = 200, description = "The signed-in user", body = AccountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_account(AuthUser(user): AuthUser) -> Json<AccountResponse> {
    Json(AccountResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        name: user.display_name,
    })
}
