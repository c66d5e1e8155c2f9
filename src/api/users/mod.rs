pub mod get;
pub mod register;

use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

use crate::api::ApiResponse;
use crate::models::{User, UserWithRecipes};
use crate::AppState;

/// Returns the router for /api/users endpoints (mounted at /api/users).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register::register_user))
        .route("/{id}", get(get::get_user))
}

#[derive(OpenApi)]
#[openapi(
    paths(register::register_user, get::get_user),
    components(schemas(
        register::NewUserRequest,
        ApiResponse<User>,
        ApiResponse<UserWithRecipes>,
    ))
)]
pub struct ApiDoc;
