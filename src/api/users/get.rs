use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{Recipe, User, UserWithRecipes};
use crate::schema::{recipes, users};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User with their recipes", body = ApiResponse<UserWithRecipes>),
        (status = 404, description = "No user with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserWithRecipes>>, ApiError> {
    let mut conn = state.pool.get()?;

    let user = users::table
        .find(id.as_str())
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user_recipes = recipes::table
        .filter(recipes::user_id.eq(id.as_str()))
        .select(Recipe::as_select())
        .load(&mut conn)?;

    Ok(Json(ApiResponse::new(
        "User fetched successfully",
        UserWithRecipes {
            user,
            recipes: user_recipes,
        },
    )))
}
