use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;

use crate::api::{ErrorResponse, StatusResponse};
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::{ratings, recipes};
use crate::AppState;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe and its ratings deleted", body = StatusResponse),
        (status = 404, description = "No recipe with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let existing: Option<Recipe> = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?;
    if existing.is_none() {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }

    // The schema has no FK cascade, so ratings are cleaned up by hand.
    diesel::delete(ratings::table.filter(ratings::recipe_id.eq(id.as_str())))
        .execute(&mut conn)?;
    diesel::delete(recipes::table.find(id.as_str())).execute(&mut conn)?;

    Ok(Json(StatusResponse::ok("Recipe deleted successfully")))
}
