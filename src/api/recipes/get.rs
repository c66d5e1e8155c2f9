use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{Rating, Recipe, RecipeWithRatings};
use crate::schema::{ratings, recipes};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe with its ratings", body = ApiResponse<RecipeWithRatings>),
        (status = 404, description = "No recipe with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RecipeWithRatings>>, ApiError> {
    let mut conn = state.pool.get()?;

    let recipe = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let recipe_ratings = ratings::table
        .filter(ratings::recipe_id.eq(id.as_str()))
        .select(Rating::as_select())
        .load(&mut conn)?;

    Ok(Json(ApiResponse::new(
        "Recipe fetched successfully",
        RecipeWithRatings {
            recipe,
            ratings: recipe_ratings,
        },
    )))
}
