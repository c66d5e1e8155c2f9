use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{Rating, Recipe};
use crate::schema::{ratings, recipes};
use crate::AppState;

/// All ratings for one recipe, newest first, with the stored average.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeRatings {
    pub recipe_id: String,
    pub average_rating: f64,
    pub count: usize,
    pub ratings: Vec<Rating>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/ratings",
    tag = "ratings",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Ratings for the recipe", body = ApiResponse<RecipeRatings>),
        (status = 404, description = "No recipe with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RecipeRatings>>, ApiError> {
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
        .order(ratings::created_at.desc())
        .load(&mut conn)?;

    Ok(Json(ApiResponse::new(
        "Ratings fetched successfully",
        RecipeRatings {
            recipe_id: recipe.id,
            average_rating: recipe.average_rating,
            count: recipe_ratings.len(),
            ratings: recipe_ratings,
        },
    )))
}
