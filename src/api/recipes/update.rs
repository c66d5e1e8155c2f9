use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{Recipe, RecipePatch};
use crate::schema::recipes;
use crate::AppState;

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipePatch,
    responses(
        (status = 200, description = "Updated recipe", body = ApiResponse<Recipe>),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 404, description = "No recipe with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RecipePatch>, JsonRejection>,
) -> Result<Json<ApiResponse<Recipe>>, ApiError> {
    let mut conn = state.pool.get()?;

    // Existence is checked before the body, so an unknown id is a 404 even
    // when the body is garbage.
    let existing: Option<Recipe> = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?;
    if existing.is_none() {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }

    let Json(patch) = body.map_err(|rejection| {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    diesel::update(recipes::table.find(id.as_str()))
        .set((&patch, recipes::updated_at.eq(Utc::now().naive_utc())))
        .execute(&mut conn)?;

    let recipe = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)?;

    Ok(Json(ApiResponse::new("Recipe updated successfully", recipe)))
}
