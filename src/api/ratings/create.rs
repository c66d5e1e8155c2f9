use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::models::{new_id, NewRating, Rating, Recipe};
use crate::raw_sql;
use crate::schema::{ratings, recipes};
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewRatingRequest {
    /// Rating id; generated when empty or omitted
    #[serde(default)]
    pub id: String,
    #[validate(range(min = 1, max = 5, message = "score must be between 1 and 5"))]
    pub score: i32,
    #[validate(length(min = 1, message = "user_name is required"))]
    pub user_name: String,
    #[serde(default)]
    pub comment: String,
}

/// Payload returned after adding a rating: the new rating plus the recipe
/// with its refreshed average.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RatingWithRecipe {
    pub rating: Rating,
    pub recipe: Recipe,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/ratings",
    tag = "ratings",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = NewRatingRequest,
    responses(
        (status = 201, description = "Rating added and average recomputed", body = ApiResponse<RatingWithRecipe>),
        (status = 400, description = "Invalid rating data", body = ErrorResponse),
        (status = 404, description = "No recipe with that id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn add_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NewRatingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RatingWithRecipe>>), ApiError> {
    let mut conn = state.pool.get()?;

    // Existence first, body second: an unknown recipe is always a 404.
    let existing: Option<Recipe> = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?;
    if existing.is_none() {
        return Err(ApiError::NotFound("Recipe not found".to_string()));
    }

    let Json(request) = body.map_err(|rejection| invalid_rating(rejection.body_text()))?;
    request.validate().map_err(invalid_rating)?;

    let rating_id = if request.id.is_empty() {
        new_id()
    } else {
        request.id.clone()
    };
    let now = Utc::now().naive_utc();
    let new_rating = NewRating {
        id: &rating_id,
        recipe_id: &id,
        user_name: &request.user_name,
        score: request.score,
        comment: &request.comment,
        created_at: now,
        updated_at: now,
    };

    let rating: Rating = diesel::insert_into(ratings::table)
        .values(&new_rating)
        .returning(Rating::as_returning())
        .get_result(&mut conn)?;

    // Recompute the stored average from scratch rather than adjusting it
    // incrementally.
    let average: f64 = ratings::table
        .filter(ratings::recipe_id.eq(id.as_str()))
        .select(raw_sql::average_score())
        .first(&mut conn)?;

    diesel::update(recipes::table.find(id.as_str()))
        .set((
            recipes::average_rating.eq(average),
            recipes::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let recipe = recipes::table
        .find(id.as_str())
        .select(Recipe::as_select())
        .first(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Rating added successfully! ⭐",
            RatingWithRecipe { rating, recipe },
        )),
    ))
}

fn invalid_rating(err: impl std::fmt::Display) -> ApiError {
    ApiError::Validation(format!(
        "Invalid rating data. Score must be 1-5 and user_name is required: {err}"
    ))
}
