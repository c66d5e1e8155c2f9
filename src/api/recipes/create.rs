use axum::extract::multipart::MultipartRejection;
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use utoipa::ToSchema;

use crate::api::{ApiResponse, ErrorResponse};
use crate::error::ApiError;
use crate::images;
use crate::models::{new_id, NewRecipe, Recipe};
use crate::schema::recipes;
use crate::uploads::StagedUpload;
use crate::AppState;

/// Multipart form accepted by the create endpoint. Numeric fields arrive as
/// text; values that fail to parse fall back to 0.
#[derive(Debug, ToSchema)]
pub struct CreateRecipeForm {
    pub title: String,
    pub description: Option<String>,
    /// JSON array of ingredient terms, e.g. `["tomato","onion"]`
    pub ingredients: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    /// Defaults to 1 when omitted
    pub servings: Option<i32>,
    pub user_id: Option<String>,
    /// Optional JPEG or PNG photo, resized and re-encoded server-side
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content = CreateRecipeForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Recipe created", body = ApiResponse<Recipe>),
        (status = 400, description = "Missing or malformed form fields", body = ErrorResponse),
        (status = 500, description = "Image processing or database failure", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    staged: Option<Extension<StagedUpload>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Recipe>>), ApiError> {
    let mut title = String::new();
    let mut description = String::new();
    let mut ingredients = String::new();
    let mut user_id = String::new();
    let mut prep_time = 0;
    let mut cook_time = 0;
    let mut servings = 1;

    // Non-multipart bodies leave every field at its default, so they fail the
    // title check below rather than erroring here.
    if let Ok(mut form) = multipart {
        while let Ok(Some(field)) = form.next_field().await {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                "title" => title = field.text().await.unwrap_or_default(),
                "description" => description = field.text().await.unwrap_or_default(),
                "ingredients" => ingredients = field.text().await.unwrap_or_default(),
                "user_id" => user_id = field.text().await.unwrap_or_default(),
                "prep_time" => {
                    prep_time = field.text().await.unwrap_or_default().parse().unwrap_or(0)
                }
                "cook_time" => {
                    cook_time = field.text().await.unwrap_or_default().parse().unwrap_or(0)
                }
                "servings" => {
                    servings = field.text().await.unwrap_or_default().parse().unwrap_or(0)
                }
                _ => {}
            }
        }
    }

    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if ingredients.is_empty() {
        return Err(ApiError::Validation(
            "Ingredients are required (JSON array string)".to_string(),
        ));
    }
    if serde_json::from_str::<Vec<String>>(&ingredients).is_err() {
        return Err(ApiError::Validation(
            "Ingredients must be a valid JSON array. Example: [\"tomato\",\"onion\"]".to_string(),
        ));
    }

    let image_url = match staged {
        Some(Extension(upload)) => {
            let filename = images::process_image(&state.config, &upload.path)?;
            Some(format!("/uploads/{filename}"))
        }
        None => None,
    };

    let id = new_id();
    let now = Utc::now().naive_utc();
    let new_recipe = NewRecipe {
        id: &id,
        title: &title,
        description: &description,
        image_url: image_url.as_deref(),
        ingredients: &ingredients,
        prep_time,
        cook_time,
        servings,
        average_rating: 0.0,
        user_id: &user_id,
        created_at: now,
        updated_at: now,
    };

    let mut conn = state.pool.get()?;
    let recipe: Recipe = diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(Recipe::as_returning())
        .get_result(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Recipe created successfully! 🎉", recipe)),
    ))
}
