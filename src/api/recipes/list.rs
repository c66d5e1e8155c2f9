use axum::extract::{Query, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::{ErrorResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// 1-based page number, defaults to 1
    page: Option<String>,
    /// Page size between 1 and 100, defaults to 10
    per_page: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "One page of recipes, newest first", body = PaginatedResponse<Recipe>),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<PaginatedResponse<Recipe>>, ApiError> {
    let (page, per_page) = page_params(params.page.as_deref(), params.per_page.as_deref());

    let mut conn = state.pool.get()?;

    let total_count: i64 = recipes::table.count().get_result(&mut conn)?;
    let items = recipes::table
        .select(Recipe::as_select())
        .order(recipes::created_at.desc())
        .limit(per_page)
        .offset((page - 1) * per_page)
        .load(&mut conn)?;

    Ok(Json(PaginatedResponse::new(
        "Recipes fetched successfully",
        items,
        page,
        per_page,
        total_count,
    )))
}

/// Out-of-range and unparsable values fall back to their defaults instead of
/// rejecting the request.
fn page_params(page: Option<&str>, per_page: Option<&str>) -> (i64, i64) {
    let mut page: i64 = page.and_then(|raw| raw.parse().ok()).unwrap_or(1);
    let mut per_page: i64 = per_page.and_then(|raw| raw.parse().ok()).unwrap_or(10);

    if page < 1 {
        page = 1;
    }
    if per_page < 1 || per_page > 100 {
        per_page = 10;
    }

    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(page_params(None, None), (1, 10));
    }

    #[test]
    fn accepts_values_in_range() {
        assert_eq!(page_params(Some("3"), Some("25")), (3, 25));
        assert_eq!(page_params(Some("1"), Some("100")), (1, 100));
    }

    #[test]
    fn clamps_page_below_one() {
        assert_eq!(page_params(Some("0"), None), (1, 10));
        assert_eq!(page_params(Some("-2"), None), (1, 10));
    }

    #[test]
    fn resets_per_page_out_of_range() {
        assert_eq!(page_params(None, Some("0")), (1, 10));
        assert_eq!(page_params(None, Some("101")), (1, 10));
    }

    #[test]
    fn unparsable_values_fall_back() {
        assert_eq!(page_params(Some("abc"), Some("lots")), (1, 10));
    }
}
