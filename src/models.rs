use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Primary keys are UUIDv4 strings, generated in the handlers rather than by
/// the database.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Queryable, Selectable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Raw ingredients string as submitted, by convention a JSON array of
    /// terms like `["tomato","onion"]`
    pub ingredients: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    /// Derived from the recipe's ratings, never written by clients
    pub average_rating: f64,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub ingredients: &'a str,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub average_rating: f64,
    pub user_id: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client-writable subset of a recipe for partial updates. The id, creation
/// time and derived average rating have no counterpart here, so incoming
/// JSON cannot touch them.
#[derive(AsChangeset, Debug, Default, Clone, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub user_id: Option<String>,
}

#[derive(Queryable, Selectable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::ratings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Rating {
    pub id: String,
    pub recipe_id: String,
    pub user_name: String,
    pub score: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ratings)]
pub struct NewRating<'a> {
    pub id: &'a str,
    pub recipe_id: &'a str,
    pub user_name: &'a str,
    pub score: i32,
    pub comment: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Recipe with its ratings eagerly attached, as returned by the detail
/// endpoint. The ratings key is omitted when there are none.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeWithRatings {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,
}

/// User with their recipes eagerly attached. The recipes key is omitted when
/// there are none.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserWithRecipes {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipes: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_uuid_shaped() {
        let id = new_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }

    #[test]
    fn patch_ignores_unknown_and_immutable_fields() {
        let patch: RecipePatch = serde_json::from_str(
            r#"{"title":"Stew","id":"evil","average_rating":9.5,"created_at":"2020-01-01","bogus":true}"#,
        )
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("Stew"));
        assert!(patch.description.is_none());
        assert!(patch.user_id.is_none());
    }

    #[test]
    fn patch_accepts_partial_bodies() {
        let patch: RecipePatch = serde_json::from_str(r#"{"servings":6}"#).unwrap();
        assert_eq!(patch.servings, Some(6));
        assert!(patch.title.is_none());
    }

    #[test]
    fn ratings_key_omitted_when_empty() {
        let recipe = Recipe {
            id: "r1".to_string(),
            title: "Toast".to_string(),
            description: String::new(),
            image_url: None,
            ingredients: r#"["bread"]"#.to_string(),
            prep_time: 1,
            cook_time: 2,
            servings: 1,
            average_rating: 0.0,
            user_id: String::new(),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let wrapped = RecipeWithRatings {
            recipe,
            ratings: vec![],
        };
        let json = serde_json::to_value(&wrapped).unwrap();
        assert!(json.get("ratings").is_none());
        assert_eq!(json["title"], "Toast");
    }
}
