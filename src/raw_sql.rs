//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! All user input in this module is passed via `.bind()` parameters, never
//! interpolated into the SQL string.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::Double;

/// Aggregate used when recomputing a recipe's average rating.
///
/// `COALESCE(AVG(score), 0)` folds the no-ratings case to 0 inside SQL.
/// Diesel's own `avg` yields a nullable result and would push that fold into
/// every caller.
pub fn average_score() -> SqlLiteral<Double> {
    sql::<Double>("COALESCE(AVG(score), 0)")
}

/// Case-insensitive substring match against the raw ingredients column.
///
/// `LOWER()` on a column has no DSL equivalent for SQLite. The pattern is
/// attached with `.bind()`.
#[macro_export]
macro_rules! ingredients_like {
    ($pattern:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(ingredients) LIKE ")
            .bind::<diesel::sql_types::Text, _>($pattern)
    };
}
