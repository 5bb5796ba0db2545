//! Catalog title model and related types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Copies stocked for every newly added title
pub const DEFAULT_COPIES: i32 = 5;

/// Largest shelf count an admin may set (owned copies add open rentals on top)
pub const MAX_COPIES: i32 = 1_000_000;

/// Title model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Title {
    pub id: i64,
    /// Display name
    pub name: String,
    pub genre: String,
    /// Copies on the shelf, ready to rent
    pub available_copies: i32,
    /// Copies owned: on the shelf plus currently rented out
    pub max_copies: i32,
}

/// Short title representation embedded in rental views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TitleShort {
    pub id: i64,
    pub name: String,
    pub genre: String,
}

/// Create title request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateTitle {
    #[serde(default)]
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 60, message = "Genre must be at most 60 characters"))]
    pub genre: String,
}

/// Update title request
///
/// `available_copies` accepts a JSON integer or an integer string
/// (form-encoded clients send `"3"`); see [`parse_copy_count`].
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTitle {
    #[serde(default)]
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 60, message = "Genre must be at most 60 characters"))]
    pub genre: String,
    #[schema(value_type = Option<i32>)]
    pub available_copies: Option<Value>,
}

/// Validated changes handed to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleChanges {
    pub name: String,
    pub genre: String,
    pub available_copies: Option<i32>,
}

/// Per-title inventory balance, used by the admin audit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryLine {
    pub title_id: i64,
    pub name: String,
    pub available_copies: i32,
    pub open_rentals: i64,
    pub max_copies: i32,
}

impl InventoryLine {
    /// Open rentals plus shelf copies must account for every owned copy
    pub fn is_balanced(&self) -> bool {
        self.available_copies >= 0
            && i64::from(self.available_copies) + self.open_rentals == i64::from(self.max_copies)
    }
}

/// Trim a required text field, rejecting blanks
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Parse an admin-supplied copy count: whole numbers in `0..=MAX_COPIES`
pub fn parse_copy_count(value: &Value) -> AppResult<i32> {
    let invalid = || {
        AppError::Validation(format!(
            "Available copies must be a whole number between 0 and {}",
            MAX_COPIES
        ))
    };

    let count = match value {
        Value::Number(n) => n.as_i64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !(0..=i64::from(MAX_COPIES)).contains(&count) {
        return Err(invalid());
    }
    i32::try_from(count).map_err(|_| invalid())
}

impl CreateTitle {
    /// Validate and normalize into (name, genre)
    pub fn into_parts(self) -> AppResult<(String, String)> {
        self.validate()?;
        Ok((require_text("Name", &self.name)?, require_text("Genre", &self.genre)?))
    }
}

impl UpdateTitle {
    pub fn into_changes(self) -> AppResult<TitleChanges> {
        self.validate()?;
        Ok(TitleChanges {
            name: require_text("Name", &self.name)?,
            genre: require_text("Genre", &self.genre)?,
            available_copies: self.available_copies.as_ref().map(parse_copy_count).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_copy_count() {
        assert_eq!(parse_copy_count(&json!(3)).unwrap(), 3);
        assert_eq!(parse_copy_count(&json!(0)).unwrap(), 0);
        assert_eq!(parse_copy_count(&json!(" 7 ")).unwrap(), 7);
        assert!(matches!(parse_copy_count(&json!(-1)), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!(2.5)), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!("two")), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!(null)), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!(u64::MAX)), Err(AppError::Validation(_))));
        assert_eq!(parse_copy_count(&json!(MAX_COPIES)).unwrap(), MAX_COPIES);
        assert!(matches!(parse_copy_count(&json!(MAX_COPIES + 1)), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!(i32::MAX)), Err(AppError::Validation(_))));
        assert!(matches!(parse_copy_count(&json!("2147483647")), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_title_requires_name_and_genre() {
        let ok = CreateTitle { name: "  Inception ".into(), genre: "Sci-Fi".into() };
        assert_eq!(ok.into_parts().unwrap(), ("Inception".to_string(), "Sci-Fi".to_string()));

        let blank = CreateTitle { name: "   ".into(), genre: "Drama".into() };
        assert!(matches!(blank.into_parts(), Err(AppError::Validation(_))));

        let missing: CreateTitle = serde_json::from_value(json!({ "name": "Heat" })).unwrap();
        assert!(matches!(missing.into_parts(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_title_changes() {
        let update: UpdateTitle = serde_json::from_value(json!({
            "name": "Heat",
            "genre": "Crime",
            "available_copies": "4"
        }))
        .unwrap();
        let changes = update.into_changes().unwrap();
        assert_eq!(changes.available_copies, Some(4));

        let update: UpdateTitle =
            serde_json::from_value(json!({ "name": "Heat", "genre": "Crime" })).unwrap();
        assert_eq!(update.into_changes().unwrap().available_copies, None);
    }

    #[test]
    fn test_inventory_balance() {
        let line = InventoryLine {
            title_id: 1,
            name: "Inception".into(),
            available_copies: 3,
            open_rentals: 2,
            max_copies: 5,
        };
        assert!(line.is_balanced());
        assert!(!InventoryLine { open_rentals: 1, ..line }.is_balanced());
    }
}
