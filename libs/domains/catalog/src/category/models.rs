use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::sorting::SortKey;
use crate::validation::validate_not_blank;

/// Category as held by the store. `id` is `None` until first saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

/// Wire form of a category. Its lean and extended forms are the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryDto {
    /// Assigned by the store; ignored on create and update
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 60, message = "Name must have between 1 and 60 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

impl Category {
    /// Copies the DTO's fields onto this entity; the id is kept.
    pub fn copy_from(&mut self, dto: CategoryDto) {
        self.name = dto.name;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategorySort {
    Id,
    Name,
}

impl SortKey for CategorySort {
    const DEFAULT: Self = CategorySort::Id;

    fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(CategorySort::Id),
            "name" => Some(CategorySort::Name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_snapshot_from_entity() {
        let category = Category::new(1, "Books");
        let dto = CategoryDto::from(&category);
        assert_eq!(dto.id, Some(1));
        assert_eq!(dto.name, "Books");
    }

    #[test]
    fn test_copy_from_keeps_id() {
        let mut category = Category::new(3, "Computers");
        category.copy_from(CategoryDto {
            id: Some(99),
            name: "Laptops".into(),
        });
        assert_eq!(category, Category::new(3, "Laptops"));
    }

    #[test]
    fn test_validation_rejects_blank_and_long_names() {
        let blank = CategoryDto {
            id: None,
            name: "  ".into(),
        };
        assert!(blank.validate().is_err());

        let long = CategoryDto {
            id: None,
            name: "x".repeat(61),
        };
        assert!(long.validate().is_err());

        let ok = CategoryDto {
            id: None,
            name: "Books".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_dto_json_shape() {
        let json =
            serde_json::to_value(CategoryDto::from(Category::new(2, "Electronics"))).unwrap();
        assert_eq!(json, serde_json::json!({"id": 2, "name": "Electronics"}));
    }
}
