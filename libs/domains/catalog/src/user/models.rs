use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

use crate::category::{Category, CategoryDto};
use crate::sorting::SortKey;
use crate::validation::{validate_category_refs, validate_not_blank, validate_past_or_present};

/// Catalog user with the categories they follow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub bio: String,
    pub registered_at: DateTime<Utc>,
    pub avatar_url: String,
    pub balance: f64,
    pub categories: BTreeSet<Category>,
}

impl User {
    /// Copies every scalar of `dto`; the id and categories are left alone.
    pub fn copy_scalars(&mut self, dto: &UserDetailsDto) {
        self.name = dto.name.clone();
        self.bio = dto.bio.clone();
        self.registered_at = dto.registered_at;
        self.avatar_url = dto.avatar_url.clone();
        self.balance = dto.balance;
    }

    pub fn category_ids(&self) -> BTreeSet<i64> {
        self.categories.iter().filter_map(|c| c.id).collect()
    }
}

/// Lean user representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Option<i64>,
    pub name: String,
    pub bio: String,
    pub registered_at: DateTime<Utc>,
    pub avatar_url: String,
    pub balance: f64,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            bio: user.bio.clone(),
            registered_at: user.registered_at,
            avatar_url: user.avatar_url.clone(),
            balance: user.balance,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            bio: user.bio,
            registered_at: user.registered_at,
            avatar_url: user.avatar_url,
            balance: user.balance,
        }
    }
}

/// Extended user representation with the followed categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserDetailsDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        length(min = 3, max = 60, message = "Name must have between 3 and 60 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[validate(custom(function = "validate_past_or_present"))]
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Avatar URL must have at most 255 characters"))]
    pub avatar_url: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Balance cannot be negative"))]
    pub balance: f64,
    #[serde(default)]
    #[validate(custom(function = "validate_category_refs"))]
    pub categories: Vec<CategoryDto>,
}

impl From<&User> for UserDetailsDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            bio: user.bio.clone(),
            registered_at: user.registered_at,
            avatar_url: user.avatar_url.clone(),
            balance: user.balance,
            categories: user.categories.iter().map(CategoryDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserSort {
    Id,
    Name,
    RegisteredAt,
    Balance,
}

impl SortKey for UserSort {
    const DEFAULT: Self = UserSort::Id;

    fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(UserSort::Id),
            "name" => Some(UserSort::Name),
            "registered_at" => Some(UserSort::RegisteredAt),
            "balance" => Some(UserSort::Balance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reader() -> UserDetailsDto {
        UserDetailsDto {
            id: None,
            name: "Maria".into(),
            bio: "Reads a lot".into(),
            registered_at: Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap(),
            avatar_url: String::new(),
            balance: 0.0,
            categories: vec![CategoryDto {
                id: Some(1),
                name: "Books".into(),
            }],
        }
    }

    #[test]
    fn test_valid_user() {
        assert!(reader().validate().is_ok());
    }

    #[test]
    fn test_negative_balance_rejected() {
        let mut dto = reader();
        dto.balance = -0.01;
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("balance"));
    }

    #[test]
    fn test_short_name_rejected() {
        let mut dto = reader();
        dto.name = "Al".into();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_copy_scalars_and_dto_snapshot() {
        let mut user = User {
            id: Some(4),
            categories: BTreeSet::from([Category::new(2, "Electronics")]),
            ..User::default()
        };
        user.copy_scalars(&reader());

        let lean = UserDto::from(&user);
        assert_eq!(lean.id, Some(4));
        assert_eq!(lean.name, "Maria");

        let details = UserDetailsDto::from(&user);
        assert_eq!(details.categories.len(), 1);
        assert_eq!(details.categories[0].name, "Electronics");
    }
}
