use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::category::{Category, CategoryDto};
use crate::sorting::SortKey;
use crate::validation::{validate_category_refs, validate_not_blank, validate_past_or_present};

/// Product as held by the store. `id` is `None` until first saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    /// Release date
    pub date: DateTime<Utc>,
    pub categories: BTreeSet<Category>,
}

impl Product {
    /// Copies every scalar of `dto`; the id and categories are left alone.
    pub fn copy_scalars(&mut self, dto: &ProductDetailsDto) {
        self.name = dto.name.clone();
        self.description = dto.description.clone();
        self.price = dto.price;
        self.img_url = dto.img_url.clone();
        self.date = dto.date;
    }

    pub fn category_ids(&self) -> BTreeSet<i64> {
        self.categories.iter().filter_map(|c| c.id).collect()
    }
}

/// Lean product representation: own fields only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
            date: product.date,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
        }
    }
}

/// Extended product representation: own fields plus its categories.
/// Accepted on create and update, returned by get-by-id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductDetailsDto {
    /// Assigned by the store; ignored on create and update
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        length(min = 5, max = 60, message = "Name must have between 5 and 60 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: f64,
    #[serde(default)]
    #[validate(length(max = 255, message = "Image URL must have at most 255 characters"))]
    pub img_url: String,
    #[validate(custom(function = "validate_past_or_present"))]
    pub date: DateTime<Utc>,
    #[serde(default)]
    #[validate(custom(function = "validate_category_refs"))]
    pub categories: Vec<CategoryDto>,
}

impl From<&Product> for ProductDetailsDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
            date: product.date,
            categories: product.categories.iter().map(CategoryDto::from).collect(),
        }
    }
}

/// Optional filters of the product listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Only products in this category
    pub category_id: Option<i64>,
}

impl ProductFilter {
    /// Name fragment, lowercased, or `None` when absent or blank
    pub fn name_fragment(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, product: &Product) -> bool {
        let name_matches = self
            .name_fragment()
            .is_none_or(|fragment| product.name.to_lowercase().contains(&fragment));
        let category_matches = self
            .category_id
            .is_none_or(|id| product.categories.iter().any(|c| c.id == Some(id)));
        name_matches && category_matches
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProductSort {
    Id,
    Name,
    Price,
    Date,
}

impl SortKey for ProductSort {
    const DEFAULT: Self = ProductSort::Id;

    fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(ProductSort::Id),
            "name" => Some(ProductSort::Name),
            "price" => Some(ProductSort::Price),
            "date" => Some(ProductSort::Date),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn phone() -> Product {
        Product {
            id: Some(1),
            name: "Phone".into(),
            description: "Good Phone".into(),
            price: 800.0,
            img_url: "https://img.com/img.png".into(),
            date: Utc.with_ymd_and_hms(2020, 10, 20, 3, 0, 0).unwrap(),
            categories: BTreeSet::from([Category::new(1, "Electronics")]),
        }
    }

    fn details() -> ProductDetailsDto {
        ProductDetailsDto::from(&phone())
    }

    #[test]
    fn test_lean_dto_has_no_categories() {
        let json = serde_json::to_value(ProductDto::from(&phone())).unwrap();
        assert!(json.get("categories").is_none());
        assert_eq!(json["img_url"], "https://img.com/img.png");
    }

    #[test]
    fn test_details_dto_materializes_categories() {
        let dto = details();
        assert_eq!(dto.categories, vec![CategoryDto::from(Category::new(1, "Electronics"))]);
    }

    #[test]
    fn test_copy_scalars_leaves_id_and_categories() {
        let mut product = Product {
            id: Some(9),
            ..Product::default()
        };
        product.copy_scalars(&details());

        assert_eq!(product.id, Some(9));
        assert_eq!(product.name, "Phone");
        assert_eq!(product.price, 800.0);
        assert!(product.categories.is_empty());
    }

    #[test]
    fn test_validation_rules() {
        let mut dto = details();
        dto.name = "Phone X".into();
        assert!(dto.validate().is_ok());

        let mut short = dto.clone();
        short.name = "TV".into();
        assert!(short.validate().is_err());

        let mut free = dto.clone();
        free.price = 0.0;
        assert!(free.validate().is_err());

        let mut future = dto.clone();
        future.date = Utc::now() + chrono::Duration::days(30);
        assert!(future.validate().is_err());

        let mut dangling = dto;
        dangling.categories.push(CategoryDto {
            id: None,
            name: "Mystery".into(),
        });
        assert!(dangling.validate().is_err());
    }

    #[test]
    fn test_filter_matches() {
        let product = phone();

        assert!(ProductFilter::default().matches(&product));
        assert!(
            ProductFilter {
                name: Some("PHO".into()),
                category_id: Some(1)
            }
            .matches(&product)
        );
        assert!(
            !ProductFilter {
                name: Some("laptop".into()),
                category_id: None
            }
            .matches(&product)
        );
        assert!(
            !ProductFilter {
                name: None,
                category_id: Some(2)
            }
            .matches(&product)
        );
        assert!(
            ProductFilter {
                name: Some("   ".into()),
                category_id: None
            }
            .matches(&product)
        );
    }
}
