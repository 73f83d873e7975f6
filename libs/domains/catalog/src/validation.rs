//! Custom `validator` rules shared by the inbound DTOs.

use chrono::{DateTime, Utc};
use validator::ValidationError;

use crate::category::CategoryDto;

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

pub(crate) fn validate_past_or_present(instant: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *instant > Utc::now() {
        return Err(ValidationError::new("past_or_present")
            .with_message("Date cannot be in the future".into()));
    }
    Ok(())
}

/// Nested category references are resolved by id, so each must carry one.
pub(crate) fn validate_category_refs(categories: &[CategoryDto]) -> Result<(), ValidationError> {
    if categories.iter().any(|category| category.id.is_none()) {
        return Err(ValidationError::new("category_id")
            .with_message("Every category must carry an id".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Books").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_past_or_present() {
        assert!(validate_past_or_present(&(Utc::now() - Duration::days(1))).is_ok());
        assert!(validate_past_or_present(&(Utc::now() + Duration::days(1))).is_err());
    }

    #[test]
    fn test_category_refs_need_ids() {
        let with_id = CategoryDto {
            id: Some(1),
            name: "Books".into(),
        };
        let without_id = CategoryDto {
            id: None,
            name: "Games".into(),
        };

        assert!(validate_category_refs(&[with_id.clone()]).is_ok());
        assert!(validate_category_refs(&[]).is_ok());
        assert!(validate_category_refs(&[with_id, without_id]).is_err());
    }
}
