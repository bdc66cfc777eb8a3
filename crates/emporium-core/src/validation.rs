//! Validation utilities.

use crate::{CategoryId, EmporiumError, EmporiumResult, FieldError, Identifier, SubCategoryId};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns an `EmporiumError` on failure.
    fn validate_request(&self) -> Result<(), EmporiumError> {
        self.validate().map_err(validation_errors_to_emporium_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `EmporiumError`.
#[must_use]
pub fn validation_errors_to_emporium_error(errors: ValidationErrors) -> EmporiumError {
    let mut field_errors = collect_field_errors(&errors, "");
    // HashMap order is arbitrary; keep messages stable
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));

    let message = field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    EmporiumError::Validation(message)
}

/// Flattens validator output, prefixing nested struct and list fields.
fn collect_field_errors(errors: &ValidationErrors, prefix: &str) -> Vec<FieldError> {
    let mut field_errors = Vec::new();

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                field_errors.extend(errs.iter().map(|error| FieldError {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                    code: error.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                field_errors.extend(collect_field_errors(nested, &path));
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    field_errors.extend(collect_field_errors(nested, &format!("{path}[{index}]")));
                }
            }
        }
    }

    field_errors
}

/// Rejects identifiers that cannot name a stored row.
pub fn require_valid_id<I: Identifier>(resource: &str, id: &I) -> EmporiumResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(EmporiumError::validation(format!(
            "invalid {resource} id: {id}"
        )))
    }
}

/// Rejects category ids outside the seeded catalog tree.
pub fn require_category(id: CategoryId) -> EmporiumResult<()> {
    rules::valid_category(&id).map_err(|_| {
        EmporiumError::validation(format!("invalid category id: {id}, must be between 1 and 3"))
    })
}

/// Rejects sub-category ids outside the seeded catalog tree.
pub fn require_sub_category(id: SubCategoryId) -> EmporiumResult<()> {
    rules::valid_sub_category(&id).map_err(|_| {
        EmporiumError::validation(format!("invalid sub-category id: {id}, must be between 1 and 10"))
    })
}

/// Common validation functions.
pub mod rules {
    use crate::{CategoryId, Identifier, SubCategoryId, MAX_CATEGORY_ID, MAX_SUB_CATEGORY_ID};
    use std::borrow::Cow;
    use validator::ValidationError;

    fn error(code: &'static str, message: &'static str) -> ValidationError {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err
    }

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(error("not_blank", "must not be blank"));
        }
        Ok(())
    }

    /// Validates an RFC 3339 timestamp such as `2024-05-01T10:00:00Z`.
    pub fn rfc3339(value: &str) -> Result<(), ValidationError> {
        chrono::DateTime::parse_from_rfc3339(value)
            .map(|_| ())
            .map_err(|_| error("rfc3339", "must be an RFC 3339 timestamp"))
    }

    /// Validates that an identifier references a row (positive or non-blank).
    pub fn valid_id<I: Identifier>(id: &I) -> Result<(), ValidationError> {
        if id.is_valid() {
            Ok(())
        } else {
            Err(error("invalid_id", "must be a valid identifier"))
        }
    }

    /// Validates a category id against the seeded catalog range.
    pub fn valid_category(id: &CategoryId) -> Result<(), ValidationError> {
        if (1..=MAX_CATEGORY_ID).contains(&id.into_inner()) {
            Ok(())
        } else {
            Err(error("category_range", "must be between 1 and 3"))
        }
    }

    /// Validates a sub-category id against the seeded catalog range.
    pub fn valid_sub_category(id: &SubCategoryId) -> Result<(), ValidationError> {
        if (1..=MAX_SUB_CATEGORY_ID).contains(&id.into_inner()) {
            Ok(())
        } else {
            Err(error("sub_category_range", "must be between 1 and 10"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use crate::{CartItemId, CategoryId, SubCategoryId, UserId};

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_rfc3339() {
        assert!(rfc3339("2024-05-01T10:00:00Z").is_ok());
        assert!(rfc3339("2024-05-01T10:00:00+02:00").is_ok());
        assert!(rfc3339("2024-05-01").is_err());
        assert!(rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_catalog_ranges() {
        assert!(valid_category(&CategoryId::new(1)).is_ok());
        assert!(valid_category(&CategoryId::new(3)).is_ok());
        assert!(valid_category(&CategoryId::new(0)).is_err());
        assert!(valid_category(&CategoryId::new(4)).is_err());
        assert!(valid_sub_category(&SubCategoryId::new(10)).is_ok());
        assert!(valid_sub_category(&SubCategoryId::new(11)).is_err());
    }

    #[test]
    fn test_require_valid_id() {
        assert!(require_valid_id("cart item", &CartItemId::new(3)).is_ok());
        let err = require_valid_id("cart item", &CartItemId::new(0)).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: invalid cart item id: 0");
        assert!(require_valid_id("user", &UserId::new("")).is_err());
    }

    #[test]
    fn test_require_catalog_ids() {
        assert!(require_category(CategoryId::new(2)).is_ok());
        assert!(require_category(CategoryId::new(4))
            .unwrap_err()
            .to_string()
            .contains("invalid category id: 4"));
        assert!(require_sub_category(SubCategoryId::new(10)).is_ok());
        assert!(require_sub_category(SubCategoryId::new(0)).is_err());
    }
}
