//! Form validation performed before any remote call.

use thiserror::Error;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Rejections raised by client-side form checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Login form submitted with a blank field.
    #[error("Please enter both email and password")]
    MissingCredentials,
    /// Password form submitted with a blank field.
    #[error("Please fill in all fields")]
    MissingPasswordFields,
    /// New password and confirmation differ.
    #[error("New passwords do not match")]
    PasswordMismatch,
    /// New password below [`MIN_PASSWORD_LEN`].
    #[error("New password must be at least {min} characters long")]
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// Upload form without a title.
    #[error("Please enter a title")]
    MissingTitle,
    /// Upload form without a file.
    #[error("Please select a file to upload")]
    MissingFile,
    /// Category form without a name.
    #[error("Please enter a category name")]
    MissingCategoryName,
    /// Category still referenced by wallpapers.
    #[error("Cannot delete category with wallpapers")]
    CategoryInUse {
        /// Number of wallpapers pointing at the category.
        wallpaper_count: usize,
    },
}

/// Check the login form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingCredentials`] when either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Check the change-password form.
///
/// # Errors
///
/// Returns the first failed rule: blank fields, mismatch, then length.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(ValidationError::MissingPasswordFields);
    }
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Check the upload form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingTitle`] or [`ValidationError::MissingFile`].
pub fn validate_upload(title: &str, has_file: bool) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if !has_file {
        return Err(ValidationError::MissingFile);
    }
    Ok(())
}

/// Check the category form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingCategoryName`] for a blank name.
pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    Ok(())
}

/// Refuse deletion of a category that still has wallpapers.
///
/// # Errors
///
/// Returns [`ValidationError::CategoryInUse`] when `wallpaper_count > 0`.
pub const fn ensure_category_deletable(wallpaper_count: usize) -> Result<(), ValidationError> {
    if wallpaper_count > 0 {
        return Err(ValidationError::CategoryInUse { wallpaper_count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            validate_login("", "secret"),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            validate_login("a@b.c", ""),
            Err(ValidationError::MissingCredentials)
        );
        assert!(validate_login("a@b.c", "secret").is_ok());
    }

    #[test]
    fn password_rules_apply_in_order() {
        assert_eq!(
            validate_password_change("", "x", "x"),
            Err(ValidationError::MissingPasswordFields)
        );
        assert_eq!(
            validate_password_change("old", "abcdefgh", "abcdefgX"),
            Err(ValidationError::PasswordMismatch)
        );
        let short = validate_password_change("old", "short", "short").unwrap_err();
        assert_eq!(
            short.to_string(),
            "New password must be at least 8 characters long"
        );
        assert!(validate_password_change("old", "abcdefgh", "abcdefgh").is_ok());
    }

    #[test]
    fn upload_and_category_forms() {
        assert_eq!(validate_upload("  ", true), Err(ValidationError::MissingTitle));
        assert_eq!(validate_upload("Dune", false), Err(ValidationError::MissingFile));
        assert!(validate_upload("Dune", true).is_ok());
        assert_eq!(
            validate_category_name(""),
            Err(ValidationError::MissingCategoryName)
        );
    }

    #[test]
    fn category_with_wallpapers_cannot_be_deleted() {
        let err = ensure_category_deletable(3).unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete category with wallpapers");
        assert!(ensure_category_deletable(0).is_ok());
    }
}
