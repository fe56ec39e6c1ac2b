//! View models shared by the gallery and admin components.

use wallzee_core::validate::{
    ValidationError, validate_category_name, validate_login, validate_password_change,
    validate_upload,
};
use wallzee_core::{CategoryRecord, DeviceType};

/// How long download feedback stays visible, in milliseconds.
pub const DOWNLOAD_TOAST_MS: u32 = wallzee_core::download::MESSAGE_TIMEOUT_MS;
/// How long form feedback stays visible, in milliseconds.
pub const FORM_TOAST_MS: u32 = 5_000;

/// Toast variants used across the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational toast.
    Info,
    /// Success toast.
    Success,
    /// Error toast.
    Error,
}

impl ToastKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Toast payload used by the host and app state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Monotonic toast identifier.
    pub id: u64,
    /// Display message.
    pub message: String,
    /// Severity classification.
    pub kind: ToastKind,
    /// Auto-dismiss delay in milliseconds.
    pub ttl_ms: u32,
}

/// Ordered toast list with monotonic ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    /// Append a toast and return its id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, ttl_ms: u32) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            message: message.into(),
            kind,
            ttl_ms,
        });
        id
    }

    /// Remove a toast; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    /// Toasts in display order.
    #[must_use]
    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Confirmation shown before a wallpaper is deleted.
pub const WALLPAPER_DELETE_PROMPT: &str = "Are you sure you want to delete this wallpaper?";

/// Confirmation shown before a category is deleted.
#[must_use]
pub fn category_delete_prompt(name: &str) -> String {
    format!(
        "Are you sure you want to delete category \"{name}\"? This will NOT delete the associated wallpapers."
    )
}

/// Rounded share of `part` in `total`, zero for an empty total.
#[must_use]
pub fn percent_of(part: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (part * 100 + total / 2) / total
}

/// Login form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl LoginForm {
    /// Check for blank fields before contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCredentials`] when a field is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_login(&self.email, &self.password)
    }
}

/// Change-password form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordForm {
    /// Current password.
    pub current: String,
    /// New password.
    pub new: String,
    /// Confirmation of the new password.
    pub confirm: String,
}

impl PasswordForm {
    /// Apply the blank, mismatch, then length rules.
    ///
    /// # Errors
    ///
    /// Returns the first failed [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_password_change(&self.current, &self.new, &self.confirm)
    }
}

/// Upload form fields; the file itself lives in the component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadForm {
    /// Title.
    pub title: String,
    /// Device partition.
    pub device: DeviceType,
    /// Selected category id; empty means none.
    pub category_id: String,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            device: DeviceType::Phone,
            category_id: String::new(),
        }
    }
}

impl UploadForm {
    /// Check title and file presence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTitle`] or [`ValidationError::MissingFile`].
    pub fn validate(&self, has_file: bool) -> Result<(), ValidationError> {
        validate_upload(&self.title, has_file)
    }

    /// Category reference to store, if any.
    #[must_use]
    pub fn category(&self) -> Option<String> {
        let trimmed = self.category_id.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Reset everything except the device toggle.
    pub fn reset(&mut self) {
        self.title.clear();
        self.category_id.clear();
    }
}

/// Category form fields, used for both create and edit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryForm {
    /// Record being edited; `None` while creating.
    pub editing: Option<String>,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Glyph.
    pub icon: String,
}

impl CategoryForm {
    /// Populate the form from an existing record.
    #[must_use]
    pub fn edit(record: &CategoryRecord) -> Self {
        Self {
            editing: Some(record.id.clone()),
            name: record.name.clone(),
            description: record.description.clone().unwrap_or_default(),
            icon: record.icon.clone().unwrap_or_default(),
        }
    }

    /// Check the name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCategoryName`] when blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_category_name(&self.name)
    }

    /// Description as an optional value.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        Some(self.description.trim()).filter(|value| !value.is_empty())
    }

    /// Icon as an optional value.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        Some(self.icon.trim()).filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_queue_assigns_monotonic_ids() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Success, "saved", FORM_TOAST_MS);
        let second = queue.push(ToastKind::Error, "failed", DOWNLOAD_TOAST_MS);
        assert!(second > first);
        queue.dismiss(first);
        queue.dismiss(999);
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].message, "failed");
        assert_eq!(queue.items()[0].ttl_ms, 3_000);
    }

    #[test]
    fn category_prompt_names_the_category_and_keeps_wallpapers() {
        let prompt = category_delete_prompt("Nature");
        assert!(prompt.contains("\"Nature\""));
        assert!(prompt.ends_with("This will NOT delete the associated wallpapers."));
    }

    #[test]
    fn percent_of_rounds_and_handles_empty_totals() {
        assert_eq!(percent_of(3, 5), 60);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(0, 0), 0);
    }

    #[test]
    fn password_form_reports_mismatch_before_length() {
        let form = PasswordForm {
            current: "old-password".into(),
            new: "short".into(),
            confirm: "other".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn upload_form_requires_title_then_file() {
        let mut form = UploadForm::default();
        assert_eq!(form.validate(true), Err(ValidationError::MissingTitle));
        form.title = "Dunes".into();
        assert_eq!(form.validate(false), Err(ValidationError::MissingFile));
        assert!(form.validate(true).is_ok());
        assert_eq!(form.category(), None);
        form.category_id = "c1".into();
        form.device = DeviceType::Desktop;
        form.reset();
        assert_eq!(form.device, DeviceType::Desktop);
        assert!(form.title.is_empty());
    }

    #[test]
    fn category_form_round_trips_optional_fields() {
        let record = CategoryRecord {
            id: "c1".into(),
            name: "Nature".into(),
            description: None,
            icon: Some("🌿".into()),
        };
        let form = CategoryForm::edit(&record);
        assert_eq!(form.editing.as_deref(), Some("c1"));
        assert_eq!(form.description(), None);
        assert_eq!(form.icon(), Some("🌿"));
        assert!(form.validate().is_ok());
        assert_eq!(
            CategoryForm::default().validate(),
            Err(ValidationError::MissingCategoryName)
        );
    }
}
