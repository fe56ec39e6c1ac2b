//! Typed wallpaper, category, and identity records.
//!
//! # Design
//! - Records are normalized once at ingestion; views never null-check fields.
//! - Device type is a closed enum; unknown values are rejected, not coerced.
//! - Empty strings from the document store are treated as absent references.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Device partition a wallpaper is laid out for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Portrait wallpapers for phones.
    Phone,
    /// Landscape wallpapers for desktops.
    Desktop,
}

impl DeviceType {
    /// All device types in display order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Phone, Self::Desktop]
    }

    /// Stored string form of the device type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Desktop => "desktop",
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "phone" => Ok(Self::Phone),
            "desktop" => Ok(Self::Desktop),
            other => Err(CoreError::UnknownDeviceType {
                value: other.to_string(),
            }),
        }
    }
}

/// Normalized wallpaper record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperRecord {
    /// Opaque identifier assigned by the document store.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Device partition (stored as the `category` attribute).
    #[serde(rename = "category")]
    pub device: DeviceType,
    /// Weak reference to a [`CategoryRecord`].
    pub category_id: Option<String>,
    /// Stored file identifier.
    pub image_id: Option<String>,
    /// Fallback absolute URL for legacy records.
    pub image_url: Option<String>,
    /// Download counter.
    pub downloads: u64,
    /// Whether the wallpaper is shown on the featured strip.
    pub featured: bool,
    /// Creation timestamp assigned by the document store.
    pub created_at: DateTime<Utc>,
}

/// Category taxonomy entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    /// Opaque identifier.
    pub id: String,
    /// Display name used by the category selector.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional glyph or emoji.
    pub icon: Option<String>,
}

/// Identity returned by the remote identity service for the active session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role labels attached to the account.
    pub labels: Vec<String>,
}

impl Identity {
    /// Whether the identity carries the configured admin label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|value| value == label)
    }
}

/// Authenticated user as seen by the views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// User identifier.
    pub user_id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Derived from the admin label.
    pub is_admin: bool,
}

impl UserSession {
    /// Derive a session view from an identity and the configured admin label.
    #[must_use]
    pub fn from_identity(identity: &Identity, admin_label: &str) -> Self {
        Self {
            user_id: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            is_admin: identity.has_label(admin_label),
        }
    }
}

/// Profile document kept in the users collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identifier, equal to the identity user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Mirrors the admin label.
    pub is_admin: bool,
    /// Profile creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Treat empty or whitespace-only strings as absent.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_parses_stored_values() {
        assert_eq!("phone".parse::<DeviceType>(), Ok(DeviceType::Phone));
        assert_eq!("desktop".parse::<DeviceType>(), Ok(DeviceType::Desktop));
        assert_eq!(
            "tablet".parse::<DeviceType>(),
            Err(CoreError::UnknownDeviceType {
                value: "tablet".into()
            })
        );
        assert_eq!(DeviceType::Desktop.to_string(), "desktop");
    }

    #[test]
    fn session_admin_flag_follows_label_membership() {
        let mut identity = Identity {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            labels: vec!["editor".into()],
        };
        assert!(!UserSession::from_identity(&identity, "admin").is_admin);
        identity.labels.push("admin".into());
        let session = UserSession::from_identity(&identity, "admin");
        assert!(session.is_admin);
        assert_eq!(session.user_id, "u1");
    }

    #[test]
    fn non_empty_drops_blank_strings() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("abc".into())), Some("abc".into()));
    }
}
