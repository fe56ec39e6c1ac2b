#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Wire DTOs for the Appwrite-compatible backend REST API.
//!
//! Documents arrive with loosely-typed attributes (missing counters, empty
//! string references, free-form device strings). The `into_*` conversions
//! below are the single place where those are normalized into the engine's
//! records, so nothing downstream has to re-check them.

pub mod paths;
pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wallzee_core::model::non_empty;
use wallzee_core::{
    CategoryRecord, CoreResult, DeviceType, Identity, UserProfile, WallpaperRecord,
};

pub use query::Query;

/// Placeholder id that asks the backend to generate a unique identifier.
pub const UNIQUE_ID: &str = "unique()";

/// Error document returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
    /// HTTP status echoed by the backend.
    #[serde(default)]
    pub code: u16,
    /// Machine-readable error type, such as `user_unauthorized`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Page of documents returned by a list call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentList<T> {
    /// Total matching documents, ignoring the limit.
    #[serde(default)]
    pub total: u64,
    /// Documents on this page.
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}

/// Body of a create-document call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest<T> {
    /// Requested id or [`UNIQUE_ID`].
    pub document_id: String,
    /// Attributes to store.
    pub data: T,
}

/// Body of an update-document call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateDocumentRequest<T> {
    /// Attributes to overwrite.
    pub data: T,
}

/// Raw wallpaper document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperDocument {
    /// Document id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Creation timestamp.
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    /// Title, possibly missing on hand-edited documents.
    #[serde(default)]
    pub title: Option<String>,
    /// Device type string (`phone`/`desktop`); null on broken documents.
    #[serde(default)]
    pub category: Option<String>,
    /// Category reference.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Stored file id.
    #[serde(default)]
    pub image_id: Option<String>,
    /// Fallback image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Download counter, signed on the wire.
    #[serde(default)]
    pub downloads: Option<i64>,
    /// Featured flag.
    #[serde(default)]
    pub featured: Option<bool>,
}

impl WallpaperDocument {
    /// Normalize into an engine record.
    ///
    /// # Errors
    ///
    /// Returns [`wallzee_core::CoreError::UnknownDeviceType`] when the device
    /// string is neither `phone` nor `desktop`.
    pub fn into_record(self) -> CoreResult<WallpaperRecord> {
        let device: DeviceType = self.category.unwrap_or_default().parse()?;
        Ok(WallpaperRecord {
            id: self.id,
            title: self.title.unwrap_or_default(),
            device,
            category_id: non_empty(self.category_id),
            image_id: non_empty(self.image_id),
            image_url: non_empty(self.image_url),
            downloads: self.downloads.map_or(0, |count| count.max(0).unsigned_abs()),
            featured: self.featured.unwrap_or(false),
            created_at: self.created_at,
        })
    }
}

/// Attributes of a new wallpaper document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewWallpaper {
    /// Title.
    pub title: String,
    /// Device type, stored as `category`.
    pub category: DeviceType,
    /// Stored file id.
    pub image_id: String,
    /// Preview URL of the stored file.
    pub image_url: String,
    /// Starts at zero.
    pub downloads: u64,
    /// Starts unfeatured.
    pub featured: bool,
    /// Optional category reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Partial update of a wallpaper document.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New category reference; `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    /// New featured flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// New download counter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
}

impl WallpaperPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category_id.is_none()
            && self.featured.is_none()
            && self.downloads.is_none()
    }
}

/// Raw category document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDocument {
    /// Document id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Glyph.
    #[serde(default)]
    pub icon: Option<String>,
}

impl CategoryDocument {
    /// Normalize into an engine record.
    #[must_use]
    pub fn into_record(self) -> CategoryRecord {
        CategoryRecord {
            id: self.id,
            name: self.name,
            description: non_empty(self.description),
            icon: non_empty(self.icon),
        }
    }
}

/// Attributes written when creating or updating a category.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Description, empty when unset.
    pub description: String,
    /// Glyph, empty when unset.
    pub icon: String,
}

impl CategoryInput {
    /// Build an input, defaulting optional fields to empty strings.
    #[must_use]
    pub fn new(name: &str, description: Option<&str>, icon: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.unwrap_or_default().to_string(),
            icon: icon.unwrap_or_default().to_string(),
        }
    }
}

/// Raw user profile document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    /// Document id, equal to the identity id.
    #[serde(rename = "$id")]
    pub id: String,
    /// System creation timestamp.
    #[serde(rename = "$createdAt")]
    pub system_created_at: DateTime<Utc>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Admin mirror flag.
    #[serde(default)]
    pub is_admin: Option<bool>,
    /// Application-written creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserDocument {
    /// Normalize into a profile, preferring the application timestamp.
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin.unwrap_or(false),
            created_at: self.created_at.unwrap_or(self.system_created_at),
        }
    }
}

/// Attributes of a new user profile.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial update of a user profile.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New admin mirror flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

/// Stored file metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileDocument {
    /// File id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning bucket.
    #[serde(default)]
    pub bucket_id: String,
    /// Original filename.
    #[serde(default)]
    pub name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size_original: u64,
    /// MIME type detected by storage.
    #[serde(default)]
    pub mime_type: String,
    /// Chunks expected for a chunked upload.
    #[serde(default)]
    pub chunks_total: u32,
    /// Chunks received so far.
    #[serde(default)]
    pub chunks_uploaded: u32,
}

/// Account of the active session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountDocument {
    /// User id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Role labels.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl From<AccountDocument> for Identity {
    fn from(account: AccountDocument) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            labels: account.labels,
        }
    }
}

/// Session created by an email login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    /// Session id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning user id.
    #[serde(default)]
    pub user_id: String,
    /// Expiry timestamp.
    #[serde(default)]
    pub expire: Option<DateTime<Utc>>,
}

/// Email/password login body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailSessionRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Password change body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    /// New password.
    pub password: String,
    /// Current password.
    pub old_password: String,
}

/// Label replacement body (server key only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelsRequest {
    /// Full label set to store.
    pub labels: Vec<String>,
}

/// User returned by the server-side users endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerUser {
    /// User id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Role labels.
    #[serde(default)]
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wallpaper_document_normalizes_defaults() {
        let doc: WallpaperDocument = serde_json::from_value(json!({
            "$id": "w1",
            "$createdAt": "2024-05-01T10:00:00.000+00:00",
            "title": "Aurora",
            "category": "phone",
            "categoryId": "",
            "imageId": "f1",
        }))
        .unwrap();
        let record = doc.into_record().unwrap();
        assert_eq!(record.device, DeviceType::Phone);
        assert_eq!(record.category_id, None);
        assert_eq!(record.image_id.as_deref(), Some("f1"));
        assert_eq!(record.downloads, 0);
        assert!(!record.featured);
    }

    #[test]
    fn unknown_device_is_rejected() {
        let doc: WallpaperDocument = serde_json::from_value(json!({
            "$id": "w2",
            "$createdAt": "2024-05-01T10:00:00Z",
            "category": "tablet",
        }))
        .unwrap();
        assert!(doc.into_record().is_err());
    }

    #[test]
    fn null_device_is_rejected_and_negative_downloads_clamp() {
        let doc: WallpaperDocument = serde_json::from_value(json!({
            "$id": "w3",
            "$createdAt": "2024-05-01T10:00:00Z",
            "category": null,
        }))
        .unwrap();
        assert!(doc.into_record().is_err());

        let doc: WallpaperDocument = serde_json::from_value(json!({
            "$id": "w4",
            "$createdAt": "2024-05-01T10:00:00Z",
            "category": "desktop",
            "downloads": -3,
        }))
        .unwrap();
        assert_eq!(doc.into_record().unwrap().downloads, 0);
    }

    #[test]
    fn new_wallpaper_omits_missing_category() {
        let body = NewWallpaper {
            title: "A".into(),
            category: DeviceType::Desktop,
            image_id: "f".into(),
            image_url: "u".into(),
            downloads: 0,
            featured: false,
            category_id: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["category"], "desktop");
        assert!(value.get("categoryId").is_none());
    }

    #[test]
    fn patch_serializes_only_set_fields_and_null_clears() {
        let patch = WallpaperPatch {
            category_id: Some(None),
            featured: Some(true),
            ..WallpaperPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"categoryId": null, "featured": true})
        );
        assert!(WallpaperPatch::default().is_empty());
    }

    #[test]
    fn user_document_prefers_application_timestamp() {
        let doc: UserDocument = serde_json::from_value(json!({
            "$id": "u1",
            "$createdAt": "2024-05-01T00:00:00Z",
            "name": "Ada",
            "email": "ada@example.com",
            "createdAt": "2023-01-01T00:00:00Z",
        }))
        .unwrap();
        let profile = doc.into_profile();
        assert!(!profile.is_admin);
        assert_eq!(profile.created_at.to_rfc3339(), "2023-01-01T00:00:00+00:00");
    }

    #[test]
    fn error_body_reads_type_field() {
        let body: ErrorBody = serde_json::from_value(json!({
            "message": "Invalid credentials",
            "code": 401,
            "type": "user_invalid_credentials",
        }))
        .unwrap();
        assert_eq!(body.kind, "user_invalid_credentials");
    }

    #[test]
    fn create_request_uses_document_id_key() {
        let request = CreateDocumentRequest {
            document_id: UNIQUE_ID.to_string(),
            data: CategoryInput::new(" Nature ", None, Some("🌲")),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"documentId": "unique()", "data": {"name": "Nature", "description": "", "icon": "🌲"}})
        );
    }
}
