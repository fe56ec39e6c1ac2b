//! Seams between the services and a concrete backend.
//!
//! # Design
//! - Documents travel as `serde_json::Value`; services own the typed decoding.
//! - URL builders are synchronous because they never touch the network.
//! - Every trait is object safe so services can hold `Arc<dyn ...>`.

use async_trait::async_trait;
use serde_json::Value;
use wallzee_api_models::{DocumentList, FileDocument, Query, SessionDocument};
use wallzee_core::Identity;
use wallzee_core::preview::PreviewSize;

use crate::error::ClientResult;

/// Bytes selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Original filename.
    pub name: String,
    /// MIME type sent with each chunk.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Build an upload, guessing the MIME type from the extension.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_for(&name).to_string();
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    /// Whether the upload carries any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Upload progress reported after each chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub uploaded: u64,
    /// Total bytes.
    pub total: u64,
    /// Chunks sent so far.
    pub chunks_uploaded: u32,
    /// Total chunks.
    pub chunks_total: u32,
}

impl UploadProgress {
    /// Completion percentage, 0 to 100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let percent = self.uploaded.saturating_mul(100) / self.total;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}

/// Callback invoked with upload progress.
pub type ProgressFn<'a> = &'a (dyn Fn(UploadProgress) + Send + Sync);

/// Collection-based document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents matching `queries`.
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> ClientResult<DocumentList<Value>>;

    /// Fetch one document.
    async fn get_document(&self, collection: &str, id: &str) -> ClientResult<Value>;

    /// Create a document; `id` may be `unique()`.
    async fn create_document(&self, collection: &str, id: &str, data: Value)
    -> ClientResult<Value>;

    /// Overwrite the given attributes of a document.
    async fn update_document(&self, collection: &str, id: &str, data: Value)
    -> ClientResult<Value>;

    /// Delete a document.
    async fn delete_document(&self, collection: &str, id: &str) -> ClientResult<()>;
}

/// File storage in the configured bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a file, reporting progress per chunk.
    async fn upload_file(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressFn<'_>>,
    ) -> ClientResult<FileDocument>;

    /// Delete a stored file.
    async fn delete_file(&self, id: &str) -> ClientResult<()>;

    /// Resized preview URL.
    fn preview_url(&self, id: &str, size: Option<PreviewSize>) -> String;

    /// Attachment download URL.
    fn download_url(&self, id: &str) -> String;

    /// Inline view URL.
    fn view_url(&self, id: &str) -> String;
}

/// Account and session management.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Start an email/password session.
    async fn create_email_session(&self, email: &str, password: &str)
    -> ClientResult<SessionDocument>;

    /// Identity behind the active session; `None` when anonymous.
    async fn current_identity(&self) -> ClientResult<Option<Identity>>;

    /// End the active session.
    async fn delete_current_session(&self) -> ClientResult<()>;

    /// Change the password of the active account.
    async fn update_password(&self, new_password: &str, old_password: &str) -> ClientResult<()>;

    /// Labels of any user (server key only).
    async fn user_labels(&self, user_id: &str) -> ClientResult<Vec<String>>;

    /// Replace the labels of any user (server key only).
    async fn update_user_labels(&self, user_id: &str, labels: &[String]) -> ClientResult<()>;
}
