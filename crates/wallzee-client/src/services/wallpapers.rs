//! Wallpaper listing, counters, and admin mutations.
//!
//! # Design
//! - Documents whose device string is unknown are dropped with a warning.
//! - Deletion removes the document first, then retries the stored file a
//!   bounded number of times; a file that survives is reported as orphaned.
//! - Failures are logged here and returned unchanged.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use wallzee_api_models::{NewWallpaper, Query, UNIQUE_ID, WallpaperDocument, WallpaperPatch};
use wallzee_config::{BackendConfig, ListingConfig};
use wallzee_core::stats::compute_stats;
use wallzee_core::validate::validate_upload;
use wallzee_core::{CoreError, DashboardStats, DeviceType, ValidationError, WallpaperRecord};

use super::{decode, to_document};
use crate::error::ClientResult;
use crate::transport::{DocumentStore, ObjectStore, ProgressFn, UploadFile};

/// Attempts made to delete a stored file after its document is gone.
pub const FILE_DELETE_ATTEMPTS: u32 = 3;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Input of the upload form.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Title typed by the admin.
    pub title: String,
    /// Target device type.
    pub device: DeviceType,
    /// Optional category reference.
    pub category_id: Option<String>,
    /// Selected file, if any.
    pub file: Option<UploadFile>,
}

/// Result of a wallpaper deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Deleted wallpaper id.
    pub id: String,
    /// File id left behind when every delete attempt failed.
    pub orphaned_file: Option<String>,
}

/// Wallpaper operations against the configured collection and bucket.
#[derive(Clone)]
pub struct WallpaperService {
    documents: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    collection: String,
    listing: ListingConfig,
    retry_backoff: Duration,
}

impl WallpaperService {
    /// Build the service from shared stores.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        backend: &BackendConfig,
        listing: ListingConfig,
    ) -> Self {
        Self {
            documents,
            objects,
            collection: backend.wallpapers_collection_id.clone(),
            listing,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Override the pause between file delete attempts.
    #[must_use]
    pub const fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Object store used for file URLs.
    #[must_use]
    pub fn objects(&self) -> &Arc<dyn ObjectStore> {
        &self.objects
    }

    /// Wallpapers for the browse views, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    #[instrument(name = "wallpapers.list", skip(self))]
    pub async fn list(&self, device: Option<DeviceType>) -> ClientResult<Vec<WallpaperRecord>> {
        let mut queries = vec![Query::newest_first(), Query::limit(self.listing.stats_limit)];
        if let Some(device) = device {
            queries.push(Query::equal("category", device.as_str()));
        }
        self.fetch("wallpapers.list", &queries).await
    }

    /// Featured wallpapers of one device type.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    #[instrument(name = "wallpapers.featured", skip(self))]
    pub async fn featured(&self, device: DeviceType) -> ClientResult<Vec<WallpaperRecord>> {
        let queries = [
            Query::equal("featured", true),
            Query::equal("category", device.as_str()),
            Query::newest_first(),
            Query::limit(self.listing.featured_limit),
        ];
        self.fetch("wallpapers.featured", &queries).await
    }

    /// Wallpapers for the admin table.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn admin_list(&self) -> ClientResult<Vec<WallpaperRecord>> {
        let queries = [
            Query::newest_first(),
            Query::limit(self.listing.admin_list_limit),
        ];
        self.fetch("wallpapers.admin_list", &queries).await
    }

    /// Dashboard counters over the most recent wallpapers.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> ClientResult<DashboardStats> {
        let queries = [Query::newest_first(), Query::limit(self.listing.stats_limit)];
        let records = self.fetch("wallpapers.stats", &queries).await?;
        Ok(compute_stats(&records, now))
    }

    /// One wallpaper by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> ClientResult<WallpaperRecord> {
        let document = self
            .documents
            .get_document(&self.collection, id)
            .await
            .inspect_err(|err| error!(error = %err, id, "failed to fetch wallpaper"))?;
        into_record("wallpapers.get", document)
    }

    /// Read-then-write increment of the download counter.
    ///
    /// Returns the stored count. Concurrent increments may lose updates.
    ///
    /// # Errors
    ///
    /// Returns the failure of either the read or the write.
    #[instrument(name = "wallpapers.increment_downloads", skip(self))]
    pub async fn increment_downloads(&self, id: &str) -> ClientResult<u64> {
        let current = self.get(id).await?;
        let downloads = current.downloads.saturating_add(1);
        let patch = WallpaperPatch {
            downloads: Some(downloads),
            ..WallpaperPatch::default()
        };
        self.update(id, &patch).await?;
        Ok(downloads)
    }

    /// Upload a file and create its wallpaper document.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call, or the failing
    /// upload or document write.
    #[instrument(name = "wallpapers.upload", skip(self, request, on_progress), fields(title = %request.title))]
    pub async fn upload(
        &self,
        request: UploadRequest,
        on_progress: Option<ProgressFn<'_>>,
    ) -> ClientResult<WallpaperRecord> {
        let has_file = request.file.as_ref().is_some_and(|file| !file.is_empty());
        validate_upload(&request.title, has_file)?;
        let Some(file) = request.file else {
            return Err(ValidationError::MissingFile.into());
        };

        let stored = self
            .objects
            .upload_file(&file, on_progress)
            .await
            .inspect_err(|err| error!(error = %err, "wallpaper upload failed"))?;
        let data = NewWallpaper {
            title: request.title.trim().to_string(),
            category: request.device,
            image_id: stored.id.clone(),
            image_url: self.objects.preview_url(&stored.id, None),
            downloads: 0,
            featured: false,
            category_id: request.category_id.filter(|id| !id.is_empty()),
        };
        let body = to_document("wallpapers.upload", &data)?;
        match self
            .documents
            .create_document(&self.collection, UNIQUE_ID, body)
            .await
        {
            Ok(document) => {
                let record = into_record("wallpapers.upload", document)?;
                info!(id = %record.id, file = %stored.id, "wallpaper uploaded");
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, file = %stored.id, "wallpaper document creation failed");
                if let Err(cleanup) = self.objects.delete_file(&stored.id).await {
                    warn!(error = %cleanup, file = %stored.id, "uploaded file left behind");
                }
                Err(err)
            }
        }
    }

    /// Delete the document, then its stored file.
    ///
    /// # Errors
    ///
    /// Returns the document delete failure; file failures are reported
    /// through [`DeleteOutcome::orphaned_file`].
    #[instrument(name = "wallpapers.delete", skip(self, record), fields(id = %record.id))]
    pub async fn delete(&self, record: &WallpaperRecord) -> ClientResult<DeleteOutcome> {
        self.documents
            .delete_document(&self.collection, &record.id)
            .await
            .inspect_err(|err| error!(error = %err, "wallpaper delete failed"))?;

        let orphaned_file = match &record.image_id {
            Some(file_id) => self.delete_file_with_retry(file_id).await,
            None => None,
        };
        Ok(DeleteOutcome {
            id: record.id.clone(),
            orphaned_file,
        })
    }

    async fn delete_file_with_retry(&self, file_id: &str) -> Option<String> {
        for attempt in 1..=FILE_DELETE_ATTEMPTS {
            match self.objects.delete_file(file_id).await {
                Ok(()) => return None,
                Err(err) if err.is_not_found() => return None,
                Err(err) => {
                    warn!(error = %err, file = file_id, attempt, "stored file delete failed");
                    if attempt < FILE_DELETE_ATTEMPTS {
                        tokio::time::sleep(self.retry_backoff * attempt).await;
                    }
                }
            }
        }
        warn!(file = file_id, "stored file orphaned");
        Some(file_id.to_string())
    }

    /// Set or clear the featured flag.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn set_featured(&self, id: &str, featured: bool) -> ClientResult<WallpaperRecord> {
        let patch = WallpaperPatch {
            featured: Some(featured),
            ..WallpaperPatch::default()
        };
        self.update(id, &patch).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn update(&self, id: &str, patch: &WallpaperPatch) -> ClientResult<WallpaperRecord> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        let body = to_document("wallpapers.update", patch)?;
        let document = self
            .documents
            .update_document(&self.collection, id, body)
            .await
            .inspect_err(|err| error!(error = %err, id, "wallpaper update failed"))?;
        into_record("wallpapers.update", document)
    }

    async fn fetch(
        &self,
        operation: &'static str,
        queries: &[Query],
    ) -> ClientResult<Vec<WallpaperRecord>> {
        let list = self
            .documents
            .list_documents(&self.collection, queries)
            .await
            .inspect_err(|err| error!(error = %err, operation, "wallpaper fetch failed"))?;
        let mut records = Vec::with_capacity(list.documents.len());
        for document in list.documents {
            let raw: WallpaperDocument = match decode(operation, document) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(error = %err, operation, "skipping malformed wallpaper document");
                    continue;
                }
            };
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(CoreError::UnknownDeviceType { value }) => {
                    warn!(device = %value, operation, "skipping wallpaper with unknown device type");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Ok(records)
    }
}

fn into_record(operation: &'static str, document: Value) -> ClientResult<WallpaperRecord> {
    let raw: WallpaperDocument = decode(operation, document)?;
    Ok(raw.into_record()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use wallzee_test_support::fixtures::wallpaper_doc;
    use serde_json::json;

    const COLLECTION: &str = "wallpapers";

    fn service(backend: &Arc<MemoryBackend>) -> WallpaperService {
        let config = BackendConfig {
            wallpapers_collection_id: COLLECTION.into(),
            ..BackendConfig::default()
        };
        WallpaperService::new(
            backend.clone(),
            backend.clone(),
            &config,
            ListingConfig::default(),
        )
        .with_retry_backoff(Duration::ZERO)
    }

    #[tokio::test]
    async fn list_drops_unknown_device_types() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        backend.seed_document(COLLECTION, wallpaper_doc("a", "A", "phone", "2024-01-01T00:00:00Z"));
        backend.seed_document(COLLECTION, wallpaper_doc("b", "B", "tablet", "2024-01-02T00:00:00Z"));
        let records = service(&backend).list(None).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
        Ok(())
    }

    #[tokio::test]
    async fn list_skips_malformed_documents() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        backend.seed_document(COLLECTION, wallpaper_doc("a", "A", "phone", "2024-01-01T00:00:00Z"));
        let mut null_device = wallpaper_doc("b", "B", "phone", "2024-01-02T00:00:00Z");
        null_device["category"] = Value::Null;
        backend.seed_document(COLLECTION, null_device);
        let mut no_timestamp = wallpaper_doc("c", "C", "desktop", "2024-01-03T00:00:00Z");
        no_timestamp["$createdAt"] = json!("yesterday");
        backend.seed_document(COLLECTION, no_timestamp);

        let records = service(&backend).list(None).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
        Ok(())
    }

    #[tokio::test]
    async fn negative_download_counts_read_as_zero() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let mut doc = wallpaper_doc("a", "A", "desktop", "2024-01-01T00:00:00Z");
        doc["downloads"] = json!(-1);
        backend.seed_document(COLLECTION, doc);
        let records = service(&backend).list(None).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].downloads, 0);
        Ok(())
    }

    #[tokio::test]
    async fn increment_reads_then_writes() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let mut doc = wallpaper_doc("a", "A", "phone", "2024-01-01T00:00:00Z");
        doc["downloads"] = json!(4);
        backend.seed_document(COLLECTION, doc);
        let count = service(&backend).increment_downloads("a").await?;
        assert_eq!(count, 5);
        assert_eq!(backend.documents(COLLECTION)[0]["downloads"], 5);
        assert_eq!(backend.calls(), vec!["documents.get", "documents.update"]);
        Ok(())
    }

    #[tokio::test]
    async fn upload_validates_before_any_call() {
        let backend = Arc::new(MemoryBackend::default());
        let request = UploadRequest {
            title: "  ".into(),
            device: DeviceType::Phone,
            category_id: None,
            file: Some(UploadFile::new("a.png", vec![1, 2, 3])),
        };
        let err = service(&backend).upload(request, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a title");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_stores_preview_url() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let request = UploadRequest {
            title: "Dunes".into(),
            device: DeviceType::Desktop,
            category_id: Some("nature".into()),
            file: Some(UploadFile::new("dunes.jpg", vec![7; 16])),
        };
        let record = service(&backend).upload(request, None).await?;
        let file_id = record.image_id.clone().unwrap_or_default();
        assert!(backend.has_file(&file_id));
        assert_eq!(
            record.image_url.as_deref(),
            Some(format!("memory://memory/{file_id}/preview").as_str())
        );
        assert_eq!(record.downloads, 0);
        assert!(!record.featured);
        assert_eq!(record.category_id.as_deref(), Some("nature"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_orphaned_file_after_retries() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let service = service(&backend);
        let record = service
            .upload(
                UploadRequest {
                    title: "Fog".into(),
                    device: DeviceType::Phone,
                    category_id: None,
                    file: Some(UploadFile::new("fog.png", vec![1])),
                },
                None,
            )
            .await?;
        backend.fail_next("storage.delete", FILE_DELETE_ATTEMPTS);
        let outcome = service.delete(&record).await?;
        assert_eq!(outcome.orphaned_file, record.image_id);
        assert!(backend.documents(COLLECTION).is_empty());
        let deletes = backend
            .calls()
            .iter()
            .filter(|call| *call == "storage.delete")
            .count();
        assert_eq!(deletes, FILE_DELETE_ATTEMPTS as usize);
        Ok(())
    }

    #[tokio::test]
    async fn delete_recovers_from_transient_file_failure() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let service = service(&backend);
        let record = service
            .upload(
                UploadRequest {
                    title: "Rain".into(),
                    device: DeviceType::Phone,
                    category_id: None,
                    file: Some(UploadFile::new("rain.png", vec![1])),
                },
                None,
            )
            .await?;
        backend.fail_next("storage.delete", 1);
        let outcome = service.delete(&record).await?;
        assert_eq!(outcome.orphaned_file, None);
        assert!(!backend.has_file(record.image_id.as_deref().unwrap_or_default()));
        Ok(())
    }

    #[tokio::test]
    async fn delete_without_file_skips_storage() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let mut doc = wallpaper_doc("a", "A", "phone", "2024-01-01T00:00:00Z");
        doc["imageId"] = Value::Null;
        backend.seed_document(COLLECTION, doc);
        let service = service(&backend);
        let record = service.get("a").await?;
        assert_eq!(record.image_id, None);
        service.delete(&record).await?;
        assert!(!backend.calls().iter().any(|call| call == "storage.delete"));
        Ok(())
    }

    #[tokio::test]
    async fn featured_filters_by_flag_and_device() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        for (id, device, featured) in [("a", "phone", true), ("b", "phone", false), ("c", "desktop", true)] {
            let mut doc = wallpaper_doc(id, id, device, "2024-01-01T00:00:00Z");
            doc["featured"] = json!(featured);
            backend.seed_document(COLLECTION, doc);
        }
        let records = service(&backend).featured(DeviceType::Phone).await?;
        assert_eq!(records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["a"]);
        Ok(())
    }
}
