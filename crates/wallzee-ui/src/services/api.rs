//! Appwrite REST client for the browser.
//!
//! # Design
//! - Every request carries the project header; the session travels in the
//!   fallback-cookie header persisted to local storage.
//! - Documents with an unknown device string are skipped with a console warning.
//! - Failures are logged to the console and returned unchanged.

use chrono::{DateTime, Utc};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wallzee_api_models::paths;
use wallzee_api_models::query::encode_queries;
use wallzee_api_models::{
    AccountDocument, CategoryDocument, CategoryInput, CreateDocumentRequest, DocumentList,
    EmailSessionRequest, ErrorBody, FileDocument, NewWallpaper, PasswordUpdateRequest, Query,
    SessionDocument, UNIQUE_ID, UpdateDocumentRequest, UserDocument, WallpaperDocument,
    WallpaperPatch,
};
use wallzee_config::{BackendConfig, ListingConfig, WallzeeConfig};
use wallzee_core::stats::{category_counts, compute_stats};
use wallzee_core::validate::{
    ValidationError, ensure_category_deletable, validate_login, validate_password_change,
};
use wallzee_core::{
    CategoryRecord, CategorySummary, CoreError, DashboardStats, DeviceType, Identity, UserProfile,
    UserSession, WallpaperRecord,
};
use web_sys::{File, FormData};

use crate::config::{download_url, preview_url};

const HEADER_PROJECT: &str = "X-Appwrite-Project";
const HEADER_FALLBACK_COOKIES: &str = "X-Fallback-Cookies";
const HEADER_UPLOAD_ID: &str = "x-appwrite-id";
const SESSION_KEY: &str = "cookieFallback";
const CHUNK_SIZE: f64 = 5.0 * 1024.0 * 1024.0;
const FILE_DELETE_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_MS: u32 = 250;

/// Failures surfaced to components.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Access Denied: This user is not authorized to access the admin panel.")]
    AccessDenied,
    #[error("{message}")]
    Remote {
        status: u16,
        kind: String,
        message: String,
    },
    #[error("network error: {0}")]
    Transport(#[from] gloo_net::Error),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("browser error: {0}")]
    Browser(String),
}

impl ApiError {
    pub(crate) const fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }

    pub(crate) const fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Upload progress reported after each chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChunkProgress {
    pub sent: u64,
    pub total: u64,
}

impl ChunkProgress {
    pub(crate) fn percent(self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        u32::try_from(self.sent.saturating_mul(100) / self.total).unwrap_or(100)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    backend: BackendConfig,
    listing: ListingConfig,
}

impl ApiClient {
    pub(crate) fn new(config: &WallzeeConfig) -> Self {
        Self {
            backend: config.backend.clone(),
            listing: config.listing,
        }
    }

    pub(crate) const fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    pub(crate) const fn page_size(&self) -> usize {
        self.listing.page_size
    }

    pub(crate) fn image_url(&self, record: &WallpaperRecord) -> String {
        crate::state::card_image_url(&self.backend, record)
    }

    pub(crate) fn thumbnail(&self, record: &WallpaperRecord) -> String {
        crate::state::thumbnail_url(&self.backend, record)
    }

    pub(crate) fn download_url(&self, file_id: &str) -> String {
        download_url(&self.backend, file_id)
    }

    fn url(&self, path: &str) -> String {
        self.backend.url(path)
    }

    fn query_url(&self, path: &str, queries: &[Query]) -> String {
        let params: Vec<String> = encode_queries(queries)
            .into_iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value)
                )
            })
            .collect();
        if params.is_empty() {
            self.url(path)
        } else {
            format!("{}?{}", self.url(path), params.join("&"))
        }
    }

    fn prepare(&self, req: Request) -> Request {
        let req = req.header(HEADER_PROJECT, &self.backend.project_id);
        match LocalStorage::get::<String>(SESSION_KEY) {
            Ok(cookies) => req.header(HEADER_FALLBACK_COOKIES, &cookies),
            Err(_) => req,
        }
    }

    async fn send(&self, operation: &'static str, req: Request) -> ApiResult<Response> {
        let response = match self.prepare(req).send().await {
            Ok(response) => response,
            Err(err) => {
                console::error!(format!("{operation} failed: {err}"));
                return Err(err.into());
            }
        };
        if let Some(cookies) = response.headers().get(HEADER_FALLBACK_COOKIES) {
            LocalStorage::set(SESSION_KEY, cookies).ok();
        }
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.json::<ErrorBody>().await.ok();
        let (kind, message) = body.map_or_else(
            || (String::new(), format!("request failed with status {status}")),
            |body| (body.kind, body.message),
        );
        if status != 401 {
            console::error!(format!("{operation} failed ({status}): {message}"));
        }
        Err(ApiError::Remote {
            status,
            kind,
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        req: Request,
    ) -> ApiResult<T> {
        Ok(self.send(operation, req).await?.json::<T>().await?)
    }

    fn with_json<B: Serialize>(req: Request, body: &B) -> ApiResult<Request> {
        Ok(req.json(body)?)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        collection: &str,
        queries: &[Query],
    ) -> ApiResult<Vec<T>> {
        let path = paths::documents(&self.backend.database_id, collection);
        let list: DocumentList<T> = self
            .send_json(operation, Request::get(&self.query_url(&path, queries)))
            .await?;
        Ok(list.documents)
    }

    async fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        collection: &str,
        id: &str,
        data: B,
    ) -> ApiResult<T> {
        let path = paths::documents(&self.backend.database_id, collection);
        let body = CreateDocumentRequest {
            document_id: id.to_string(),
            data,
        };
        let req = Self::with_json(Request::post(&self.url(&path)), &body)?;
        self.send_json(operation, req).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        collection: &str,
        id: &str,
        data: B,
    ) -> ApiResult<T> {
        let path = paths::document(&self.backend.database_id, collection, id);
        let req = Self::with_json(Request::patch(&self.url(&path)), &UpdateDocumentRequest { data })?;
        self.send_json(operation, req).await
    }

    async fn remove(&self, operation: &'static str, collection: &str, id: &str) -> ApiResult<()> {
        let path = paths::document(&self.backend.database_id, collection, id);
        self.send(operation, Request::delete(&self.url(&path))).await?;
        Ok(())
    }

    async fn wallpapers(
        &self,
        operation: &'static str,
        queries: &[Query],
    ) -> ApiResult<Vec<WallpaperRecord>> {
        let documents: Vec<serde_json::Value> = self
            .list(operation, &self.backend.wallpapers_collection_id, queries)
            .await?;
        Ok(documents
            .into_iter()
            .filter_map(|document| {
                let parsed = serde_json::from_value::<WallpaperDocument>(document)
                    .map_err(|err| err.to_string())
                    .and_then(|raw| raw.into_record().map_err(|err| err.to_string()));
                match parsed {
                    Ok(record) => Some(record),
                    Err(err) => {
                        console::warn!(format!("{operation}: skipping wallpaper: {err}"));
                        None
                    }
                }
            })
            .collect())
    }

    pub(crate) async fn list_wallpapers(
        &self,
        device: Option<DeviceType>,
    ) -> ApiResult<Vec<WallpaperRecord>> {
        let mut queries = vec![Query::newest_first(), Query::limit(self.listing.stats_limit)];
        if let Some(device) = device {
            queries.push(Query::equal("category", device.as_str()));
        }
        self.wallpapers("wallpapers.list", &queries).await
    }

    pub(crate) async fn featured(&self, device: DeviceType) -> ApiResult<Vec<WallpaperRecord>> {
        let queries = [
            Query::equal("featured", true),
            Query::equal("category", device.as_str()),
            Query::newest_first(),
            Query::limit(self.listing.featured_limit),
        ];
        self.wallpapers("wallpapers.featured", &queries).await
    }

    pub(crate) async fn admin_wallpapers(&self) -> ApiResult<Vec<WallpaperRecord>> {
        let queries = [
            Query::newest_first(),
            Query::limit(self.listing.admin_list_limit),
        ];
        self.wallpapers("wallpapers.admin_list", &queries).await
    }

    pub(crate) async fn dashboard_stats(&self, now: DateTime<Utc>) -> ApiResult<DashboardStats> {
        let queries = [Query::newest_first(), Query::limit(self.listing.stats_limit)];
        let records = self.wallpapers("wallpapers.stats", &queries).await?;
        Ok(compute_stats(&records, now))
    }

    async fn get_wallpaper(&self, id: &str) -> ApiResult<WallpaperRecord> {
        let path = paths::document(
            &self.backend.database_id,
            &self.backend.wallpapers_collection_id,
            id,
        );
        let document: WallpaperDocument = self
            .send_json("wallpapers.get", Request::get(&self.url(&path)))
            .await?;
        Ok(document.into_record()?)
    }

    pub(crate) async fn update_wallpaper(
        &self,
        id: &str,
        patch: &WallpaperPatch,
    ) -> ApiResult<WallpaperRecord> {
        let document: WallpaperDocument = self
            .patch(
                "wallpapers.update",
                &self.backend.wallpapers_collection_id,
                id,
                patch,
            )
            .await?;
        Ok(document.into_record()?)
    }

    /// Read-then-write increment; returns the stored count.
    pub(crate) async fn increment_downloads(&self, id: &str) -> ApiResult<u64> {
        let current = self.get_wallpaper(id).await?;
        let downloads = current.downloads.saturating_add(1);
        let patch = WallpaperPatch {
            downloads: Some(downloads),
            ..WallpaperPatch::default()
        };
        self.update_wallpaper(id, &patch).await?;
        Ok(downloads)
    }

    pub(crate) async fn set_featured(&self, id: &str, featured: bool) -> ApiResult<WallpaperRecord> {
        let patch = WallpaperPatch {
            featured: Some(featured),
            ..WallpaperPatch::default()
        };
        self.update_wallpaper(id, &patch).await
    }

    async fn upload_file(
        &self,
        file: &File,
        on_progress: &dyn Fn(ChunkProgress),
    ) -> ApiResult<FileDocument> {
        let url = self.url(&paths::files(&self.backend.bucket_id));
        let size = file.size();
        let total = size as u64;
        let chunked = size > CHUNK_SIZE;
        let mut uploaded_id: Option<String> = None;
        let mut start = 0.0_f64;
        loop {
            let end = (start + CHUNK_SIZE).min(size);
            let blob = file
                .slice_with_f64_and_f64(start, end)
                .map_err(|err| ApiError::Browser(format!("{err:?}")))?;
            let form = FormData::new().map_err(|err| ApiError::Browser(format!("{err:?}")))?;
            let file_id = uploaded_id.clone().unwrap_or_else(|| UNIQUE_ID.to_string());
            form.append_with_str("fileId", &file_id)
                .map_err(|err| ApiError::Browser(format!("{err:?}")))?;
            form.append_with_blob_and_filename("file", &blob, &file.name())
                .map_err(|err| ApiError::Browser(format!("{err:?}")))?;

            let mut req = Request::post(&url).body(form);
            if chunked {
                req = req.header(
                    "content-range",
                    &format!("bytes {}-{}/{total}", start as u64, (end as u64).saturating_sub(1)),
                );
                if let Some(id) = &uploaded_id {
                    req = req.header(HEADER_UPLOAD_ID, id);
                }
            }
            let document: FileDocument = self.send_json("storage.upload", req).await?;
            if uploaded_id.is_none() {
                uploaded_id = Some(document.id.clone());
            }
            on_progress(ChunkProgress {
                sent: end as u64,
                total,
            });
            start = end;
            if start >= size {
                return Ok(document);
            }
        }
    }

    async fn delete_file(&self, file_id: &str) -> ApiResult<()> {
        let path = paths::file(&self.backend.bucket_id, file_id);
        self.send("storage.delete", Request::delete(&self.url(&path)))
            .await?;
        Ok(())
    }

    /// Upload the image, then create its document; the file is removed again
    /// when the document write fails.
    pub(crate) async fn upload_wallpaper(
        &self,
        title: &str,
        device: DeviceType,
        category_id: Option<String>,
        file: &File,
        on_progress: &dyn Fn(ChunkProgress),
    ) -> ApiResult<WallpaperRecord> {
        let stored = self.upload_file(file, on_progress).await?;
        let data = NewWallpaper {
            title: title.trim().to_string(),
            category: device,
            image_id: stored.id.clone(),
            image_url: preview_url(&self.backend, &stored.id, None),
            downloads: 0,
            featured: false,
            category_id,
        };
        let created: ApiResult<WallpaperDocument> = self
            .create(
                "wallpapers.upload",
                &self.backend.wallpapers_collection_id,
                UNIQUE_ID,
                data,
            )
            .await;
        match created {
            Ok(document) => Ok(document.into_record()?),
            Err(err) => {
                if let Err(cleanup) = self.delete_file(&stored.id).await {
                    console::warn!(format!("uploaded file {} left behind: {cleanup}", stored.id));
                }
                Err(err)
            }
        }
    }

    /// Delete the document, then retry its file; returns an orphaned file id.
    pub(crate) async fn delete_wallpaper(
        &self,
        record: &WallpaperRecord,
    ) -> ApiResult<Option<String>> {
        self.remove(
            "wallpapers.delete",
            &self.backend.wallpapers_collection_id,
            &record.id,
        )
        .await?;
        let Some(file_id) = record.image_id.as_deref() else {
            return Ok(None);
        };
        for attempt in 1..=FILE_DELETE_ATTEMPTS {
            match self.delete_file(file_id).await {
                Ok(()) => return Ok(None),
                Err(err) if err.is_not_found() => return Ok(None),
                Err(err) => {
                    console::warn!(format!("file delete attempt {attempt} failed: {err}"));
                    if attempt < FILE_DELETE_ATTEMPTS {
                        TimeoutFuture::new(RETRY_BACKOFF_MS * attempt).await;
                    }
                }
            }
        }
        Ok(Some(file_id.to_string()))
    }

    pub(crate) async fn list_categories(&self) -> ApiResult<Vec<CategoryRecord>> {
        let queries = [
            Query::order_asc("name"),
            Query::limit(self.listing.category_limit),
        ];
        let documents: Vec<CategoryDocument> = self
            .list(
                "categories.list",
                &self.backend.categories_collection_id,
                &queries,
            )
            .await?;
        Ok(documents.into_iter().map(CategoryDocument::into_record).collect())
    }

    pub(crate) async fn category_summaries(&self) -> ApiResult<Vec<CategorySummary>> {
        let (categories, wallpapers) =
            futures_util::join!(self.list_categories(), self.list_wallpapers(None));
        Ok(category_counts(&categories?, &wallpapers?))
    }

    pub(crate) async fn save_category(
        &self,
        id: Option<&str>,
        input: CategoryInput,
    ) -> ApiResult<CategoryRecord> {
        let collection = &self.backend.categories_collection_id;
        let document: CategoryDocument = match id {
            Some(id) => self.patch("categories.update", collection, id, input).await?,
            None => {
                self.create("categories.create", collection, UNIQUE_ID, input)
                    .await?
            }
        };
        Ok(document.into_record())
    }

    /// Refused locally while wallpapers still reference the category.
    pub(crate) async fn delete_category(&self, id: &str, wallpaper_count: usize) -> ApiResult<()> {
        ensure_category_deletable(wallpaper_count)?;
        self.remove("categories.delete", &self.backend.categories_collection_id, id)
            .await
    }

    pub(crate) async fn list_users(&self) -> ApiResult<Vec<UserProfile>> {
        let queries = [Query::newest_first(), Query::limit(self.listing.stats_limit)];
        let documents: Vec<UserDocument> = self
            .list("users.list", &self.backend.users_collection_id, &queries)
            .await?;
        Ok(documents.into_iter().map(UserDocument::into_profile).collect())
    }

    async fn identity(&self) -> ApiResult<Identity> {
        let account: AccountDocument = self
            .send_json("account.get", Request::get(&self.url(paths::ACCOUNT)))
            .await?;
        Ok(account.into())
    }

    /// Current user; any failure reads as signed out.
    pub(crate) async fn current_user(&self) -> Option<UserSession> {
        match self.identity().await {
            Ok(identity) => Some(UserSession::from_identity(
                &identity,
                &self.backend.admin_label,
            )),
            Err(_) => None,
        }
    }

    /// Email sign-in that never leaves a non-admin session behind.
    pub(crate) async fn login(&self, email: &str, password: &str) -> ApiResult<UserSession> {
        validate_login(email, password)?;
        let body = EmailSessionRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let req = Self::with_json(Request::post(&self.url(paths::EMAIL_SESSION)), &body)?;
        let _session: SessionDocument = self.send_json("account.create_session", req).await?;

        let user = match self.identity().await {
            Ok(identity) => UserSession::from_identity(&identity, &self.backend.admin_label),
            Err(err) => {
                self.logout().await;
                return Err(err);
            }
        };
        if !user.is_admin {
            self.logout().await;
            return Err(ApiError::AccessDenied);
        }
        Ok(user)
    }

    /// Delete the current session; failures are only logged.
    pub(crate) async fn logout(&self) {
        if let Err(err) = self
            .send(
                "account.delete_session",
                Request::delete(&self.url(paths::CURRENT_SESSION)),
            )
            .await
        {
            console::warn!(format!("logout failed: {err}"));
        }
        LocalStorage::delete(SESSION_KEY);
    }

    /// Validate, then change the password. A remote failure drops the local
    /// session.
    pub(crate) async fn update_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> ApiResult<()> {
        validate_password_change(current, new, confirm)?;
        let body = PasswordUpdateRequest {
            password: new.to_string(),
            old_password: current.to_string(),
        };
        let req = Self::with_json(Request::patch(&self.url(paths::ACCOUNT_PASSWORD)), &body)?;
        if let Err(err) = self.send("account.update_password", req).await {
            LocalStorage::delete(SESSION_KEY);
            return Err(err);
        }
        Ok(())
    }
}
