//! REST implementation of the transport traits over `reqwest`.
//!
//! # Design
//! - Every request carries the project header; the session travels in the
//!   fallback-cookie header captured when the session was created.
//! - Files larger than [`CHUNK_SIZE`] are sent in ranged multipart chunks;
//!   chunks after the first name the file through `x-appwrite-id`.
//! - Label calls use the server key and never send the user session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use wallzee_api_models::query::encode_queries;
use wallzee_api_models::{
    AccountDocument, CreateDocumentRequest, DocumentList, EmailSessionRequest, ErrorBody,
    FileDocument, LabelsRequest, PasswordUpdateRequest, Query, ServerUser, SessionDocument,
    UNIQUE_ID, UpdateDocumentRequest, paths,
};
use wallzee_config::BackendConfig;
use wallzee_core::preview::{PREVIEW_GRAVITY, PREVIEW_QUALITY, PreviewSize};
use wallzee_core::{Identity, ValidationError};

use crate::error::{ClientError, ClientResult};
use crate::transport::{
    DocumentStore, IdentityService, ObjectStore, ProgressFn, UploadFile, UploadProgress,
};

/// Project header sent on every request.
pub const HEADER_PROJECT: &str = "X-Appwrite-Project";
/// Server key header for privileged calls.
pub const HEADER_KEY: &str = "X-Appwrite-Key";
/// Session carrier for clients without a cookie jar.
pub const HEADER_FALLBACK_COOKIES: &str = "X-Fallback-Cookies";
/// Names the file being assembled from chunks.
pub const HEADER_UPLOAD_ID: &str = "x-appwrite-id";
/// Upload chunk size in bytes.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Backend client for an Appwrite-compatible REST API.
#[derive(Clone)]
pub struct AppwriteClient {
    http: Client,
    backend: BackendConfig,
    session: Arc<RwLock<Option<String>>>,
}

impl AppwriteClient {
    /// Build a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] when the HTTP client cannot be built.
    pub fn new(backend: BackendConfig, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Http {
                operation: "client.build",
                source,
            })?;
        Ok(Self::with_client(http, backend))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub fn with_client(http: Client, backend: BackendConfig) -> Self {
        Self {
            http,
            backend,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Backend identifiers in use.
    #[must_use]
    pub const fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// Underlying HTTP client, shared with download sinks.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.http
    }

    /// Current fallback-cookie session token.
    pub async fn session_token(&self) -> Option<String> {
        self.session.read().await.clone()
    }

    /// Replace the session token, e.g. after loading it from disk.
    pub async fn set_session_token(&self, token: Option<String>) {
        *self.session.write().await = token;
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.backend.url(path))
            .header(HEADER_PROJECT, &self.backend.project_id);
        match self.session.read().await.as_deref() {
            Some(token) => builder.header(HEADER_FALLBACK_COOKIES, token),
            None => builder,
        }
    }

    fn server_request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let key = self
            .backend
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingApiKey)?;
        Ok(self
            .http
            .request(method, self.backend.url(path))
            .header(HEADER_PROJECT, &self.backend.project_id)
            .header(HEADER_KEY, key))
    }

    async fn execute(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ClientResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(classify_response(response).await)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.execute(operation, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Http { operation, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { operation, source })
    }

    fn collection_path(&self, collection: &str) -> String {
        paths::documents(&self.backend.database_id, collection)
    }

    fn file_url(&self, path: &str) -> String {
        format!("{}?project={}", self.backend.url(path), self.backend.project_id)
    }
}

/// Turn a failed response into a typed error.
pub async fn classify_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.unwrap_or_default();
    let body = serde_json::from_slice::<ErrorBody>(&bytes).ok();
    ClientError::from_status(status, body)
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    #[instrument(name = "documents.list", skip(self, queries))]
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> ClientResult<DocumentList<Value>> {
        let builder = self
            .request(Method::GET, &self.collection_path(collection))
            .await
            .query(&encode_queries(queries));
        self.execute_json("documents.list", builder).await
    }

    #[instrument(name = "documents.get", skip(self))]
    async fn get_document(&self, collection: &str, id: &str) -> ClientResult<Value> {
        let path = paths::document(&self.backend.database_id, collection, id);
        let builder = self.request(Method::GET, &path).await;
        self.execute_json("documents.get", builder).await
    }

    #[instrument(name = "documents.create", skip(self, data))]
    async fn create_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> ClientResult<Value> {
        let body = CreateDocumentRequest {
            document_id: id.to_string(),
            data,
        };
        let builder = self
            .request(Method::POST, &self.collection_path(collection))
            .await
            .json(&body);
        self.execute_json("documents.create", builder).await
    }

    #[instrument(name = "documents.update", skip(self, data))]
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> ClientResult<Value> {
        let path = paths::document(&self.backend.database_id, collection, id);
        let builder = self
            .request(Method::PATCH, &path)
            .await
            .json(&UpdateDocumentRequest { data });
        self.execute_json("documents.update", builder).await
    }

    #[instrument(name = "documents.delete", skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> ClientResult<()> {
        let path = paths::document(&self.backend.database_id, collection, id);
        let builder = self.request(Method::DELETE, &path).await;
        self.execute("documents.delete", builder).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for AppwriteClient {
    #[instrument(name = "storage.upload", skip(self, file, on_progress), fields(name = %file.name, size = file.bytes.len()))]
    async fn upload_file(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressFn<'_>>,
    ) -> ClientResult<FileDocument> {
        let path = paths::files(&self.backend.bucket_id);
        let total = file.bytes.len() as u64;
        let chunks: Vec<&[u8]> = file.bytes.chunks(CHUNK_SIZE).collect();
        let chunks_total = u32::try_from(chunks.len()).unwrap_or(u32::MAX);
        let mut uploaded_id: Option<String> = None;
        let mut last: Option<FileDocument> = None;
        let mut offset = 0_u64;

        for (index, chunk) in chunks.into_iter().enumerate() {
            let end = offset + chunk.len() as u64;
            let part = Part::bytes(chunk.to_vec())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|source| ClientError::Http {
                    operation: "storage.upload",
                    source,
                })?;
            let file_id = uploaded_id.clone().unwrap_or_else(|| UNIQUE_ID.to_string());
            let form = Form::new().text("fileId", file_id).part("file", part);
            let mut builder = self.request(Method::POST, &path).await.multipart(form);
            if chunks_total > 1 {
                builder = builder.header(
                    CONTENT_RANGE,
                    format!("bytes {offset}-{}/{total}", end.saturating_sub(1)),
                );
                if let Some(id) = &uploaded_id {
                    builder = builder.header(HEADER_UPLOAD_ID, id);
                }
            }

            let document: FileDocument = self.execute_json("storage.upload", builder).await?;
            if uploaded_id.is_none() {
                uploaded_id = Some(document.id.clone());
            }
            offset = end;
            let progress = UploadProgress {
                uploaded: offset,
                total,
                chunks_uploaded: u32::try_from(index + 1).unwrap_or(u32::MAX),
                chunks_total,
            };
            debug!(percent = progress.percent(), chunk = index + 1, "upload chunk sent");
            if let Some(callback) = on_progress {
                callback(progress);
            }
            last = Some(document);
        }

        last.ok_or(ClientError::Validation(ValidationError::MissingFile))
    }

    #[instrument(name = "storage.delete", skip(self))]
    async fn delete_file(&self, id: &str) -> ClientResult<()> {
        let path = paths::file(&self.backend.bucket_id, id);
        let builder = self.request(Method::DELETE, &path).await;
        self.execute("storage.delete", builder).await?;
        Ok(())
    }

    fn preview_url(&self, id: &str, size: Option<PreviewSize>) -> String {
        let mut url = self.file_url(&paths::file_preview(&self.backend.bucket_id, id));
        if let Some(size) = size {
            url.push_str(&format!(
                "&width={}&height={}&gravity={PREVIEW_GRAVITY}&quality={PREVIEW_QUALITY}",
                size.width, size.height
            ));
        }
        url
    }

    fn download_url(&self, id: &str) -> String {
        self.file_url(&paths::file_download(&self.backend.bucket_id, id))
    }

    fn view_url(&self, id: &str) -> String {
        self.file_url(&paths::file_view(&self.backend.bucket_id, id))
    }
}

#[async_trait]
impl IdentityService for AppwriteClient {
    #[instrument(name = "account.create_session", skip(self, password))]
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<SessionDocument> {
        let body = EmailSessionRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self
            .request(Method::POST, paths::EMAIL_SESSION)
            .await
            .json(&body);
        let response = self.execute("account.create_session", builder).await?;
        let token = response
            .headers()
            .get(HEADER_FALLBACK_COOKIES)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if token.is_none() {
            debug!("session response carried no fallback cookie");
        }
        let bytes = response.bytes().await.map_err(|source| ClientError::Http {
            operation: "account.create_session",
            source,
        })?;
        let session: SessionDocument =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                operation: "account.create_session",
                source,
            })?;
        if token.is_some() {
            self.set_session_token(token).await;
        }
        Ok(session)
    }

    #[instrument(name = "account.get", skip(self))]
    async fn current_identity(&self) -> ClientResult<Option<Identity>> {
        let builder = self.request(Method::GET, paths::ACCOUNT).await;
        let response = builder.send().await.map_err(|source| ClientError::Http {
            operation: "account.get",
            source,
        })?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(classify_response(response).await);
        }
        let account: AccountDocument = response.json().await.map_err(|source| ClientError::Http {
            operation: "account.get",
            source,
        })?;
        Ok(Some(account.into()))
    }

    #[instrument(name = "account.delete_session", skip(self))]
    async fn delete_current_session(&self) -> ClientResult<()> {
        let builder = self.request(Method::DELETE, paths::CURRENT_SESSION).await;
        let outcome = self.execute("account.delete_session", builder).await;
        self.set_session_token(None).await;
        outcome.map(|_| ())
    }

    #[instrument(name = "account.update_password", skip_all)]
    async fn update_password(&self, new_password: &str, old_password: &str) -> ClientResult<()> {
        let body = PasswordUpdateRequest {
            password: new_password.to_string(),
            old_password: old_password.to_string(),
        };
        let builder = self
            .request(Method::PATCH, paths::ACCOUNT_PASSWORD)
            .await
            .json(&body);
        self.execute("account.update_password", builder).await?;
        Ok(())
    }

    #[instrument(name = "users.get_labels", skip(self))]
    async fn user_labels(&self, user_id: &str) -> ClientResult<Vec<String>> {
        let builder = self.server_request(Method::GET, &paths::user(user_id))?;
        let user: ServerUser = self.execute_json("users.get_labels", builder).await?;
        Ok(user.labels)
    }

    #[instrument(name = "users.update_labels", skip(self))]
    async fn update_user_labels(&self, user_id: &str, labels: &[String]) -> ClientResult<()> {
        let builder = self
            .server_request(Method::PUT, &paths::user_labels(user_id))?
            .json(&LabelsRequest {
                labels: labels.to_vec(),
            });
        let _: Value = self.execute_json("users.update_labels", builder).await?;
        Ok(())
    }
}
