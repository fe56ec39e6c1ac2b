//! In-process backend implementing every transport trait.
//!
//! # Design
//! - Documents live in insertion order per collection and get system fields
//!   (`$id`, `$createdAt`, `$updatedAt`) on creation.
//! - `equal`, `orderAsc`, `orderDesc`, and `limit` queries are evaluated.
//! - Every call is appended to a log so tests can assert which remote calls ran.
//! - Failures can be injected per operation name.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;
use wallzee_api_models::{DocumentList, ErrorBody, FileDocument, Query, SessionDocument, UNIQUE_ID};
use wallzee_core::Identity;
use wallzee_core::preview::PreviewSize;

use crate::appwrite::CHUNK_SIZE;
use crate::error::{ClientError, ClientResult};
use crate::transport::{
    DocumentStore, IdentityService, ObjectStore, ProgressFn, UploadFile, UploadProgress,
};

#[derive(Debug, Clone)]
struct MemoryAccount {
    id: String,
    name: String,
    email: String,
    password: String,
    labels: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: BTreeMap<String, Vec<Value>>,
    files: BTreeMap<String, (FileDocument, Vec<u8>)>,
    accounts: Vec<MemoryAccount>,
    session_user: Option<String>,
    calls: Vec<String>,
    failures: BTreeMap<String, u32>,
    sequence: i64,
}

impl MemoryState {
    fn record(&mut self, operation: &str) -> ClientResult<()> {
        self.calls.push(operation.to_string());
        if let Some(remaining) = self.failures.get_mut(operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ClientError::Status {
                    code: 503,
                    kind: "general_unavailable".into(),
                    message: format!("injected failure for {operation}"),
                });
            }
        }
        Ok(())
    }

    fn next_timestamp(&mut self) -> String {
        self.sequence += 1;
        (Utc::now() + Duration::microseconds(self.sequence)).to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn session_account(&self) -> Option<&MemoryAccount> {
        let user = self.session_user.as_deref()?;
        self.accounts.iter().find(|account| account.id == user)
    }
}

/// Backend kept entirely in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    bucket: String,
    state: Mutex<MemoryState>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new("memory")
    }
}

fn not_found(message: &str) -> ClientError {
    ClientError::from_status(
        404,
        Some(ErrorBody {
            message: message.to_string(),
            code: 404,
            kind: "not_found".into(),
        }),
    )
}

fn unauthorized(kind: &str, message: &str) -> ClientError {
    ClientError::Status {
        code: 401,
        kind: kind.to_string(),
        message: message.to_string(),
    }
}

fn compare_attribute(a: &Value, b: &Value, attribute: &str) -> std::cmp::Ordering {
    match (a.get(attribute), b.get(attribute)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Equal,
    }
}

impl MemoryBackend {
    /// Empty backend whose URLs name `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a raw document as-is (system fields included).
    pub fn seed_document(&self, collection: &str, document: Value) {
        self.lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Register an account that can log in.
    pub fn add_account(&self, email: &str, password: &str, name: &str, labels: &[&str]) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.lock().accounts.push(MemoryAccount {
            id: id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            labels: labels.iter().map(|label| (*label).to_string()).collect(),
        });
        id
    }

    /// Make the next `times` calls of `operation` fail with a 503.
    pub fn fail_next(&self, operation: &str, times: u32) {
        self.lock().failures.insert(operation.to_string(), times);
    }

    /// Operation names in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Forget the call log.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Documents currently stored in `collection`.
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<Value> {
        self.lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a file with `id` is stored.
    #[must_use]
    pub fn has_file(&self, id: &str) -> bool {
        self.lock().files.contains_key(id)
    }

    /// Id of the signed-in account.
    #[must_use]
    pub fn session_user(&self) -> Option<String> {
        self.lock().session_user.clone()
    }

    /// Current password of an account, for assertions.
    #[must_use]
    pub fn password_of(&self, email: &str) -> Option<String> {
        self.lock()
            .accounts
            .iter()
            .find(|account| account.email == email)
            .map(|account| account.password.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> ClientResult<DocumentList<Value>> {
        let mut state = self.lock();
        state.record("documents.list")?;
        let mut documents = state
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default();

        for query in queries.iter().filter(|query| query.method() == "equal") {
            let Some(attribute) = query.attribute() else {
                continue;
            };
            documents.retain(|document| {
                document
                    .get(attribute)
                    .is_some_and(|value| query.values().contains(value))
            });
        }
        for query in queries {
            match (query.method(), query.attribute()) {
                ("orderDesc", Some(attribute)) => {
                    documents.sort_by(|a, b| compare_attribute(b, a, attribute));
                }
                ("orderAsc", Some(attribute)) => {
                    documents.sort_by(|a, b| compare_attribute(a, b, attribute));
                }
                _ => {}
            }
        }
        let total = documents.len() as u64;
        if let Some(limit) = queries
            .iter()
            .filter(|query| query.method() == "limit")
            .find_map(|query| query.values().first().and_then(Value::as_u64))
        {
            documents.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(DocumentList { total, documents })
    }

    async fn get_document(&self, collection: &str, id: &str) -> ClientResult<Value> {
        let mut state = self.lock();
        state.record("documents.get")?;
        state
            .collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|doc| doc["$id"] == id))
            .cloned()
            .ok_or_else(|| not_found("Document with the requested ID could not be found."))
    }

    async fn create_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> ClientResult<Value> {
        let mut state = self.lock();
        state.record("documents.create")?;
        let id = if id == UNIQUE_ID {
            Uuid::new_v4().simple().to_string()
        } else {
            id.to_string()
        };
        let exists = state
            .collections
            .get(collection)
            .is_some_and(|documents| documents.iter().any(|doc| doc["$id"] == id.as_str()));
        if exists {
            return Err(ClientError::Status {
                code: 409,
                kind: "document_already_exists".into(),
                message: "Document with the requested ID already exists.".into(),
            });
        }
        let now = state.next_timestamp();
        let mut object = match data {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        object.insert("$id".into(), Value::from(id));
        object.insert("$createdAt".into(), Value::from(now.clone()));
        object.insert("$updatedAt".into(), Value::from(now));
        let document = Value::Object(object);
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> ClientResult<Value> {
        let mut state = self.lock();
        state.record("documents.update")?;
        let now = state.next_timestamp();
        let document = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|doc| doc["$id"] == id))
            .ok_or_else(|| not_found("Document with the requested ID could not be found."))?;
        if let (Value::Object(target), Value::Object(patch)) = (&mut *document, data) {
            target.extend(patch);
            target.insert("$updatedAt".into(), Value::from(now));
        }
        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> ClientResult<()> {
        let mut state = self.lock();
        state.record("documents.delete")?;
        let documents = state
            .collections
            .get_mut(collection)
            .ok_or_else(|| not_found("Collection with the requested ID could not be found."))?;
        let index = documents
            .iter()
            .position(|doc| doc["$id"] == id)
            .ok_or_else(|| not_found("Document with the requested ID could not be found."))?;
        documents.remove(index);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload_file(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressFn<'_>>,
    ) -> ClientResult<FileDocument> {
        let document = {
            let mut state = self.lock();
            state.record("storage.upload")?;
            let id = Uuid::new_v4().simple().to_string();
            let chunks_total = u32::try_from(file.bytes.len().div_ceil(CHUNK_SIZE)).unwrap_or(u32::MAX);
            let document = FileDocument {
                id: id.clone(),
                bucket_id: self.bucket.clone(),
                name: file.name.clone(),
                size_original: file.bytes.len() as u64,
                mime_type: file.mime_type.clone(),
                chunks_total,
                chunks_uploaded: chunks_total,
            };
            state.files.insert(id, (document.clone(), file.bytes.clone()));
            document
        };
        if let Some(callback) = on_progress {
            let total = document.size_original;
            for chunk in 1..=document.chunks_total {
                callback(UploadProgress {
                    uploaded: (u64::from(chunk) * CHUNK_SIZE as u64).min(total),
                    total,
                    chunks_uploaded: chunk,
                    chunks_total: document.chunks_total,
                });
            }
        }
        Ok(document)
    }

    async fn delete_file(&self, id: &str) -> ClientResult<()> {
        let mut state = self.lock();
        state.record("storage.delete")?;
        state
            .files
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("The requested file could not be found."))
    }

    fn preview_url(&self, id: &str, size: Option<PreviewSize>) -> String {
        match size {
            Some(size) => format!(
                "memory://{}/{id}/preview?width={}&height={}",
                self.bucket, size.width, size.height
            ),
            None => format!("memory://{}/{id}/preview", self.bucket),
        }
    }

    fn download_url(&self, id: &str) -> String {
        format!("memory://{}/{id}/download", self.bucket)
    }

    fn view_url(&self, id: &str) -> String {
        format!("memory://{}/{id}/view", self.bucket)
    }
}

#[async_trait]
impl IdentityService for MemoryBackend {
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<SessionDocument> {
        let mut state = self.lock();
        state.record("account.create_session")?;
        let user_id = state
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == password)
            .map(|account| account.id.clone())
            .ok_or_else(|| {
                unauthorized(
                    "user_invalid_credentials",
                    "Invalid credentials. Please check the email and password.",
                )
            })?;
        state.session_user = Some(user_id.clone());
        Ok(SessionDocument {
            id: Uuid::new_v4().simple().to_string(),
            user_id,
            expire: None,
        })
    }

    async fn current_identity(&self) -> ClientResult<Option<Identity>> {
        let mut state = self.lock();
        state.record("account.get")?;
        Ok(state.session_account().map(|account| Identity {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            labels: account.labels.clone(),
        }))
    }

    async fn delete_current_session(&self) -> ClientResult<()> {
        let mut state = self.lock();
        state.record("account.delete_session")?;
        if state.session_user.take().is_none() {
            return Err(unauthorized(
                "general_unauthorized_scope",
                "User (role: guests) missing scope (account)",
            ));
        }
        Ok(())
    }

    async fn update_password(&self, new_password: &str, old_password: &str) -> ClientResult<()> {
        let mut state = self.lock();
        state.record("account.update_password")?;
        let user = state
            .session_user
            .clone()
            .ok_or_else(|| unauthorized("general_unauthorized_scope", "No active session"))?;
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.id == user)
            .ok_or_else(|| not_found("User with the requested ID could not be found."))?;
        if account.password != old_password {
            return Err(unauthorized(
                "user_invalid_credentials",
                "Invalid credentials. Please check the email and password.",
            ));
        }
        account.password = new_password.to_string();
        Ok(())
    }

    async fn user_labels(&self, user_id: &str) -> ClientResult<Vec<String>> {
        let mut state = self.lock();
        state.record("users.get_labels")?;
        state
            .accounts
            .iter()
            .find(|account| account.id == user_id)
            .map(|account| account.labels.clone())
            .ok_or_else(|| not_found("User with the requested ID could not be found."))
    }

    async fn update_user_labels(&self, user_id: &str, labels: &[String]) -> ClientResult<()> {
        let mut state = self.lock();
        state.record("users.update_labels")?;
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.id == user_id)
            .ok_or_else(|| not_found("User with the requested ID could not be found."))?;
        account.labels = labels.to_vec();
        Ok(())
    }
}
