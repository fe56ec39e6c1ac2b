//! User profile documents and admin label management.
//!
//! # Design
//! - Profile document ids equal identity ids.
//! - Create-or-update creates only when the lookup reports not-found; any
//!   other failure is returned.
//! - Promotion edits the identity labels first, then mirrors the result into
//!   the profile's `isAdmin` flag.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};
use wallzee_api_models::{NewUserProfile, Query, UserDocument, UserProfilePatch};
use wallzee_config::{BackendConfig, ListingConfig};
use wallzee_core::stats::user_stats;
use wallzee_core::{Identity, UserProfile, UserStats};

use super::{decode, to_document};
use crate::error::ClientResult;
use crate::transport::{DocumentStore, IdentityService};

/// Profile and role operations.
#[derive(Clone)]
pub struct UserService {
    documents: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityService>,
    collection: String,
    admin_label: String,
    limit: u32,
}

impl UserService {
    /// Build the service from shared stores.
    #[must_use]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityService>,
        backend: &BackendConfig,
        listing: ListingConfig,
    ) -> Self {
        Self {
            documents,
            identity,
            collection: backend.users_collection_id.clone(),
            admin_label: backend.admin_label.clone(),
            limit: listing.admin_list_limit,
        }
    }

    /// Profiles, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    #[instrument(name = "users.list", skip(self))]
    pub async fn list(&self) -> ClientResult<Vec<UserProfile>> {
        let queries = [Query::newest_first(), Query::limit(self.limit)];
        let list = self
            .documents
            .list_documents(&self.collection, &queries)
            .await
            .inspect_err(|err| error!(error = %err, "user fetch failed"))?;
        list.documents
            .into_iter()
            .map(|document| decode::<UserDocument>("users.list", document).map(UserDocument::into_profile))
            .collect()
    }

    /// One profile by user id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::NotFound`] when no profile exists.
    pub async fn get(&self, user_id: &str) -> ClientResult<UserProfile> {
        let document = self.documents.get_document(&self.collection, user_id).await?;
        Ok(decode::<UserDocument>("users.get", document)?.into_profile())
    }

    /// Ensure a profile exists for `identity`, refreshing name and email.
    ///
    /// # Errors
    ///
    /// Returns any lookup failure other than not-found, or the write failure.
    #[instrument(name = "users.create_or_update", skip(self, identity), fields(user = %identity.id))]
    pub async fn create_or_update_profile(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> ClientResult<UserProfile> {
        match self.get(&identity.id).await {
            Ok(_) => {
                let patch = UserProfilePatch {
                    name: Some(identity.name.clone()),
                    email: Some(identity.email.clone()),
                    is_admin: None,
                };
                self.update(&identity.id, &patch).await
            }
            Err(err) if err.is_not_found() => {
                let body = to_document(
                    "users.create",
                    &NewUserProfile {
                        name: identity.name.clone(),
                        email: identity.email.clone(),
                        created_at: now,
                    },
                )?;
                let document = self
                    .documents
                    .create_document(&self.collection, &identity.id, body)
                    .await
                    .inspect_err(|err| error!(error = %err, "profile create failed"))?;
                info!("profile created");
                Ok(decode::<UserDocument>("users.create", document)?.into_profile())
            }
            Err(err) => {
                error!(error = %err, "profile lookup failed");
                Err(err)
            }
        }
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn update(&self, user_id: &str, patch: &UserProfilePatch) -> ClientResult<UserProfile> {
        let body = to_document("users.update", patch)?;
        let document = self
            .documents
            .update_document(&self.collection, user_id, body)
            .await
            .inspect_err(|err| error!(error = %err, user = user_id, "profile update failed"))?;
        Ok(decode::<UserDocument>("users.update", document)?.into_profile())
    }

    /// Delete a profile document.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn delete(&self, user_id: &str) -> ClientResult<()> {
        self.documents
            .delete_document(&self.collection, user_id)
            .await
            .inspect_err(|err| error!(error = %err, user = user_id, "profile delete failed"))
    }

    /// Profile counters.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn stats(&self, now: DateTime<Utc>) -> ClientResult<UserStats> {
        let profiles = self.list().await?;
        Ok(user_stats(&profiles, now))
    }

    /// Grant the admin label.
    ///
    /// # Errors
    ///
    /// Returns the label read or write failure; requires a server key
    /// against a remote backend.
    #[instrument(name = "users.promote", skip(self))]
    pub async fn promote(&self, user_id: &str) -> ClientResult<Vec<String>> {
        self.set_admin(user_id, true).await
    }

    /// Revoke the admin label.
    ///
    /// # Errors
    ///
    /// Returns the label read or write failure; requires a server key
    /// against a remote backend.
    #[instrument(name = "users.demote", skip(self))]
    pub async fn demote(&self, user_id: &str) -> ClientResult<Vec<String>> {
        self.set_admin(user_id, false).await
    }

    async fn set_admin(&self, user_id: &str, admin: bool) -> ClientResult<Vec<String>> {
        let mut labels = self.identity.user_labels(user_id).await?;
        labels.retain(|label| label != &self.admin_label);
        if admin {
            labels.push(self.admin_label.clone());
        }
        self.identity.update_user_labels(user_id, &labels).await?;

        let patch = UserProfilePatch {
            is_admin: Some(admin),
            ..UserProfilePatch::default()
        };
        match self.update(user_id, &patch).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                warn!(user = user_id, "labels changed for a user without a profile");
            }
            Err(err) => return Err(err),
        }
        info!(user = user_id, admin, "admin label updated");
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use chrono::TimeZone;
    use serde_json::json;

    fn service(backend: &Arc<MemoryBackend>) -> UserService {
        let config = BackendConfig {
            users_collection_id: "users".into(),
            ..BackendConfig::default()
        };
        UserService::new(backend.clone(), backend.clone(), &config, ListingConfig::default())
    }

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            labels: vec![],
        }
    }

    #[tokio::test]
    async fn profile_is_created_once_then_updated() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let service = service(&backend);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().unwrap_or_default();

        let created = service.create_or_update_profile(&identity("u1"), now).await?;
        assert_eq!(created.id, "u1");
        assert_eq!(created.created_at, now);

        let mut renamed = identity("u1");
        renamed.name = "Ada L".into();
        let updated = service.create_or_update_profile(&renamed, now).await?;
        assert_eq!(updated.name, "Ada L");
        assert_eq!(backend.documents("users").len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_failure_other_than_not_found_propagates() {
        let backend = Arc::new(MemoryBackend::default());
        backend.fail_next("documents.get", 1);
        let result = service(&backend)
            .create_or_update_profile(&identity("u1"), Utc::now())
            .await;
        assert!(result.is_err());
        assert!(!backend.calls().iter().any(|call| call == "documents.create"));
    }

    #[tokio::test]
    async fn promote_and_demote_toggle_label_and_flag() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        let id = backend.add_account("ada@example.com", "password1", "Ada", &["beta"]);
        backend.seed_document(
            "users",
            json!({"$id": id, "$createdAt": "2024-01-01T00:00:00Z", "name": "Ada", "email": "ada@example.com"}),
        );
        let service = service(&backend);

        let labels = service.promote(&id).await?;
        assert_eq!(labels, vec!["beta".to_string(), "admin".to_string()]);
        assert!(service.get(&id).await?.is_admin);

        let labels = service.demote(&id).await?;
        assert_eq!(labels, vec!["beta".to_string()]);
        assert!(!service.get(&id).await?.is_admin);
        Ok(())
    }
}
