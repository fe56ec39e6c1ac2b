//! Category CRUD with the in-use guard.

use std::sync::Arc;

use tracing::{error, info, instrument};
use wallzee_api_models::{CategoryDocument, CategoryInput, Query, UNIQUE_ID};
use wallzee_config::{BackendConfig, ListingConfig};
use wallzee_core::stats::category_counts;
use wallzee_core::validate::{ensure_category_deletable, validate_category_name};
use wallzee_core::{CategoryRecord, CategorySummary, WallpaperRecord};

use super::{decode, to_document};
use crate::error::ClientResult;
use crate::transport::DocumentStore;

/// Category operations against the configured collection.
#[derive(Clone)]
pub struct CategoryService {
    documents: Arc<dyn DocumentStore>,
    collection: String,
    limit: u32,
}

impl CategoryService {
    /// Build the service from a shared document store.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>, backend: &BackendConfig, listing: ListingConfig) -> Self {
        Self {
            documents,
            collection: backend.categories_collection_id.clone(),
            limit: listing.category_limit,
        }
    }

    /// Categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    #[instrument(name = "categories.list", skip(self))]
    pub async fn list(&self) -> ClientResult<Vec<CategoryRecord>> {
        let queries = [Query::order_asc("name"), Query::limit(self.limit)];
        let list = self
            .documents
            .list_documents(&self.collection, &queries)
            .await
            .inspect_err(|err| error!(error = %err, "category fetch failed"))?;
        list.documents
            .into_iter()
            .map(|document| {
                decode::<CategoryDocument>("categories.list", document).map(CategoryDocument::into_record)
            })
            .collect()
    }

    /// Categories with the number of wallpapers referencing each.
    ///
    /// # Errors
    ///
    /// Returns the backend failure unchanged.
    pub async fn list_with_counts(
        &self,
        wallpapers: &[WallpaperRecord],
    ) -> ClientResult<Vec<CategorySummary>> {
        let categories = self.list().await?;
        Ok(category_counts(&categories, wallpapers))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or the backend failure.
    #[instrument(name = "categories.create", skip(self, description, icon))]
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> ClientResult<CategoryRecord> {
        validate_category_name(name)?;
        let body = to_document("categories.create", &CategoryInput::new(name, description, icon))?;
        let document = self
            .documents
            .create_document(&self.collection, UNIQUE_ID, body)
            .await
            .inspect_err(|err| error!(error = %err, "category create failed"))?;
        let record = decode::<CategoryDocument>("categories.create", document)?.into_record();
        info!(id = %record.id, "category created");
        Ok(record)
    }

    /// Overwrite a category's attributes.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or the backend failure.
    #[instrument(name = "categories.update", skip(self, description, icon))]
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> ClientResult<CategoryRecord> {
        validate_category_name(name)?;
        let body = to_document("categories.update", &CategoryInput::new(name, description, icon))?;
        let document = self
            .documents
            .update_document(&self.collection, id, body)
            .await
            .inspect_err(|err| error!(error = %err, "category update failed"))?;
        Ok(decode::<CategoryDocument>("categories.update", document)?.into_record())
    }

    /// Delete a category that no wallpaper references.
    ///
    /// `wallpaper_count` comes from the caller's current view; a non-zero
    /// count refuses the deletion without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`wallzee_core::ValidationError::CategoryInUse`] or the backend
    /// failure.
    #[instrument(name = "categories.delete", skip(self))]
    pub async fn delete(&self, id: &str, wallpaper_count: usize) -> ClientResult<()> {
        ensure_category_deletable(wallpaper_count)?;
        self.documents
            .delete_document(&self.collection, id)
            .await
            .inspect_err(|err| error!(error = %err, "category delete failed"))?;
        info!("category deleted");
        Ok(())
    }
}
