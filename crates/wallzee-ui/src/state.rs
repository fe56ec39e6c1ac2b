//! App-wide yewdux store and view helpers.
//!
//! # Design
//! - One store holds the session and the toast queue; gallery lists stay
//!   component-local in a [`ListingState`](wallzee_core::ListingState).
//! - Reducers are plain methods so they run under native tests.

use std::rc::Rc;

use wallzee_config::BackendConfig;
use wallzee_core::download::failure_message;
use wallzee_core::preview::{ImageSource, THUMBNAIL_PLACEHOLDER};
use wallzee_core::{
    CategoryRecord, DeviceType, ListingState, SessionState, UserSession, WallpaperRecord,
};
use yew::Reducible;
use yewdux::store::Store;

use crate::config::preview_url;
use crate::models::{DOWNLOAD_TOAST_MS, FORM_TOAST_MS, ToastKind, ToastQueue};

/// Message shown when sign-in succeeds without the admin label.
pub const NOT_ADMIN_MESSAGE: &str = "You do not have administrator privileges";
/// Message shown for any other sign-in failure.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
/// Message shown when the remote password change fails.
pub const PASSWORD_FAILED_MESSAGE: &str =
    "Failed to update password. Please check your current password and try again.";

/// Global application store.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AppStore {
    /// Authentication lifecycle.
    pub session: SessionState,
    /// Pending notifications.
    pub toasts: ToastQueue,
}

impl AppStore {
    /// Record the resolved identity check.
    pub fn set_session(&mut self, user: Option<UserSession>) {
        self.session = user.map_or(SessionState::Anonymous, SessionState::Authenticated);
    }

    /// Drop the local session.
    pub fn sign_out(&mut self) {
        self.session = SessionState::Anonymous;
    }

    /// Download feedback, dismissed after three seconds.
    pub fn download_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.toasts.push(kind, message, DOWNLOAD_TOAST_MS)
    }

    /// Admin form feedback, dismissed after five seconds.
    pub fn form_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.toasts.push(kind, message, FORM_TOAST_MS)
    }

    /// Remove a toast by id.
    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.dismiss(id);
    }
}

/// Gallery list plus fetch status, driven through `use_reducer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryModel {
    /// Records, selection, page, and in-flight downloads.
    pub listing: ListingState,
    /// A fetch is outstanding.
    pub loading: bool,
    /// Last fetch failure.
    pub error: Option<String>,
}

impl GalleryModel {
    /// Empty model waiting for its first fetch.
    #[must_use]
    pub fn new(device: Option<DeviceType>, page_size: usize) -> Self {
        Self {
            listing: ListingState::new(device, page_size),
            loading: true,
            error: None,
        }
    }
}

/// Transitions applied to a [`GalleryModel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryAction {
    /// A fetch started.
    Loading,
    /// Records arrived; categories are replaced when present.
    Loaded {
        /// Fetched wallpapers.
        records: Vec<WallpaperRecord>,
        /// Fetched categories, if the view uses them.
        categories: Option<Vec<CategoryRecord>>,
    },
    /// The fetch failed.
    Failed(String),
    /// Category selector changed.
    SelectCategory(String),
    /// Search box changed.
    Search(String),
    /// Page number clicked.
    GoTo(usize),
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Download of a record started.
    DownloadStarted(String),
    /// Remote increment settled.
    DownloadFinished {
        /// Record id.
        id: String,
        /// Whether the increment was stored.
        success: bool,
    },
    /// Record deleted remotely.
    Removed(String),
    /// Record created remotely.
    Prepended(WallpaperRecord),
    /// Record updated remotely.
    Replaced(WallpaperRecord),
}

impl Reducible for GalleryModel {
    type Action = GalleryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let listing = &mut next.listing;
        match action {
            GalleryAction::Loading => {
                next.loading = true;
                next.error = None;
            }
            GalleryAction::Loaded {
                records,
                categories,
            } => {
                listing.set_records(records);
                if let Some(categories) = categories {
                    listing.set_categories(categories);
                }
                next.loading = false;
            }
            GalleryAction::Failed(message) => {
                next.loading = false;
                next.error = Some(message);
            }
            GalleryAction::SelectCategory(label) => listing.select_category(&label),
            GalleryAction::Search(query) => listing.set_search(query),
            GalleryAction::GoTo(page) => listing.go_to(page),
            GalleryAction::Next => listing.next(),
            GalleryAction::Prev => listing.prev(),
            GalleryAction::DownloadStarted(id) => {
                listing.begin_download(&id);
            }
            GalleryAction::DownloadFinished { id, success } => listing.finish_download(&id, success),
            GalleryAction::Removed(id) => {
                listing.remove(&id);
            }
            GalleryAction::Prepended(record) => listing.prepend(record),
            GalleryAction::Replaced(record) => {
                listing.replace(record);
            }
        }
        Rc::new(next)
    }
}

/// Settle a remote counter increment: the listing transition, plus the
/// error message to show when the increment failed. The saved file stays.
#[must_use]
pub fn settle_increment(id: String, outcome: Result<(), String>) -> (GalleryAction, Option<String>) {
    let message = outcome.err().map(|reason| failure_message(&reason));
    let action = GalleryAction::DownloadFinished {
        id,
        success: message.is_none(),
    };
    (action, message)
}

/// Card image for a gallery tile or the preview modal.
#[must_use]
pub fn card_image_url(backend: &BackendConfig, record: &WallpaperRecord) -> String {
    ImageSource::for_record(record)
        .resolve(|file_id, size| preview_url(backend, file_id, Some(size)))
}

/// Small thumbnail for admin tables.
#[must_use]
pub fn thumbnail_url(backend: &BackendConfig, record: &WallpaperRecord) -> String {
    match (&record.image_id, &record.image_url) {
        (Some(file_id), _) => preview_url(backend, file_id, None),
        (None, Some(url)) => url.clone(),
        (None, None) => THUMBNAIL_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallzee_core::DeviceType;
    use wallzee_core::preview::PHONE_PLACEHOLDER;
    use wallzee_test_support::records::{at, wallpaper};

    #[test]
    fn failed_increment_surfaces_a_download_error() {
        let (action, message) = settle_increment("w1".into(), Err("network down".into()));
        assert_eq!(
            action,
            GalleryAction::DownloadFinished {
                id: "w1".into(),
                success: false,
            }
        );
        assert_eq!(message.as_deref(), Some("Failed to download: network down"));

        let (action, message) = settle_increment("w1".into(), Ok(()));
        assert_eq!(
            action,
            GalleryAction::DownloadFinished {
                id: "w1".into(),
                success: true,
            }
        );
        assert!(message.is_none());
    }

    fn backend() -> BackendConfig {
        BackendConfig {
            endpoint: "https://cloud.example/v1".into(),
            project_id: "proj".into(),
            bucket_id: "bucket".into(),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn session_resolution_leaves_loading() {
        let mut store = AppStore::default();
        assert!(store.session.is_loading());
        store.set_session(None);
        assert_eq!(store.session, SessionState::Anonymous);
        store.set_session(Some(UserSession {
            user_id: "u1".into(),
            email: "root@example.com".into(),
            name: "Root".into(),
            is_admin: true,
        }));
        assert!(store.session.is_admin());
        store.sign_out();
        assert_eq!(store.session.user(), None);
    }

    #[test]
    fn toast_helpers_apply_their_timeouts() {
        let mut store = AppStore::default();
        let download = store.download_toast(ToastKind::Success, "saved");
        store.form_toast(ToastKind::Error, "failed");
        let ttls: Vec<u32> = store.toasts.items().iter().map(|toast| toast.ttl_ms).collect();
        assert_eq!(ttls, vec![3_000, 5_000]);
        store.dismiss_toast(download);
        assert_eq!(store.toasts.items().len(), 1);
    }

    fn reduce(model: GalleryModel, actions: Vec<GalleryAction>) -> GalleryModel {
        let mut model = Rc::new(model);
        for action in actions {
            model = model.reduce(action);
        }
        (*model).clone()
    }

    #[test]
    fn gallery_reducer_filters_and_pages() {
        let records: Vec<WallpaperRecord> = (1..=45)
            .map(|day| {
                let mut record =
                    wallpaper(&format!("w{day}"), DeviceType::Phone, at(2024, 1, day.min(28)));
                record.title = if day % 2 == 0 { "Even".into() } else { "Odd".into() };
                record
            })
            .collect();
        let model = reduce(
            GalleryModel::new(Some(DeviceType::Phone), 10),
            vec![
                GalleryAction::Loaded {
                    records,
                    categories: None,
                },
                GalleryAction::Next,
                GalleryAction::Next,
            ],
        );
        assert!(!model.loading);
        assert_eq!(model.listing.page(), 3);
        assert_eq!(model.listing.total_pages(), 5);

        let model = reduce(model, vec![GalleryAction::Search("even".into())]);
        assert_eq!(model.listing.page(), 1);
        assert_eq!(model.listing.filtered().len(), 22);
    }

    #[test]
    fn gallery_reducer_counts_downloads_once() {
        let record = wallpaper("w1", DeviceType::Desktop, at(2024, 3, 1));
        let model = reduce(
            GalleryModel::new(None, 40),
            vec![
                GalleryAction::Loaded {
                    records: vec![record],
                    categories: None,
                },
                GalleryAction::DownloadStarted("w1".into()),
            ],
        );
        assert!(model.listing.is_downloading("w1"));
        let model = reduce(
            model,
            vec![GalleryAction::DownloadFinished {
                id: "w1".into(),
                success: true,
            }],
        );
        assert!(!model.listing.is_downloading("w1"));
        assert_eq!(model.listing.records()[0].downloads, 1);
    }

    #[test]
    fn gallery_reducer_reports_failures() {
        let model = reduce(
            GalleryModel::new(None, 40),
            vec![GalleryAction::Failed("Failed to load wallpapers".into())],
        );
        assert!(!model.loading);
        assert_eq!(model.error.as_deref(), Some("Failed to load wallpapers"));
        let model = reduce(model, vec![GalleryAction::Loading]);
        assert!(model.loading);
        assert_eq!(model.error, None);
    }

    #[test]
    fn card_images_prefer_stored_files() {
        let mut record = wallpaper("w1", DeviceType::Phone, at(2024, 1, 1));
        record.image_id = Some("f1".into());
        assert!(
            card_image_url(&backend(), &record)
                .ends_with("width=1080&height=1920&gravity=center&quality=100")
        );

        record.image_id = None;
        record.image_url = None;
        assert_eq!(card_image_url(&backend(), &record), PHONE_PLACEHOLDER);
        assert_eq!(thumbnail_url(&backend(), &record), THUMBNAIL_PLACEHOLDER);
    }
}
