//! Shared state for the Featured, Phone, Desktop, and admin listing views.
//!
//! # Design
//! - One state type drives every listing; views differ only in device scope.
//! - Predicate changes reset the page to 1; page moves clamp to the filtered
//!   list.
//! - Mutations are local patches applied after a remote call succeeds.

use crate::download::{InFlightDownloads, apply_download_increment};
use crate::filter::{self, CategorySelection, WallpaperFilter};
use crate::model::{CategoryRecord, DeviceType, WallpaperRecord};
use crate::paging::{self, DEFAULT_PAGE_SIZE, Page, PageToken};

/// Per-view listing state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingState {
    records: Vec<WallpaperRecord>,
    categories: Vec<CategoryRecord>,
    filter: WallpaperFilter,
    page: usize,
    page_size: usize,
    downloads: InFlightDownloads,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(None, DEFAULT_PAGE_SIZE)
    }
}

impl ListingState {
    /// Empty state scoped to a device type (or none), with a page size.
    #[must_use]
    pub fn new(device: Option<DeviceType>, page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            categories: Vec::new(),
            filter: WallpaperFilter {
                device,
                ..WallpaperFilter::default()
            },
            page: 1,
            page_size: page_size.max(1),
            downloads: InFlightDownloads::default(),
        }
    }

    /// Replace the records, sorting newest first.
    pub fn set_records(&mut self, mut records: Vec<WallpaperRecord>) {
        filter::sort_newest_first(&mut records);
        self.records = records;
        self.clamp_page();
    }

    /// Replace the category list.
    pub fn set_categories(&mut self, categories: Vec<CategoryRecord>) {
        self.categories = categories;
    }

    /// Select a category by selector label.
    pub fn select_category(&mut self, label: &str) {
        self.filter.category = CategorySelection::from_label(label);
        self.page = 1;
    }

    /// Update the search query.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
        self.page = 1;
    }

    /// Jump to a page, clamped to the filtered list.
    pub fn go_to(&mut self, page: usize) {
        self.page = paging::clamp_page(page, self.total_pages());
    }

    /// Advance one page.
    pub fn next(&mut self) {
        self.page = paging::next_page(self.page, self.total_pages());
    }

    /// Go back one page.
    pub fn prev(&mut self) {
        self.page = paging::prev_page(self.page, self.total_pages());
    }

    /// All records, newest first.
    #[must_use]
    pub fn records(&self) -> &[WallpaperRecord] {
        &self.records
    }

    /// Fetched categories.
    #[must_use]
    pub fn categories(&self) -> &[CategoryRecord] {
        &self.categories
    }

    /// Active predicates.
    #[must_use]
    pub const fn filter(&self) -> &WallpaperFilter {
        &self.filter
    }

    /// Current page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Records that pass the active predicates.
    #[must_use]
    pub fn filtered(&self) -> Vec<&WallpaperRecord> {
        filter::filter_wallpapers(&self.records, &self.categories, &self.filter)
    }

    /// Pages available for the filtered list.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        paging::total_pages(self.filtered().len(), self.page_size)
    }

    /// The page currently on screen.
    #[must_use]
    pub fn visible_page(&self) -> Page<&WallpaperRecord> {
        paging::paginate(&self.filtered(), self.page_size, self.page)
    }

    /// Selector tokens for the current page.
    #[must_use]
    pub fn page_tokens(&self) -> Vec<PageToken> {
        paging::page_window(self.page, self.total_pages())
    }

    /// Whether page controls are needed.
    #[must_use]
    pub fn show_pagination(&self) -> bool {
        paging::needs_pagination(self.filtered().len(), self.page_size)
    }

    /// Selector labels for the category dropdown.
    #[must_use]
    pub fn category_options(&self) -> Vec<String> {
        filter::category_options(&self.categories)
    }

    /// Mark a download as started; `false` when it is already running.
    pub fn begin_download(&mut self, id: &str) -> bool {
        self.downloads.begin(id)
    }

    /// Clear the in-flight flag, applying the optimistic +1 on success.
    pub fn finish_download(&mut self, id: &str, success: bool) {
        self.downloads.finish(id);
        if success {
            self.apply_increment(id);
        }
    }

    /// Whether `id` is currently downloading.
    #[must_use]
    pub fn is_downloading(&self, id: &str) -> bool {
        self.downloads.contains(id)
    }

    /// Add one to the local download counter for `id`.
    pub fn apply_increment(&mut self, id: &str) -> bool {
        apply_download_increment(&mut self.records, id)
    }

    /// Drop a record after a successful remote delete.
    pub fn remove(&mut self, id: &str) -> Option<WallpaperRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        self.clamp_page();
        Some(removed)
    }

    /// Insert a freshly created record at the top.
    pub fn prepend(&mut self, record: WallpaperRecord) {
        self.records.insert(0, record);
    }

    /// Patch the featured flag of a record.
    pub fn set_featured(&mut self, id: &str, featured: bool) -> bool {
        let Some(record) = self.find_mut(id) else {
            return false;
        };
        record.featured = featured;
        true
    }

    /// Replace a record with its updated copy.
    pub fn replace(&mut self, updated: WallpaperRecord) -> bool {
        match self.find_mut(&updated.id) {
            Some(record) => {
                *record = updated;
                true
            }
            None => false,
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut WallpaperRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    fn clamp_page(&mut self) {
        self.page = paging::clamp_page(self.page, self.total_pages());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(index: i64, device: DeviceType) -> WallpaperRecord {
        WallpaperRecord {
            id: format!("w{index}"),
            title: format!("Wallpaper {index}"),
            device,
            category_id: None,
            image_id: Some(format!("f{index}")),
            image_url: None,
            downloads: 0,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(index),
        }
    }

    fn state_with(count: i64) -> ListingState {
        let mut state = ListingState::new(Some(DeviceType::Phone), 40);
        state.set_records((0..count).map(|i| record(i, DeviceType::Phone)).collect());
        state
    }

    #[test]
    fn records_are_sorted_newest_first() {
        let state = state_with(3);
        let ids: Vec<_> = state.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1", "w0"]);
    }

    #[test]
    fn paging_through_eighty_five_records() {
        let mut state = state_with(85);
        assert!(state.show_pagination());
        assert_eq!(state.total_pages(), 3);
        state.next();
        state.next();
        state.next();
        assert_eq!(state.page(), 3);
        assert_eq!(state.visible_page().items.len(), 5);
        state.go_to(0);
        assert_eq!(state.page(), 1);
        state.prev();
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn predicate_changes_reset_to_first_page() {
        let mut state = state_with(85);
        state.go_to(3);
        state.set_search("Wallpaper 1");
        assert_eq!(state.page(), 1);
        state.go_to(2);
        state.select_category("All");
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn device_scope_hides_other_devices() {
        let mut state = ListingState::new(Some(DeviceType::Desktop), 40);
        state.set_records(vec![record(1, DeviceType::Phone), record(2, DeviceType::Desktop)]);
        let visible = state.visible_page();
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, "w2");
    }

    #[test]
    fn download_lifecycle_applies_one_increment() {
        let mut state = state_with(2);
        assert!(state.begin_download("w1"));
        assert!(!state.begin_download("w1"));
        assert!(state.is_downloading("w1"));
        state.finish_download("w1", true);
        assert!(!state.is_downloading("w1"));
        let record = state.records().iter().find(|r| r.id == "w1").unwrap();
        assert_eq!(record.downloads, 1);

        assert!(state.begin_download("w0"));
        state.finish_download("w0", false);
        let record = state.records().iter().find(|r| r.id == "w0").unwrap();
        assert_eq!(record.downloads, 0);
    }

    #[test]
    fn local_patches() {
        let mut state = state_with(2);
        state.prepend(record(9, DeviceType::Phone));
        assert_eq!(state.records()[0].id, "w9");
        assert!(state.set_featured("w9", true));
        assert!(state.records()[0].featured);
        let mut updated = state.records()[0].clone();
        updated.title = "Renamed".into();
        assert!(state.replace(updated));
        assert_eq!(state.records()[0].title, "Renamed");
        assert!(state.remove("w9").is_some());
        assert!(state.remove("w9").is_none());
        assert!(!state.set_featured("w9", false));
    }
}
