//! Category, device, and search filtering plus newest-first ordering.
//!
//! # Design
//! - A named category resolves to an id through the category list first.
//! - When no category carries that name, the name is compared against the
//!   record's device type string instead; older records were tagged that way.
//! - Filtering never reorders; callers sort once when records arrive.

use crate::model::{CategoryRecord, DeviceType, WallpaperRecord};

/// Selector label meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All";

/// Category choice made in a listing view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategorySelection {
    /// No category restriction.
    #[default]
    All,
    /// Restrict to the category with this display name.
    Named(String),
}

impl CategorySelection {
    /// Build a selection from a selector label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    /// Selector label for this selection.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }
}

/// Active predicates for a listing view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallpaperFilter {
    /// Category selection.
    pub category: CategorySelection,
    /// Device scope for phone/desktop pages.
    pub device: Option<DeviceType>,
    /// Free-text title search.
    pub search: String,
}

/// How a category selection is matched against records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryMatch<'a> {
    /// No restriction.
    Any,
    /// Match `category_id` against a resolved category id.
    ById(&'a str),
    /// Match the raw selection name against the record's device type string.
    ByLegacyName(&'a str),
}

/// Resolve a selection into a concrete matching rule.
#[must_use]
pub fn resolve_category<'a>(
    selection: &'a CategorySelection,
    categories: &'a [CategoryRecord],
) -> CategoryMatch<'a> {
    match selection {
        CategorySelection::All => CategoryMatch::Any,
        CategorySelection::Named(name) => categories
            .iter()
            .find(|category| category.name == *name)
            .map_or(CategoryMatch::ByLegacyName(name.as_str()), |category| {
                CategoryMatch::ById(category.id.as_str())
            }),
    }
}

impl CategoryMatch<'_> {
    /// Whether the record satisfies this rule.
    #[must_use]
    pub fn accepts(&self, record: &WallpaperRecord) -> bool {
        match self {
            Self::Any => true,
            Self::ById(id) => record.category_id.as_deref() == Some(*id),
            Self::ByLegacyName(name) => record.device.as_str() == *name,
        }
    }
}

/// Case-insensitive title match; an empty query matches everything.
#[must_use]
pub fn matches_search(record: &WallpaperRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    record
        .title
        .to_lowercase()
        .contains(&query.to_lowercase())
}

/// Apply every active predicate, preserving source order.
#[must_use]
pub fn filter_wallpapers<'a>(
    records: &'a [WallpaperRecord],
    categories: &[CategoryRecord],
    filter: &WallpaperFilter,
) -> Vec<&'a WallpaperRecord> {
    let rule = resolve_category(&filter.category, categories);
    let query = filter.search.to_lowercase();
    records
        .iter()
        .filter(|record| filter.device.is_none_or(|device| record.device == device))
        .filter(|record| rule.accepts(record))
        .filter(|record| query.is_empty() || record.title.to_lowercase().contains(&query))
        .collect()
}

/// Sort newest first; equal timestamps keep their relative order.
pub fn sort_newest_first(records: &mut [WallpaperRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Selector labels: "All" followed by category names in fetch order.
#[must_use]
pub fn category_options(categories: &[CategoryRecord]) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(
            categories
                .iter()
                .filter(|category| !category.name.is_empty())
                .map(|category| category.name.clone()),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(id: &str, title: &str, device: DeviceType, category_id: Option<&str>) -> WallpaperRecord {
        WallpaperRecord {
            id: id.into(),
            title: title.into(),
            device,
            category_id: category_id.map(str::to_string),
            image_id: Some(format!("file-{id}")),
            image_url: None,
            downloads: 0,
            featured: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn category(id: &str, name: &str) -> CategoryRecord {
        CategoryRecord {
            id: id.into(),
            name: name.into(),
            description: None,
            icon: None,
        }
    }

    fn sample() -> Vec<WallpaperRecord> {
        vec![
            record("1", "Mountain Dawn", DeviceType::Phone, Some("nature")),
            record("2", "City Lights", DeviceType::Desktop, Some("urban")),
            record("3", "Forest mist", DeviceType::Desktop, Some("nature")),
            record("4", "Neon Alley", DeviceType::Phone, None),
        ]
    }

    #[test]
    fn device_filter_keeps_only_matching_records_in_order() {
        let records = sample();
        for device in DeviceType::all() {
            let filter = WallpaperFilter {
                device: Some(device),
                ..WallpaperFilter::default()
            };
            let out = filter_wallpapers(&records, &[], &filter);
            assert!(out.iter().all(|r| r.device == device));
            let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
            let expected: Vec<_> = records
                .iter()
                .filter(|r| r.device == device)
                .map(|r| r.id.as_str())
                .collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn search_is_case_insensitive_and_empty_is_identity() {
        let records = sample();
        let all = filter_wallpapers(&records, &[], &WallpaperFilter::default());
        assert_eq!(all.len(), records.len());

        let filter = WallpaperFilter {
            search: "FOREST".into(),
            ..WallpaperFilter::default()
        };
        let out = filter_wallpapers(&records, &[], &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
        assert!(matches_search(&records[1], "lights"));
        assert!(matches_search(&records[1], ""));
    }

    #[test]
    fn named_category_resolves_to_id() {
        let records = sample();
        let categories = vec![category("nature", "Nature"), category("urban", "Urban")];
        let filter = WallpaperFilter {
            category: CategorySelection::Named("Nature".into()),
            ..WallpaperFilter::default()
        };
        let ids: Vec<_> = filter_wallpapers(&records, &categories, &filter)
            .into_iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn unknown_category_name_falls_back_to_device_string() {
        let records = sample();
        let selection = CategorySelection::Named("phone".into());
        assert_eq!(
            resolve_category(&selection, &[]),
            CategoryMatch::ByLegacyName("phone")
        );
        let filter = WallpaperFilter {
            category: selection,
            ..WallpaperFilter::default()
        };
        let ids: Vec<_> = filter_wallpapers(&records, &[], &filter)
            .into_iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn predicates_combine() {
        let records = sample();
        let categories = vec![category("nature", "Nature")];
        let filter = WallpaperFilter {
            category: CategorySelection::Named("Nature".into()),
            device: Some(DeviceType::Desktop),
            search: "mist".into(),
        };
        let out = filter_wallpapers(&records, &categories, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
    }

    #[test]
    fn sort_orders_newest_first_and_is_stable() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut records = sample();
        records[0].created_at = base;
        records[1].created_at = base + Duration::days(2);
        records[2].created_at = base + Duration::days(1);
        records[3].created_at = base + Duration::days(1);
        sort_newest_first(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "4", "1"]);
    }

    #[test]
    fn category_options_lead_with_all() {
        let options = category_options(&[category("a", "Abstract"), category("b", "")]);
        assert_eq!(options, vec!["All".to_string(), "Abstract".to_string()]);
        assert_eq!(CategorySelection::from_label("All"), CategorySelection::All);
        assert_eq!(CategorySelection::from_label("Abstract").label(), "Abstract");
    }
}
