//! Admin dashboard aggregation.
//!
//! # Design
//! - Pure functions over already-fetched lists; recomputed on every change.
//! - "Recent" means created within the last [`RECENT_WINDOW_DAYS`] calendar
//!   days relative to the supplied `now`.
//! - Per-category counts are a nested scan (categories times wallpapers); the
//!   dashboard caps fetches at [`STATS_FETCH_LIMIT`] records.

use chrono::{DateTime, Days, Utc};
use serde::Serialize;

use crate::model::{CategoryRecord, DeviceType, UserProfile, WallpaperRecord};

/// Window used for the "recent" counters.
pub const RECENT_WINDOW_DAYS: u64 = 30;
/// Record limit used when fetching wallpapers for the dashboard.
pub const STATS_FETCH_LIMIT: u32 = 1_000;

/// Wallpaper counts per device type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeviceCounts {
    /// Phone wallpapers.
    pub phone: usize,
    /// Desktop wallpapers.
    pub desktop: usize,
}

/// Dashboard summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of wallpapers.
    pub total: usize,
    /// Counts per device type.
    pub by_device: DeviceCounts,
    /// Sum of download counters.
    pub total_downloads: u64,
    /// Wallpapers created inside the recent window.
    pub recent: usize,
}

/// A category with its derived wallpaper count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category.
    #[serde(flatten)]
    pub category: CategoryRecord,
    /// Wallpapers whose `category_id` points here.
    pub wallpaper_count: usize,
}

/// User profile summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Number of profiles.
    pub total: usize,
    /// Profiles flagged as admin.
    pub admins: usize,
    /// Profiles created inside the recent window.
    pub recent: usize,
}

fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Aggregate dashboard counters.
#[must_use]
pub fn compute_stats(wallpapers: &[WallpaperRecord], now: DateTime<Utc>) -> DashboardStats {
    let cutoff = recent_cutoff(now);
    wallpapers
        .iter()
        .fold(DashboardStats::default(), |mut stats, record| {
            stats.total += 1;
            match record.device {
                DeviceType::Phone => stats.by_device.phone += 1,
                DeviceType::Desktop => stats.by_device.desktop += 1,
            }
            stats.total_downloads = stats.total_downloads.saturating_add(record.downloads);
            if record.created_at >= cutoff {
                stats.recent += 1;
            }
            stats
        })
}

/// Attach wallpaper counts to categories, preserving category order.
#[must_use]
pub fn category_counts(
    categories: &[CategoryRecord],
    wallpapers: &[WallpaperRecord],
) -> Vec<CategorySummary> {
    categories
        .iter()
        .map(|category| CategorySummary {
            category: category.clone(),
            wallpaper_count: wallpapers
                .iter()
                .filter(|record| record.category_id.as_deref() == Some(category.id.as_str()))
                .count(),
        })
        .collect()
}

/// Aggregate user profile counters.
#[must_use]
pub fn user_stats(profiles: &[UserProfile], now: DateTime<Utc>) -> UserStats {
    let cutoff = recent_cutoff(now);
    UserStats {
        total: profiles.len(),
        admins: profiles.iter().filter(|profile| profile.is_admin).count(),
        recent: profiles
            .iter()
            .filter(|profile| profile.created_at >= cutoff)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap()
    }

    fn wallpaper(id: &str, device: DeviceType, downloads: u64, age_days: i64) -> WallpaperRecord {
        WallpaperRecord {
            id: id.into(),
            title: id.into(),
            device,
            category_id: Some(if id < "c" { "cat-a" } else { "cat-b" }.into()),
            image_id: None,
            image_url: None,
            downloads,
            featured: false,
            created_at: now() - Duration::days(age_days),
        }
    }

    #[test]
    fn dashboard_counts_devices_downloads_and_recent() {
        let wallpapers = vec![
            wallpaper("a", DeviceType::Phone, 1, 1),
            wallpaper("b", DeviceType::Phone, 2, 10),
            wallpaper("c", DeviceType::Phone, 3, 29),
            wallpaper("d", DeviceType::Desktop, 5, 31),
            wallpaper("e", DeviceType::Desktop, 0, 400),
        ];
        let stats = compute_stats(&wallpapers, now());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_device, DeviceCounts { phone: 3, desktop: 2 });
        assert_eq!(stats.total_downloads, 11);
        assert_eq!(stats.recent, 3);
    }

    #[test]
    fn recent_window_includes_the_cutoff_instant() {
        let wallpapers = vec![wallpaper("a", DeviceType::Phone, 0, 30)];
        assert_eq!(compute_stats(&wallpapers, now()).recent, 1);
        assert_eq!(compute_stats(&[], now()), DashboardStats::default());
    }

    #[test]
    fn category_counts_follow_category_ids() {
        let categories = vec![
            CategoryRecord {
                id: "cat-a".into(),
                name: "Abstract".into(),
                description: None,
                icon: None,
            },
            CategoryRecord {
                id: "cat-z".into(),
                name: "Zen".into(),
                description: None,
                icon: None,
            },
        ];
        let wallpapers = vec![
            wallpaper("a", DeviceType::Phone, 0, 1),
            wallpaper("b", DeviceType::Phone, 0, 1),
            wallpaper("c", DeviceType::Desktop, 0, 1),
        ];
        let counts = category_counts(&categories, &wallpapers);
        assert_eq!(counts[0].wallpaper_count, 2);
        assert_eq!(counts[1].wallpaper_count, 0);
        assert_eq!(counts[1].category.name, "Zen");
    }

    #[test]
    fn user_stats_count_admins_and_recent_profiles() {
        let profile = |id: &str, is_admin: bool, age_days: i64| UserProfile {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@example.com"),
            is_admin,
            created_at: now() - Duration::days(age_days),
        };
        let stats = user_stats(
            &[profile("a", true, 2), profile("b", false, 45), profile("c", false, 3)],
            now(),
        );
        assert_eq!(
            stats,
            UserStats {
                total: 3,
                admins: 1,
                recent: 2
            }
        );
    }
}
