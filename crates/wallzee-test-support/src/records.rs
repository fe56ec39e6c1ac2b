//! Engine record builders with sensible defaults.

use chrono::{DateTime, TimeZone, Utc};
use wallzee_core::{CategoryRecord, DeviceType, UserProfile, WallpaperRecord};

/// Midnight UTC of the given date.
///
/// # Panics
///
/// Panics on an invalid date.
#[must_use]
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// Wallpaper with a stored file and no category.
#[must_use]
pub fn wallpaper(id: &str, device: DeviceType, created_at: DateTime<Utc>) -> WallpaperRecord {
    WallpaperRecord {
        id: id.to_string(),
        title: format!("Wallpaper {id}"),
        device,
        category_id: None,
        image_id: Some(format!("file-{id}")),
        image_url: None,
        downloads: 0,
        featured: false,
        created_at,
    }
}

/// Category with only a name.
#[must_use]
pub fn category(id: &str, name: &str) -> CategoryRecord {
    CategoryRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        icon: None,
    }
}

/// User profile.
#[must_use]
pub fn profile(id: &str, is_admin: bool, created_at: DateTime<Utc>) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{id}@example.com"),
        is_admin,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallpaper_defaults() {
        let record = wallpaper("w1", DeviceType::Phone, at(2024, 1, 1));
        assert_eq!(record.image_id.as_deref(), Some("file-w1"));
        assert_eq!(record.downloads, 0);
        assert_eq!(profile("ada", true, at(2024, 1, 1)).email, "ada@example.com");
        assert_eq!(category("c1", "Nature").name, "Nature");
    }
}
