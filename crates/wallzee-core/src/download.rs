//! Download planning, filename derivation, and optimistic counters.
//!
//! # Design
//! - Planning is pure: the caller supplies the storage URL builder and performs
//!   the actual save and remote increment.
//! - A per-record in-flight set blocks a second download of the same record
//!   until its increment settles; other records proceed independently.
//! - The local counter is bumped only after the remote increment succeeds.

use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};
use crate::model::WallpaperRecord;

/// How long download feedback stays on screen, in milliseconds.
pub const MESSAGE_TIMEOUT_MS: u32 = 3_000;

/// Suffix appended to every derived filename stem.
const FILENAME_SUFFIX: &str = "_wallzee";

/// Stem used when the sanitized title is empty.
const FALLBACK_STEM: &str = "wallpaper";

/// Everything needed to save one wallpaper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadPlan {
    /// Wallpaper identifier.
    pub id: String,
    /// Title, used in feedback messages.
    pub title: String,
    /// Absolute source URL.
    pub url: String,
    /// Target filename including extension.
    pub filename: String,
}

/// `png` when the URL mentions `.png`, `jpg` otherwise.
#[must_use]
pub fn guess_extension(url: &str) -> &'static str {
    if url.to_lowercase().contains(".png") {
        "png"
    } else {
        "jpg"
    }
}

/// Strip punctuation from a title and join words with underscores.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Filename for a wallpaper title and source URL.
#[must_use]
pub fn download_filename(title: &str, url: &str) -> String {
    let stem = sanitize_title(title);
    let stem = if stem.is_empty() {
        FALLBACK_STEM
    } else {
        stem.as_str()
    };
    format!("{stem}{FILENAME_SUFFIX}.{}", guess_extension(url))
}

/// Resolve the source URL and filename for a record.
///
/// `download_url` maps a stored file id to its storage download URL.
///
/// # Errors
///
/// Returns [`CoreError::NoDownloadSource`] when the record has neither a file
/// id nor a fallback URL.
pub fn plan_download<F>(record: &WallpaperRecord, download_url: F) -> CoreResult<DownloadPlan>
where
    F: FnOnce(&str) -> String,
{
    let url = match (&record.image_id, &record.image_url) {
        (Some(file_id), _) => download_url(file_id),
        (None, Some(url)) => url.clone(),
        (None, None) => {
            return Err(CoreError::NoDownloadSource {
                id: record.id.clone(),
            });
        }
    };
    Ok(DownloadPlan {
        id: record.id.clone(),
        title: record.title.clone(),
        filename: download_filename(&record.title, &url),
        url,
    })
}

/// Apply the optimistic +1 to the matching record.
///
/// Returns `false` when no record carries `id`.
pub fn apply_download_increment(records: &mut [WallpaperRecord], id: &str) -> bool {
    let Some(record) = records.iter_mut().find(|record| record.id == id) else {
        return false;
    };
    record.downloads = record.downloads.saturating_add(1);
    true
}

/// Feedback shown after a successful save.
#[must_use]
pub fn success_message(title: &str) -> String {
    format!("{title} downloaded successfully!")
}

/// Feedback shown after a failed save.
#[must_use]
pub fn failure_message(reason: &str) -> String {
    format!("Failed to download: {reason}")
}

/// Identifiers whose download is still in progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InFlightDownloads {
    ids: BTreeSet<String>,
}

impl InFlightDownloads {
    /// Mark `id` as downloading; `false` when it already was.
    pub fn begin(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Clear the flag for `id`.
    pub fn finish(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Whether `id` is currently downloading.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of downloads in progress.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is downloading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceType;
    use chrono::Utc;

    fn record(image_id: Option<&str>, image_url: Option<&str>) -> WallpaperRecord {
        WallpaperRecord {
            id: "w1".into(),
            title: "Sunset Beach!! 2024".into(),
            device: DeviceType::Desktop,
            category_id: None,
            image_id: image_id.map(str::to_string),
            image_url: image_url.map(str::to_string),
            downloads: 4,
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filename_strips_punctuation_and_joins_words() {
        assert_eq!(
            download_filename("Sunset Beach!! 2024", "https://cdn/x/download"),
            "Sunset_Beach_2024_wallzee.jpg"
        );
        assert_eq!(
            download_filename("  neon-city   lights ", "https://cdn/a.PNG"),
            "neon-city_lights_wallzee.png"
        );
        assert_eq!(download_filename("!!!", "u"), "wallpaper_wallzee.jpg");
    }

    #[test]
    fn plan_prefers_stored_file_over_fallback_url() {
        let plan = plan_download(&record(Some("f1"), Some("https://legacy/a.png")), |id| {
            format!("https://storage/{id}/download")
        })
        .unwrap();
        assert_eq!(plan.url, "https://storage/f1/download");
        assert_eq!(plan.filename, "Sunset_Beach_2024_wallzee.jpg");

        let legacy = plan_download(&record(None, Some("https://legacy/a.png")), |_| {
            unreachable!("no stored file")
        })
        .unwrap();
        assert_eq!(legacy.filename, "Sunset_Beach_2024_wallzee.png");
    }

    #[test]
    fn plan_without_source_fails() {
        let err = plan_download(&record(None, None), |id| id.to_string()).unwrap_err();
        assert_eq!(err, CoreError::NoDownloadSource { id: "w1".into() });
    }

    #[test]
    fn optimistic_increment_adds_exactly_one() {
        let mut records = vec![record(Some("f1"), None)];
        assert!(apply_download_increment(&mut records, "w1"));
        assert_eq!(records[0].downloads, 5);
        assert!(!apply_download_increment(&mut records, "missing"));
        assert_eq!(records[0].downloads, 5);
    }

    #[test]
    fn in_flight_blocks_only_the_same_record() {
        let mut flights = InFlightDownloads::default();
        assert!(flights.begin("a"));
        assert!(!flights.begin("a"));
        assert!(flights.begin("b"));
        assert_eq!(flights.len(), 2);
        flights.finish("a");
        assert!(!flights.contains("a"));
        assert!(flights.contains("b"));
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(success_message("Dune"), "Dune downloaded successfully!");
        assert_eq!(failure_message("timeout"), "Failed to download: timeout");
    }
}
