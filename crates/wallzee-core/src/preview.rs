//! Image source selection for cards, thumbnails, and the preview modal.

use crate::model::{DeviceType, WallpaperRecord};

/// Placeholder shown for phone wallpapers without an image.
pub const PHONE_PLACEHOLDER: &str = "https://placehold.co/400x600?text=No+Image";
/// Placeholder shown for desktop wallpapers without an image.
pub const DESKTOP_PLACEHOLDER: &str = "https://placehold.co/800x450?text=No+Image";
/// Placeholder shown in admin thumbnails.
pub const THUMBNAIL_PLACEHOLDER: &str = "https://placehold.co/100x100?text=No+Image";

/// Crop anchor passed to the storage preview endpoint.
pub const PREVIEW_GRAVITY: &str = "center";
/// Output quality passed to the storage preview endpoint.
pub const PREVIEW_QUALITY: u8 = 100;

/// Requested preview dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PreviewSize {
    /// Full-size preview for a device type.
    #[must_use]
    pub const fn for_device(device: DeviceType) -> Self {
        match device {
            DeviceType::Phone => Self {
                width: 1080,
                height: 1920,
            },
            DeviceType::Desktop => Self {
                width: 1280,
                height: 720,
            },
        }
    }
}

/// Placeholder for a device type.
#[must_use]
pub const fn placeholder(device: DeviceType) -> &'static str {
    match device {
        DeviceType::Phone => PHONE_PLACEHOLDER,
        DeviceType::Desktop => DESKTOP_PLACEHOLDER,
    }
}

/// Where a card should load its image from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Storage preview of a stored file.
    Stored {
        /// File identifier.
        file_id: &'a str,
        /// Requested size.
        size: PreviewSize,
    },
    /// Legacy absolute URL.
    Url(&'a str),
    /// No image available.
    Placeholder(&'static str),
}

impl<'a> ImageSource<'a> {
    /// Pick the source for a record.
    #[must_use]
    pub fn for_record(record: &'a WallpaperRecord) -> Self {
        if let Some(file_id) = record.image_id.as_deref() {
            return Self::Stored {
                file_id,
                size: PreviewSize::for_device(record.device),
            };
        }
        match record.image_url.as_deref() {
            Some(url) => Self::Url(url),
            None => Self::Placeholder(placeholder(record.device)),
        }
    }

    /// Resolve to a URL using the storage preview builder.
    #[must_use]
    pub fn resolve<F>(&self, preview_url: F) -> String
    where
        F: FnOnce(&str, PreviewSize) -> String,
    {
        match self {
            Self::Stored { file_id, size } => preview_url(file_id, *size),
            Self::Url(url) => (*url).to_string(),
            Self::Placeholder(url) => (*url).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(device: DeviceType, image_id: Option<&str>, image_url: Option<&str>) -> WallpaperRecord {
        WallpaperRecord {
            id: "w".into(),
            title: "t".into(),
            device,
            category_id: None,
            image_id: image_id.map(str::to_string),
            image_url: image_url.map(str::to_string),
            downloads: 0,
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stored_files_use_device_sized_previews() {
        let phone = record(DeviceType::Phone, Some("f1"), None);
        let source = ImageSource::for_record(&phone);
        assert_eq!(
            source,
            ImageSource::Stored {
                file_id: "f1",
                size: PreviewSize {
                    width: 1080,
                    height: 1920
                }
            }
        );
        let url = source.resolve(|id, size| format!("{id}:{}x{}", size.width, size.height));
        assert_eq!(url, "f1:1080x1920");
    }

    #[test]
    fn missing_images_fall_back() {
        let legacy = record(DeviceType::Desktop, None, Some("https://x/y.jpg"));
        assert_eq!(ImageSource::for_record(&legacy), ImageSource::Url("https://x/y.jpg"));
        let bare = record(DeviceType::Desktop, None, None);
        assert_eq!(
            ImageSource::for_record(&bare).resolve(|_, _| String::new()),
            DESKTOP_PLACEHOLDER
        );
        assert_eq!(placeholder(DeviceType::Phone), PHONE_PLACEHOLDER);
    }
}
