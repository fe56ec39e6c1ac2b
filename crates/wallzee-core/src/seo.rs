//! Page metadata and Schema.org structured data.

use serde_json::{Value, json};

use crate::model::WallpaperRecord;

/// Public site origin.
pub const SITE_URL: &str = "https://wallzee.live";
/// Brand name.
pub const SITE_NAME: &str = "Wallzee";
/// Title used when a page supplies none.
pub const DEFAULT_TITLE: &str = "Wallzee - Premium HD Wallpapers for Desktop & Mobile Devices";
/// Description used when a page supplies none.
pub const DEFAULT_DESCRIPTION: &str = "Download beautiful, high-quality wallpapers for desktop and mobile devices. Wallzee offers thousands of HD wallpapers for free.";
/// Keywords used when a page supplies none.
pub const DEFAULT_KEYWORDS: &str = "wallpapers, desktop wallpapers, mobile wallpapers, HD wallpapers, 4K wallpapers, phone backgrounds, desktop backgrounds";

const TITLE_SUFFIX: &str = "Wallzee - HD Wallpapers for Desktop & Mobile";
const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Resolved head metadata for a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageMeta {
    /// Full document title.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Absolute canonical URL.
    pub canonical_url: String,
    /// Comma-joined keywords.
    pub keywords: String,
    /// Robots directive.
    pub robots: &'static str,
}

impl PageMeta {
    /// Resolve metadata from optional page inputs.
    #[must_use]
    pub fn new(
        title: Option<&str>,
        description: Option<&str>,
        canonical: Option<&str>,
        keywords: &[&str],
        noindex: bool,
    ) -> Self {
        Self {
            title: page_title(title),
            description: description
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
            canonical_url: canonical_url(canonical.unwrap_or(SITE_URL)),
            keywords: if keywords.is_empty() {
                DEFAULT_KEYWORDS.to_string()
            } else {
                keywords.join(", ")
            },
            robots: if noindex {
                "noindex, nofollow"
            } else {
                "index, follow, max-image-preview:large, max-snippet:-1, max-video-preview:-1"
            },
        }
    }
}

/// Branded document title.
#[must_use]
pub fn page_title(title: Option<&str>) -> String {
    match title.filter(|value| !value.is_empty()) {
        Some(title) => format!("{title} | {TITLE_SUFFIX}"),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Absolute URL for a path or URL.
#[must_use]
pub fn canonical_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("http") {
        path_or_url.to_string()
    } else {
        format!("{SITE_URL}{path_or_url}")
    }
}

/// `WebSite` object with a search action.
#[must_use]
pub fn website_schema() -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebSite",
        "name": SITE_NAME,
        "url": SITE_URL,
        "description": "Download beautiful, high-quality wallpapers for desktop and mobile devices.",
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{SITE_URL}/search?q={{search_term_string}}"),
            "query-input": "required name=search_term_string"
        }
    })
}

/// Image entry for a gallery schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryImage {
    /// Image URL.
    pub url: String,
    /// Image name.
    pub name: String,
    /// Optional description; the name is used when absent.
    pub description: Option<String>,
}

/// `ImageGallery` object.
#[must_use]
pub fn image_gallery_schema(title: &str, description: &str, images: &[GalleryImage]) -> Value {
    let images: Vec<Value> = images
        .iter()
        .map(|image| {
            json!({
                "@type": "ImageObject",
                "contentUrl": image.url,
                "name": image.name,
                "description": image.description.as_deref().unwrap_or(&image.name),
            })
        })
        .collect();
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "ImageGallery",
        "name": title,
        "description": description,
        "image": images,
    })
}

/// `ImageObject` for one wallpaper.
#[must_use]
pub fn wallpaper_schema(record: &WallpaperRecord, content_url: &str) -> Value {
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "ImageObject",
        "contentUrl": content_url,
        "name": record.title,
        "description": format!("{} wallpaper for {}", record.title, record.device),
        "uploadDate": record.created_at.to_rfc3339(),
        "author": { "@type": "Organization", "name": SITE_NAME },
        "copyrightNotice": "Wallzee - Free for personal use",
        "license": format!("{SITE_URL}/terms"),
    })
}

/// `BreadcrumbList` from `(name, url)` pairs.
#[must_use]
pub fn breadcrumb_schema(items: &[(&str, &str)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();
    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceType;
    use chrono::Utc;

    #[test]
    fn titles_carry_the_brand() {
        assert_eq!(
            page_title(Some("Phone")),
            "Phone | Wallzee - HD Wallpapers for Desktop & Mobile"
        );
        assert_eq!(page_title(None), DEFAULT_TITLE);
        assert_eq!(page_title(Some("")), DEFAULT_TITLE);
    }

    #[test]
    fn canonical_urls_are_absolute() {
        assert_eq!(canonical_url("/phone"), "https://wallzee.live/phone");
        assert_eq!(canonical_url("https://x.test/a"), "https://x.test/a");
    }

    #[test]
    fn meta_defaults() {
        let meta = PageMeta::new(None, None, None, &[], true);
        assert_eq!(meta.canonical_url, SITE_URL);
        assert_eq!(meta.keywords, DEFAULT_KEYWORDS);
        assert_eq!(meta.robots, "noindex, nofollow");
        let meta = PageMeta::new(Some("Desktop"), Some("d"), Some("/desktop"), &["a", "b"], false);
        assert_eq!(meta.keywords, "a, b");
        assert_eq!(meta.description, "d");
    }

    #[test]
    fn schemas_have_expected_shape() {
        assert_eq!(
            website_schema()["potentialAction"]["target"],
            "https://wallzee.live/search?q={search_term_string}"
        );
        let crumbs = breadcrumb_schema(&[("Home", "/"), ("Phone", "/phone")]);
        assert_eq!(crumbs["itemListElement"][1]["position"], 2);

        let record = WallpaperRecord {
            id: "w".into(),
            title: "Aurora".into(),
            device: DeviceType::Phone,
            category_id: None,
            image_id: None,
            image_url: None,
            downloads: 0,
            featured: true,
            created_at: Utc::now(),
        };
        let schema = wallpaper_schema(&record, "https://img");
        assert_eq!(schema["description"], "Aurora wallpaper for phone");

        let gallery = image_gallery_schema(
            "Featured",
            "Top picks",
            &[GalleryImage {
                url: "u".into(),
                name: "n".into(),
                description: None,
            }],
        );
        assert_eq!(gallery["image"][0]["description"], "n");
    }
}
