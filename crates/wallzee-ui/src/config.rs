//! Build-time configuration and storage URL helpers for the browser bundle.
//!
//! # Design
//! - Identifiers are baked in at compile time from `WALLZEE_*` variables and
//!   fall back to the production defaults.
//! - The server API key is never embedded; label management stays a CLI concern.

use wallzee_api_models::paths;
use wallzee_config::{BackendConfig, ConfigResult, WallzeeConfig, load_from_lookup};
use wallzee_core::preview::{PREVIEW_GRAVITY, PREVIEW_QUALITY, PreviewSize};

fn build_time(name: &str) -> Option<String> {
    let value = match name {
        "WALLZEE_ENDPOINT" => option_env!("WALLZEE_ENDPOINT"),
        "WALLZEE_PROJECT_ID" => option_env!("WALLZEE_PROJECT_ID"),
        "WALLZEE_DATABASE_ID" => option_env!("WALLZEE_DATABASE_ID"),
        "WALLZEE_WALLPAPERS_COLLECTION_ID" => option_env!("WALLZEE_WALLPAPERS_COLLECTION_ID"),
        "WALLZEE_CATEGORIES_COLLECTION_ID" => option_env!("WALLZEE_CATEGORIES_COLLECTION_ID"),
        "WALLZEE_USERS_COLLECTION_ID" => option_env!("WALLZEE_USERS_COLLECTION_ID"),
        "WALLZEE_BUCKET_ID" => option_env!("WALLZEE_BUCKET_ID"),
        "WALLZEE_ADMIN_LABEL" => option_env!("WALLZEE_ADMIN_LABEL"),
        "WALLZEE_PAGE_SIZE" => option_env!("WALLZEE_PAGE_SIZE"),
        _ => None,
    };
    value.map(str::to_string)
}

/// Configuration compiled into the bundle.
///
/// # Errors
///
/// Returns [`wallzee_config::ConfigError`] when a build-time override is invalid.
pub fn load() -> ConfigResult<WallzeeConfig> {
    load_with(build_time)
}

/// Configuration from an arbitrary lookup, with any API key discarded.
///
/// # Errors
///
/// Returns [`wallzee_config::ConfigError`] when an override is invalid.
pub fn load_with<F>(lookup: F) -> ConfigResult<WallzeeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_from_lookup(lookup)?;
    config.backend.api_key = None;
    Ok(config)
}

fn file_url(backend: &BackendConfig, path: &str) -> String {
    format!("{}?project={}", backend.url(path), backend.project_id)
}

/// Storage preview URL, optionally resized and center-cropped.
#[must_use]
pub fn preview_url(backend: &BackendConfig, file_id: &str, size: Option<PreviewSize>) -> String {
    let mut url = file_url(backend, &paths::file_preview(&backend.bucket_id, file_id));
    if let Some(size) = size {
        url.push_str(&format!(
            "&width={}&height={}&gravity={PREVIEW_GRAVITY}&quality={PREVIEW_QUALITY}",
            size.width, size.height
        ));
    }
    url
}

/// Storage download URL for the original file.
#[must_use]
pub fn download_url(backend: &BackendConfig, file_id: &str) -> String {
    file_url(backend, &paths::file_download(&backend.bucket_id, file_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallzee_core::DeviceType;

    fn backend() -> BackendConfig {
        BackendConfig {
            endpoint: "https://cloud.example/v1".into(),
            project_id: "proj".into(),
            bucket_id: "bucket".into(),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn api_key_is_dropped_from_bundle_config() {
        let config = load_with(|name| match name {
            "WALLZEE_API_KEY" => Some("server-secret".into()),
            "WALLZEE_PROJECT_ID" => Some("proj".into()),
            _ => None,
        })
        .expect("valid config");
        assert_eq!(config.backend.api_key, None);
        assert_eq!(config.backend.project_id, "proj");
    }

    #[test]
    fn invalid_override_is_reported() {
        let result = load_with(|name| (name == "WALLZEE_PAGE_SIZE").then(|| "zero".into()));
        assert!(result.is_err());
    }

    #[test]
    fn preview_and_download_urls_carry_project() {
        let backend = backend();
        assert_eq!(
            preview_url(&backend, "f1", Some(PreviewSize::for_device(DeviceType::Desktop))),
            "https://cloud.example/v1/storage/buckets/bucket/files/f1/preview?project=proj&width=1280&height=720&gravity=center&quality=100"
        );
        assert_eq!(
            preview_url(&backend, "f1", None),
            "https://cloud.example/v1/storage/buckets/bucket/files/f1/preview?project=proj"
        );
        assert_eq!(
            download_url(&backend, "f1"),
            "https://cloud.example/v1/storage/buckets/bucket/files/f1/download?project=proj"
        );
    }
}
