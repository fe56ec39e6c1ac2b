//! Environment overlay on top of the default configuration.
//!
//! # Design
//! - Every setting reads `WALLZEE_<NAME>`; unset or empty variables keep the default.
//! - Lookup is injected so tests never mutate the process environment.
//! - Parsing stops at the first invalid value.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{LogFormatSetting, WallzeeConfig};
use crate::validate::{parse_endpoint, parse_identifier, parse_positive};

/// Prefix shared by every environment variable.
pub const ENV_PREFIX: &str = "WALLZEE_";

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns [`ConfigError`] when an override fails validation.
pub fn load_from_env() -> ConfigResult<WallzeeConfig> {
    load_from_lookup(|name| std::env::var(name).ok())
}

/// Load configuration using an arbitrary variable lookup.
///
/// # Errors
///
/// Returns [`ConfigError`] when an override fails validation.
pub fn load_from_lookup<F>(lookup: F) -> ConfigResult<WallzeeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |field: &'static str| {
        lookup(field)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let mut config = WallzeeConfig::default();

    if let Some(value) = get("WALLZEE_ENDPOINT") {
        config.backend.endpoint = parse_endpoint("WALLZEE_ENDPOINT", &value)?;
    }

    let identifiers: [(&'static str, &mut String); 7] = [
        ("WALLZEE_PROJECT_ID", &mut config.backend.project_id),
        ("WALLZEE_DATABASE_ID", &mut config.backend.database_id),
        (
            "WALLZEE_WALLPAPERS_COLLECTION_ID",
            &mut config.backend.wallpapers_collection_id,
        ),
        (
            "WALLZEE_CATEGORIES_COLLECTION_ID",
            &mut config.backend.categories_collection_id,
        ),
        (
            "WALLZEE_USERS_COLLECTION_ID",
            &mut config.backend.users_collection_id,
        ),
        ("WALLZEE_BUCKET_ID", &mut config.backend.bucket_id),
        ("WALLZEE_ADMIN_LABEL", &mut config.backend.admin_label),
    ];
    for (field, slot) in identifiers {
        if let Some(value) = get(field) {
            *slot = parse_identifier(field, &value)?;
        }
    }

    config.backend.api_key = get("WALLZEE_API_KEY");

    if let Some(value) = get("WALLZEE_PAGE_SIZE") {
        let size = parse_positive("WALLZEE_PAGE_SIZE", &value)?;
        config.listing.page_size =
            usize::try_from(size).map_err(|_| ConfigError::InvalidField {
                field: "WALLZEE_PAGE_SIZE",
                value: Some(value.clone()),
                reason: "too large",
            })?;
    }

    if let Some(value) = get("WALLZEE_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Some(value) = get("WALLZEE_LOG_FORMAT") {
        config.logging.format = Some(value.parse::<LogFormatSetting>()?);
    }

    if let Some(value) = get("WALLZEE_SESSION_FILE") {
        config.client.session_file = PathBuf::from(value);
    }
    if let Some(value) = get("WALLZEE_HTTP_TIMEOUT_SECS") {
        config.client.http_timeout =
            Duration::from_secs(parse_positive("WALLZEE_HTTP_TIMEOUT_SECS", &value)?);
    }

    debug!(
        endpoint = %config.backend.endpoint,
        project = %config.backend.project_id,
        api_key = config.backend.has_api_key(),
        "configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = load_from_lookup(|_| None).unwrap();
        assert_eq!(config, WallzeeConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load_from_lookup(lookup(&[
            ("WALLZEE_ENDPOINT", "http://localhost/v1/"),
            ("WALLZEE_PROJECT_ID", "proj"),
            ("WALLZEE_ADMIN_LABEL", "staff"),
            ("WALLZEE_API_KEY", "key"),
            ("WALLZEE_PAGE_SIZE", "12"),
            ("WALLZEE_LOG_FORMAT", "json"),
            ("WALLZEE_SESSION_FILE", "/tmp/s"),
            ("WALLZEE_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.backend.endpoint, "http://localhost/v1");
        assert_eq!(config.backend.project_id, "proj");
        assert_eq!(config.backend.admin_label, "staff");
        assert_eq!(config.backend.api_key.as_deref(), Some("key"));
        assert_eq!(config.listing.page_size, 12);
        assert_eq!(config.logging.format, Some(LogFormatSetting::Json));
        assert_eq!(config.client.session_file, PathBuf::from("/tmp/s"));
        assert_eq!(config.client.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = load_from_lookup(lookup(&[("WALLZEE_BUCKET_ID", "   ")])).unwrap();
        assert_eq!(config.backend.bucket_id, crate::defaults::BUCKET_ID);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load_from_lookup(lookup(&[("WALLZEE_PAGE_SIZE", "zero")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "WALLZEE_PAGE_SIZE",
                ..
            }
        ));
        assert!(load_from_lookup(lookup(&[("WALLZEE_ENDPOINT", "nope")])).is_err());
    }
}
