//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers; parsing lives in `validate.rs` and `loader.rs`.
//! - `Default` reproduces the production deployment.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::defaults;
use crate::error::ConfigError;

/// Identifiers of the remote project, database, collections, and bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// API endpoint without a trailing slash.
    pub endpoint: String,
    /// Project id.
    pub project_id: String,
    /// Database id.
    pub database_id: String,
    /// Wallpaper collection id.
    pub wallpapers_collection_id: String,
    /// Category collection id.
    pub categories_collection_id: String,
    /// User profile collection id.
    pub users_collection_id: String,
    /// Storage bucket id.
    pub bucket_id: String,
    /// Label granting admin access.
    pub admin_label: String,
    /// Server API key, needed only for label changes.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::ENDPOINT.to_string(),
            project_id: defaults::PROJECT_ID.to_string(),
            database_id: defaults::DATABASE_ID.to_string(),
            wallpapers_collection_id: defaults::WALLPAPERS_COLLECTION_ID.to_string(),
            categories_collection_id: defaults::CATEGORIES_COLLECTION_ID.to_string(),
            users_collection_id: defaults::USERS_COLLECTION_ID.to_string(),
            bucket_id: defaults::BUCKET_ID.to_string(),
            admin_label: defaults::ADMIN_LABEL.to_string(),
            api_key: None,
        }
    }
}

impl BackendConfig {
    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Whether a server key is available.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Page sizes and fetch limits for listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingConfig {
    /// Wallpapers per page.
    pub page_size: usize,
    /// Wallpapers on the featured strip.
    pub featured_limit: u32,
    /// Wallpapers fetched by the admin list.
    pub admin_list_limit: u32,
    /// Categories fetched for selectors.
    pub category_limit: u32,
    /// Wallpapers fetched for statistics.
    pub stats_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            featured_limit: defaults::FEATURED_LIMIT,
            admin_list_limit: defaults::ADMIN_LIST_LIMIT,
            category_limit: defaults::CATEGORY_LIMIT,
            stats_limit: defaults::STATS_LIMIT,
        }
    }
}

/// Requested log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl FromStr for LogFormatSetting {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::InvalidField {
                field: "WALLZEE_LOG_FORMAT",
                value: Some(value.to_string()),
                reason: "expected 'json' or 'pretty'",
            }),
        }
    }
}

impl Display for LogFormatSetting {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        })
    }
}

/// Logging settings handed to the telemetry crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    /// Default filter directive.
    pub level: String,
    /// Output format; inferred from the build profile when unset.
    pub format: Option<LogFormatSetting>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

/// Native client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    /// Where the CLI keeps its session token.
    pub session_file: PathBuf,
    /// Per-request timeout.
    #[serde(serialize_with = "serialize_secs")]
    pub http_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from(defaults::SESSION_FILE),
            http_timeout: Duration::from_secs(defaults::HTTP_TIMEOUT_SECS),
        }
    }
}

fn serialize_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(value.as_secs())
}

/// Effective configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WallzeeConfig {
    /// Remote identifiers.
    pub backend: BackendConfig,
    /// Listing tunables.
    pub listing: ListingConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Native client settings.
    pub client: ClientSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_deployment() {
        let config = WallzeeConfig::default();
        assert_eq!(config.backend.endpoint, "https://fra.cloud.appwrite.io/v1");
        assert_eq!(config.backend.admin_label, "admin");
        assert_eq!(config.listing.page_size, 40);
        assert_eq!(config.listing.featured_limit, 8);
        assert_eq!(
            config.backend.url("/account"),
            "https://fra.cloud.appwrite.io/v1/account"
        );
    }

    #[test]
    fn api_key_is_never_serialized() {
        let mut config = WallzeeConfig::default();
        config.backend.api_key = Some("secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"httpTimeout\":30"));
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormatSetting>(), Ok(LogFormatSetting::Json));
        assert_eq!(" pretty ".parse::<LogFormatSetting>(), Ok(LogFormatSetting::Pretty));
        assert!("xml".parse::<LogFormatSetting>().is_err());
    }
}
