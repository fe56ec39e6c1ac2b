//! Default backend identifiers and tunables.
//!
//! # Design
//! - Identifiers point at the production project; every one can be overridden.
//! - Numeric limits mirror what the listing and admin views request.

/// API endpoint, including the version segment.
pub const ENDPOINT: &str = "https://fra.cloud.appwrite.io/v1";
/// Project identifier sent with every request.
pub const PROJECT_ID: &str = "68209798000cedff539c";
/// Database holding every collection.
pub const DATABASE_ID: &str = "68209849000b88ea385e";
/// Wallpaper documents.
pub const WALLPAPERS_COLLECTION_ID: &str = "682098d2002c06b08999";
/// Category documents.
pub const CATEGORIES_COLLECTION_ID: &str = "6820990900093e53c158";
/// User profile documents.
pub const USERS_COLLECTION_ID: &str = "users";
/// Storage bucket for wallpaper files.
pub const BUCKET_ID: &str = "6820988300220f701b9b";
/// Label that marks an account as administrator.
pub const ADMIN_LABEL: &str = "admin";

/// Wallpapers per listing page.
pub const PAGE_SIZE: usize = 40;
/// Wallpapers on the featured strip.
pub const FEATURED_LIMIT: u32 = 8;
/// Wallpapers fetched for admin management.
pub const ADMIN_LIST_LIMIT: u32 = 100;
/// Categories fetched for selectors.
pub const CATEGORY_LIMIT: u32 = 100;
/// Wallpapers fetched for dashboard statistics.
pub const STATS_LIMIT: u32 = 1_000;

/// Default log level when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "info";
/// Session file name, relative to the working directory.
pub const SESSION_FILE: &str = ".wallzee-session";
/// HTTP request timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
