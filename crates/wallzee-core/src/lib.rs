#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! DOM-free wallpaper gallery engine shared by the CLI and the web front end.
//!
//! Layout: `model.rs` (typed records), `filter.rs` and `paging.rs` (list
//! shaping), `listing.rs` (per-view state), `download.rs` (download planning
//! and optimistic counters), `stats.rs` (admin aggregation), `session.rs`
//! (auth lifecycle), `validate.rs` (form checks), `preview.rs` (image sources),
//! `seo.rs` (page metadata).

pub mod download;
pub mod error;
pub mod filter;
pub mod listing;
pub mod model;
pub mod paging;
pub mod preview;
pub mod seo;
pub mod session;
pub mod stats;
pub mod validate;

pub use error::{CoreError, CoreResult};
pub use filter::{CategorySelection, WallpaperFilter};
pub use listing::ListingState;
pub use model::{CategoryRecord, DeviceType, Identity, UserProfile, UserSession, WallpaperRecord};
pub use paging::{Page, PageToken};
pub use session::SessionState;
pub use stats::{CategorySummary, DashboardStats, UserStats};
pub use validate::ValidationError;
