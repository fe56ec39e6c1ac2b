#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Configuration for the Wallzee front ends.
//!
//! Layout: `defaults.rs` (backend identifiers and tunables), `model.rs`
//! (typed settings), `validate.rs` (field parsing), `loader.rs` (environment
//! overlay), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_PREFIX, load_from_env, load_from_lookup};
pub use model::{
    BackendConfig, ClientSettings, ListingConfig, LogFormatSetting, LoggingSettings, WallzeeConfig,
};
