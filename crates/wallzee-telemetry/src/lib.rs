#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Logging setup shared by the Wallzee binaries.
//!
//! Layout: `init.rs` (subscriber installation and build SHA), `context.rs`
//! (command-level spans), `error.rs` (`TelemetryError`).

pub mod context;
pub mod error;
pub mod init;

pub use context::{CommandContextGuard, command_span};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
