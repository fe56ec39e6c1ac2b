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

//! Backend access for the native Wallzee front end.
//!
//! Layout: `transport.rs` (document/object/identity traits), `appwrite.rs`
//! (REST implementation over `reqwest`), `memory.rs` (in-process backend used
//! by tests and offline runs), `services/` (wallpapers, categories, session
//! store, user profiles, download pipeline, session file).

pub mod appwrite;
pub mod error;
pub mod memory;
pub mod services;
pub mod transport;

pub use appwrite::AppwriteClient;
pub use error::{ClientError, ClientResult};
pub use memory::MemoryBackend;
pub use services::auth::SessionStore;
pub use services::categories::CategoryService;
pub use services::download::{DownloadOutcome, DownloadPipeline, FileSink, SaveSink, SavedFile};
pub use services::session_file::{SessionFile, StoredSession};
pub use services::users::UserService;
pub use services::wallpapers::{DeleteOutcome, UploadRequest, WallpaperService};
pub use transport::{DocumentStore, IdentityService, ObjectStore, UploadFile, UploadProgress};
