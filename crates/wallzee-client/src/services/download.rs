//! Download pipeline: resolve the source, save the bytes, bump the counter.
//!
//! # Design
//! - A wallpaper already downloading is refused until its first run ends.
//! - The counter increment is best-effort; a failed increment never undoes
//!   a saved file.
//! - Saving goes through [`SaveSink`] so tests and front ends choose where
//!   bytes land.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};
use wallzee_core::WallpaperRecord;
use wallzee_core::download::{InFlightDownloads, plan_download, success_message};

use super::wallpapers::WallpaperService;
use crate::appwrite::classify_response;
use crate::error::{ClientError, ClientResult};

/// A file written by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Where the bytes landed.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
}

/// Destination for downloaded bytes.
#[async_trait]
pub trait SaveSink: Send + Sync {
    /// Fetch `url` and store it under `filename`.
    async fn save(&self, url: &str, filename: &str) -> ClientResult<SavedFile>;
}

/// Streams downloads into a directory.
#[derive(Clone, Debug)]
pub struct FileSink {
    http: Client,
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir` with the given HTTP client.
    #[must_use]
    pub fn new(http: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            dir: dir.into(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SaveSink for FileSink {
    #[instrument(name = "download.save", skip(self))]
    async fn save(&self, url: &str, filename: &str) -> ClientResult<SavedFile> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                operation: "download.fetch",
                source,
            })?;
        if !response.status().is_success() {
            return Err(classify_response(response).await);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ClientError::Io {
                operation: "download.create_dir",
                path: self.dir.clone(),
                source,
            })?;
        let path = self.dir.join(filename);
        let io_error = |source| ClientError::Io {
            operation: "download.write",
            path: path.clone(),
            source,
        };
        let mut file = File::create(&path).await.map_err(io_error)?;
        let mut written = 0_u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| ClientError::Http {
                operation: "download.stream",
                source,
            })?;
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
            debug!(written, "download progress");
        }
        file.flush().await.map_err(io_error)?;
        Ok(SavedFile {
            path,
            bytes: written,
        })
    }
}

/// Outcome of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Saved file.
    pub saved: SavedFile,
    /// Stored counter after the increment; `None` when the increment failed.
    pub new_count: Option<u64>,
    /// Feedback line for the user.
    pub message: String,
}

/// Coordinates downloads and counter updates.
pub struct DownloadPipeline<S> {
    wallpapers: WallpaperService,
    sink: S,
    in_flight: Mutex<InFlightDownloads>,
}

struct InFlightGuard<'a> {
    in_flight: &'a Mutex<InFlightDownloads>,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finish(&self.id);
    }
}

impl<S: SaveSink> DownloadPipeline<S> {
    /// Pipeline saving through `sink`.
    #[must_use]
    pub fn new(wallpapers: WallpaperService, sink: S) -> Self {
        Self {
            wallpapers,
            sink,
            in_flight: Mutex::new(InFlightDownloads::default()),
        }
    }

    /// Whether `id` is currently downloading.
    #[must_use]
    pub fn is_downloading(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    fn begin(&self, id: &str) -> ClientResult<InFlightGuard<'_>> {
        let started = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .begin(id);
        if !started {
            return Err(ClientError::DownloadInProgress { id: id.to_string() });
        }
        Ok(InFlightGuard {
            in_flight: &self.in_flight,
            id: id.to_string(),
        })
    }

    /// Save a wallpaper and record the download.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DownloadInProgress`] for a repeated request,
    /// a core error when the record has no source, or the sink failure.
    #[instrument(name = "download.run", skip(self, record), fields(id = %record.id))]
    pub async fn download(&self, record: &WallpaperRecord) -> ClientResult<DownloadOutcome> {
        let _guard = self.begin(&record.id)?;
        let objects = self.wallpapers.objects();
        let plan = plan_download(record, |file_id| objects.download_url(file_id))?;

        let saved = self
            .sink
            .save(&plan.url, &plan.filename)
            .await
            .inspect_err(|err| error!(error = %err, "download failed"))?;

        let new_count = match self.wallpapers.increment_downloads(&plan.id).await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!(error = %err, "download counter not updated");
                None
            }
        };
        info!(path = %saved.path.display(), "wallpaper saved");
        Ok(DownloadOutcome {
            saved,
            new_count,
            message: success_message(&plan.title),
        })
    }
}
