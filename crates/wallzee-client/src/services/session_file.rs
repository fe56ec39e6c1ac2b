//! Session token persisted between CLI invocations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Token and owner written after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Value of the fallback-cookie header.
    pub fallback_cookies: String,
    /// Signed-in user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// JSON file holding a [`StoredSession`].
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Session file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; `None` when no file exists.
    ///
    /// # Errors
    ///
    /// Returns IO failures other than a missing file, or a decode error for a
    /// corrupt file.
    pub async fn load(&self) -> ClientResult<Option<StoredSession>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ClientError::Io {
                    operation: "session_file.load",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let session = serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            operation: "session_file.load",
            source,
        })?;
        debug!(path = %self.path.display(), "session loaded");
        Ok(Some(session))
    }

    /// Write `session`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns IO failures.
    pub async fn save(&self, session: &StoredSession) -> ClientResult<()> {
        let io_error = |source| ClientError::Io {
            operation: "session_file.save",
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let body = serde_json::to_vec_pretty(session).map_err(|source| ClientError::Decode {
            operation: "session_file.save",
            source,
        })?;
        fs::write(&self.path, body).await.map_err(io_error)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the file; a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns IO failures other than a missing file.
    pub async fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ClientError::Io {
                operation: "session_file.clear",
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear_cycle() -> ClientResult<()> {
        let dir = tempfile::tempdir().map_err(|source| ClientError::Io {
            operation: "test",
            path: PathBuf::new(),
            source,
        })?;
        let file = SessionFile::new(dir.path().join("nested").join("session.json"));
        assert_eq!(file.load().await?, None);

        let session = StoredSession {
            fallback_cookies: r#"{"a_session_demo":"token"}"#.into(),
            user_id: Some("u1".into()),
        };
        file.save(&session).await?;
        assert_eq!(file.load().await?, Some(session));

        file.clear().await?;
        file.clear().await?;
        assert_eq!(file.load().await?, None);
        Ok(())
    }
}
