//! Shared context, error types, and backend error mapping for the CLI.

use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, warn};
use wallzee_client::{
    AppwriteClient, CategoryService, ClientError, SessionFile, SessionStore, StoredSession,
    UserService, WallpaperService,
};
use wallzee_config::{ConfigError, WallzeeConfig};
use wallzee_core::session::RouteAccess;
use wallzee_core::{SessionState, UserSession};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Map a backend or service failure onto the CLI's two exit classes.
pub(crate) fn classify(err: ClientError) -> CliError {
    match err {
        ClientError::Validation(rule) => CliError::validation(rule.to_string()),
        ClientError::MissingApiKey => CliError::validation(
            "a server API key is required (pass --api-key or set WALLZEE_API_KEY)",
        ),
        ClientError::Status {
            code: 400 | 409,
            message,
            ..
        } => CliError::validation(message),
        other => CliError::failure(anyhow!(other.user_message())),
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) backend: AppwriteClient,
    pub(crate) config: WallzeeConfig,
    pub(crate) session_file: SessionFile,
}

impl AppContext {
    pub(crate) fn new(config: WallzeeConfig) -> CliResult<Self> {
        let backend = AppwriteClient::new(config.backend.clone(), config.client.http_timeout)
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
        let session_file = SessionFile::new(config.client.session_file.clone());
        Ok(Self {
            backend,
            config,
            session_file,
        })
    }

    pub(crate) fn wallpapers(&self) -> WallpaperService {
        let shared = Arc::new(self.backend.clone());
        WallpaperService::new(
            shared.clone(),
            shared,
            &self.config.backend,
            self.config.listing,
        )
    }

    pub(crate) fn categories(&self) -> CategoryService {
        CategoryService::new(
            Arc::new(self.backend.clone()),
            &self.config.backend,
            self.config.listing,
        )
    }

    pub(crate) fn users(&self) -> UserService {
        let shared = Arc::new(self.backend.clone());
        UserService::new(
            shared.clone(),
            shared,
            &self.config.backend,
            self.config.listing,
        )
    }

    pub(crate) fn session_store(&self) -> SessionStore {
        SessionStore::new(
            Arc::new(self.backend.clone()),
            self.config.backend.admin_label.clone(),
        )
    }

    /// Load the persisted session token into the backend client.
    pub(crate) async fn restore_session(&self) -> CliResult<Option<StoredSession>> {
        let stored = self.session_file.load().await.map_err(classify)?;
        if let Some(session) = &stored {
            debug!(path = %self.session_file.path().display(), "restored session");
            self.backend
                .set_session_token(Some(session.fallback_cookies.clone()))
                .await;
        }
        Ok(stored)
    }

    /// Persist the backend's current session token.
    pub(crate) async fn persist_session(&self, user_id: &str) -> CliResult<()> {
        let Some(token) = self.backend.session_token().await else {
            warn!("backend returned no session token; login will not persist");
            return Ok(());
        };
        self.session_file
            .save(&StoredSession {
                fallback_cookies: token,
                user_id: Some(user_id.to_string()),
            })
            .await
            .map_err(classify)
    }

    /// Resolve the stored session and insist on an admin.
    pub(crate) async fn require_admin(&self) -> CliResult<UserSession> {
        self.restore_session().await?;
        let state = self.session_store().initialize().await;
        match state.admin_route_access() {
            RouteAccess::Allowed => state
                .user()
                .cloned()
                .ok_or_else(|| CliError::failure(anyhow!("session resolved without a user"))),
            RouteAccess::Forbidden => Err(classify(ClientError::AccessDenied)),
            RouteAccess::RedirectToLogin | RouteAccess::Wait => Err(CliError::validation(
                "not signed in; run `wallzee login` first",
            )),
        }
    }

    /// Current session state after restoring the stored token.
    pub(crate) async fn resolve_session(&self) -> CliResult<SessionState> {
        self.restore_session().await?;
        Ok(self.session_store().initialize().await)
    }
}

/// Use a supplied secret or prompt for it on an interactive terminal.
pub(crate) fn resolve_secret(value: Option<String>, prompt: &str, flag: &str) -> CliResult<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if io::stdin().is_terminal() {
        rpassword::prompt_password(prompt)
            .map_err(|err| CliError::failure(anyhow!("failed to read {flag} from stdin: {err}")))
    } else {
        Err(CliError::validation(format!(
            "{flag} required; supply it via the flag when running non-interactively"
        )))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use httpmock::MockServer;
    use wallzee_config::WallzeeConfig;

    use super::AppContext;

    pub(crate) const PROJECT: &str = "proj";

    /// Context pointed at a mock server with a session file under `dir`.
    pub(crate) fn context_with(server: &MockServer, dir: &Path) -> AppContext {
        let mut config = WallzeeConfig::default();
        config.backend.endpoint = format!("{}/v1", server.base_url());
        config.backend.project_id = PROJECT.into();
        config.backend.database_id = "db".into();
        config.backend.wallpapers_collection_id = "wallpapers".into();
        config.backend.categories_collection_id = "categories".into();
        config.backend.users_collection_id = "users".into();
        config.backend.bucket_id = "bucket".into();
        config.client.session_file = dir.join("session.json");
        AppContext::new(config).expect("context should build")
    }
}
