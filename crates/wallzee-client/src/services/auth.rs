//! Admin session store.
//!
//! # Design
//! - State starts as `Loading` and becomes `Anonymous` or `Authenticated`
//!   after [`SessionStore::initialize`]; any failure there means anonymous.
//! - Login is admin-only. A non-admin identity has its fresh session deleted
//!   before [`ClientError::AccessDenied`] is returned, so no session survives.
//! - Logout always ends anonymous, even when the backend call fails.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use wallzee_core::validate::{validate_login, validate_password_change};
use wallzee_core::{SessionState, UserSession};

use crate::error::{ClientError, ClientResult};
use crate::transport::IdentityService;

/// Shared authentication state for the admin surface.
pub struct SessionStore {
    identity: Arc<dyn IdentityService>,
    admin_label: String,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Store in the `Loading` state.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityService>, admin_label: impl Into<String>) -> Self {
        Self {
            identity,
            admin_label: admin_label.into(),
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Signed-in user, if any.
    pub async fn current_user(&self) -> Option<UserSession> {
        self.state.read().await.user().cloned()
    }

    /// Resolve the existing session, if one is active.
    #[instrument(name = "session.initialize", skip(self))]
    pub async fn initialize(&self) -> SessionState {
        let next = match self.identity.current_identity().await {
            Ok(Some(identity)) => {
                SessionState::Authenticated(UserSession::from_identity(&identity, &self.admin_label))
            }
            Ok(None) => SessionState::Anonymous,
            Err(err) => {
                warn!(error = %err, "session check failed; continuing anonymous");
                SessionState::Anonymous
            }
        };
        self.state.write().await.clone_from(&next);
        next
    }

    /// Sign in with email and password; only admins are accepted.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call,
    /// [`ClientError::AccessDenied`] for non-admin accounts, or the backend
    /// failure.
    #[instrument(name = "session.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserSession> {
        validate_login(email, password)?;
        self.identity
            .create_email_session(email, password)
            .await
            .inspect_err(|err| warn!(error = %err, "login rejected"))?;

        let session = match self.identity.current_identity().await {
            Ok(Some(identity)) => UserSession::from_identity(&identity, &self.admin_label),
            Ok(None) => {
                self.discard_session().await;
                return Err(ClientError::from_status(401, None));
            }
            Err(err) => {
                self.discard_session().await;
                return Err(err);
            }
        };
        if !session.is_admin {
            warn!(user = %session.user_id, "non-admin login refused");
            self.discard_session().await;
            return Err(ClientError::AccessDenied);
        }

        info!(user = %session.user_id, "admin signed in");
        *self.state.write().await = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    /// End the session; the store is anonymous afterwards regardless.
    #[instrument(name = "session.logout", skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.identity.delete_current_session().await {
            warn!(error = %err, "logout call failed; clearing local state");
        }
        *self.state.write().await = SessionState::Anonymous;
    }

    /// Change the password of the signed-in account.
    ///
    /// A backend failure clears the local session.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any remote call, or the backend
    /// failure.
    #[instrument(name = "session.update_password", skip_all)]
    pub async fn update_password(&self, current: &str, new: &str, confirm: &str) -> ClientResult<()> {
        validate_password_change(current, new, confirm)?;
        if let Err(err) = self.identity.update_password(new, current).await {
            warn!(error = %err, "password change failed; clearing session");
            *self.state.write().await = SessionState::Anonymous;
            return Err(err);
        }
        info!("password changed");
        Ok(())
    }

    async fn discard_session(&self) {
        if let Err(err) = self.identity.delete_current_session().await {
            warn!(error = %err, "failed to discard session");
        }
        *self.state.write().await = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use wallzee_core::ValidationError;

    fn store(backend: &Arc<MemoryBackend>) -> SessionStore {
        SessionStore::new(backend.clone(), "admin")
    }

    #[tokio::test]
    async fn initialize_without_session_is_anonymous() {
        let backend = Arc::new(MemoryBackend::default());
        let store = store(&backend);
        assert!(store.state().await.is_loading());
        assert_eq!(store.initialize().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn initialize_failure_is_anonymous() {
        let backend = Arc::new(MemoryBackend::default());
        backend.fail_next("account.get", 1);
        assert_eq!(store(&backend).initialize().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn admin_login_authenticates() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        backend.add_account("root@example.com", "password1", "Root", &["admin"]);
        let store = store(&backend);
        let session = store.login("root@example.com", "password1").await?;
        assert!(session.is_admin);
        assert!(store.state().await.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn non_admin_login_leaves_no_session() {
        let backend = Arc::new(MemoryBackend::default());
        backend.add_account("user@example.com", "password1", "User", &[]);
        let store = store(&backend);
        let err = store.login("user@example.com", "password1").await.unwrap_err();
        assert!(matches!(err, ClientError::AccessDenied));
        assert_eq!(backend.session_user(), None);
        assert_eq!(store.state().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn blank_credentials_make_no_remote_call() {
        let backend = Arc::new(MemoryBackend::default());
        let err = store(&backend).login("", "x").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::MissingCredentials)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn logout_is_anonymous_even_on_failure() {
        let backend = Arc::new(MemoryBackend::default());
        let store = store(&backend);
        store.logout().await;
        assert_eq!(store.state().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn password_change_failure_clears_session() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        backend.add_account("root@example.com", "password1", "Root", &["admin"]);
        let store = store(&backend);
        store.login("root@example.com", "password1").await?;

        let err = store
            .update_password("wrong-old", "password2", "password2")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(store.state().await, SessionState::Anonymous);
        Ok(())
    }

    #[tokio::test]
    async fn password_change_succeeds() -> ClientResult<()> {
        let backend = Arc::new(MemoryBackend::default());
        backend.add_account("root@example.com", "password1", "Root", &["admin"]);
        let store = store(&backend);
        store.login("root@example.com", "password1").await?;
        store
            .update_password("password1", "password2", "password2")
            .await?;
        assert_eq!(backend.password_of("root@example.com").as_deref(), Some("password2"));
        Ok(())
    }
}
