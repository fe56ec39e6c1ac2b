//! Authentication lifecycle shared by the front ends.
//!
//! # Design
//! - State starts in `Loading` until the identity check resolves.
//! - Protected routes wait while loading, then redirect or render.

use crate::model::UserSession;

/// Application-scoped authentication state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Identity check still in flight.
    #[default]
    Loading,
    /// No active session.
    Anonymous,
    /// A signed-in user.
    Authenticated(UserSession),
}

/// Outcome of an admin route guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    /// Render the route.
    Allowed,
    /// Show a spinner until the session resolves.
    Wait,
    /// Send the visitor to the login page.
    RedirectToLogin,
    /// Signed in without the admin label.
    Forbidden,
}

impl SessionState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserSession> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Loading | Self::Anonymous => None,
        }
    }

    /// Whether the identity check is still running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether a signed-in admin is present.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_admin)
    }

    /// Guard decision for admin-only routes.
    #[must_use]
    pub fn admin_route_access(&self) -> RouteAccess {
        match self {
            Self::Loading => RouteAccess::Wait,
            Self::Anonymous => RouteAccess::RedirectToLogin,
            Self::Authenticated(user) if user.is_admin => RouteAccess::Allowed,
            Self::Authenticated(_) => RouteAccess::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> UserSession {
        UserSession {
            user_id: "u".into(),
            email: "u@example.com".into(),
            name: "U".into(),
            is_admin,
        }
    }

    #[test]
    fn guard_follows_lifecycle() {
        assert_eq!(SessionState::default().admin_route_access(), RouteAccess::Wait);
        assert_eq!(
            SessionState::Anonymous.admin_route_access(),
            RouteAccess::RedirectToLogin
        );
        assert_eq!(
            SessionState::Authenticated(user(true)).admin_route_access(),
            RouteAccess::Allowed
        );
        assert_eq!(
            SessionState::Authenticated(user(false)).admin_route_access(),
            RouteAccess::Forbidden
        );
    }

    #[test]
    fn accessors() {
        assert!(SessionState::Loading.is_loading());
        assert!(SessionState::Anonymous.user().is_none());
        assert!(SessionState::Authenticated(user(true)).is_admin());
        assert!(!SessionState::Authenticated(user(false)).is_admin());
    }
}
