//! Authentication collaborator seam.
//!
//! The login form never verifies credentials itself. It hands the raw values
//! of a successful submit to an `AuthProvider` supplied by the caller, and the
//! home screen routes its logout button to the same provider. Keeping this a
//! trait (instead of an ambient global) lets the form be tested in isolation
//! with a recording provider.
//!
//! `AuthSession` is the in-memory provider used by the binary. It accepts any
//! credentials and keeps no state across restarts.

use tracing::info;

/// Outbound callbacks of the login flow.
pub trait AuthProvider {
    /// Invoked exactly once per successful submit with the stored field values.
    fn on_login(&mut self, email: &str, password: &str);
    /// Invoked by the home screen's logout control.
    fn on_logout(&mut self);
    /// Whether a login has happened since the last logout.
    fn is_logged_in(&self) -> bool;
}

impl<T: AuthProvider + ?Sized> AuthProvider for &mut T {
    fn on_login(&mut self, email: &str, password: &str) {
        (**self).on_login(email, password)
    }
    fn on_logout(&mut self) {
        (**self).on_logout()
    }
    fn is_logged_in(&self) -> bool {
        (**self).is_logged_in()
    }
}

/// In-memory session: logged in after any `on_login`, logged out after `on_logout`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthSession {
    user: Option<String>,
    logins: u64,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// E-mail of the current user, if logged in.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Number of successful logins over the session lifetime.
    pub fn login_count(&self) -> u64 {
        self.logins
    }
}

impl AuthProvider for AuthSession {
    fn on_login(&mut self, email: &str, password: &str) {
        // Credentials are accepted as-is; only lengths reach the log.
        info!(
            target: "auth",
            email_len = email.len(),
            password_len = password.len(),
            "login"
        );
        self.user = Some(email.to_string());
        self.logins += 1;
    }

    fn on_logout(&mut self) {
        info!(target: "auth", was_logged_in = self.user.is_some(), "logout");
        self.user = None;
    }

    fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_logged_out() {
        let session = AuthSession::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.user(), None);
        assert_eq!(session.login_count(), 0);
    }

    #[test]
    fn login_then_logout_round_trip() {
        let mut session = AuthSession::new();
        session.on_login("x@y.com", "password1");
        assert!(session.is_logged_in());
        assert_eq!(session.user(), Some("x@y.com"));
        session.on_logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.user(), None);
        assert_eq!(session.login_count(), 1, "logout keeps the counter");
    }

    #[test]
    fn mut_ref_forwards_to_inner_provider() {
        fn login_via<A: AuthProvider>(mut provider: A) {
            provider.on_login("a@b", "secret-pass");
        }
        let mut session = AuthSession::new();
        login_via(&mut session);
        assert!(session.is_logged_in());
        assert_eq!(session.login_count(), 1);
    }
}
