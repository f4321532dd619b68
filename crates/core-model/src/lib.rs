//! Application model: which screen is mounted, where focus is, and the
//! short-lived status message.
//!
//! Invariants:
//! * A `LoginForm` exists only while the Login screen is mounted. Leaving the
//!   screen drops the form, which cancels any pending validity aggregation.
//! * `Screen::Home` is shown iff the auth provider reports a login.
//! * Focus leaving a field delivers that field's blur before focus moves.

use core_auth::AuthProvider;
use core_form::{FieldKind, LoginForm, SubmitOutcome};
use std::time::{Duration, Instant};
use tracing::{debug, info};

mod status;
pub use status::EphemeralMessage;

/// How long transient status messages stay visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Focus stops of the login screen, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Email,
    Password,
    Submit,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Email => Focus::Password,
            Focus::Password => Focus::Submit,
            Focus::Submit => Focus::Email,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Email => Focus::Submit,
            Focus::Password => Focus::Email,
            Focus::Submit => Focus::Password,
        }
    }

    pub fn field(self) -> Option<FieldKind> {
        match self {
            Focus::Email => Some(FieldKind::Email),
            Focus::Password => Some(FieldKind::Password),
            Focus::Submit => None,
        }
    }
}

impl From<FieldKind> for Focus {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Email => Focus::Email,
            FieldKind::Password => Focus::Password,
        }
    }
}

#[derive(Debug)]
pub struct LoginScreen {
    pub form: LoginForm,
    pub focus: Focus,
}

#[derive(Debug)]
pub enum Screen {
    Login(LoginScreen),
    Home,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login(_) => "login",
            Screen::Home => "home",
        }
    }
}

/// Result of a submit as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitEffect {
    LoggedIn,
    Refocused(FieldKind),
    /// Submit outside the login screen.
    Ignored,
}

pub struct AppModel<A: AuthProvider> {
    screen: Screen,
    auth: A,
    quiet_period: Duration,
    pub status: Option<EphemeralMessage>,
}

impl<A: AuthProvider> AppModel<A> {
    /// Mount the screen matching the provider's current login state.
    pub fn new(auth: A, quiet_period: Duration) -> Self {
        let screen = if auth.is_logged_in() {
            Screen::Home
        } else {
            Screen::Login(Self::mount_login(quiet_period))
        };
        Self {
            screen,
            auth,
            quiet_period,
            status: None,
        }
    }

    fn mount_login(quiet_period: Duration) -> LoginScreen {
        LoginScreen {
            form: LoginForm::new(quiet_period),
            focus: Focus::Email,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn login(&self) -> Option<&LoginScreen> {
        match &self.screen {
            Screen::Login(login) => Some(login),
            Screen::Home => None,
        }
    }

    pub fn login_mut(&mut self) -> Option<&mut LoginScreen> {
        match &mut self.screen {
            Screen::Login(login) => Some(login),
            Screen::Home => None,
        }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn set_status<S: Into<String>>(&mut self, text: S, now: Instant) {
        self.status = Some(EphemeralMessage::new(text, now + STATUS_TTL));
    }

    /// Replace the focused field's value. No-op when focus is not on a field.
    pub fn edit_focused(&mut self, value: String, now: Instant) -> bool {
        let Some(login) = self.login_mut() else {
            return false;
        };
        match login.focus {
            Focus::Email => login.form.on_email_change_at(value, now),
            Focus::Password => login.form.on_password_change_at(value, now),
            Focus::Submit => return false,
        }
        true
    }

    /// Current value of the focused field.
    pub fn focused_value(&self) -> Option<&str> {
        let login = self.login()?;
        let kind = login.focus.field()?;
        Some(login.form.field(kind).value.as_str())
    }

    /// Move focus, blurring the field being left. Returns true when focus changed.
    pub fn set_focus(&mut self, target: Focus, now: Instant) -> bool {
        let Some(login) = self.login_mut() else {
            return false;
        };
        if login.focus == target {
            return false;
        }
        match login.focus {
            Focus::Email => login.form.on_email_blur_at(now),
            Focus::Password => login.form.on_password_blur_at(now),
            Focus::Submit => {}
        }
        debug!(target: "model.focus", from = ?login.focus, to = ?target, "focus_changed");
        login.focus = target;
        true
    }

    pub fn focus_next(&mut self, now: Instant) -> bool {
        match self.login().map(|l| l.focus.next()) {
            Some(target) => self.set_focus(target, now),
            None => false,
        }
    }

    pub fn focus_prev(&mut self, now: Instant) -> bool {
        match self.login().map(|l| l.focus.prev()) {
            Some(target) => self.set_focus(target, now),
            None => false,
        }
    }

    /// Submit the login form. On success the form is unmounted and Home shown.
    pub fn submit(&mut self, now: Instant) -> SubmitEffect {
        let Screen::Login(login) = &mut self.screen else {
            return SubmitEffect::Ignored;
        };
        match login.form.submit(&mut self.auth) {
            SubmitOutcome::Proceed { .. } => {
                // Dropping the screen drops the form and its pending aggregation.
                self.screen = Screen::Home;
                self.status = None;
                info!(target: "model.screen", screen = "home", "screen_mounted");
                SubmitEffect::LoggedIn
            }
            SubmitOutcome::FocusField(kind) => {
                self.set_focus(kind.into(), now);
                let hint = match kind {
                    FieldKind::Email => "Please enter a valid e-mail.",
                    FieldKind::Password => "Password must be longer than 6 characters.",
                };
                self.set_status(hint, now);
                SubmitEffect::Refocused(kind)
            }
        }
    }

    /// Log out from the home screen and mount a fresh login form.
    pub fn logout(&mut self, now: Instant) -> bool {
        if !matches!(self.screen, Screen::Home) {
            return false;
        }
        self.auth.on_logout();
        self.screen = Screen::Login(Self::mount_login(self.quiet_period));
        self.set_status("Logged out.", now);
        info!(target: "model.screen", screen = "login", "screen_mounted");
        true
    }

    /// Earliest instant at which `tick` has work to do for the form.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.login().and_then(|l| l.form.deadline())
    }

    /// Drive timers. Returns true when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(login) = self.login_mut()
            && login.form.poll(now).is_some()
        {
            changed = true;
        }
        if self.status.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.status = None;
            changed = true;
        }
        changed
    }
}
