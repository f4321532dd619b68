//! Login form validation core.
//!
//! Three pieces:
//! * `field`: pure per-field reducer (`Edit` / `Blur`) with the e-mail and
//!   password validators.
//! * `debounce`: single-slot cancellable aggregation that publishes the
//!   combined form validity after a quiet period.
//! * `gate`: submit decision (proceed vs. focus redirect).
//!
//! `LoginForm` wires them together and is what the shell talks to. It holds
//! no clock and does no I/O: time enters through the `_at` methods and
//! `poll`, and the login callback is an `AuthProvider` passed to `submit`.
//!
//! Lifecycle: a form is created in its mounted state (both fields untouched,
//! validity `false`). Dropping it (or calling `dispose`) cancels any pending
//! aggregation.

pub mod debounce;
pub mod field;
pub mod gate;

pub use debounce::{DEFAULT_QUIET_PERIOD, DebouncedValidityAggregator, PendingTimer, TimerId};
pub use field::{
    FieldAction, FieldKind, FieldSnapshot, reduce, validate_email, validate_password,
};
pub use gate::{SubmitOutcome, evaluate};

use core_auth::AuthProvider;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

#[derive(Debug)]
pub struct LoginForm {
    email: FieldSnapshot,
    password: FieldSnapshot,
    validity: DebouncedValidityAggregator,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl LoginForm {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            email: FieldSnapshot::untouched(),
            password: FieldSnapshot::untouched(),
            validity: DebouncedValidityAggregator::new(quiet_period),
        }
    }

    pub fn email(&self) -> &FieldSnapshot {
        &self.email
    }

    pub fn password(&self) -> &FieldSnapshot {
        &self.password
    }

    pub fn field(&self, kind: FieldKind) -> &FieldSnapshot {
        match kind {
            FieldKind::Email => &self.email,
            FieldKind::Password => &self.password,
        }
    }

    /// Debounced combined validity.
    pub fn form_is_valid(&self) -> bool {
        self.validity.form_is_valid()
    }

    pub fn validity(&self) -> &DebouncedValidityAggregator {
        &self.validity
    }

    /// When the next aggregation is due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.validity.deadline()
    }

    pub fn on_email_change(&mut self, value: impl Into<String>) {
        self.on_email_change_at(value, Instant::now())
    }

    pub fn on_email_change_at(&mut self, value: impl Into<String>, now: Instant) {
        self.apply(FieldKind::Email, FieldAction::Edit(value.into()), now);
    }

    pub fn on_password_change(&mut self, value: impl Into<String>) {
        self.on_password_change_at(value, Instant::now())
    }

    pub fn on_password_change_at(&mut self, value: impl Into<String>, now: Instant) {
        self.apply(FieldKind::Password, FieldAction::Edit(value.into()), now);
    }

    pub fn on_email_blur(&mut self) {
        self.on_email_blur_at(Instant::now())
    }

    pub fn on_email_blur_at(&mut self, now: Instant) {
        self.apply(FieldKind::Email, FieldAction::Blur, now);
    }

    pub fn on_password_blur(&mut self) {
        self.on_password_blur_at(Instant::now())
    }

    pub fn on_password_blur_at(&mut self, now: Instant) {
        self.apply(FieldKind::Password, FieldAction::Blur, now);
    }

    /// Run `action` through the field reducer for `kind`. Returns true when the
    /// snapshot changed (and the aggregation was rescheduled).
    pub fn apply(&mut self, kind: FieldKind, action: FieldAction, now: Instant) -> bool {
        let action_kind = match &action {
            FieldAction::Edit(_) => "edit",
            FieldAction::Blur => "blur",
        };
        let slot = match kind {
            FieldKind::Email => &mut self.email,
            FieldKind::Password => &mut self.password,
        };
        let next = reduce(kind, slot, action);
        if next == *slot {
            trace!(target: "form.field", field = %kind, action = action_kind, "unchanged");
            return false;
        }
        debug!(
            target: "form.field",
            field = %kind,
            action = action_kind,
            value_len = next.value.len(),
            is_valid = ?next.is_valid,
            "field_updated"
        );
        *slot = next;
        self.validity
            .notify_at(self.email.valid(), self.password.valid(), now);
        true
    }

    /// Advance the debounce clock. Returns the newly published validity when a
    /// pending aggregation fired.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        self.validity.poll(now)
    }

    /// Evaluate a submit. On `Proceed` the provider's `on_login` is invoked
    /// once with the stored values; on `FocusField` nothing is forwarded.
    pub fn submit<A: AuthProvider + ?Sized>(&mut self, auth: &mut A) -> SubmitOutcome {
        let outcome = evaluate(&self.email, &self.password, self.form_is_valid());
        match &outcome {
            SubmitOutcome::Proceed { email, password } => {
                info!(target: "form.submit", "proceed");
                auth.on_login(email, password);
            }
            SubmitOutcome::FocusField(kind) => {
                info!(
                    target: "form.submit",
                    focus = %kind,
                    email_valid = ?self.email.is_valid,
                    password_valid = ?self.password.is_valid,
                    "rejected"
                );
            }
        }
        outcome
    }

    /// Tear down the form. Pending aggregation is cancelled and never fires.
    pub fn dispose(&mut self) {
        self.validity.dispose();
    }
}
