//! Submit decision.

use crate::field::{FieldKind, FieldSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form valid: hand these raw values to the login callback.
    Proceed { email: String, password: String },
    /// Form invalid: move focus to this field.
    FocusField(FieldKind),
}

impl SubmitOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, SubmitOutcome::Proceed { .. })
    }
}

/// Decide what a submit does. E-mail is checked first, so it wins focus when
/// both fields are invalid. Values are forwarded exactly as stored.
pub fn evaluate(
    email: &FieldSnapshot,
    password: &FieldSnapshot,
    form_valid: bool,
) -> SubmitOutcome {
    if form_valid {
        return SubmitOutcome::Proceed {
            email: email.value.clone(),
            password: password.value.clone(),
        };
    }
    if !email.valid() {
        SubmitOutcome::FocusField(FieldKind::Email)
    } else {
        SubmitOutcome::FocusField(FieldKind::Password)
    }
}
