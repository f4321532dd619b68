//! Per-field reducer.
//!
//! A field is a `(value, is_valid)` pair. `is_valid` is `None` until the
//! field sees its first action and a definite bool afterwards. The reducer is
//! pure: it never mutates the incoming snapshot and always returns a
//! well-formed replacement.

use std::fmt;

/// Which input a snapshot belongs to. Selects the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Email,
    Password,
}

impl FieldKind {
    pub fn validate(self, value: &str) -> bool {
        match self {
            FieldKind::Email => validate_email(value),
            FieldKind::Password => validate_password(value),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Email => "E-Mail",
            FieldKind::Password => "Password",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Syntactic e-mail check: contains `@`. Intentionally weak.
pub fn validate_email(value: &str) -> bool {
    value.contains('@')
}

/// Minimum number of characters (exclusive) after trimming.
pub const PASSWORD_MIN_EXCLUSIVE: usize = 6;

/// Password check: more than six characters once surrounding whitespace is trimmed.
pub fn validate_password(value: &str) -> bool {
    value.trim().chars().count() > PASSWORD_MIN_EXCLUSIVE
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSnapshot {
    pub value: String,
    pub is_valid: Option<bool>,
}

impl FieldSnapshot {
    /// Initial, never evaluated state.
    pub fn untouched() -> Self {
        Self::default()
    }

    pub fn is_untouched(&self) -> bool {
        self.is_valid.is_none()
    }

    /// Validity with an untouched field counted as invalid.
    pub fn valid(&self) -> bool {
        self.is_valid == Some(true)
    }

    /// True only for a field evaluated as invalid (untouched fields are not flagged).
    pub fn is_flagged_invalid(&self) -> bool {
        self.is_valid == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// User changed the value.
    Edit(String),
    /// User left the field.
    Blur,
}

/// Compute the next snapshot for `kind` given `action`.
pub fn reduce(kind: FieldKind, state: &FieldSnapshot, action: FieldAction) -> FieldSnapshot {
    match action {
        FieldAction::Edit(value) => {
            let is_valid = kind.validate(&value);
            FieldSnapshot {
                value,
                is_valid: Some(is_valid),
            }
        }
        FieldAction::Blur => FieldSnapshot {
            value: state.value.clone(),
            is_valid: Some(kind.validate(&state.value)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_examples() {
        assert!(validate_email("a@b"));
        assert!(validate_email("@"));
        assert!(!validate_email("ab"));
        assert!(!validate_email(""));
    }

    #[test]
    fn password_examples() {
        assert!(!validate_password("short"));
        assert!(validate_password("longenough"));
        assert!(validate_password("1234567"));
        assert!(!validate_password("123456 "));
        assert!(!validate_password("   123456   "));
        assert!(validate_password(" 1234 567 "));
    }

    #[test]
    fn password_counts_chars_not_bytes() {
        // six two-byte chars: 12 bytes but only 6 chars
        assert!(!validate_password("éééééé"));
        assert!(validate_password("ééééééé"));
    }

    #[test]
    fn edit_recomputes_validity_eagerly() {
        let s0 = FieldSnapshot::untouched();
        let s1 = reduce(FieldKind::Email, &s0, FieldAction::Edit("x".into()));
        assert_eq!(s1.value, "x");
        assert_eq!(s1.is_valid, Some(false));
        let s2 = reduce(FieldKind::Email, &s1, FieldAction::Edit("x@".into()));
        assert_eq!(s2.is_valid, Some(true));
        // Input snapshot untouched by the reducer.
        assert_eq!(s1.value, "x");
    }

    #[test]
    fn blur_revalidates_without_changing_value() {
        let s0 = FieldSnapshot::untouched();
        let s1 = reduce(FieldKind::Password, &s0, FieldAction::Blur);
        assert_eq!(s1.value, "");
        assert_eq!(s1.is_valid, Some(false));
        assert!(s1.is_flagged_invalid());

        let typed = FieldSnapshot {
            value: "password1".into(),
            is_valid: None,
        };
        let blurred = reduce(FieldKind::Password, &typed, FieldAction::Blur);
        assert_eq!(blurred.value, "password1");
        assert_eq!(blurred.is_valid, Some(true));
    }

    #[test]
    fn untouched_is_neither_valid_nor_flagged() {
        let s = FieldSnapshot::untouched();
        assert!(s.is_untouched());
        assert!(!s.valid());
        assert!(!s.is_flagged_invalid());
    }

    #[test]
    fn kind_labels() {
        assert_eq!(FieldKind::Email.to_string(), "E-Mail");
        assert_eq!(FieldKind::Password.label(), "Password");
    }
}
