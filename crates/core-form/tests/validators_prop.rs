//! Property tests for the field validators.

use core_form::{FieldAction, FieldKind, FieldSnapshot, reduce, validate_email, validate_password};
use proptest::prelude::*;

proptest! {
    #[test]
    fn email_without_at_is_invalid(s in "[^@]*") {
        prop_assert!(!validate_email(&s));
    }

    #[test]
    fn email_with_at_is_valid(pre in ".*", post in ".*") {
        let s = format!("{pre}@{post}");
        prop_assert!(validate_email(&s));
    }

    #[test]
    fn password_matches_trimmed_char_count(s in "\\PC*") {
        prop_assert_eq!(validate_password(&s), s.trim().chars().count() > 6);
    }

    #[test]
    fn edit_always_yields_definite_validity(s in "\\PC*") {
        for kind in [FieldKind::Email, FieldKind::Password] {
            let next = reduce(kind, &FieldSnapshot::untouched(), FieldAction::Edit(s.clone()));
            prop_assert_eq!(&next.value, &s);
            prop_assert_eq!(next.is_valid, Some(kind.validate(&s)));
        }
    }

    #[test]
    fn blur_is_idempotent(s in "\\PC*") {
        let start = FieldSnapshot { value: s, is_valid: None };
        let once = reduce(FieldKind::Password, &start, FieldAction::Blur);
        let twice = reduce(FieldKind::Password, &once, FieldAction::Blur);
        prop_assert_eq!(once, twice);
    }
}
