//! Field text edits. The cursor always sits at the end of the focused field,
//! so every edit rebuilds the full value and feeds it to the form as an
//! `Edit` (the form never sees partial mutations).

use super::DispatchResult;
use crate::EditKind;
use core_auth::AuthProvider;
use core_model::AppModel;
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

pub(crate) fn handle_edit<A: AuthProvider>(
    kind: EditKind,
    model: &mut AppModel<A>,
    now: Instant,
) -> DispatchResult {
    let Some(current) = model.focused_value() else {
        return DispatchResult::clean();
    };
    let Some(next) = apply_edit(current, &kind) else {
        return DispatchResult::clean();
    };
    tracing::trace!(
        target: "actions.dispatch",
        op = edit_label(&kind),
        value_len = next.len(),
        "edit"
    );
    DispatchResult::from_dirty(model.edit_focused(next, now))
}

fn edit_label(kind: &EditKind) -> &'static str {
    match kind {
        EditKind::InsertChar(_) => "insert_char",
        EditKind::InsertText(_) => "insert_text",
        EditKind::Backspace => "backspace",
    }
}

/// New field value after `kind`, or `None` when the edit changes nothing.
pub(crate) fn apply_edit(current: &str, kind: &EditKind) -> Option<String> {
    match kind {
        EditKind::InsertChar(c) => {
            if c.is_control() {
                return None;
            }
            let mut next = String::with_capacity(current.len() + c.len_utf8());
            next.push_str(current);
            next.push(*c);
            Some(next)
        }
        EditKind::InsertText(text) => {
            let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
            if cleaned.is_empty() {
                return None;
            }
            Some(format!("{current}{cleaned}"))
        }
        EditKind::Backspace => {
            let (idx, _) = current.grapheme_indices(true).next_back()?;
            Some(current[..idx].to_string())
        }
    }
}
