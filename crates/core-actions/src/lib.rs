//! Shell actions: what a key means on the current screen, and how an action
//! changes the `AppModel`.

pub mod dispatcher;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{translate_key, translate_paste};

/// Field text edits. Always applied at the end of the focused field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    /// Pasted text; line breaks are dropped before insertion.
    InsertText(String),
    /// Remove the last grapheme cluster.
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Next,
    Prev,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Edit(EditKind),
    Focus(FocusMove),
    Submit,
    Logout,
    Quit,
}

impl Action {
    /// Stable label for logs (never includes typed content).
    pub fn label(&self) -> &'static str {
        match self {
            Action::Edit(EditKind::InsertChar(_)) => "insert_char",
            Action::Edit(EditKind::InsertText(_)) => "insert_text",
            Action::Edit(EditKind::Backspace) => "backspace",
            Action::Focus(FocusMove::Next) => "focus_next",
            Action::Focus(FocusMove::Prev) => "focus_prev",
            Action::Submit => "submit",
            Action::Logout => "logout",
            Action::Quit => "quit",
        }
    }
}

/// Observer notified before each dispatched action.
pub trait ActionObserver: Send {
    fn on_action(&self, action: &Action);
}
