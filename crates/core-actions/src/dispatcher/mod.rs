//! Dispatcher applying `Action` to the application model.
//!
//! * `edit`    - field text mutation (insert / paste / backspace)
//! * `session` - focus moves, submit, logout
//!
//! Every branch is synchronous and returns a `DispatchResult` telling the
//! runtime whether to repaint, whether the mounted screen changed (full
//! repaint + cursor reset), or whether to quit.

use crate::{Action, ActionObserver};
use core_auth::AuthProvider;
use core_model::AppModel;
use std::time::Instant;

mod edit;
mod session;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The mounted screen was replaced (login <-> home).
    pub screen_changed: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            screen_changed: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            screen_changed: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            screen_changed: false,
        }
    }
    pub fn screen_changed() -> Self {
        Self {
            dirty: true,
            quit: false,
            screen_changed: true,
        }
    }
    pub(crate) fn from_dirty(dirty: bool) -> Self {
        if dirty { Self::dirty() } else { Self::clean() }
    }
}

/// Apply an action to the model at `now`.
pub fn dispatch<A: AuthProvider>(
    action: Action,
    model: &mut AppModel<A>,
    observers: &[Box<dyn ActionObserver>],
    now: Instant,
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }

    let label = action.label();
    let result = match action {
        Action::Edit(kind) => edit::handle_edit(kind, model, now),
        Action::Focus(dir) => session::handle_focus(dir, model, now),
        Action::Submit => session::handle_submit(model, now),
        Action::Logout => session::handle_logout(model, now),
        Action::Quit => DispatchResult::quit(),
    };
    tracing::trace!(
        target: "actions.dispatch",
        action = label,
        dirty = result.dirty,
        quit = result.quit,
        screen_changed = result.screen_changed,
        "dispatch_outcome"
    );
    result
}
