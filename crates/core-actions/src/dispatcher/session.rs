//! Focus, submit and logout handling.

use super::DispatchResult;
use crate::FocusMove;
use core_auth::AuthProvider;
use core_model::{AppModel, SubmitEffect};
use std::time::Instant;

pub(crate) fn handle_focus<A: AuthProvider>(
    dir: FocusMove,
    model: &mut AppModel<A>,
    now: Instant,
) -> DispatchResult {
    let moved = match dir {
        FocusMove::Next => model.focus_next(now),
        FocusMove::Prev => model.focus_prev(now),
    };
    DispatchResult::from_dirty(moved)
}

pub(crate) fn handle_submit<A: AuthProvider>(
    model: &mut AppModel<A>,
    now: Instant,
) -> DispatchResult {
    match model.submit(now) {
        SubmitEffect::LoggedIn => DispatchResult::screen_changed(),
        SubmitEffect::Refocused(_) => DispatchResult::dirty(),
        SubmitEffect::Ignored => DispatchResult::clean(),
    }
}

pub(crate) fn handle_logout<A: AuthProvider>(
    model: &mut AppModel<A>,
    now: Instant,
) -> DispatchResult {
    if model.logout(now) {
        DispatchResult::screen_changed()
    } else {
        DispatchResult::clean()
    }
}
