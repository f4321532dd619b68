//! Screen composition: `AppModel` -> `Frame`.
//!
//! The login card is centered in the area above the status line:
//!
//! ```text
//! Login
//!
//! E-Mail
//! > [user@example.com       ]
//!
//! Password
//!   [********               ]
//!
//!   [ Login ]
//! ```
//!
//! The focused stop carries a `> ` marker and the terminal cursor sits at the
//! end of the focused field. A field flagged invalid gets `ERROR` styling
//! and an `(invalid)` suffix on its label. The Login button is always drawn
//! (submit is never disabled) and is reverse-highlighted once the debounced
//! form validity is true.

use crate::status::{StatusContext, build_status};
use crate::{CellFlags, Frame};
use core_auth::AuthProvider;
use core_form::{FieldKind, FieldSnapshot};
use core_model::{AppModel, Focus, LoginScreen, Screen};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const CARD_MAX_WIDTH: u16 = 44;
const LOGIN_CARD_ROWS: u16 = 9;
const HOME_CARD_ROWS: u16 = 3;
const FOCUS_MARKER: &str = "> ";
const PASSWORD_MASK: &str = "*";
pub const LOGIN_BUTTON: &str = "[ Login ]";
pub const LOGOUT_BUTTON: &str = "[ Logout ]";
pub const INVALID_SUFFIX: &str = " (invalid)";

/// A composed frame plus where the terminal cursor should be shown.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub frame: Frame,
    /// `None` hides the cursor (button focus, home screen).
    pub cursor: Option<(u16, u16)>,
}

/// Compose the whole screen for a `width` x `height` terminal.
pub fn build_frame<A: AuthProvider>(model: &AppModel<A>, width: u16, height: u16) -> RenderedFrame {
    let mut frame = Frame::new(width, height);
    if height == 0 || width == 0 {
        return RenderedFrame {
            frame,
            cursor: None,
        };
    }
    let status_row = height - 1;
    let content_rows = status_row;
    let card_w = width.min(CARD_MAX_WIDTH);
    let left = (width - card_w) / 2;

    let (cursor, focus) = match model.screen() {
        Screen::Login(login) => {
            let top = content_rows.saturating_sub(LOGIN_CARD_ROWS) / 2;
            let cursor = compose_login(&mut frame, login, left, top, card_w, content_rows);
            (cursor, Some(login.focus))
        }
        Screen::Home => {
            let top = content_rows.saturating_sub(HOME_CARD_ROWS) / 2;
            compose_home(&mut frame, left, top, content_rows);
            (None, None)
        }
    };

    let ctx = StatusContext {
        screen: model.screen().name(),
        focus,
        message: model.status.as_ref().map(|m| m.text.as_str()),
    };
    let status = build_status(&ctx);
    frame.put_str(0, status_row, &status, CellFlags::empty());
    frame.apply_flags_span(0, status_row, width, CellFlags::REVERSE);

    RenderedFrame { frame, cursor }
}

fn compose_login(
    frame: &mut Frame,
    login: &LoginScreen,
    left: u16,
    top: u16,
    card_w: u16,
    limit: u16,
) -> Option<(u16, u16)> {
    let row = |offset: u16| {
        let y = top.saturating_add(offset);
        (y < limit).then_some(y)
    };

    if let Some(y) = row(0) {
        frame.put_str(left, y, "Login", CellFlags::BOLD);
    }

    let mut cursor = None;
    for (kind, label_offset) in [(FieldKind::Email, 2), (FieldKind::Password, 5)] {
        let focused = login.focus == Focus::from(kind);
        let snapshot = login.form.field(kind);
        if let Some(y) = row(label_offset) {
            draw_label(frame, left, y, kind, snapshot);
        }
        if let Some(y) = row(label_offset + 1) {
            let end = draw_field_box(frame, left, y, card_w, kind, snapshot, focused);
            if focused && end < frame.width {
                cursor = Some((end, y));
            }
        }
    }

    if let Some(y) = row(8) {
        let focused = login.focus == Focus::Submit;
        let x = draw_focus_marker(frame, left, y, focused);
        let mut flags = CellFlags::empty();
        if login.form.form_is_valid() {
            flags |= CellFlags::REVERSE;
        }
        if focused {
            flags |= CellFlags::BOLD;
        }
        frame.put_str(x, y, LOGIN_BUTTON, flags);
    }
    cursor
}

fn compose_home(frame: &mut Frame, left: u16, top: u16, limit: u16) {
    if top < limit {
        frame.put_str(left, top, "Welcome back!", CellFlags::BOLD);
    }
    let y = top.saturating_add(2);
    if y < limit {
        let x = draw_focus_marker(frame, left, y, true);
        frame.put_str(x, y, LOGOUT_BUTTON, CellFlags::REVERSE | CellFlags::BOLD);
    }
}

fn draw_focus_marker(frame: &mut Frame, x: u16, y: u16, focused: bool) -> u16 {
    if focused {
        frame.put_str(x, y, FOCUS_MARKER, CellFlags::BOLD)
    } else {
        x.saturating_add(FOCUS_MARKER.len() as u16)
    }
}

fn draw_label(frame: &mut Frame, x: u16, y: u16, kind: FieldKind, snapshot: &FieldSnapshot) {
    if snapshot.is_flagged_invalid() {
        let end = frame.put_str(x, y, kind.label(), CellFlags::ERROR);
        frame.put_str(end, y, INVALID_SUFFIX, CellFlags::ERROR);
    } else {
        frame.put_str(x, y, kind.label(), CellFlags::empty());
    }
}

/// Draw `> [value   ]` and return the column just past the visible value.
fn draw_field_box(
    frame: &mut Frame,
    x: u16,
    y: u16,
    card_w: u16,
    kind: FieldKind,
    snapshot: &FieldSnapshot,
    focused: bool,
) -> u16 {
    let frame_flags = if snapshot.is_flagged_invalid() {
        CellFlags::ERROR
    } else {
        CellFlags::empty()
    };
    let open = draw_focus_marker(frame, x, y, focused);
    let inner_start = frame.put_str(open, y, "[", frame_flags);
    // "> " + "[" + inner + "]"
    let inner_w = card_w.saturating_sub(FOCUS_MARKER.len() as u16 + 2);
    let shown = visible_tail(&display_value(kind, &snapshot.value), inner_w.saturating_sub(1));
    let end = frame.put_str(inner_start, y, &shown, CellFlags::empty());
    frame.put_str(inner_start.saturating_add(inner_w), y, "]", frame_flags);
    end
}

/// What the field shows: the raw value, or one mask glyph per grapheme.
fn display_value(kind: FieldKind, value: &str) -> String {
    match kind {
        FieldKind::Email => value.to_string(),
        FieldKind::Password => PASSWORD_MASK.repeat(value.graphemes(true).count()),
    }
}

/// Longest suffix of `text` (in whole graphemes) that fits in `max_cols`.
fn visible_tail(text: &str, max_cols: u16) -> String {
    let mut cols = 0u16;
    let mut start = text.len();
    for (idx, g) in text.grapheme_indices(true).rev() {
        let w = g.width() as u16;
        if cols.saturating_add(w) > max_cols {
            break;
        }
        cols += w;
        start = idx;
    }
    text[start..].to_string()
}
