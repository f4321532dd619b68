//! Status line composition.
//!
//! Two stages, as with the frame itself:
//! 1. `compose_status` produces an ordered vector of `StatusSegment` items.
//! 2. `format_status` renders those segments into the displayed string.
//!
//! An active ephemeral message replaces the key hints until it expires.

use core_model::Focus;

/// What the status line needs to know about the model.
pub struct StatusContext<'a> {
    pub screen: &'static str,
    /// Focus stop on the login screen; `None` elsewhere.
    pub focus: Option<Focus>,
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// Upper-cased screen label ("LOGIN", "HOME").
    Screen(String),
    Hints(&'static str),
    Message(&'a str),
}

const LOGIN_FIELD_HINTS: &str = "Tab/Shift-Tab move  Enter submit  Esc quit";
const LOGIN_BUTTON_HINTS: &str = "Enter log in  Tab/Shift-Tab move  Esc quit";
const HOME_HINTS: &str = "Enter/l log out  Esc/q quit";

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut segs = vec![StatusSegment::Screen(ctx.screen.to_ascii_uppercase())];
    match ctx.message {
        Some(msg) => segs.push(StatusSegment::Message(msg)),
        None => {
            let hints = match ctx.focus {
                Some(Focus::Submit) => LOGIN_BUTTON_HINTS,
                Some(_) => LOGIN_FIELD_HINTS,
                None => HOME_HINTS,
            };
            segs.push(StatusSegment::Hints(hints));
        }
    }
    segs
}

pub fn format_status(segs: &[StatusSegment<'_>]) -> String {
    let mut out = String::new();
    for seg in segs {
        match seg {
            StatusSegment::Screen(name) => {
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
            StatusSegment::Hints(text) => {
                out.push(' ');
                out.push_str(text);
            }
            StatusSegment::Message(text) => {
                out.push(' ');
                out.push_str(text);
            }
        }
    }
    out
}

/// Convenience: compose + format.
pub fn build_status(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx))
}
