//! Terminal writer.
//!
//! Frames are translated into an ordered list of primitive commands and
//! flushed once, so a frame never appears half drawn.
//!
//! Invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute (0,0) origin; caller ensures bounds.
//! * Style changes are emitted only at flag boundaries within a row, and every
//!   row ends with a style reset.

use crate::compose::RenderedFrame;
use crate::{CellFlags, Frame};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    Style(CellFlags),
    ResetStyle,
    ShowCursorAt(u16, u16),
    HideCursor,
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn style(&mut self, flags: CellFlags) {
        if flags.is_empty() {
            self.cmds.push(Command::ResetStyle);
        } else {
            self.cmds.push(Command::Style(flags));
        }
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Flush to stdout.
    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Style(flags) => {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                    if flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if flags.contains(CellFlags::BOLD) {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    if flags.contains(CellFlags::ERROR) {
                        queue!(out, SetForegroundColor(Color::Red))?;
                    }
                }
                Command::ResetStyle => queue!(out, SetAttribute(Attribute::Reset))?,
                Command::ShowCursorAt(x, y) => queue!(out, MoveTo(x, y), Show)?,
                Command::HideCursor => queue!(out, Hide)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Translate a composed frame into writer commands (row-major, full repaint).
pub fn emit_frame(rendered: &RenderedFrame) -> Writer {
    let mut w = Writer::new();
    w.cmds.push(Command::HideCursor);
    emit_rows(&rendered.frame, &mut w);
    if let Some((x, y)) = rendered.cursor {
        w.cmds.push(Command::ShowCursorAt(x, y));
    }
    trace!(
        target: "render",
        rows = rendered.frame.height,
        commands = w.cmds.len(),
        cursor_visible = rendered.cursor.is_some(),
        "frame_emitted"
    );
    w
}

fn emit_rows(frame: &Frame, w: &mut Writer) {
    for y in 0..frame.height {
        w.move_to(0, y);
        w.clear_line();
        let mut current = CellFlags::empty();
        let mut run = String::new();
        for (cluster, _, flags, _) in frame.row_leaders(y) {
            if flags != current {
                w.print(std::mem::take(&mut run));
                w.style(flags);
                current = flags;
            }
            run.push_str(cluster);
        }
        w.print(run);
        if !current.is_empty() {
            w.style(CellFlags::empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(frame: Frame, cursor: Option<(u16, u16)>) -> RenderedFrame {
        RenderedFrame { frame, cursor }
    }

    #[test]
    fn plain_row_is_one_print() {
        let mut f = Frame::new(4, 1);
        f.put_str(0, 0, "ab", CellFlags::empty());
        let w = emit_frame(&rendered(f, None));
        assert_eq!(
            w.commands(),
            &[
                Command::HideCursor,
                Command::MoveTo(0, 0),
                Command::ClearLine,
                Command::Print("ab  ".into()),
            ]
        );
    }

    #[test]
    fn style_changes_split_runs_and_reset_at_row_end() {
        let mut f = Frame::new(4, 1);
        f.put_str(0, 0, "ab", CellFlags::empty());
        f.put_str(2, 0, "cd", CellFlags::REVERSE);
        let w = emit_frame(&rendered(f, Some((1, 0))));
        assert_eq!(
            &w.commands()[3..],
            &[
                Command::Print("ab".into()),
                Command::Style(CellFlags::REVERSE),
                Command::Print("cd".into()),
                Command::ResetStyle,
                Command::ShowCursorAt(1, 0),
            ]
        );
    }

    #[test]
    fn flush_to_buffer_emits_text() {
        let mut f = Frame::new(8, 2);
        f.put_str(0, 1, "Login", CellFlags::BOLD | CellFlags::ERROR);
        let mut out = Vec::new();
        emit_frame(&rendered(f, None)).flush_to(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Login"));
        assert!(s.contains('\x1b'));
    }
}
