//! Frame composition and terminal emission for the login shell.
//!
//! Rendering is split in two stages:
//! 1. `compose::build_frame` turns an `AppModel` into a `Frame` (a grid of
//!    grapheme cells) plus an optional cursor position. Pure, no I/O.
//! 2. `writer::emit_frame` translates a frame into queued terminal commands,
//!    flushed once per frame.
//!
//! Cells follow the grapheme cluster model: a leader cell stores the full
//! cluster and its visual width; wide clusters are followed by continuation
//! cells (width 0) that never print.
//!
//! Invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty.
//! - Password values never reach a frame; only one mask glyph per grapheme.

use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub mod compose;
pub mod status;
pub mod timing;
pub mod writer;

pub use compose::{RenderedFrame, build_frame};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // highlighted control
        const BOLD    = 0b0000_0010; // titles and focused stops
        const ERROR   = 0b0000_0100; // invalid field marker
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full grapheme cluster string (leader cells only). Empty for continuation cells.
    pub cluster: String,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.max(1) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set a full cluster at (x,y) and populate continuation cells for its width.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = width.max(1).min(self.width - x);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
    }

    /// Write `text` starting at (x,y), clipped at the right edge. Returns the
    /// column after the last cluster written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, flags: CellFlags) -> u16 {
        let mut col = x;
        for g in text.graphemes(true) {
            let w = g.width() as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > self.width {
                break;
            }
            self.set_cluster(col, y, g, w, flags);
            col += w;
        }
        col
    }

    /// Apply additional flags over `span_width` cells starting at (x,y).
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Iterate leader cells of a row, yielding (&str, width, flags, start_x).
    pub fn row_leaders<'a>(
        &'a self,
        y: u16,
    ) -> impl Iterator<Item = (&'a str, u16, CellFlags, u16)> + 'a {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let cell = &self.cells[start + x as usize];
                if cell.is_leader() {
                    let w = cell.width as u16;
                    let out = (&*cell.cluster, w, cell.flags, x);
                    x = x.saturating_add(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Row text with trailing blanks removed (tests and diagnostics).
    pub fn line_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let s: String = self.row_leaders(y).map(|(c, _, _, _)| c).collect();
        s.trim_end().to_string()
    }

    /// Flags of the cell at (x,y), if in bounds.
    pub fn flags_at(&self, x: u16, y: u16) -> Option<CellFlags> {
        self.index(x, y).map(|i| self.cells[i].flags)
    }
}
