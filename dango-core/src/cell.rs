//! Terminal cell representation
//!
//! A cell represents a single character position in the terminal grid.
//! Each cell contains:
//! - A character (Unicode scalar value or grapheme cluster)
//! - Foreground and background colors
//! - Text attributes (bold, italics, underscore, etc.)

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::color::Color;

/// Flags for cell text attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellFlags {
    bits: u16,
}

impl CellFlags {
    pub const NONE: u16 = 0;
    pub const BOLD: u16 = 1 << 0;
    pub const ITALICS: u16 = 1 << 1;
    pub const UNDERSCORE: u16 = 1 << 2;
    pub const STRIKETHROUGH: u16 = 1 << 3;
    pub const REVERSE: u16 = 1 << 4;
    pub const BLINK: u16 = 1 << 5;
    pub const WIDE_CHAR: u16 = 1 << 6;
    pub const WIDE_CHAR_SPACER: u16 = 1 << 7;

    pub const fn empty() -> Self {
        CellFlags { bits: Self::NONE }
    }

    pub const fn new(bits: u16) -> Self {
        CellFlags { bits }
    }

    pub fn contains(&self, flag: u16) -> bool {
        self.bits & flag != 0
    }

    pub fn set(&mut self, flag: u16, value: bool) {
        if value {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }

    pub fn insert(&mut self, flag: u16) {
        self.bits |= flag;
    }

    pub fn remove(&mut self, flag: u16) {
        self.bits &= !flag;
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The character stored in this cell
    /// We store a String to support grapheme clusters (combining characters)
    pub data: String,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text attributes
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            data: String::from(" "),
            fg: Color::Default,
            bg: Color::Default,
            flags: CellFlags::empty(),
        }
    }
}

impl Cell {
    /// Create a new cell with the given character and default style
    pub fn new(ch: char) -> Self {
        Cell {
            data: ch.to_string(),
            ..Default::default()
        }
    }

    /// Create a new cell carrying the given style template
    pub fn styled(ch: char, attrs: &CellAttributes) -> Self {
        Cell {
            data: ch.to_string(),
            fg: attrs.fg,
            bg: attrs.bg,
            flags: attrs.flags,
        }
    }

    /// A styled blank, used when erasing with the cursor's attributes
    pub fn blank(attrs: &CellAttributes) -> Self {
        Cell::styled(' ', attrs)
    }

    /// Check if this cell is a space with default attributes
    pub fn is_default(&self) -> bool {
        self.data == " "
            && self.fg == Color::Default
            && self.bg == Color::Default
            && self.flags.is_empty()
    }

    /// The display width of this cell in columns
    pub fn width(&self) -> usize {
        if self.flags.contains(CellFlags::WIDE_CHAR_SPACER) {
            0
        } else if self.flags.contains(CellFlags::WIDE_CHAR) {
            2
        } else {
            self.data.width().max(1)
        }
    }

    pub fn is_wide(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR)
    }

    /// Check if this cell is the stub slot after a wide character
    pub fn is_wide_spacer(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR_SPACER)
    }
}

/// The cursor's style template, applied to freshly drawn cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellAttributes {
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl CellAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all attributes to default
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
