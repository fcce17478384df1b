//! Cursor state for terminal emulation.
//!
//! The cursor tracks its position, the style template applied to
//! freshly drawn cells, and visibility. [`Savepoint`] is the DECSC
//! snapshot pushed by `ESC 7` and popped by `ESC 8`.

use serde::{Deserialize, Serialize};

use crate::cell::CellAttributes;
use crate::charset::Charset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// 0-based column. May transiently equal the screen width after
    /// drawing into the last column, recording a pending wrap.
    pub x: usize,
    /// 0-based row.
    pub y: usize,
    /// Style template for freshly drawn cells.
    pub attrs: CellAttributes,
    pub hidden: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            x: 0,
            y: 0,
            attrs: CellAttributes::default(),
            hidden: false,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Snapshot taken by `save_cursor` (DECSC).
///
/// Holds the cursor by value, never a reference into the live cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savepoint {
    pub cursor: Cursor,
    pub g0: Charset,
    pub g1: Charset,
    /// Active charset slot: 0 for G0, 1 for G1.
    pub charset: usize,
    /// Whether DECOM was set.
    pub origin: bool,
    /// Whether DECAWM was set.
    pub wrap: bool,
}
