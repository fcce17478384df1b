//! Control characters recognized by the stream.
//!
//! The set here is for `TERM=linux`, a superset of VT102.

/// Does nothing.
pub const NUL: char = '\u{00}';
/// Beeps.
pub const BEL: char = '\u{07}';
/// Backspace one column, but not past the beginning of the line.
pub const BS: char = '\u{08}';
/// Move cursor to the next tab stop, or to the end of the line if
/// there is no tab stop left.
pub const HT: char = '\u{09}';
/// Line feed; with new-line mode set also a carriage return.
pub const LF: char = '\u{0a}';
/// Vertical tab, treated as [`LF`].
pub const VT: char = '\u{0b}';
/// Form feed, treated as [`LF`].
pub const FF: char = '\u{0c}';
/// Move cursor to the left margin of the current line.
pub const CR: char = '\u{0d}';
/// Activate the G1 character set.
pub const SO: char = '\u{0e}';
/// Activate the G0 character set.
pub const SI: char = '\u{0f}';
/// Interrupt an escape sequence in progress.
pub const CAN: char = '\u{18}';
/// Same as [`CAN`].
pub const SUB: char = '\u{1a}';
/// Starts an escape sequence.
pub const ESC: char = '\u{1b}';
/// Ignored.
pub const DEL: char = '\u{7f}';
/// Single-character control sequence introducer.
pub const CSI_C1: char = '\u{9b}';
