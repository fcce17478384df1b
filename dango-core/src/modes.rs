//! Terminal mode numbers.
//!
//! Standard ECMA-48 modes keep their wire numbers. DEC private modes
//! (selected with `CSI ? ... h/l`) are stored shifted by
//! [`PRIVATE_MODE_SHIFT`] so the two namespaces cannot collide; the
//! constants below are already shifted.

/// How far private mode numbers are shifted before storage.
pub const PRIVATE_MODE_SHIFT: u32 = 5;

/// *Line Feed/New Line Mode*: when set, a line feed also implies a
/// carriage return.
pub const LNM: u32 = 20;

/// *Insert/Replace Mode*: when set, drawn characters push existing
/// ones to the right instead of overwriting them.
pub const IRM: u32 = 4;

/// *Column Mode*: selects 132 columns when set, 80 when reset. The
/// screen is erased either way.
pub const DECCOLM: u32 = 3 << PRIVATE_MODE_SHIFT;

/// *Screen Mode*: reverses foreground and background across the whole
/// display.
pub const DECSCNM: u32 = 5 << PRIVATE_MODE_SHIFT;

/// *Origin Mode*: makes cursor addressing relative to the scrolling
/// region and confines the cursor to it.
pub const DECOM: u32 = 6 << PRIVATE_MODE_SHIFT;

/// *Autowrap Mode*: drawing past the last column continues on the next
/// line.
pub const DECAWM: u32 = 7 << PRIVATE_MODE_SHIFT;

/// *Text Cursor Enable Mode*: cursor visibility.
pub const DECTCEM: u32 = 25 << PRIVATE_MODE_SHIFT;
