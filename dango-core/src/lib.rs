//! Dango Core
//!
//! The screen model of the dango terminal emulator: an in-memory grid
//! of styled cells plus cursor, margin, mode, tab and charset state
//! that reflects what a VT100-family terminal would show.
//!
//! [`Screen`] implements `dango_stream::Listener`, so attaching it to a
//! `Stream` yields a complete headless emulator:
//!
//! ```
//! use dango_core::Screen;
//! use dango_stream::Stream;
//!
//! let mut screen = Screen::new(80, 24);
//! let mut stream = Stream::new();
//! stream.feed("\x1b[5B", &mut screen); // move the cursor down 5 rows
//! assert_eq!(screen.cursor().y, 5);
//! ```
//!
//! This crate performs no I/O and has no GUI dependencies; it can be
//! used headlessly for testing terminal programs.

pub mod cell;
pub mod charset;
pub mod color;
pub mod cursor;
pub mod line;
pub mod modes;
pub mod screen;

pub use cell::{Cell, CellAttributes, CellFlags};
pub use charset::Charset;
pub use color::{Color, NamedColor, Rgb};
pub use cursor::{Cursor, Savepoint};
pub use line::Line;
pub use screen::{Margins, Screen, TabStops};
