//! Dango Stream
//!
//! The parser half of the dango terminal emulator: a character-driven
//! state machine that recognizes control codes, escape sequences, CSI
//! sequences, sharp sequences, and character set designations, and
//! dispatches named events to a [`Listener`].
//!
//! The parser performs no I/O and owns no screen state; pair it with
//! `dango-core`'s `Screen` (or any other [`Listener`]) to obtain a
//! full emulator. [`ByteStream`] adapts raw bytes to characters in
//! front of the parser.

pub mod bytes;
pub mod control;
pub mod listener;
pub mod params;
pub mod stream;

pub use bytes::{ByteStream, Encoding, ErrorPolicy};
pub use listener::{Event, Fanout, Listener};
pub use params::Params;
pub use stream::Stream;
