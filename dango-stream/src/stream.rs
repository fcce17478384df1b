//! The escape sequence state machine.
//!
//! [`Stream`] consumes one character at a time and dispatches named
//! events to a [`Listener`]. It recognizes basic control characters,
//! `ESC`-introduced sequences, CSI sequences with numeric parameters,
//! "sharp" sequences (`ESC #`), and character set designations
//! (`ESC (` / `ESC )`).
//!
//! The machine is deterministic and never fails on malformed input:
//! unrecognized sequences are reported through [`Listener::debug`] and
//! parsing resumes from the ground state.

use log::trace;

use crate::control as ctrl;
use crate::listener::{Event, Listener};
use crate::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Plain text and control characters.
    Ground,
    /// Just saw `ESC`.
    Escape,
    /// After `ESC #`.
    Sharp,
    /// After `ESC (` or `ESC )`.
    Charset,
    /// Inside CSI parameter bytes.
    Arguments,
}

/// Character stream parser and event dispatcher.
///
/// ```
/// use dango_stream::{Listener, Stream};
///
/// #[derive(Default)]
/// struct Counter(usize);
///
/// impl Listener for Counter {
///     fn cursor_up(&mut self, count: u16) {
///         self.0 += count as usize;
///     }
/// }
///
/// let mut stream = Stream::new();
/// let mut counter = Counter::default();
/// stream.feed("\x1b[5A", &mut counter);
/// assert_eq!(counter.0, 5);
/// ```
pub struct Stream {
    state: State,
    params: Params,
    current: u32,
    private: bool,
    charset_mode: char,
}

impl Default for Stream {
    fn default() -> Self {
        Self::new()
    }
}

fn emit<L: Listener + ?Sized>(listener: &mut L, event: Event, f: impl FnOnce(&mut L)) {
    listener.before(event);
    f(listener);
    listener.after(event);
}

impl Stream {
    pub fn new() -> Self {
        Stream {
            state: State::Ground,
            params: Params::new(),
            current: 0,
            private: false,
            charset_mode: '(',
        }
    }

    /// Consume a blob of text, advancing the state as necessary.
    pub fn feed<L: Listener + ?Sized>(&mut self, data: &str, listener: &mut L) {
        for ch in data.chars() {
            self.advance(ch, listener);
        }
    }

    /// Consume a single character.
    pub fn advance<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match self.state {
            State::Ground => self.ground(ch, listener),
            State::Escape => self.escape(ch, listener),
            State::Sharp => self.sharp(ch, listener),
            State::Charset => self.charset(ch, listener),
            State::Arguments => self.arguments(ch, listener),
        }
    }

    /// Abandon any sequence in progress and return to the ground state.
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.clear();
    }

    fn clear(&mut self) {
        self.params.clear();
        self.current = 0;
        self.private = false;
    }

    fn ground<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match ch {
            ctrl::ESC => self.state = State::Escape,
            ctrl::CSI_C1 => {
                self.clear();
                self.state = State::Arguments;
            }
            ctrl::NUL | ctrl::DEL => {}
            _ => {
                if !dispatch_basic(ch, listener) {
                    emit(listener, Event::Draw, |l| l.draw(ch));
                }
            }
        }
    }

    fn escape<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match ch {
            '#' => {
                self.state = State::Sharp;
                return;
            }
            '[' => {
                self.clear();
                self.state = State::Arguments;
                return;
            }
            '(' | ')' => {
                self.charset_mode = ch;
                self.state = State::Charset;
                return;
            }
            'c' => emit(listener, Event::Reset, |l| l.reset()),
            'D' => emit(listener, Event::Index, |l| l.index()),
            'E' => emit(listener, Event::Linefeed, |l| l.linefeed()),
            'H' => emit(listener, Event::SetTabStop, |l| l.set_tab_stop()),
            'M' => emit(listener, Event::ReverseIndex, |l| l.reverse_index()),
            '7' => emit(listener, Event::SaveCursor, |l| l.save_cursor()),
            '8' => emit(listener, Event::RestoreCursor, |l| l.restore_cursor()),
            _ => {
                trace!("unrecognized escape sequence: ESC {:?}", ch);
                listener.debug(&[], ch);
            }
        }
        self.state = State::Ground;
    }

    fn sharp<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match ch {
            '8' => emit(listener, Event::AlignmentDisplay, |l| l.alignment_display()),
            _ => {
                trace!("unrecognized sharp sequence: ESC # {:?}", ch);
                listener.debug(&[], ch);
            }
        }
        self.state = State::Ground;
    }

    fn charset<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        let mode = self.charset_mode;
        emit(listener, Event::SetCharset, |l| l.set_charset(ch, mode));
        self.state = State::Ground;
    }

    fn arguments<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        match ch {
            '?' => self.private = true,
            ctrl::BEL | ctrl::BS | ctrl::HT | ctrl::LF | ctrl::VT | ctrl::FF | ctrl::CR => {
                // Basic controls embedded mid-sequence execute without
                // touching the accumulated parameters.
                dispatch_basic(ch, listener);
            }
            // Secondary device attribute requests (`CSI > c`) are not
            // supported; the marker is skipped like a space.
            ' ' | '>' => {}
            ctrl::CAN | ctrl::SUB => {
                // The sequence is aborted and the substitute character
                // itself is displayed.
                emit(listener, Event::Draw, |l| l.draw(ch));
                self.reset();
            }
            '0'..='9' => {
                self.current = self
                    .current
                    .saturating_mul(10)
                    .saturating_add(ch as u32 - '0' as u32);
            }
            ';' => self.push_current(ch, listener),
            _ => {
                self.push_current(ch, listener);
                self.dispatch_csi(ch, listener);
                self.reset();
            }
        }
    }

    fn push_current<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        let value = self.current.min(9999) as u16;
        if !self.params.push(value) {
            trace!("parameter overflow in CSI sequence at {:?}", ch);
            listener.debug(self.params.as_slice(), ch);
        }
        self.current = 0;
    }

    fn dispatch_csi<L: Listener + ?Sized>(&mut self, ch: char, listener: &mut L) {
        let params = self.params;
        let private = self.private;
        let p0 = params.get_or_zero(0);
        let p1 = params.get_or_zero(1);

        match ch {
            '@' => emit(listener, Event::InsertCharacters, |l| {
                l.insert_characters(p0)
            }),
            'A' => emit(listener, Event::CursorUp, |l| l.cursor_up(p0)),
            'B' | 'e' => emit(listener, Event::CursorDown, |l| l.cursor_down(p0)),
            'C' | 'a' => emit(listener, Event::CursorForward, |l| l.cursor_forward(p0)),
            'D' => emit(listener, Event::CursorBack, |l| l.cursor_back(p0)),
            'E' => emit(listener, Event::CursorDown1, |l| l.cursor_down1(p0)),
            'F' => emit(listener, Event::CursorUp1, |l| l.cursor_up1(p0)),
            'G' | '\'' => emit(listener, Event::CursorToColumn, |l| l.cursor_to_column(p0)),
            'H' | 'f' => emit(listener, Event::CursorPosition, |l| {
                l.cursor_position(p0, p1)
            }),
            'J' => emit(listener, Event::EraseInDisplay, |l| l.erase_in_display(p0)),
            'K' => emit(listener, Event::EraseInLine, |l| l.erase_in_line(p0)),
            'L' => emit(listener, Event::InsertLines, |l| l.insert_lines(p0)),
            'M' => emit(listener, Event::DeleteLines, |l| l.delete_lines(p0)),
            'P' => emit(listener, Event::DeleteCharacters, |l| {
                l.delete_characters(p0)
            }),
            'X' => emit(listener, Event::EraseCharacters, |l| l.erase_characters(p0)),
            'd' => emit(listener, Event::CursorToLine, |l| l.cursor_to_line(p0)),
            'g' => emit(listener, Event::ClearTabStop, |l| l.clear_tab_stop(p0)),
            'h' => emit(listener, Event::SetMode, |l| {
                l.set_mode(params.as_slice(), private)
            }),
            'l' => emit(listener, Event::ResetMode, |l| {
                l.reset_mode(params.as_slice(), private)
            }),
            'm' => emit(listener, Event::SelectGraphicRendition, |l| {
                l.select_graphic_rendition(params.as_slice())
            }),
            'r' => emit(listener, Event::SetMargins, |l| l.set_margins(p0, p1)),
            'c' => emit(listener, Event::ReportDeviceAttributes, |l| {
                l.report_device_attributes(p0, private)
            }),
            'n' => emit(listener, Event::ReportDeviceStatus, |l| {
                l.report_device_status(p0)
            }),
            _ => {
                trace!("unrecognized CSI sequence: {:?} {:?}", params, ch);
                listener.debug(params.as_slice(), ch);
            }
        }
    }
}

fn dispatch_basic<L: Listener + ?Sized>(ch: char, listener: &mut L) -> bool {
    match ch {
        ctrl::BEL => emit(listener, Event::Bell, |l| l.bell()),
        ctrl::BS => emit(listener, Event::Backspace, |l| l.backspace()),
        ctrl::HT => emit(listener, Event::Tab, |l| l.tab()),
        ctrl::LF | ctrl::VT | ctrl::FF => emit(listener, Event::Linefeed, |l| l.linefeed()),
        ctrl::CR => emit(listener, Event::CarriageReturn, |l| l.carriage_return()),
        ctrl::SO => emit(listener, Event::ShiftOut, |l| l.shift_out()),
        ctrl::SI => emit(listener, Event::ShiftIn, |l| l.shift_in()),
        _ => return false,
    }
    true
}
