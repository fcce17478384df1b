//! Event dispatch interface.
//!
//! A [`Listener`] receives the named events recognized by
//! [`crate::Stream`]. Every method has a no-op default implementation, so
//! an implementation only spells out the events it cares about; anything
//! else is silently ignored.

/// Identifies a dispatched event, for the [`Listener::before`] and
/// [`Listener::after`] hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Draw,
    Bell,
    Backspace,
    Tab,
    Linefeed,
    CarriageReturn,
    ShiftIn,
    ShiftOut,
    Reset,
    Index,
    ReverseIndex,
    SetTabStop,
    SaveCursor,
    RestoreCursor,
    AlignmentDisplay,
    SetCharset,
    InsertCharacters,
    CursorUp,
    CursorDown,
    CursorForward,
    CursorBack,
    CursorUp1,
    CursorDown1,
    CursorToColumn,
    CursorToLine,
    CursorPosition,
    EraseInDisplay,
    EraseInLine,
    InsertLines,
    DeleteLines,
    DeleteCharacters,
    EraseCharacters,
    ClearTabStop,
    SetMargins,
    SetMode,
    ResetMode,
    SelectGraphicRendition,
    ReportDeviceAttributes,
    ReportDeviceStatus,
}

/// Receiver for parsed terminal events.
///
/// Counts arrive exactly as they appeared on the wire: a missing CSI
/// parameter is delivered as 0, and each operation applies its own
/// default (usually 1). Coordinates in [`Listener::cursor_position`] and
/// [`Listener::set_margins`] are 1-based for the same reason.
#[allow(unused_variables)]
pub trait Listener {
    /// Called before each dispatched event.
    fn before(&mut self, event: Event) {}

    /// Called after each dispatched event.
    fn after(&mut self, event: Event) {}

    /// A printable character, already decoded.
    fn draw(&mut self, ch: char) {}

    fn bell(&mut self) {}
    fn backspace(&mut self) {}
    fn tab(&mut self) {}
    fn linefeed(&mut self) {}
    fn carriage_return(&mut self) {}
    fn shift_in(&mut self) {}
    fn shift_out(&mut self) {}

    fn reset(&mut self) {}
    fn index(&mut self) {}
    fn reverse_index(&mut self) {}
    fn set_tab_stop(&mut self) {}
    fn save_cursor(&mut self) {}
    fn restore_cursor(&mut self) {}
    fn alignment_display(&mut self) {}

    /// Designate a character set: `mode` is `(` for G0 or `)` for G1,
    /// `code` names the set.
    fn set_charset(&mut self, code: char, mode: char) {}

    fn insert_characters(&mut self, count: u16) {}
    fn cursor_up(&mut self, count: u16) {}
    fn cursor_down(&mut self, count: u16) {}
    fn cursor_forward(&mut self, count: u16) {}
    fn cursor_back(&mut self, count: u16) {}
    fn cursor_up1(&mut self, count: u16) {}
    fn cursor_down1(&mut self, count: u16) {}
    fn cursor_to_column(&mut self, column: u16) {}
    fn cursor_to_line(&mut self, line: u16) {}
    fn cursor_position(&mut self, line: u16, column: u16) {}
    fn erase_in_display(&mut self, how: u16) {}
    fn erase_in_line(&mut self, how: u16) {}
    fn insert_lines(&mut self, count: u16) {}
    fn delete_lines(&mut self, count: u16) {}
    fn delete_characters(&mut self, count: u16) {}
    fn erase_characters(&mut self, count: u16) {}
    fn clear_tab_stop(&mut self, how: u16) {}
    fn set_margins(&mut self, top: u16, bottom: u16) {}

    fn set_mode(&mut self, modes: &[u16], private: bool) {}
    fn reset_mode(&mut self, modes: &[u16], private: bool) {}
    fn select_graphic_rendition(&mut self, params: &[u16]) {}

    fn report_device_attributes(&mut self, mode: u16, private: bool) {}
    fn report_device_status(&mut self, mode: u16) {}

    /// Endpoint for unrecognized sequences and parameter overflow:
    /// the accumulated parameters and the offending character.
    fn debug(&mut self, params: &[u16], ch: char) {}
}

/// Forwards every event to an ordered list of listeners.
///
/// The stream drives a single listener per feed; attach several to a
/// `Fanout` and feed that instead to have each one observe every event
/// in attach order.
#[derive(Default)]
pub struct Fanout<'a> {
    listeners: Vec<&'a mut dyn Listener>,
}

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Fanout {
            listeners: Vec::new(),
        }
    }

    pub fn attach(&mut self, listener: &'a mut dyn Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

macro_rules! forward {
    ($( fn $name:ident($( $arg:ident : $ty:ty ),*); )*) => {
        $(
            fn $name(&mut self, $( $arg: $ty ),*) {
                for listener in self.listeners.iter_mut() {
                    listener.$name($( $arg ),*);
                }
            }
        )*
    };
}

impl Listener for Fanout<'_> {
    forward! {
        fn before(event: Event);
        fn after(event: Event);
        fn draw(ch: char);
        fn bell();
        fn backspace();
        fn tab();
        fn linefeed();
        fn carriage_return();
        fn shift_in();
        fn shift_out();
        fn reset();
        fn index();
        fn reverse_index();
        fn set_tab_stop();
        fn save_cursor();
        fn restore_cursor();
        fn alignment_display();
        fn set_charset(code: char, mode: char);
        fn insert_characters(count: u16);
        fn cursor_up(count: u16);
        fn cursor_down(count: u16);
        fn cursor_forward(count: u16);
        fn cursor_back(count: u16);
        fn cursor_up1(count: u16);
        fn cursor_down1(count: u16);
        fn cursor_to_column(column: u16);
        fn cursor_to_line(line: u16);
        fn cursor_position(line: u16, column: u16);
        fn erase_in_display(how: u16);
        fn erase_in_line(how: u16);
        fn insert_lines(count: u16);
        fn delete_lines(count: u16);
        fn delete_characters(count: u16);
        fn erase_characters(count: u16);
        fn clear_tab_stop(how: u16);
        fn set_margins(top: u16, bottom: u16);
        fn set_mode(modes: &[u16], private: bool);
        fn reset_mode(modes: &[u16], private: bool);
        fn select_graphic_rendition(params: &[u16]);
        fn report_device_attributes(mode: u16, private: bool);
        fn report_device_status(mode: u16);
        fn debug(params: &[u16], ch: char);
    }
}
