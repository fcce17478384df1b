//! Screen model for terminal emulation.
//!
//! The Screen maintains:
//! - The cell grid (always exactly `lines x columns`)
//! - Cursor state and the DECSC/DECRC savepoint stack
//! - Scroll margins, terminal modes, and tab stops
//! - G0/G1 character set designations
//!
//! It implements every event dispatched by `dango_stream::Stream`, so a
//! screen attached to a stream behaves like the display of a VT-family
//! terminal. No operation fails: out-of-range parameters are clamped
//! and the parser's `debug` event is the only diagnostic channel.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use dango_stream::Listener;

use crate::cell::{Cell, CellAttributes, CellFlags};
use crate::charset::Charset;
use crate::color::{Color, NamedColor, Rgb};
use crate::cursor::{Cursor, Savepoint};
use crate::line::Line;
use crate::modes;

/// The scrolling region: inclusive 0-based row bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
}

impl Margins {
    pub fn full(lines: usize) -> Self {
        Margins {
            top: 0,
            bottom: lines.saturating_sub(1),
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.top && line <= self.bottom
    }
}

/// Horizontal tab stops, kept as a set of column indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabStops {
    stops: BTreeSet<usize>,
}

impl TabStops {
    /// Hardware default: a stop every eight columns.
    pub fn new(columns: usize) -> Self {
        TabStops {
            stops: (8..columns).step_by(8).collect(),
        }
    }

    pub fn set(&mut self, column: usize) {
        self.stops.insert(column);
    }

    pub fn clear(&mut self, column: usize) {
        self.stops.remove(&column);
    }

    pub fn clear_all(&mut self) {
        self.stops.clear();
    }

    /// The first stop strictly right of `column`, or the last column
    /// when there is none.
    pub fn next_stop(&self, column: usize, columns: usize) -> usize {
        self.stops
            .range(column + 1..)
            .next()
            .copied()
            .unwrap_or(columns.saturating_sub(1))
            .min(columns.saturating_sub(1))
    }
}

/// An in-memory terminal display.
///
/// ```
/// use dango_core::Screen;
/// use dango_stream::Stream;
///
/// let mut screen = Screen::new(80, 24);
/// let mut stream = Stream::new();
/// stream.feed("Hello \x1b[1mWorld\x1b[0m!", &mut screen);
/// assert_eq!(screen.display()[0].trim_end(), "Hello World!");
/// ```
#[derive(Debug, Clone)]
pub struct Screen {
    columns: usize,
    lines: usize,
    buffer: Vec<Line>,
    pub cursor: Cursor,
    margins: Margins,
    mode: HashSet<u32>,
    tabstops: TabStops,
    g0: Charset,
    g1: Charset,
    /// Active charset slot: 0 for G0, 1 for G1.
    charset: usize,
    savepoints: Vec<Savepoint>,
    replies: Vec<String>,
}

impl Screen {
    pub fn new(columns: usize, lines: usize) -> Self {
        let columns = columns.max(1);
        let lines = lines.max(1);
        let mut screen = Screen {
            columns,
            lines,
            buffer: Vec::new(),
            cursor: Cursor::new(),
            margins: Margins::full(lines),
            mode: HashSet::new(),
            tabstops: TabStops::new(columns),
            g0: Charset::Ascii,
            g1: Charset::SpecialGraphics,
            charset: 0,
            savepoints: Vec::new(),
            replies: Vec::new(),
        };
        screen.reset();
        screen
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// The set of active mode numbers (private modes pre-shifted).
    pub fn mode(&self) -> &HashSet<u32> {
        &self.mode
    }

    pub fn get_cell(&self, line: usize, column: usize) -> Option<&Cell> {
        self.buffer.get(line).and_then(|l| l.get(column))
    }

    /// The screen contents as one string per row, each of display
    /// width `columns`.
    pub fn display(&self) -> Vec<String> {
        self.buffer.iter().map(Line::text).collect()
    }

    /// Answers queued by device status/attribute reports, to be
    /// written back to the process driving the terminal.
    pub fn drain_replies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.replies)
    }

    /// An empty cell with default colors. While DECSCNM is active the
    /// default carries the reverse attribute, so erased regions show
    /// reversed too.
    fn default_cell(&self) -> Cell {
        let mut cell = Cell::default();
        if self.mode.contains(&modes::DECSCNM) {
            cell.flags.insert(CellFlags::REVERSE);
        }
        cell
    }

    fn default_attrs(&self) -> CellAttributes {
        let mut attrs = CellAttributes::default();
        if self.mode.contains(&modes::DECSCNM) {
            attrs.flags.insert(CellFlags::REVERSE);
        }
        attrs
    }

    fn active_charset(&self) -> Charset {
        if self.charset == 1 {
            self.g1
        } else {
            self.g0
        }
    }

    /// Reset the terminal to its construction state, preserving
    /// dimensions.
    pub fn reset(&mut self) {
        self.buffer = (0..self.lines).map(|_| Line::new(self.columns)).collect();
        self.margins = Margins::full(self.lines);
        self.mode = [modes::DECAWM, modes::DECTCEM].into_iter().collect();
        self.charset = 0;
        self.g0 = Charset::Ascii;
        self.g1 = Charset::SpecialGraphics;
        self.tabstops = TabStops::new(self.columns);
        self.cursor = Cursor::new();
        self.savepoints.clear();
        self.replies.clear();
    }

    /// Resize the grid. Shrinking drops rows from the bottom and
    /// columns from the left; growth appends blank rows at the bottom
    /// and blank columns at the right. Margins reset to the full
    /// screen and origin mode is cleared.
    pub fn resize(&mut self, lines: usize, columns: usize) {
        let lines = lines.max(1);
        let columns = columns.max(1);
        if lines == self.lines && columns == self.columns {
            return;
        }

        if columns < self.columns {
            let surplus = self.columns - columns;
            for line in &mut self.buffer {
                line.drop_left(surplus);
            }
        } else if columns > self.columns {
            let extra = columns - self.columns;
            for line in &mut self.buffer {
                line.grow_right(extra);
            }
        }
        self.columns = columns;

        if lines < self.lines {
            self.buffer.truncate(lines);
        } else {
            for _ in self.lines..lines {
                self.buffer.push(Line::new(columns));
            }
        }
        self.lines = lines;

        self.margins = Margins::full(lines);
        self.mode.remove(&modes::DECOM);
        self.ensure_hbounds();
        self.ensure_vbounds(false);
    }

    fn ensure_hbounds(&mut self) {
        self.cursor.x = self.cursor.x.min(self.columns - 1);
    }

    fn ensure_vbounds(&mut self, use_margins: bool) {
        let (top, bottom) = if use_margins || self.mode.contains(&modes::DECOM) {
            (self.margins.top, self.margins.bottom)
        } else {
            (0, self.lines - 1)
        };
        self.cursor.y = self.cursor.y.clamp(top, bottom);
    }

    /// Display a character at the cursor position, advancing the
    /// cursor. Reaching past the last column leaves the cursor parked
    /// at `columns`; the next draw wraps (DECAWM) or overwrites the
    /// last cell.
    pub fn draw(&mut self, input: char) {
        let ch = self.active_charset().translate(input);
        let width = ch.width().unwrap_or(0);

        if self.cursor.x >= self.columns {
            if self.mode.contains(&modes::DECAWM) {
                self.carriage_return();
                self.linefeed();
            } else if width > 0 {
                self.cursor.x = self.columns.saturating_sub(width);
            }
        }

        if width > 0 && self.mode.contains(&modes::IRM) {
            self.insert_characters(width);
        }

        let x = self.cursor.x;
        let y = self.cursor.y;
        let attrs = self.cursor.attrs;

        match width {
            1 => self.buffer[y].set(x, Cell::styled(ch, &attrs)),
            2 => {
                let mut cell = Cell::styled(ch, &attrs);
                cell.flags.insert(CellFlags::WIDE_CHAR);
                self.buffer[y].set(x, cell);
                if x + 1 < self.columns {
                    let mut spacer = Cell::blank(&attrs);
                    spacer.data.clear();
                    spacer.flags.insert(CellFlags::WIDE_CHAR_SPACER);
                    self.buffer[y].set(x + 1, spacer);
                }
            }
            _ => {
                if ch.is_control() {
                    return;
                }
                // Zero-width combining input joins the previously
                // drawn character, on this line or the end of the one
                // above.
                if x > 0 {
                    if let Some(cell) = self.buffer[y].get_mut(x - 1) {
                        cell.data.push(ch);
                    }
                } else if y > 0 {
                    let last = self.columns - 1;
                    if let Some(cell) = self.buffer[y - 1].get_mut(last) {
                        cell.data.push(ch);
                    }
                }
                return;
            }
        }

        self.cursor.x = (x + width).min(self.columns);
    }

    /// Move the cursor to the beginning of the current line.
    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
    }

    /// Move the cursor down one line; at the bottom margin the region
    /// scrolls up instead.
    pub fn index(&mut self) {
        let Margins { top, bottom } = self.margins;
        if self.cursor.y == bottom {
            self.buffer.remove(top);
            self.buffer
                .insert(bottom, Line::filled(self.columns, &self.default_cell()));
        } else {
            self.cursor_down(1);
        }
    }

    /// Move the cursor up one line; at the top margin the region
    /// scrolls down instead.
    pub fn reverse_index(&mut self) {
        let Margins { top, bottom } = self.margins;
        if self.cursor.y == top {
            self.buffer.remove(bottom);
            self.buffer
                .insert(top, Line::filled(self.columns, &self.default_cell()));
        } else {
            self.cursor_up(1);
        }
    }

    /// Perform an index and, with LNM set, a carriage return.
    pub fn linefeed(&mut self) {
        self.index();
        if self.mode.contains(&modes::LNM) {
            self.carriage_return();
        }
    }

    /// Move to the next tab stop, or the end of the line if there are
    /// none left.
    pub fn tab(&mut self) {
        self.cursor.x = self.tabstops.next_stop(self.cursor.x, self.columns);
    }

    pub fn backspace(&mut self) {
        self.cursor_back(1);
    }

    /// Bell hook; the grid is unaffected.
    pub fn bell(&mut self) {
        log::debug!("bell");
    }

    pub fn shift_in(&mut self) {
        self.charset = 0;
    }

    pub fn shift_out(&mut self) {
        self.charset = 1;
    }

    /// Designate a charset into G0 (`mode` is `(`) or G1 (`)`).
    pub fn set_charset(&mut self, code: char, mode: char) {
        if let Some(charset) = Charset::from_code(code) {
            match mode {
                '(' => self.g0 = charset,
                ')' => self.g1 = charset,
                _ => {}
            }
        }
    }

    /// Push the cursor and charset state onto the savepoint stack.
    pub fn save_cursor(&mut self) {
        self.savepoints.push(Savepoint {
            cursor: self.cursor.clone(),
            g0: self.g0,
            g1: self.g1,
            charset: self.charset,
            origin: self.mode.contains(&modes::DECOM),
            wrap: self.mode.contains(&modes::DECAWM),
        });
    }

    /// Pop the savepoint stack. With nothing saved, origin mode is
    /// reset and the cursor homes.
    pub fn restore_cursor(&mut self) {
        if let Some(savepoint) = self.savepoints.pop() {
            self.g0 = savepoint.g0;
            self.g1 = savepoint.g1;
            self.charset = savepoint.charset;
            set_flag(&mut self.mode, modes::DECOM, savepoint.origin);
            set_flag(&mut self.mode, modes::DECAWM, savepoint.wrap);
            self.cursor = savepoint.cursor;
            self.ensure_hbounds();
            self.ensure_vbounds(true);
        } else {
            self.mode.remove(&modes::DECOM);
            self.cursor_position(0, 0);
        }
    }

    /// Move cursor up, stopping at the top margin.
    pub fn cursor_up(&mut self, count: usize) {
        let count = count.max(1);
        self.cursor.y = self.cursor.y.saturating_sub(count).max(self.margins.top);
    }

    /// Move cursor up to column 1.
    pub fn cursor_up1(&mut self, count: usize) {
        self.cursor_up(count);
        self.carriage_return();
    }

    /// Move cursor down, stopping at the bottom margin.
    pub fn cursor_down(&mut self, count: usize) {
        let count = count.max(1);
        self.cursor.y = (self.cursor.y + count).min(self.margins.bottom);
    }

    /// Move cursor down to column 1.
    pub fn cursor_down1(&mut self, count: usize) {
        self.cursor_down(count);
        self.carriage_return();
    }

    /// Move cursor left, stopping at the left edge.
    pub fn cursor_back(&mut self, count: usize) {
        // A pending wrap parks the cursor one past the last column;
        // step back inside first.
        if self.cursor.x == self.columns {
            self.cursor.x -= 1;
        }
        self.cursor.x = self.cursor.x.saturating_sub(count.max(1));
    }

    /// Move cursor right, stopping at the right edge.
    pub fn cursor_forward(&mut self, count: usize) {
        self.cursor.x = (self.cursor.x + count.max(1)).min(self.columns - 1);
    }

    /// Move to a 1-based column in the current line.
    pub fn cursor_to_column(&mut self, column: usize) {
        self.cursor.x = (column.max(1) - 1).min(self.columns - 1);
    }

    /// Move to a 1-based line in the current column. Under DECOM the
    /// line is relative to the top margin.
    pub fn cursor_to_line(&mut self, line: usize) {
        let mut line = line.max(1) - 1;
        if self.mode.contains(&modes::DECOM) {
            line += self.margins.top;
        }
        self.cursor.y = line;
        self.ensure_vbounds(false);
    }

    /// Move to a 1-based position. Under DECOM the line is relative to
    /// the top margin and motion out of the region is discarded.
    pub fn cursor_position(&mut self, line: usize, column: usize) {
        let column = column.max(1) - 1;
        let mut line = line.max(1) - 1;

        if self.mode.contains(&modes::DECOM) {
            line += self.margins.top;
            if !self.margins.contains(line) {
                return;
            }
        }

        self.cursor.x = column;
        self.cursor.y = line;
        self.ensure_hbounds();
        self.ensure_vbounds(false);
    }

    /// Insert blank lines at the cursor row; lines pushed past the
    /// bottom margin are lost. A no-op outside the margins.
    pub fn insert_lines(&mut self, count: usize) {
        let count = count.max(1);
        let bottom = self.margins.bottom;
        let y = self.cursor.y;

        if self.margins.contains(y) {
            let count = count.min(bottom - y + 1);
            for _ in 0..count {
                self.buffer.remove(bottom);
                self.buffer
                    .insert(y, Line::filled(self.columns, &self.default_cell()));
            }
            self.carriage_return();
        }
    }

    /// Delete lines at the cursor row; lines below move up and the
    /// bottom of the region is filled with cursor-styled blanks. A
    /// no-op outside the margins.
    pub fn delete_lines(&mut self, count: usize) {
        let count = count.max(1);
        let bottom = self.margins.bottom;
        let y = self.cursor.y;

        if self.margins.contains(y) {
            let count = count.min(bottom - y + 1);
            let blank = Cell::blank(&self.cursor.attrs);
            for _ in 0..count {
                self.buffer.remove(y);
                self.buffer.insert(bottom, Line::filled(self.columns, &blank));
            }
            self.carriage_return();
        }
    }

    /// Insert blank characters at the cursor; the cursor does not
    /// move.
    pub fn insert_characters(&mut self, count: usize) {
        let x = self.cursor.x;
        if x >= self.columns {
            return;
        }
        let count = count.max(1).min(self.columns - x);
        let blank = Cell::blank(&self.cursor.attrs);
        self.buffer[self.cursor.y].insert_cells(x, count, &blank);
    }

    /// Delete characters at the cursor; the rest of the line moves
    /// left, exposing cursor-styled blanks on the right.
    pub fn delete_characters(&mut self, count: usize) {
        let x = self.cursor.x;
        if x >= self.columns {
            return;
        }
        let count = count.max(1).min(self.columns - x);
        let blank = Cell::blank(&self.cursor.attrs);
        self.buffer[self.cursor.y].delete_cells(x, count, &blank);
    }

    /// Overwrite characters starting at the cursor with cursor-styled
    /// blanks. The cursor does not move.
    pub fn erase_characters(&mut self, count: usize) {
        let count = count.max(1);
        let x = self.cursor.x;
        let end = (x + count).min(self.columns);
        let blank = Cell::blank(&self.cursor.attrs);
        self.buffer[self.cursor.y].fill_range(x, end, &blank);
    }

    /// Erase within the current line: 0 = cursor to end, 1 = start
    /// through cursor, 2 = whole line. Erased cells take the cursor's
    /// attributes.
    pub fn erase_in_line(&mut self, how: usize) {
        let x = self.cursor.x;
        let y = self.cursor.y;
        let blank = Cell::blank(&self.cursor.attrs);
        match how {
            0 => self.buffer[y].fill_range(x, self.columns, &blank),
            1 => self.buffer[y].fill_range(0, x + 1, &blank),
            2 => self.buffer[y].fill(&blank),
            _ => {}
        }
    }

    /// Erase within the display: 0 = cursor to end, 1 = start through
    /// cursor, 2 (or 3) = everything. The cursor does not move.
    pub fn erase_in_display(&mut self, how: usize) {
        let y = self.cursor.y;
        let blank = Cell::blank(&self.cursor.attrs);
        match how {
            0 => {
                for line in &mut self.buffer[y + 1..] {
                    line.fill(&blank);
                }
                self.erase_in_line(0);
            }
            1 => {
                for line in &mut self.buffer[..y] {
                    line.fill(&blank);
                }
                self.erase_in_line(1);
            }
            2 | 3 => {
                for line in &mut self.buffer {
                    line.fill(&blank);
                }
            }
            _ => {}
        }
    }

    /// Set a tab stop at the cursor column.
    pub fn set_tab_stop(&mut self) {
        self.tabstops.set(self.cursor.x);
    }

    /// Clear a tab stop: 0 clears at the cursor column, 3 clears all.
    pub fn clear_tab_stop(&mut self, how: usize) {
        match how {
            0 => self.tabstops.clear(self.cursor.x),
            3 => self.tabstops.clear_all(),
            _ => {}
        }
    }

    /// Select the scrolling region from 1-based bounds; 0 re-defaults
    /// to the respective screen edge. Regions shorter than two lines
    /// are ignored. On success the cursor homes.
    pub fn set_margins(&mut self, top: usize, bottom: usize) {
        let top = (top.max(1) - 1).min(self.lines - 1);
        let bottom = if bottom == 0 { self.lines } else { bottom } - 1;
        let bottom = bottom.min(self.lines - 1);

        if bottom > top {
            self.margins = Margins { top, bottom };
            self.cursor_position(0, 0);
        }
    }

    /// Set (enable) a list of modes. Numbers from a private (`?`)
    /// sequence are shifted into the private namespace first.
    pub fn set_mode(&mut self, mode_numbers: &[u16], private: bool) {
        let applied = shift_modes(mode_numbers, private);
        self.mode.extend(applied.iter().copied());

        // When column mode is selected, the screen is erased and the
        // cursor moves to the home position.
        if applied.contains(&modes::DECCOLM) {
            self.resize(self.lines, 132);
            self.erase_in_display(2);
            self.cursor_position(0, 0);
        }

        if applied.contains(&modes::DECOM) {
            self.cursor_position(0, 0);
        }

        if applied.contains(&modes::DECSCNM) {
            self.set_reverse_video(true);
        }

        if applied.contains(&modes::DECTCEM) {
            self.cursor.hidden = false;
        }
    }

    /// Reset (disable) a list of modes.
    pub fn reset_mode(&mut self, mode_numbers: &[u16], private: bool) {
        let applied = shift_modes(mode_numbers, private);
        for mode in &applied {
            self.mode.remove(mode);
        }

        if applied.contains(&modes::DECCOLM) {
            self.resize(self.lines, 80);
            self.erase_in_display(2);
            self.cursor_position(0, 0);
        }

        if applied.contains(&modes::DECOM) {
            self.cursor_position(0, 0);
        }

        if applied.contains(&modes::DECSCNM) {
            self.set_reverse_video(false);
        }

        if applied.contains(&modes::DECTCEM) {
            self.cursor.hidden = true;
        }
    }

    fn set_reverse_video(&mut self, reverse: bool) {
        for line in &mut self.buffer {
            for cell in line.cells_mut() {
                cell.flags.set(CellFlags::REVERSE, reverse);
            }
        }
        self.select_graphic_rendition(&[if reverse { 7 } else { 27 }]);
    }

    /// Apply SGR parameters to the cursor's style template.
    pub fn select_graphic_rendition(&mut self, params: &[u16]) {
        if matches!(params, [] | [0]) {
            self.cursor.attrs = self.default_attrs();
            return;
        }

        let mut attrs = self.cursor.attrs;
        let mut params = params.iter().copied();

        while let Some(param) = params.next() {
            match param {
                0 => attrs = self.default_attrs(),
                1 => attrs.flags.insert(CellFlags::BOLD),
                3 => attrs.flags.insert(CellFlags::ITALICS),
                4 => attrs.flags.insert(CellFlags::UNDERSCORE),
                5 => attrs.flags.insert(CellFlags::BLINK),
                7 => attrs.flags.insert(CellFlags::REVERSE),
                9 => attrs.flags.insert(CellFlags::STRIKETHROUGH),
                22 => attrs.flags.remove(CellFlags::BOLD),
                23 => attrs.flags.remove(CellFlags::ITALICS),
                24 => attrs.flags.remove(CellFlags::UNDERSCORE),
                25 => attrs.flags.remove(CellFlags::BLINK),
                27 => attrs.flags.remove(CellFlags::REVERSE),
                29 => attrs.flags.remove(CellFlags::STRIKETHROUGH),
                30..=37 => {
                    if let Some(named) = NamedColor::from_sgr_normal(param - 30) {
                        attrs.fg = Color::Named(named);
                    }
                }
                39 => attrs.fg = Color::Default,
                40..=47 => {
                    if let Some(named) = NamedColor::from_sgr_normal(param - 40) {
                        attrs.bg = Color::Named(named);
                    }
                }
                49 => attrs.bg = Color::Default,
                90..=97 => {
                    if let Some(named) = NamedColor::from_sgr_bright(param - 90) {
                        attrs.fg = Color::Named(named);
                    }
                }
                100..=107 => {
                    if let Some(named) = NamedColor::from_sgr_bright(param - 100) {
                        attrs.bg = Color::Named(named);
                    }
                }
                38 | 48 => {
                    let color = match params.next() {
                        Some(5) => params
                            .next()
                            .map(|index| Color::Indexed(index.min(255) as u8)),
                        Some(2) => match (params.next(), params.next(), params.next()) {
                            (Some(r), Some(g), Some(b)) => Some(Color::Rgb(Rgb::new(
                                r.min(255) as u8,
                                g.min(255) as u8,
                                b.min(255) as u8,
                            ))),
                            _ => None,
                        },
                        _ => None,
                    };
                    if let Some(color) = color {
                        if param == 38 {
                            attrs.fg = color;
                        } else {
                            attrs.bg = color;
                        }
                    }
                }
                _ => {}
            }
        }

        self.cursor.attrs = attrs;
    }

    /// Fill the screen with uppercase E's for focus and alignment.
    pub fn alignment_display(&mut self) {
        let cell = Cell::new('E');
        for line in &mut self.buffer {
            line.fill(&cell);
        }
    }

    /// Report terminal identity. Only the primary request is answered,
    /// with the VT102 id, matching the linux console.
    pub fn report_device_attributes(&mut self, mode: usize, private: bool) {
        if mode == 0 && !private {
            self.replies.push("\u{1b}[?6c".to_string());
        }
    }

    /// Report terminal status (5) or cursor position (6).
    pub fn report_device_status(&mut self, mode: usize) {
        match mode {
            5 => self.replies.push("\u{1b}[0n".to_string()),
            6 => {
                let x = self.cursor.x + 1;
                let mut y = self.cursor.y + 1;
                // Origin mode selects line numbering.
                if self.mode.contains(&modes::DECOM) {
                    y -= self.margins.top;
                }
                self.replies.push(format!("\u{1b}[{y};{x}R"));
            }
            _ => {}
        }
    }
}

fn set_flag(mode: &mut HashSet<u32>, flag: u32, value: bool) {
    if value {
        mode.insert(flag);
    } else {
        mode.remove(&flag);
    }
}

fn shift_modes(mode_numbers: &[u16], private: bool) -> Vec<u32> {
    mode_numbers
        .iter()
        .map(|&m| {
            let m = m as u32;
            if private {
                m << modes::PRIVATE_MODE_SHIFT
            } else {
                m
            }
        })
        .collect()
}

impl Listener for Screen {
    fn draw(&mut self, ch: char) {
        Screen::draw(self, ch);
    }

    fn bell(&mut self) {
        Screen::bell(self);
    }

    fn backspace(&mut self) {
        Screen::backspace(self);
    }

    fn tab(&mut self) {
        Screen::tab(self);
    }

    fn linefeed(&mut self) {
        Screen::linefeed(self);
    }

    fn carriage_return(&mut self) {
        Screen::carriage_return(self);
    }

    fn shift_in(&mut self) {
        Screen::shift_in(self);
    }

    fn shift_out(&mut self) {
        Screen::shift_out(self);
    }

    fn reset(&mut self) {
        Screen::reset(self);
    }

    fn index(&mut self) {
        Screen::index(self);
    }

    fn reverse_index(&mut self) {
        Screen::reverse_index(self);
    }

    fn set_tab_stop(&mut self) {
        Screen::set_tab_stop(self);
    }

    fn save_cursor(&mut self) {
        Screen::save_cursor(self);
    }

    fn restore_cursor(&mut self) {
        Screen::restore_cursor(self);
    }

    fn alignment_display(&mut self) {
        Screen::alignment_display(self);
    }

    fn set_charset(&mut self, code: char, mode: char) {
        Screen::set_charset(self, code, mode);
    }

    fn insert_characters(&mut self, count: u16) {
        Screen::insert_characters(self, count as usize);
    }

    fn cursor_up(&mut self, count: u16) {
        Screen::cursor_up(self, count as usize);
    }

    fn cursor_down(&mut self, count: u16) {
        Screen::cursor_down(self, count as usize);
    }

    fn cursor_forward(&mut self, count: u16) {
        Screen::cursor_forward(self, count as usize);
    }

    fn cursor_back(&mut self, count: u16) {
        Screen::cursor_back(self, count as usize);
    }

    fn cursor_up1(&mut self, count: u16) {
        Screen::cursor_up1(self, count as usize);
    }

    fn cursor_down1(&mut self, count: u16) {
        Screen::cursor_down1(self, count as usize);
    }

    fn cursor_to_column(&mut self, column: u16) {
        Screen::cursor_to_column(self, column as usize);
    }

    fn cursor_to_line(&mut self, line: u16) {
        Screen::cursor_to_line(self, line as usize);
    }

    fn cursor_position(&mut self, line: u16, column: u16) {
        Screen::cursor_position(self, line as usize, column as usize);
    }

    fn erase_in_display(&mut self, how: u16) {
        Screen::erase_in_display(self, how as usize);
    }

    fn erase_in_line(&mut self, how: u16) {
        Screen::erase_in_line(self, how as usize);
    }

    fn insert_lines(&mut self, count: u16) {
        Screen::insert_lines(self, count as usize);
    }

    fn delete_lines(&mut self, count: u16) {
        Screen::delete_lines(self, count as usize);
    }

    fn delete_characters(&mut self, count: u16) {
        Screen::delete_characters(self, count as usize);
    }

    fn erase_characters(&mut self, count: u16) {
        Screen::erase_characters(self, count as usize);
    }

    fn clear_tab_stop(&mut self, how: u16) {
        Screen::clear_tab_stop(self, how as usize);
    }

    fn set_margins(&mut self, top: u16, bottom: u16) {
        Screen::set_margins(self, top as usize, bottom as usize);
    }

    fn set_mode(&mut self, mode_numbers: &[u16], private: bool) {
        Screen::set_mode(self, mode_numbers, private);
    }

    fn reset_mode(&mut self, mode_numbers: &[u16], private: bool) {
        Screen::reset_mode(self, mode_numbers, private);
    }

    fn select_graphic_rendition(&mut self, params: &[u16]) {
        Screen::select_graphic_rendition(self, params);
    }

    fn report_device_attributes(&mut self, mode: u16, private: bool) {
        Screen::report_device_attributes(self, mode as usize, private);
    }

    fn report_device_status(&mut self, mode: u16) {
        Screen::report_device_status(self, mode as usize);
    }

    fn debug(&mut self, params: &[u16], ch: char) {
        log::debug!("unhandled sequence: params={params:?} final={ch:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_str(screen: &mut Screen, text: &str) {
        for ch in text.chars() {
            screen.draw(ch);
        }
    }

    #[test]
    fn test_new_screen() {
        let screen = Screen::new(80, 24);
        assert_eq!(screen.columns(), 80);
        assert_eq!(screen.lines(), 24);
        assert_eq!(screen.cursor().x, 0);
        assert_eq!(screen.cursor().y, 0);
        assert_eq!(screen.margins(), Margins { top: 0, bottom: 23 });
        assert!(screen.mode().contains(&modes::DECAWM));
        assert!(screen.mode().contains(&modes::DECTCEM));
        assert_eq!(screen.display(), vec![" ".repeat(80); 24]);
    }

    #[test]
    fn test_draw_advances_cursor() {
        let mut screen = Screen::new(80, 24);
        draw_str(&mut screen, "Hello");
        assert_eq!(screen.display()[0], format!("Hello{}", " ".repeat(75)));
        assert_eq!(screen.cursor().x, 5);
    }

    #[test]
    fn test_draw_uses_cursor_attrs() {
        let mut screen = Screen::new(80, 24);
        screen.select_graphic_rendition(&[1, 31]);
        screen.draw('x');
        let cell = screen.get_cell(0, 0).unwrap();
        assert!(cell.flags.contains(CellFlags::BOLD));
        assert_eq!(cell.fg, Color::Named(NamedColor::Red));
    }

    #[test]
    fn test_pending_wrap() {
        let mut screen = Screen::new(4, 2);
        draw_str(&mut screen, "abcd");
        // The cursor parks one past the last column until the next
        // draw.
        assert_eq!(screen.cursor().x, 4);
        assert_eq!(screen.cursor().y, 0);

        screen.draw('e');
        assert_eq!(screen.display()[0], "abcd");
        assert_eq!(screen.display()[1], "e   ");
        assert_eq!(screen.cursor().x, 1);
        assert_eq!(screen.cursor().y, 1);
    }

    #[test]
    fn test_no_autowrap_overwrites_last_column() {
        let mut screen = Screen::new(4, 2);
        screen.reset_mode(&[7], true); // DECAWM off
        draw_str(&mut screen, "abcdef");
        assert_eq!(screen.display()[0], "abcf");
        assert_eq!(screen.cursor().y, 0);
    }

    #[test]
    fn test_wide_character() {
        let mut screen = Screen::new(10, 2);
        screen.draw('世');
        assert_eq!(screen.cursor().x, 2);
        assert!(screen.get_cell(0, 0).unwrap().is_wide());
        assert!(screen.get_cell(0, 1).unwrap().is_wide_spacer());
        assert_eq!(screen.display()[0], "世        ");
    }

    #[test]
    fn test_combining_character() {
        let mut screen = Screen::new(10, 2);
        screen.draw('e');
        screen.draw('\u{0301}');
        assert_eq!(screen.get_cell(0, 0).unwrap().data, "e\u{0301}");
        assert_eq!(screen.cursor().x, 1);
    }

    #[test]
    fn test_linefeed_scrolls_at_bottom_margin() {
        let mut screen = Screen::new(4, 3);
        draw_str(&mut screen, "one");
        screen.cursor.y = 2;
        screen.linefeed();
        assert_eq!(screen.cursor().y, 2);
        assert_eq!(screen.display(), vec!["    ", "    ", "    "]);
    }

    #[test]
    fn test_index_within_margins_only() {
        let mut screen = Screen::new(4, 5);
        screen.set_margins(2, 4);
        draw_str(&mut screen, "top");
        screen.cursor.y = 3; // bottom margin (0-based)
        screen.index();
        // Line 0 is outside the scrolling region and untouched.
        assert_eq!(screen.display()[0], "top ");
    }

    #[test]
    fn test_reverse_index_at_top_margin() {
        let mut screen = Screen::new(4, 3);
        draw_str(&mut screen, "one");
        screen.cursor.y = 0;
        screen.reverse_index();
        assert_eq!(screen.display()[0], "    ");
        assert_eq!(screen.display()[1], "one ");
    }

    #[test]
    fn test_cursor_motion_clamps() {
        let mut screen = Screen::new(80, 24);
        screen.cursor_down(100);
        assert_eq!(screen.cursor().y, 23);
        screen.cursor_up(100);
        assert_eq!(screen.cursor().y, 0);
        screen.cursor_forward(100);
        assert_eq!(screen.cursor().x, 79);
        screen.cursor_back(100);
        assert_eq!(screen.cursor().x, 0);
    }

    #[test]
    fn test_cursor_up_stops_at_top_margin() {
        let mut screen = Screen::new(80, 24);
        screen.set_margins(5, 20);
        screen.cursor.y = 10;
        screen.cursor_up(100);
        assert_eq!(screen.cursor().y, 4);
    }

    #[test]
    fn test_cursor_position_is_one_based() {
        let mut screen = Screen::new(80, 24);
        screen.cursor_position(10, 20);
        assert_eq!(screen.cursor().y, 9);
        assert_eq!(screen.cursor().x, 19);

        // Defaults home the cursor.
        screen.cursor_position(0, 0);
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 0));
    }

    #[test]
    fn test_cursor_position_respects_origin_mode() {
        let mut screen = Screen::new(80, 24);
        screen.set_margins(5, 20);
        screen.set_mode(&[6], true); // DECOM

        screen.cursor_position(1, 1);
        assert_eq!(screen.cursor().y, 4);

        // Motion out of the region is discarded.
        screen.cursor_position(20, 1);
        assert_eq!(screen.cursor().y, 4);
    }

    #[test]
    fn test_insert_lines() {
        let mut screen = Screen::new(4, 3);
        draw_str(&mut screen, "one");
        screen.carriage_return();
        screen.linefeed();
        draw_str(&mut screen, "two");
        screen.cursor_position(1, 1);
        screen.insert_lines(1);
        assert_eq!(screen.display(), vec!["    ", "one ", "two "]);
        assert_eq!(screen.cursor().x, 0);
    }

    #[test]
    fn test_delete_lines() {
        let mut screen = Screen::new(4, 3);
        draw_str(&mut screen, "one");
        screen.carriage_return();
        screen.linefeed();
        draw_str(&mut screen, "two");
        screen.cursor_position(1, 1);
        screen.delete_lines(1);
        assert_eq!(screen.display(), vec!["two ", "    ", "    "]);
    }

    #[test]
    fn test_delete_lines_outside_margins_is_noop() {
        let mut screen = Screen::new(4, 4);
        screen.set_margins(2, 3);
        draw_str(&mut screen, "one");
        screen.cursor.y = 0;
        screen.delete_lines(1);
        assert_eq!(screen.display()[0], "one ");
    }

    #[test]
    fn test_insert_characters() {
        let mut screen = Screen::new(6, 1);
        draw_str(&mut screen, "abcdef");
        screen.cursor_position(1, 3);
        screen.insert_characters(2);
        assert_eq!(screen.display()[0], "ab  cd");
    }

    #[test]
    fn test_delete_characters() {
        let mut screen = Screen::new(6, 1);
        draw_str(&mut screen, "abcdef");
        screen.cursor_position(1, 3);
        screen.delete_characters(2);
        assert_eq!(screen.display()[0], "abef  ");
    }

    #[test]
    fn test_erase_characters_keeps_cursor_style() {
        let mut screen = Screen::new(6, 1);
        draw_str(&mut screen, "abcdef");
        screen.cursor_position(1, 2);
        screen.select_graphic_rendition(&[41]);
        screen.erase_characters(3);
        assert_eq!(screen.display()[0], "a   ef");
        assert_eq!(
            screen.get_cell(0, 2).unwrap().bg,
            Color::Named(NamedColor::Red)
        );
    }

    #[test]
    fn test_erase_in_line() {
        let mut screen = Screen::new(6, 1);
        draw_str(&mut screen, "abcdef");
        screen.cursor_position(1, 3);

        let mut eol = screen.clone();
        eol.erase_in_line(0);
        assert_eq!(eol.display()[0], "ab    ");

        let mut bol = screen.clone();
        bol.erase_in_line(1);
        assert_eq!(bol.display()[0], "   def");

        let mut all = screen.clone();
        all.erase_in_line(2);
        assert_eq!(all.display()[0], "      ");
    }

    #[test]
    fn test_erase_in_display() {
        let mut screen = Screen::new(3, 3);
        for _ in 0..3 {
            draw_str(&mut screen, "xxx");
            screen.carriage_return();
            screen.linefeed();
        }
        screen.cursor_position(2, 2);

        let mut below = screen.clone();
        below.erase_in_display(0);
        assert_eq!(below.display(), vec!["xxx", "x  ", "   "]);

        let mut above = screen.clone();
        above.erase_in_display(1);
        assert_eq!(above.display(), vec!["   ", "  x", "xxx"]);

        let mut all = screen.clone();
        all.erase_in_display(2);
        assert_eq!(all.display(), vec!["   ", "   ", "   "]);
        assert_eq!(all.cursor().y, 1);
    }

    #[test]
    fn test_tabs() {
        let mut screen = Screen::new(80, 24);
        screen.tab();
        assert_eq!(screen.cursor().x, 8);
        screen.tab();
        assert_eq!(screen.cursor().x, 16);

        screen.cursor_to_column(75);
        screen.tab();
        assert_eq!(screen.cursor().x, 79);
    }

    #[test]
    fn test_custom_tab_stops() {
        let mut screen = Screen::new(80, 24);
        screen.clear_tab_stop(3);
        screen.cursor_to_column(5);
        screen.set_tab_stop();
        screen.cursor_to_column(1);
        screen.tab();
        assert_eq!(screen.cursor().x, 4);
        screen.tab();
        assert_eq!(screen.cursor().x, 79);
    }

    #[test]
    fn test_set_margins_homes_cursor() {
        let mut screen = Screen::new(80, 24);
        screen.cursor_position(10, 10);
        screen.set_margins(5, 20);
        assert_eq!(screen.margins(), Margins { top: 4, bottom: 19 });
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 0));
    }

    #[test]
    fn test_set_margins_bare_resets() {
        let mut screen = Screen::new(80, 24);
        screen.set_margins(5, 20);
        screen.set_margins(0, 0);
        assert_eq!(screen.margins(), Margins { top: 0, bottom: 23 });
    }

    #[test]
    fn test_set_margins_rejects_short_region() {
        let mut screen = Screen::new(80, 24);
        screen.set_margins(7, 7);
        assert_eq!(screen.margins(), Margins { top: 0, bottom: 23 });
    }

    #[test]
    fn test_mode_set_reset_roundtrip() {
        let mut screen = Screen::new(80, 24);
        assert!(!screen.mode().contains(&(modes::IRM)));
        screen.set_mode(&[4], false);
        assert!(screen.mode().contains(&(modes::IRM)));
        screen.set_mode(&[4], false);
        assert!(screen.mode().contains(&(modes::IRM)));
        screen.reset_mode(&[4], false);
        assert!(!screen.mode().contains(&(modes::IRM)));
    }

    #[test]
    fn test_private_modes_are_shifted() {
        let mut screen = Screen::new(80, 24);
        screen.set_mode(&[6], true);
        assert!(screen.mode().contains(&modes::DECOM));
        // The non-private mode 6 is untouched.
        assert!(!screen.mode().contains(&6));
    }

    #[test]
    fn test_insert_mode_shifts_on_draw() {
        let mut screen = Screen::new(6, 1);
        draw_str(&mut screen, "abc");
        screen.cursor_position(1, 1);
        screen.set_mode(&[4], false); // IRM
        screen.draw('X');
        assert_eq!(screen.display()[0], "Xabc  ");
    }

    #[test]
    fn test_dectcem_controls_cursor_visibility() {
        let mut screen = Screen::new(80, 24);
        assert!(!screen.cursor().hidden);
        screen.reset_mode(&[25], true);
        assert!(screen.cursor().hidden);
        screen.set_mode(&[25], true);
        assert!(!screen.cursor().hidden);
    }

    #[test]
    fn test_decscnm_reverses_cells() {
        let mut screen = Screen::new(4, 2);
        draw_str(&mut screen, "ab");
        screen.set_mode(&[5], true);
        assert!(screen
            .get_cell(0, 0)
            .unwrap()
            .flags
            .contains(CellFlags::REVERSE));
        assert!(screen.cursor().attrs.flags.contains(CellFlags::REVERSE));

        screen.reset_mode(&[5], true);
        assert!(!screen
            .get_cell(0, 0)
            .unwrap()
            .flags
            .contains(CellFlags::REVERSE));
    }

    #[test]
    fn test_deccolm_resizes_and_clears() {
        let mut screen = Screen::new(80, 24);
        draw_str(&mut screen, "hello");
        screen.set_mode(&[3], true);
        assert_eq!(screen.columns(), 132);
        assert_eq!(screen.display()[0], " ".repeat(132));
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 0));

        screen.reset_mode(&[3], true);
        assert_eq!(screen.columns(), 80);
    }

    #[test]
    fn test_sgr_text_attributes() {
        let mut screen = Screen::new(80, 24);
        screen.select_graphic_rendition(&[1, 3, 4, 5, 7, 9]);
        let flags = screen.cursor().attrs.flags;
        for flag in [
            CellFlags::BOLD,
            CellFlags::ITALICS,
            CellFlags::UNDERSCORE,
            CellFlags::BLINK,
            CellFlags::REVERSE,
            CellFlags::STRIKETHROUGH,
        ] {
            assert!(flags.contains(flag));
        }

        screen.select_graphic_rendition(&[22, 23, 24, 25, 27, 29]);
        assert!(screen.cursor().attrs.flags.is_empty());
    }

    #[test]
    fn test_sgr_colors() {
        let mut screen = Screen::new(80, 24);
        screen.select_graphic_rendition(&[33, 44]);
        assert_eq!(screen.cursor().attrs.fg, Color::Named(NamedColor::Brown));
        assert_eq!(screen.cursor().attrs.bg, Color::Named(NamedColor::Blue));

        screen.select_graphic_rendition(&[39, 49]);
        assert_eq!(screen.cursor().attrs.fg, Color::Default);
        assert_eq!(screen.cursor().attrs.bg, Color::Default);

        screen.select_graphic_rendition(&[97, 100]);
        assert_eq!(
            screen.cursor().attrs.fg,
            Color::Named(NamedColor::BrightWhite)
        );
        assert_eq!(
            screen.cursor().attrs.bg,
            Color::Named(NamedColor::BrightBlack)
        );
    }

    #[test]
    fn test_sgr_extended_colors() {
        let mut screen = Screen::new(80, 24);
        screen.select_graphic_rendition(&[38, 5, 196]);
        assert_eq!(screen.cursor().attrs.fg, Color::Indexed(196));

        screen.select_graphic_rendition(&[48, 2, 10, 20, 30]);
        assert_eq!(
            screen.cursor().attrs.bg,
            Color::Rgb(crate::color::Rgb::new(10, 20, 30))
        );

        // A malformed tail is dropped without touching the color.
        screen.select_graphic_rendition(&[38, 2, 1]);
        assert_eq!(screen.cursor().attrs.fg, Color::Indexed(196));
    }

    #[test]
    fn test_sgr_reset() {
        let mut screen = Screen::new(80, 24);
        screen.select_graphic_rendition(&[1, 31]);
        screen.select_graphic_rendition(&[0]);
        assert_eq!(screen.cursor().attrs, CellAttributes::default());

        screen.select_graphic_rendition(&[1, 31]);
        screen.select_graphic_rendition(&[]);
        assert_eq!(screen.cursor().attrs, CellAttributes::default());
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut screen = Screen::new(80, 24);
        screen.cursor_position(10, 20);
        screen.select_graphic_rendition(&[31]);
        screen.save_cursor();

        screen.cursor_position(1, 1);
        screen.select_graphic_rendition(&[32]);

        screen.restore_cursor();
        assert_eq!(screen.cursor().y, 9);
        assert_eq!(screen.cursor().x, 19);
        assert_eq!(screen.cursor().attrs.fg, Color::Named(NamedColor::Red));
    }

    #[test]
    fn test_restore_cursor_restores_modes_exactly() {
        let mut screen = Screen::new(80, 24);
        screen.reset_mode(&[7], true); // DECAWM off
        screen.save_cursor();
        screen.set_mode(&[7], true);
        screen.restore_cursor();
        assert!(!screen.mode().contains(&modes::DECAWM));
    }

    #[test]
    fn test_restore_without_save_homes() {
        let mut screen = Screen::new(80, 24);
        screen.set_mode(&[6], true);
        screen.cursor_position(5, 5);
        screen.restore_cursor();
        assert!(!screen.mode().contains(&modes::DECOM));
        assert_eq!((screen.cursor().x, screen.cursor().y), (0, 0));
    }

    #[test]
    fn test_charset_shift() {
        let mut screen = Screen::new(10, 1);
        screen.set_charset('0', ')');
        screen.shift_out();
        screen.draw('q');
        assert_eq!(screen.get_cell(0, 0).unwrap().data, "─");

        screen.shift_in();
        screen.draw('q');
        assert_eq!(screen.get_cell(0, 1).unwrap().data, "q");
    }

    #[test]
    fn test_alignment_display() {
        let mut screen = Screen::new(3, 2);
        screen.alignment_display();
        assert_eq!(screen.display(), vec!["EEE", "EEE"]);
    }

    #[test]
    fn test_resize_grow_and_shrink() {
        let mut screen = Screen::new(4, 2);
        draw_str(&mut screen, "abcd");

        screen.resize(3, 6);
        assert_eq!(screen.lines(), 3);
        assert_eq!(screen.columns(), 6);
        assert_eq!(screen.display()[0], "abcd  ");

        // Shrinking drops columns from the left and rows from the
        // bottom.
        screen.resize(2, 4);
        assert_eq!(screen.display(), vec!["cd  ", "    "]);
        assert_eq!(screen.margins(), Margins { top: 0, bottom: 1 });
    }

    #[test]
    fn test_resize_clears_origin_mode() {
        let mut screen = Screen::new(80, 24);
        screen.set_mode(&[6], true);
        screen.resize(10, 10);
        assert!(!screen.mode().contains(&modes::DECOM));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut screen = Screen::new(20, 5);
        draw_str(&mut screen, "garbage");
        screen.set_mode(&[4, 20], false);
        screen.set_margins(2, 4);
        screen.save_cursor();

        screen.reset();
        let once = screen.clone();
        screen.reset();

        assert_eq!(once.display(), screen.display());
        assert_eq!(once.mode(), screen.mode());
        assert_eq!(once.cursor(), screen.cursor());
        assert_eq!(once.margins(), screen.margins());
    }

    #[test]
    fn test_device_reports() {
        let mut screen = Screen::new(80, 24);
        screen.report_device_attributes(0, false);
        assert_eq!(screen.drain_replies(), vec!["\u{1b}[?6c"]);

        // Private requests are ignored.
        screen.report_device_attributes(0, true);
        assert!(screen.drain_replies().is_empty());

        screen.cursor_position(5, 10);
        screen.report_device_status(6);
        assert_eq!(screen.drain_replies(), vec!["\u{1b}[5;10R"]);

        screen.report_device_status(5);
        assert_eq!(screen.drain_replies(), vec!["\u{1b}[0n"]);
    }
}
