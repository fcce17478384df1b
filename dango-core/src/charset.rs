//! Character set translation for G0/G1.
//!
//! VT terminals designate one of several character sets into the G0 or
//! G1 slot (`ESC (` / `ESC )`) and select between them with SI/SO. Only
//! the sets the linux console knows are supported; characters without a
//! mapping pass through unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    /// US ASCII, the identity mapping (`ESC ( B`)
    #[default]
    Ascii,
    /// DEC Special Graphics, line drawing (`ESC ( 0`)
    SpecialGraphics,
    /// United Kingdom, `#` becomes `£` (`ESC ( A`)
    Uk,
}

impl Charset {
    /// Look up a designation code; unrecognized codes yield `None` and
    /// the designation is ignored.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'B' => Some(Charset::Ascii),
            '0' => Some(Charset::SpecialGraphics),
            'A' => Some(Charset::Uk),
            // Alternate ROM sets are not distinguished from ASCII.
            '1' | '2' => Some(Charset::Ascii),
            _ => None,
        }
    }

    /// Translate a character through this set.
    pub fn translate(self, ch: char) -> char {
        match self {
            Charset::Ascii => ch,
            Charset::Uk => {
                if ch == '#' {
                    '£'
                } else {
                    ch
                }
            }
            Charset::SpecialGraphics => match ch {
                '_' => ' ',
                '`' => '◆', // Diamond
                'a' => '▒', // Checker board
                'b' => '␉', // Horizontal tab symbol
                'c' => '␌', // Form feed symbol
                'd' => '␍', // Carriage return symbol
                'e' => '␊', // Line feed symbol
                'f' => '°', // Degree symbol
                'g' => '±', // Plus/minus
                'h' => '␤', // New line symbol
                'i' => '␋', // Vertical tab symbol
                'j' => '┘', // Lower right corner
                'k' => '┐', // Upper right corner
                'l' => '┌', // Upper left corner
                'm' => '└', // Lower left corner
                'n' => '┼', // Crossing lines
                'o' => '⎺', // Scan line 1
                'p' => '⎻', // Scan line 3
                'q' => '─', // Horizontal line
                'r' => '⎼', // Scan line 7
                's' => '⎽', // Scan line 9
                't' => '├', // Left tee
                'u' => '┤', // Right tee
                'v' => '┴', // Bottom tee
                'w' => '┬', // Top tee
                'x' => '│', // Vertical line
                'y' => '≤',
                'z' => '≥',
                '{' => 'π',
                '|' => '≠',
                '}' => '£',
                '~' => '·', // Bullet
                _ => ch,
            },
        }
    }
}
