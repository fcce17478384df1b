//! Byte-to-character adapter in front of the stream.
//!
//! Programs write bytes, the parser consumes characters. [`ByteStream`]
//! decodes bytes against an ordered list of `(Encoding, ErrorPolicy)`
//! fallbacks: each encoding is tried in order, and a byte every fallback
//! rejects is skipped. UTF-8 is decoded incrementally, so multi-byte
//! characters may straddle feed boundaries.

use thiserror::Error;

use crate::listener::Listener;
use crate::stream::Stream;

/// Supported input encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

/// What to do when an encoding rejects input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Hand the offending byte to the next fallback.
    Strict,
    /// Emit U+FFFD for the offending byte.
    Replace,
    /// Skip the offending byte.
    Ignore,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum DecodeError {
    #[error("byte sequence is not valid for the encoding")]
    Malformed,
    #[error("more bytes are needed to finish the character")]
    Incomplete,
}

/// A [`Stream`] fed with bytes instead of characters.
pub struct ByteStream {
    stream: Stream,
    fallbacks: Vec<(Encoding, ErrorPolicy)>,
    pending: Vec<u8>,
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStream {
    /// A byte stream decoding UTF-8 with a Latin-1 fallback, matching
    /// what the linux console would show for mixed output.
    pub fn new() -> Self {
        Self::with_fallbacks(vec![
            (Encoding::Utf8, ErrorPolicy::Strict),
            (Encoding::Latin1, ErrorPolicy::Replace),
        ])
    }

    pub fn with_fallbacks(fallbacks: Vec<(Encoding, ErrorPolicy)>) -> Self {
        ByteStream {
            stream: Stream::new(),
            fallbacks,
            pending: Vec::new(),
        }
    }

    /// Access the wrapped parser, e.g. to reset it.
    pub fn stream(&mut self) -> &mut Stream {
        &mut self.stream
    }

    /// Decode and consume a blob of bytes.
    pub fn feed<L: Listener + ?Sized>(&mut self, data: &[u8], listener: &mut L) {
        self.pending.extend_from_slice(data);

        let mut offset = 0;
        while offset < self.pending.len() {
            match self.decode_at(offset) {
                Decoded::Char(ch, consumed) => {
                    self.stream.advance(ch, listener);
                    offset += consumed;
                }
                Decoded::Skip(consumed) => offset += consumed,
                Decoded::Starved => break,
            }
        }
        self.pending.drain(..offset);
    }

    fn decode_at(&self, offset: usize) -> Decoded {
        let bytes = &self.pending[offset..];
        for (i, &(encoding, policy)) in self.fallbacks.iter().enumerate() {
            match decode_one(encoding, bytes) {
                Ok((ch, consumed)) => return Decoded::Char(ch, consumed),
                Err(DecodeError::Incomplete) => return Decoded::Starved,
                Err(DecodeError::Malformed) => match policy {
                    ErrorPolicy::Strict => {
                        if i + 1 == self.fallbacks.len() {
                            // Out of fallbacks; drop the byte.
                            return Decoded::Skip(1);
                        }
                    }
                    ErrorPolicy::Replace => return Decoded::Char('\u{fffd}', 1),
                    ErrorPolicy::Ignore => return Decoded::Skip(1),
                },
            }
        }
        Decoded::Skip(1)
    }
}

enum Decoded {
    Char(char, usize),
    Skip(usize),
    Starved,
}

fn decode_one(encoding: Encoding, bytes: &[u8]) -> Result<(char, usize), DecodeError> {
    match encoding {
        Encoding::Latin1 => Ok((bytes[0] as char, 1)),
        Encoding::Utf8 => decode_utf8(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<(char, usize), DecodeError> {
    let len = match bytes[0] {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Err(DecodeError::Malformed),
    };

    if bytes.len() < len {
        // Continuation bytes seen so far must still look like UTF-8,
        // otherwise waiting for more input would never help.
        if bytes[1..].iter().all(|b| b & 0xc0 == 0x80) {
            return Err(DecodeError::Incomplete);
        }
        return Err(DecodeError::Malformed);
    }

    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => {
            let ch = s.chars().next().expect("non-empty utf-8 slice");
            Ok((ch, len))
        }
        Err(_) => Err(DecodeError::Malformed),
    }
}
