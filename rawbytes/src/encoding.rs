//! Text encodings and the process-wide registry that names them.
//!
//! Codecs are looked up by name at conversion time. The registry starts out with
//! `utf-8`, `us-ascii`, `iso-8859-1`, `utf-16`, `utf-16BE`, `utf-32`, `utf-32BE`
//! and `hex`; [`register`] adds more or replaces one of these. Lookup ignores ASCII
//! case.
//!
//! ```
//! # use rawbytes::encoding;
//! let utf16 = encoding::lookup("utf-16").unwrap();
//! assert_eq!(utf16.null_terminator(), vec![0, 0]);
//! assert_eq!(utf16.decode_until_terminator(&[0x48, 0, 0x69, 0, 0, 0, 0x21, 0]), ("Hi".to_owned(), 6));
//! ```
use {
    crate::{
        error::{invalid_text, Result},
        io::{find_terminator, read_terminated_from},
    },
    once_cell::sync::Lazy,
    parking_lot::RwLock,
    std::{collections::HashMap, io::Read, sync::Arc},
    tracing::debug,
};

/// A named text codec.
pub trait Encoding: Send + Sync {
    /// Registry key.
    fn name(&self) -> &str;

    /// Decode `bytes`. Malformed input is replaced rather than rejected.
    fn decode(&self, bytes: &[u8]) -> String;

    /// Encode `text`, failing if it cannot be represented.
    fn encode(&self, text: &str) -> Result<Vec<u8>>;

    /// Byte sequence that ends a null-terminated string.
    fn null_terminator(&self) -> Vec<u8> {
        self.encode("\0").unwrap_or_else(|_| vec![0])
    }

    /// Decode up to the first aligned terminator.
    ///
    /// Returns the text and the number of bytes consumed, terminator included. Without
    /// a terminator the whole input is decoded and consumed.
    fn decode_until_terminator(&self, bytes: &[u8]) -> (String, usize) {
        let terminator = self.null_terminator();
        match find_terminator(bytes, &terminator) {
            Some(end) => (self.decode(&bytes[..end]), end + terminator.len()),
            None => (self.decode(bytes), bytes.len()),
        }
    }

    /// [`Encoding::decode_until_terminator`] over a sequential source, reading one
    /// terminator-sized chunk at a time.
    fn decode_until_terminator_from(&self, source: &mut dyn Read) -> std::io::Result<(String, usize)> {
        let (data, consumed) = read_terminated_from(source, &self.null_terminator())?;
        Ok((self.decode(&data), consumed))
    }
}

pub struct Utf8;

impl Encoding for Utf8 {
    fn name(&self) -> &str {
        "utf-8"
    }

    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn null_terminator(&self) -> Vec<u8> {
        vec![0]
    }
}

/// Single-byte codec covering code points below `limit`; anything else encodes
/// as `?` and decodes as U+FFFD.
pub struct SingleByte {
    name: &'static str,
    limit: u32,
}

impl SingleByte {
    pub const ASCII: SingleByte = SingleByte {
        name: "us-ascii",
        limit: 0x80,
    };
    pub const LATIN1: SingleByte = SingleByte {
        name: "iso-8859-1",
        limit: 0x100,
    };
}

impl Encoding for SingleByte {
    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| {
                if u32::from(b) < self.limit {
                    char::from(b)
                } else {
                    char::REPLACEMENT_CHARACTER
                }
            })
            .collect()
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text
            .chars()
            .map(|c| match u8::try_from(u32::from(c)) {
                Ok(b) if u32::from(b) < self.limit => b,
                _ => b'?',
            })
            .collect())
    }

    fn null_terminator(&self) -> Vec<u8> {
        vec![0]
    }
}

pub struct Utf16 {
    big_endian: bool,
}

impl Utf16 {
    pub const LE: Utf16 = Utf16 { big_endian: false };
    pub const BE: Utf16 = Utf16 { big_endian: true };
}

impl Encoding for Utf16 {
    fn name(&self) -> &str {
        if self.big_endian {
            "utf-16BE"
        } else {
            "utf-16"
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let units = bytes.chunks(2).map(|pair| match *pair {
            [a, b] if self.big_endian => u16::from_be_bytes([a, b]),
            [a, b] => u16::from_le_bytes([a, b]),
            // A trailing odd byte cannot form a code unit.
            _ => 0xFFFD,
        });
        char::decode_utf16(units)
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text
            .encode_utf16()
            .flat_map(|unit| {
                if self.big_endian {
                    unit.to_be_bytes()
                } else {
                    unit.to_le_bytes()
                }
            })
            .collect())
    }

    fn null_terminator(&self) -> Vec<u8> {
        vec![0; 2]
    }
}

pub struct Utf32 {
    big_endian: bool,
}

impl Utf32 {
    pub const LE: Utf32 = Utf32 { big_endian: false };
    pub const BE: Utf32 = Utf32 { big_endian: true };
}

impl Encoding for Utf32 {
    fn name(&self) -> &str {
        if self.big_endian {
            "utf-32BE"
        } else {
            "utf-32"
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        bytes
            .chunks(4)
            .map(|quad| {
                let scalar = match *quad {
                    [a, b, c, d] if self.big_endian => u32::from_be_bytes([a, b, c, d]),
                    [a, b, c, d] => u32::from_le_bytes([a, b, c, d]),
                    _ => 0xFFFD,
                };
                char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER)
            })
            .collect()
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text
            .chars()
            .flat_map(|c| {
                if self.big_endian {
                    u32::from(c).to_be_bytes()
                } else {
                    u32::from(c).to_le_bytes()
                }
            })
            .collect())
    }

    fn null_terminator(&self) -> Vec<u8> {
        vec![0; 4]
    }
}

/// Bytes as upper-case hexadecimal digit pairs.
///
/// The string `"1AF5"` encodes to `[0x1A, 0xF5]`. Its terminator is a single zero
/// byte.
pub struct Hex;

impl Encoding for Hex {
    fn name(&self) -> &str {
        "hex"
    }

    fn decode(&self, bytes: &[u8]) -> String {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        let mut text = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            text.push(char::from(DIGITS[usize::from(b >> 4)]));
            text.push(char::from(DIGITS[usize::from(b & 0x0F)]));
        }
        text
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let digits = text.as_bytes();
        if digits.len() % 2 != 0 {
            return Err(invalid_text(self.name()));
        }
        digits
            .chunks_exact(2)
            .map(|pair| {
                let high = hex_value(pair[0]);
                let low = hex_value(pair[1]);
                match (high, low) {
                    (Some(high), Some(low)) => Ok(high << 4 | low),
                    _ => Err(invalid_text(self.name())),
                }
            })
            .collect()
    }

    fn null_terminator(&self) -> Vec<u8> {
        vec![0]
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

type Registry = HashMap<String, Arc<dyn Encoding>>;

static ENCODINGS: Lazy<RwLock<Registry>> = Lazy::new(|| {
    let builtin: [Arc<dyn Encoding>; 8] = [
        Arc::new(Utf8),
        Arc::new(SingleByte::ASCII),
        Arc::new(SingleByte::LATIN1),
        Arc::new(Utf16::LE),
        Arc::new(Utf16::BE),
        Arc::new(Utf32::LE),
        Arc::new(Utf32::BE),
        Arc::new(Hex),
    ];
    RwLock::new(
        builtin
            .into_iter()
            .map(|encoding| (encoding.name().to_ascii_lowercase(), encoding))
            .collect(),
    )
});

/// Add `encoding` under its own name, replacing any codec already registered there.
///
/// Register during initialization; conversions already running may or may not
/// observe the change.
pub fn register(encoding: Arc<dyn Encoding>) {
    let name = encoding.name().to_ascii_lowercase();
    debug!(encoding = %name, "registering encoding");
    ENCODINGS.write().insert(name, encoding);
}

/// The codec registered under `name`.
pub fn lookup(name: &str) -> Option<Arc<dyn Encoding>> {
    ENCODINGS.read().get(&name.to_ascii_lowercase()).cloned()
}
