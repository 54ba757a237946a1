//! Text codec binding
//!
//! String fields travel as UTF-8. A packer is configured with the charset
//! its caller speaks, and converts through a [`TextCodec`] on every string
//! push and pop. [`CharsetRegistry`] is the stock codec: a name-keyed table
//! of [`Charset`] implementations that callers can extend with their own
//! (for example GBK tables living in another crate).

use crate::constants::WIRE_TEXT_ENCODING;
use crate::error::PackError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

/// Converts text between a caller charset and the wire encoding
pub trait TextCodec: Send + Sync + Debug {
    /// Re-encode `bytes`, written in `charset`, into the wire encoding
    fn to_wire_text(&self, charset: &str, bytes: &[u8]) -> Result<Vec<u8>, PackError>;

    /// Re-encode wire text into `charset`
    fn from_wire_text(&self, charset: &str, wire: &[u8]) -> Result<Vec<u8>, PackError>;

    /// Check whether `charset` can be converted
    fn supports(&self, charset: &str) -> bool;
}

/// One registered charset
///
/// Errors are plain reasons; the registry attaches the charset name.
pub trait Charset: Send + Sync + Debug {
    /// Convert bytes in this charset to UTF-8
    fn encode_to_utf8(&self, bytes: &[u8]) -> Result<Vec<u8>, String>;

    /// Convert UTF-8 bytes to this charset
    fn decode_from_utf8(&self, wire: &[u8]) -> Result<Vec<u8>, String>;
}

/// The wire encoding itself; bytes pass through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl Charset for Utf8 {
    fn encode_to_utf8(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        Ok(bytes.to_vec())
    }

    fn decode_from_utf8(&self, wire: &[u8]) -> Result<Vec<u8>, String> {
        Ok(wire.to_vec())
    }
}

/// 7-bit US-ASCII
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascii;

impl Charset for Ascii {
    fn encode_to_utf8(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        match bytes.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(format!(
                "byte 0x{:02X} at offset {} is not ASCII",
                bytes[pos], pos
            )),
            None => Ok(bytes.to_vec()),
        }
    }

    fn decode_from_utf8(&self, wire: &[u8]) -> Result<Vec<u8>, String> {
        let text = std::str::from_utf8(wire).map_err(|e| e.to_string())?;
        match text.chars().find(|c| !c.is_ascii()) {
            Some(c) => Err(format!("character {:?} has no ASCII encoding", c)),
            None => Ok(wire.to_vec()),
        }
    }
}

/// ISO-8859-1: one byte per code point U+0000..=U+00FF
#[derive(Debug, Clone, Copy, Default)]
pub struct Latin1;

impl Charset for Latin1 {
    fn encode_to_utf8(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        Ok(bytes
            .iter()
            .map(|&b| char::from(b))
            .collect::<String>()
            .into_bytes())
    }

    fn decode_from_utf8(&self, wire: &[u8]) -> Result<Vec<u8>, String> {
        let text = std::str::from_utf8(wire).map_err(|e| e.to_string())?;
        text.chars()
            .map(|c| {
                u8::try_from(u32::from(c))
                    .map_err(|_| format!("character {:?} has no ISO-8859-1 encoding", c))
            })
            .collect()
    }
}

/// Name-keyed table of charsets
///
/// Names are matched case-insensitively. The empty name and `OEM` usually
/// mean "the locale's charset"; here they are UTF-8 pass-through, so text
/// from a non-UTF-8 locale needs an explicit charset name.
#[derive(Debug, Clone)]
pub struct CharsetRegistry {
    charsets: HashMap<String, Arc<dyn Charset>>,
}

impl CharsetRegistry {
    /// Create a registry holding only the built-in charsets
    pub fn new() -> Self {
        let mut registry = Self {
            charsets: HashMap::new(),
        };

        let utf8: Arc<dyn Charset> = Arc::new(Utf8);
        for name in [WIRE_TEXT_ENCODING, "UTF8", "", "OEM"] {
            registry.insert(name, utf8.clone());
        }

        let ascii: Arc<dyn Charset> = Arc::new(Ascii);
        for name in ["ASCII", "US-ASCII", "ANSI", "C"] {
            registry.insert(name, ascii.clone());
        }

        let latin1: Arc<dyn Charset> = Arc::new(Latin1);
        for name in ["ISO-8859-1", "LATIN1"] {
            registry.insert(name, latin1.clone());
        }

        registry
    }

    /// Process-wide registry with the built-in charsets, created on first use
    pub fn shared() -> Arc<CharsetRegistry> {
        static SHARED: OnceLock<Arc<CharsetRegistry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(CharsetRegistry::new())).clone()
    }

    /// Add or replace a charset
    pub fn register(&mut self, name: &str, charset: impl Charset + 'static) {
        self.insert(name, Arc::new(charset));
    }

    fn insert(&mut self, name: &str, charset: Arc<dyn Charset>) {
        self.charsets.insert(name.to_ascii_uppercase(), charset);
    }

    /// Look up a charset by name
    pub fn get(&self, name: &str) -> Result<&dyn Charset, PackError> {
        self.charsets
            .get(&name.to_ascii_uppercase())
            .map(|c| &**c)
            .ok_or_else(|| PackError::UnsupportedCharset(name.to_string()))
    }

    /// Registered names, upper-cased
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.charsets.keys().map(String::as_str)
    }
}

impl Default for CharsetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCodec for CharsetRegistry {
    fn to_wire_text(&self, charset: &str, bytes: &[u8]) -> Result<Vec<u8>, PackError> {
        self.get(charset)?
            .encode_to_utf8(bytes)
            .map_err(|reason| PackError::Conversion {
                charset: charset.to_string(),
                reason,
            })
    }

    fn from_wire_text(&self, charset: &str, wire: &[u8]) -> Result<Vec<u8>, PackError> {
        self.get(charset)?
            .decode_from_utf8(wire)
            .map_err(|reason| PackError::Conversion {
                charset: charset.to_string(),
                reason,
            })
    }

    fn supports(&self, charset: &str) -> bool {
        self.get(charset).is_ok()
    }
}
