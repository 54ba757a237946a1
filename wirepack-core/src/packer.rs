//! Typed push/pop over a [`Buffer`]
//!
//! A [`Packer`] keeps two cursors over one buffer: the write cursor is the
//! end of the occupied data, the read cursor is where the next pop starts.
//! Fields are written and read back in the same order; nothing on the wire
//! describes which type a field has.
//!
//! Wire layout of each field kind:
//!
//! - fixed-width numbers: `size_of::<T>()` bytes, big-endian
//! - string: `i32` length, then that many bytes of UTF-8
//! - binary: `i32` length, then that many raw bytes
//! - raw: exactly the bytes given, no prefix
//!
//! Failed pushes leave the buffer as it was and failed pops leave the read
//! cursor where it was.

use crate::blob::Blob;
use crate::buffer::Buffer;
use crate::charset::{CharsetRegistry, TextCodec};
use crate::constants::{LENGTH_PREFIX_SIZE, MAX_FIELD_LEN, WIRE_TEXT_ENCODING};
use crate::endian::WireScalar;
use crate::error::PackError;
use bytes::Bytes;
use core::ops::Range;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Cursor-pair reader/writer over an owned or borrowed byte region
#[derive(Debug)]
pub struct Packer<'a> {
    buffer: Buffer<'a>,
    read_cursor: usize,
    charset: String,
    codec: Arc<dyn TextCodec>,
}

macro_rules! scalar_ops {
    ($($push:ident, $pop:ident, $ty:ty;)*) => {$(
        #[doc = concat!("Push a `", stringify!($ty), "` in canonical byte order")]
        pub fn $push(&mut self, value: $ty) -> Result<(), PackError> {
            self.push_scalar(value)
        }

        #[doc = concat!("Pop a `", stringify!($ty), "`")]
        pub fn $pop(&mut self) -> Result<$ty, PackError> {
            self.pop_scalar()
        }
    )*};
}

impl<'a> Packer<'a> {
    /// Create an owned packer with the default capacity
    ///
    /// Strings are taken to be in the wire encoding already.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an owned packer; `0` selects the default capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(
            Buffer::with_capacity(capacity),
            String::new(),
            CharsetRegistry::shared(),
        )
    }

    /// Create a packer over a caller-owned region, ready to be popped
    pub fn bound(region: &'a mut [u8]) -> Result<Self, PackError> {
        PackerBuilder::new().bind(region)
    }

    /// Start configuring a packer
    pub fn builder() -> PackerBuilder {
        PackerBuilder::new()
    }

    fn from_parts(buffer: Buffer<'a>, charset: String, codec: Arc<dyn TextCodec>) -> Self {
        Self {
            buffer,
            read_cursor: 0,
            charset,
            codec,
        }
    }

    /// Switch to a caller-owned region
    ///
    /// Any owned storage is released. The region counts as fully written
    /// and the read cursor moves to its start. The packer never grows a
    /// bound region; pushes that do not fit fail with [`PackError::Logic`].
    pub fn bind(&mut self, region: &'a mut [u8]) -> Result<(), PackError> {
        self.buffer.bind(region)?;
        self.read_cursor = 0;
        Ok(())
    }

    /// Zero the region and move both cursors back to the start
    pub fn reset(&mut self) {
        #[cfg(feature = "logging")]
        debug!(
            "Resetting packer ({} bytes occupied, read cursor at {})",
            self.buffer.len(),
            self.read_cursor
        );

        self.buffer.reset();
        self.read_cursor = 0;
    }

    /// The occupied bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// The underlying buffer
    pub fn buffer(&self) -> &Buffer<'a> {
        &self.buffer
    }

    /// Number of occupied bytes (the write cursor)
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current capacity of the region
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Check if the region is borrowed from the caller
    pub fn is_bound(&self) -> bool {
        self.buffer.is_bound()
    }

    /// Caller charset used for string fields
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Offset of the next pop
    pub fn read_position(&self) -> usize {
        self.read_cursor
    }

    /// Unread bytes before the end of occupied data
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.read_cursor
    }

    /// Consume the packer, returning the occupied bytes
    pub fn into_bytes(self) -> Bytes {
        self.buffer.into_bytes()
    }

    /// Push any fixed-width value
    pub fn push_scalar<T: WireScalar>(&mut self, value: T) -> Result<(), PackError> {
        self.buffer.append_scalar(value)
    }

    /// Pop any fixed-width value
    pub fn pop_scalar<T: WireScalar>(&mut self) -> Result<T, PackError> {
        self.ensure_available(T::WIDTH)?;
        let value = T::read_wire(&self.buffer.as_slice()[self.read_cursor..]);
        self.read_cursor += T::WIDTH;
        Ok(value)
    }

    scalar_ops! {
        push_i8, pop_i8, i8;
        push_i16, pop_i16, i16;
        push_i32, pop_i32, i32;
        push_i64, pop_i64, i64;
        push_u8, pop_u8, u8;
        push_u16, pop_u16, u16;
        push_u32, pop_u32, u32;
        push_u64, pop_u64, u64;
        push_f32, pop_f32, f32;
        push_f64, pop_f64, f64;
    }

    /// Push text written in the packer's charset
    ///
    /// The text is converted to the wire encoding and written as a
    /// length-prefixed field. The prefix counts converted bytes.
    pub fn push_string(&mut self, text: &[u8]) -> Result<(), PackError> {
        let wire = self.codec.to_wire_text(&self.charset, text)?;
        self.push_prefixed(&wire)
    }

    /// Push the first `len` bytes of `text` as a string field
    pub fn push_string_len(&mut self, text: &[u8], len: usize) -> Result<(), PackError> {
        if len > text.len() {
            return Err(PackError::InvalidArgument(format!(
                "string length {} exceeds the {} bytes supplied",
                len,
                text.len()
            )));
        }
        self.push_string(&text[..len])
    }

    /// Push a Rust string as a string field
    ///
    /// A `&str` is already in the wire encoding, so the packer's charset
    /// is bypassed.
    pub fn push_str(&mut self, text: &str) -> Result<(), PackError> {
        self.push_prefixed(text.as_bytes())
    }

    /// Pop a string field, converted to the packer's charset
    pub fn pop_string(&mut self) -> Result<Vec<u8>, PackError> {
        let payload = self.field_at_cursor()?;
        let text = self
            .codec
            .from_wire_text(&self.charset, &self.buffer.as_slice()[payload.clone()])?;
        self.read_cursor = payload.end;
        Ok(text)
    }

    /// Pop a string field as a Rust string
    ///
    /// The wire bytes are taken as UTF-8 whatever the packer's charset.
    pub fn pop_str(&mut self) -> Result<String, PackError> {
        let payload = self.field_at_cursor()?;
        let text = core::str::from_utf8(&self.buffer.as_slice()[payload.clone()])
            .map_err(|e| PackError::Conversion {
                charset: WIRE_TEXT_ENCODING.into(),
                reason: e.to_string(),
            })?
            .to_owned();
        self.read_cursor = payload.end;
        Ok(text)
    }

    /// Pop a string field into `dest`, or query its length
    ///
    /// With `None`, returns the wire length of the next string field and
    /// leaves the read cursor where it is. With a destination, writes at
    /// most `dest.len() - 1` bytes followed by a `0` terminator and returns
    /// the number of text bytes written.
    ///
    /// A truncated pop still consumes the whole field. To retry with a
    /// larger destination, record [`Packer::read_position`] first and
    /// rewind with [`Packer::pop_reset`].
    pub fn pop_string_into(&mut self, dest: Option<&mut [u8]>) -> Result<usize, PackError> {
        let Some(dest) = dest else {
            return self.peek_length();
        };

        if dest.is_empty() {
            return Err(PackError::InvalidArgument(
                "string destination has no room for a terminator".into(),
            ));
        }

        let text = self.pop_string()?;
        let n = text.len().min(dest.len() - 1);

        #[cfg(feature = "logging")]
        if n < text.len() {
            debug!(
                "Truncating {}-byte string into {}-byte destination",
                text.len(),
                dest.len()
            );
        }

        dest[..n].copy_from_slice(&text[..n]);
        dest[n] = 0;
        Ok(n)
    }

    /// Push a length-prefixed binary field
    pub fn push_binary(&mut self, data: &[u8]) -> Result<(), PackError> {
        self.push_prefixed(data)
    }

    /// Pop a binary field into an owned blob
    pub fn pop_binary(&mut self) -> Result<Blob, PackError> {
        let payload = self.field_at_cursor()?;
        let blob = Blob::from_slice(&self.buffer.as_slice()[payload.clone()]);
        self.read_cursor = payload.end;
        Ok(blob)
    }

    /// Pop a binary field into `dest`, or query its length
    ///
    /// Follows the same convention as [`Packer::pop_string_into`], except
    /// that no terminator is written: up to `dest.len()` bytes are copied.
    pub fn pop_binary_into(&mut self, dest: Option<&mut [u8]>) -> Result<usize, PackError> {
        let Some(dest) = dest else {
            return self.peek_length();
        };

        let payload = self.field_at_cursor()?;
        let n = payload.len().min(dest.len());
        dest[..n].copy_from_slice(&self.buffer.as_slice()[payload.start..payload.start + n]);
        self.read_cursor = payload.end;
        Ok(n)
    }

    /// Append bytes with no length prefix
    pub fn push_raw(&mut self, data: &[u8]) -> Result<(), PackError> {
        self.buffer.append(data)
    }

    /// Pop exactly `n` unprefixed bytes
    pub fn pop_raw(&mut self, n: usize) -> Result<Blob, PackError> {
        self.ensure_available(n)?;
        let start = self.read_cursor;
        let blob = Blob::from_slice(&self.buffer.as_slice()[start..start + n]);
        self.read_cursor += n;
        Ok(blob)
    }

    /// Fill `dest` with unprefixed bytes
    pub fn pop_raw_into(&mut self, dest: &mut [u8]) -> Result<usize, PackError> {
        let n = dest.len();
        self.ensure_available(n)?;
        let start = self.read_cursor;
        dest.copy_from_slice(&self.buffer.as_slice()[start..start + n]);
        self.read_cursor += n;
        Ok(n)
    }

    /// Move the read cursor to `position`
    pub fn pop_reset(&mut self, position: usize) -> Result<(), PackError> {
        if position > self.buffer.len() {
            return Err(PackError::InvalidArgument(format!(
                "pop position {} is past the {} occupied bytes",
                position,
                self.buffer.len()
            )));
        }
        self.read_cursor = position;
        Ok(())
    }

    /// Read the next length prefix without consuming it
    pub fn peek_length(&self) -> Result<usize, PackError> {
        self.ensure_available(LENGTH_PREFIX_SIZE)?;
        let raw = i32::read_wire(&self.buffer.as_slice()[self.read_cursor..]);
        usize::try_from(raw).map_err(|_| {
            PackError::InvalidArgument(format!(
                "negative length prefix {} at offset {}",
                raw, self.read_cursor
            ))
        })
    }

    /// Locate the payload of the length-prefixed field at the read cursor
    fn field_at_cursor(&self) -> Result<Range<usize>, PackError> {
        let len = self.peek_length()?;
        let available = self.remaining();
        let needed = LENGTH_PREFIX_SIZE + len;
        if needed > available {
            return Err(PackError::out_of_range(needed, available));
        }

        let start = self.read_cursor + LENGTH_PREFIX_SIZE;
        Ok(start..start + len)
    }

    fn push_prefixed(&mut self, payload: &[u8]) -> Result<(), PackError> {
        if payload.len() > MAX_FIELD_LEN {
            return Err(PackError::InvalidArgument(format!(
                "field of {} bytes exceeds the {} byte limit",
                payload.len(),
                MAX_FIELD_LEN
            )));
        }

        // Reserve for prefix and payload together so a refused write leaves nothing behind
        self.buffer
            .ensure_capacity(LENGTH_PREFIX_SIZE + payload.len())?;
        self.buffer.append_scalar(payload.len() as i32)?;
        self.buffer.append(payload)
    }

    fn ensure_available(&self, needed: usize) -> Result<(), PackError> {
        let available = self.remaining();
        if needed > available {
            return Err(PackError::out_of_range(needed, available));
        }
        Ok(())
    }
}

impl Default for Packer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Packer`]
#[derive(Debug, Clone, Default)]
pub struct PackerBuilder {
    capacity: usize,
    charset: String,
    codec: Option<Arc<dyn TextCodec>>,
}

impl PackerBuilder {
    /// Create a builder with the default capacity, the wire charset and
    /// the shared charset registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capacity of an owned packer
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the charset callers use for string fields
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Use a custom text codec
    pub fn codec(mut self, codec: Arc<dyn TextCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    fn resolve_codec(&mut self) -> Result<Arc<dyn TextCodec>, PackError> {
        let codec: Arc<dyn TextCodec> = match self.codec.take() {
            Some(codec) => codec,
            None => CharsetRegistry::shared(),
        };

        if !codec.supports(&self.charset) {
            return Err(PackError::UnsupportedCharset(self.charset.clone()));
        }
        Ok(codec)
    }

    /// Build an owned packer
    pub fn build<'a>(mut self) -> Result<Packer<'a>, PackError> {
        let codec = self.resolve_codec()?;
        Ok(Packer::from_parts(
            Buffer::with_capacity(self.capacity),
            self.charset,
            codec,
        ))
    }

    /// Build a packer over a caller-owned region
    ///
    /// The configured capacity is ignored; the region's length is the
    /// hard ceiling.
    pub fn bind<'a>(mut self, region: &'a mut [u8]) -> Result<Packer<'a>, PackError> {
        let codec = self.resolve_codec()?;
        let buffer = Buffer::borrowed(region)?;
        Ok(Packer::from_parts(buffer, self.charset, codec))
    }
}
