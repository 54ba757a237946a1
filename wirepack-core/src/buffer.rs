//! Growable byte region backing a packer
//!
//! A [`Buffer`] either owns its storage, in which case it grows by doubling
//! when a write does not fit, or borrows a caller-supplied region, in which
//! case its capacity is a hard ceiling.

use crate::constants::{DEFAULT_BUFFER_CAPACITY, GROWTH_FACTOR};
use crate::endian::WireScalar;
use crate::error::PackError;
use bytes::{Bytes, BytesMut};
use core::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

static DEFAULT_CAPACITY: AtomicUsize = AtomicUsize::new(DEFAULT_BUFFER_CAPACITY);

/// Capacity used by [`Buffer::with_capacity`] when asked for zero bytes
pub fn default_capacity() -> usize {
    DEFAULT_CAPACITY.load(Ordering::Relaxed)
}

/// Change the process-wide default capacity
///
/// Affects buffers created afterwards. A default of zero would leave owned
/// buffers unable to grow, so it is rejected.
pub fn set_default_capacity(capacity: usize) -> Result<(), PackError> {
    if capacity == 0 {
        return Err(PackError::InvalidArgument(
            "default buffer capacity must be non-zero".into(),
        ));
    }
    DEFAULT_CAPACITY.store(capacity, Ordering::Relaxed);
    Ok(())
}

#[derive(Debug)]
enum Storage<'a> {
    /// Zero-filled region whose length is the capacity
    Owned(BytesMut),
    /// Caller-owned region
    Borrowed(&'a mut [u8]),
}

/// Owned-or-borrowed byte region with an occupied-length marker
#[derive(Debug)]
pub struct Buffer<'a> {
    storage: Storage<'a>,
    occupied: usize,
}

impl<'a> Buffer<'a> {
    /// Allocate an owned, zero-filled buffer
    ///
    /// A capacity of `0` selects [`default_capacity`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            default_capacity()
        } else {
            capacity
        };

        Self {
            storage: Storage::Owned(BytesMut::zeroed(capacity)),
            occupied: 0,
        }
    }

    /// Create a buffer over a caller-owned region, treated as fully occupied
    pub fn borrowed(region: &'a mut [u8]) -> Result<Self, PackError> {
        let mut buffer = Self::with_capacity(1);
        buffer.bind(region)?;
        Ok(buffer)
    }

    /// Switch to borrowing `region`
    ///
    /// A previously owned region is released. The whole region counts as
    /// occupied; call [`Buffer::reset`] to write into it from the start.
    pub fn bind(&mut self, region: &'a mut [u8]) -> Result<(), PackError> {
        if region.is_empty() {
            return Err(PackError::InvalidArgument(
                "cannot bind an empty region".into(),
            ));
        }

        #[cfg(feature = "logging")]
        debug!("Binding buffer to external region of {} bytes", region.len());

        self.occupied = region.len();
        self.storage = Storage::Borrowed(region);
        Ok(())
    }

    /// Total bytes available before the buffer must grow
    pub fn capacity(&self) -> usize {
        self.region().len()
    }

    /// Number of occupied bytes
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Check if the region is borrowed from the caller
    pub fn is_bound(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    /// The occupied bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.region()[..self.occupied]
    }

    fn region(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(buf) => &buf[..],
            Storage::Borrowed(region) => &region[..],
        }
    }

    fn region_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(buf) => &mut buf[..],
            Storage::Borrowed(region) => &mut region[..],
        }
    }

    /// Make room for `additional` more bytes after the occupied data
    ///
    /// Owned storage doubles until the bytes fit; the occupied prefix is
    /// preserved and the new tail is zeroed. Borrowed storage cannot grow.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<(), PackError> {
        let required = self.occupied.checked_add(additional).ok_or_else(|| {
            PackError::InvalidArgument(format!(
                "write of {} bytes overflows buffer addressing",
                additional
            ))
        })?;

        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }

        let occupied = self.occupied;
        match &mut self.storage {
            Storage::Borrowed(_) => {
                #[cfg(feature = "logging")]
                warn!(
                    "Refusing to grow bound buffer: {} bytes needed, capacity {}",
                    required, capacity
                );

                Err(PackError::Logic(format!(
                    "bound buffer cannot grow: {} bytes needed, capacity {}",
                    required, capacity
                )))
            }
            Storage::Owned(buf) => {
                let mut new_capacity = capacity.max(1);
                while new_capacity < required {
                    new_capacity = new_capacity
                        .checked_mul(GROWTH_FACTOR)
                        .unwrap_or(required);
                }

                #[cfg(feature = "logging")]
                debug!(
                    "Growing buffer from {} to {} bytes ({} occupied)",
                    capacity, new_capacity, occupied
                );

                let mut grown = BytesMut::zeroed(new_capacity);
                grown[..occupied].copy_from_slice(&buf[..occupied]);
                *buf = grown;
                Ok(())
            }
        }
    }

    /// Append raw bytes, growing if needed
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), PackError> {
        self.ensure_capacity(bytes.len())?;
        let start = self.occupied;
        self.region_mut()[start..start + bytes.len()].copy_from_slice(bytes);
        self.occupied += bytes.len();
        Ok(())
    }

    /// Append a fixed-width value in canonical byte order
    pub fn append_scalar<T: WireScalar>(&mut self, value: T) -> Result<(), PackError> {
        self.ensure_capacity(T::WIDTH)?;
        let start = self.occupied;
        value.write_wire(&mut self.region_mut()[start..start + T::WIDTH]);
        self.occupied += T::WIDTH;
        Ok(())
    }

    /// Zero the whole region and mark it empty
    ///
    /// Capacity and ownership are unchanged.
    pub fn reset(&mut self) {
        self.region_mut().fill(0);
        self.occupied = 0;
    }

    /// Consume the buffer, returning the occupied bytes
    ///
    /// Owned storage is frozen without copying; a borrowed region is copied.
    pub fn into_bytes(self) -> Bytes {
        match self.storage {
            Storage::Owned(mut buf) => {
                buf.truncate(self.occupied);
                buf.freeze()
            }
            Storage::Borrowed(region) => Bytes::copy_from_slice(&region[..self.occupied]),
        }
    }
}

impl Default for Buffer<'_> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_zero_filled() {
        let buffer = Buffer::with_capacity(16);
        assert_eq!(buffer.capacity(), 16);
        assert!(buffer.is_empty());
        assert!(buffer.region().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let buffer = Buffer::with_capacity(0);
        assert_eq!(buffer.capacity(), default_capacity());
    }

    #[test]
    fn test_default_capacity_rejects_zero() {
        let result = set_default_capacity(0);
        assert!(matches!(result, Err(PackError::InvalidArgument(_))));
    }

    #[test]
    fn test_growth_doubles() {
        let mut buffer = Buffer::with_capacity(4);
        buffer.append(&[1, 2, 3]).unwrap();
        buffer.append(&[4, 5, 6, 7, 8, 9, 10]).unwrap();

        // 4 -> 8 -> 16
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert!(buffer.region()[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bind_marks_region_occupied() {
        let mut region = [7u8; 8];
        let buffer = Buffer::borrowed(&mut region).unwrap();
        assert!(buffer.is_bound());
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_bind_empty_region() {
        let mut region: [u8; 0] = [];
        let mut buffer = Buffer::with_capacity(4);
        assert!(matches!(
            buffer.bind(&mut region),
            Err(PackError::InvalidArgument(_))
        ));
        assert!(!buffer.is_bound());
    }

    #[test]
    fn test_bound_buffer_cannot_grow() {
        let mut region = [0u8; 4];
        let mut buffer = Buffer::borrowed(&mut region).unwrap();
        buffer.reset();
        buffer.append(&[1, 2]).unwrap();

        let result = buffer.append(&[3, 4, 5]);
        assert!(matches!(result, Err(PackError::Logic(_))));
        assert_eq!(buffer.as_slice(), &[1, 2]);
        drop(buffer);
        assert_eq!(region, [1, 2, 0, 0]);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut buffer = Buffer::with_capacity(2);
        buffer.append(&[9; 5]).unwrap();
        let capacity = buffer.capacity();

        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
        assert!(buffer.region().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_append_scalar() {
        let mut buffer = Buffer::with_capacity(1);
        buffer.append_scalar(0x0A0Bu16).unwrap();
        assert_eq!(buffer.as_slice(), &[0x0A, 0x0B]);
    }

    #[test]
    fn test_into_bytes() {
        let mut buffer = Buffer::with_capacity(64);
        buffer.append(b"abc").unwrap();
        assert_eq!(buffer.into_bytes().as_ref(), b"abc");

        let mut region = *b"xyz";
        let buffer = Buffer::borrowed(&mut region).unwrap();
        assert_eq!(buffer.into_bytes().as_ref(), b"xyz");
    }
}
