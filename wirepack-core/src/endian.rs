//! Byte order normalization
//!
//! The wire carries every multi-byte numeric field in big-endian order.
//! All fixed-width pushes and pops go through [`to_canonical`], which is the
//! only place host byte order is considered.

/// Whether the host stores integers least-significant byte first
pub const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Convert bytes in host order to canonical wire order, or back.
///
/// The operation is its own inverse.
#[inline]
pub fn to_canonical(bytes: &mut [u8]) {
    if HOST_IS_LITTLE_ENDIAN {
        bytes.reverse();
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width numeric types that can be written to the wire
pub trait WireScalar: Copy + sealed::Sealed {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write `self` in canonical order into `out[..Self::WIDTH]`
    fn write_wire(self, out: &mut [u8]);

    /// Read a value in canonical order from `bytes[..Self::WIDTH]`
    fn read_wire(bytes: &[u8]) -> Self;
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl WireScalar for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn write_wire(self, out: &mut [u8]) {
                let mut raw = self.to_ne_bytes();
                to_canonical(&mut raw);
                out[..Self::WIDTH].copy_from_slice(&raw);
            }

            #[inline]
            fn read_wire(bytes: &[u8]) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::WIDTH]);
                to_canonical(&mut raw);
                <$ty>::from_ne_bytes(raw)
            }
        }
    )*};
}

impl_wire_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
