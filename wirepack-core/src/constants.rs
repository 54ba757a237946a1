//! Constants and limits for the Wirepack wire format

/// Size of the `int32` length prefix carried by every variable-size field
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Capacity used when a buffer is created with a capacity of zero,
/// until changed with [`crate::buffer::set_default_capacity`]
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Largest payload a length prefix can describe
pub const MAX_FIELD_LEN: usize = i32::MAX as usize;

/// Canonical text encoding of string fields on the wire
pub const WIRE_TEXT_ENCODING: &str = "UTF-8";

/// Owned buffers multiply their capacity by this factor until a write fits
pub const GROWTH_FACTOR: usize = 2;
