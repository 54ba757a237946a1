//! Error types for Wirepack operations

/// Broad classification of a [`PackError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input
    InvalidArgument,
    /// Read past the occupied data
    OutOfRange,
    /// Operation violates a structural invariant
    Logic,
    /// Error raised by the text codec
    Charset,
}

/// Errors that can occur during packing and unpacking
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Malformed argument: bad length, empty region, invalid position
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough occupied data left to satisfy a read
    #[error("Out of range: need {needed} bytes, {available} available")]
    OutOfRange {
        /// The number of bytes the read required.
        needed: usize,
        /// The number of unread bytes before the end of occupied data.
        available: usize,
    },

    /// Structural violation, e.g. growing a bound buffer
    #[error("Logic error: {0}")]
    Logic(String),

    /// Charset is not registered with the text codec
    #[error("Unsupported charset: {0:?}")]
    UnsupportedCharset(String),

    /// Text could not be converted to or from the wire encoding
    #[error("Cannot convert text for charset {charset:?}: {reason}")]
    Conversion {
        /// The caller charset involved in the conversion.
        charset: String,
        /// What went wrong.
        reason: String,
    },
}

impl PackError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PackError::OutOfRange { .. } => ErrorKind::OutOfRange,
            PackError::Logic(_) => ErrorKind::Logic,
            PackError::UnsupportedCharset(_) | PackError::Conversion { .. } => ErrorKind::Charset,
        }
    }

    pub(crate) fn out_of_range(needed: usize, available: usize) -> Self {
        PackError::OutOfRange { needed, available }
    }
}
