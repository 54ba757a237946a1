//! # Wirepack Core
//!
//! A typed, cursor-based binary value packer. Values are pushed into a
//! growable byte buffer in a portable, big-endian wire format and popped
//! back in the same order.
//!
//! ## Modules
//!
//! - `constants`: Wire format constants and limits
//! - `buffer`: Owned-or-borrowed byte region with doubling growth
//! - `endian`: Host/wire byte order normalization
//! - `packer`: Typed push/pop operations and the packer builder
//! - `blob`: Owned byte values returned by binary pops
//! - `charset`: Text codec binding for string fields
//! - `types`: `Packable` trait and the dynamic `Field` layer
//!
//! ## Example
//!
//! ```
//! use wirepack_core::Packer;
//!
//! let mut packer = Packer::with_capacity(4);
//! packer.push_i32(300)?;
//! packer.push_str("ab")?;
//! packer.push_i8(-1)?;
//!
//! assert_eq!(packer.pop_i32()?, 300);
//! assert_eq!(packer.pop_str()?, "ab");
//! assert_eq!(packer.pop_i8()?, -1);
//! # Ok::<(), wirepack_core::PackError>(())
//! ```

#![warn(missing_docs)]

pub mod blob;
pub mod buffer;
pub mod charset;
pub mod constants;
pub mod endian;
pub mod error;
pub mod packer;
pub mod types;

// Re-export commonly used types
pub use blob::Blob;
pub use buffer::Buffer;
pub use charset::{CharsetRegistry, TextCodec};
pub use error::{ErrorKind, PackError};
pub use packer::{Packer, PackerBuilder};
pub use types::{Field, FieldKind, Packable};

/// Result type alias for Wirepack operations
pub type Result<T> = core::result::Result<T, PackError>;
