//! Owned fixed-length byte values

use bytes::Bytes;
use core::ops::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

/// An owned run of bytes returned by binary and raw pops
///
/// Cloning a `Blob` copies its bytes; two blobs never share storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blob {
    data: Box<[u8]>,
}

impl Blob {
    /// Create a zero-filled blob of `len` bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: vec![0u8; len].into_boxed_slice(),
        }
    }

    /// Copy `bytes` into a new blob
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            data: bytes.into(),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the blob holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// View the bytes mutably
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take the bytes as a vector
    pub fn into_vec(self) -> Vec<u8> {
        self.data.into_vec()
    }

    /// Convert into a shareable `Bytes` handle
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.into_vec())
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Blob {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            data: bytes.into_boxed_slice(),
        }
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl From<Blob> for Vec<u8> {
    fn from(blob: Blob) -> Self {
        blob.into_vec()
    }
}
