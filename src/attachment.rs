//! Proof-of-payment attachments.
//!
//! The backend stores the receipt as a PNG, so anything else is refused when
//! it is selected rather than after upload. The type is checked from the file
//! signature, not the extension.

#[cfg(test)]
#[path = "attachment_test.rs"]
mod attachment_test;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// First eight bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("cannot read attachment {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("attachment is not a PNG image")]
    NotPng,
}

#[must_use]
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// A selected receipt image, guaranteed to be PNG.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    bytes: Vec<u8>,
}

impl Attachment {
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotPng`] when `bytes` lacks the PNG signature.
    pub fn from_png_bytes(bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        if !is_png(&bytes) {
            return Err(AttachmentError::NotPng);
        }
        Ok(Self { bytes })
    }

    /// Read and validate an image file.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::Read`] if the file cannot be read and
    /// [`AttachmentError::NotPng`] if it is not a PNG.
    pub fn load(path: &Path) -> Result<Self, AttachmentError> {
        let bytes = std::fs::read(path).map_err(|source| AttachmentError::Read { path: path.to_owned(), source })?;
        Self::from_png_bytes(bytes)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 with padding, as the upload body expects.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment").field("len", &self.bytes.len()).finish()
    }
}
