//! Opening and sealing course containers.
//!
//! This module undoes (and re-applies) the outer layers around course
//! plaintext:
//!
//! - [`cipher`] - AES-128-CBC container encryption with a pluggable key schedule
//! - [`compress`] - raw DEFLATE and zlib (de)compression
//!
//! [`ContainerCodec`] dispatches over the three [`ContainerFormat`] shapes.
//!
//! # Example
//!
//! ```
//! use course_codec::container::ContainerCodec;
//! use course_codec::format::ContainerFormat;
//!
//! let codec = ContainerCodec::with_static_key([0x42; 16]);
//! let plaintext = vec![0u8; 512];
//!
//! for format in ContainerFormat::ALL {
//!     let sealed = codec.seal(&plaintext, format).unwrap();
//!     assert_eq!(codec.open(&sealed, format).unwrap(), plaintext);
//! }
//! ```

pub mod cipher;
pub mod compress;

pub use cipher::{CourseCipher, KeyDerivation, StaticKey};
pub use compress::{compress_raw, compress_zlib, decompress_raw, decompress_zlib};

use tracing::debug;

use crate::error::{CourseError, Result};
use crate::format::ContainerFormat;

/// Opens and seals containers of every shape.
///
/// The zlib shape needs no key, so a codec built with
/// [`ContainerCodec::without_cipher`] can still handle database-stored
/// courses; encrypted shapes then fail with a `ContainerDecodeError`.
#[derive(Debug, Default)]
pub struct ContainerCodec {
    cipher: Option<CourseCipher>,
}

impl ContainerCodec {
    /// Creates a codec that can handle every container shape.
    #[must_use]
    pub fn new(cipher: CourseCipher) -> Self {
        Self {
            cipher: Some(cipher),
        }
    }

    /// Creates a codec with one fixed course key.
    #[must_use]
    pub fn with_static_key(key: [u8; cipher::KEY_SIZE]) -> Self {
        Self::new(CourseCipher::with_static_key(key))
    }

    /// Creates a codec that only handles the unencrypted zlib shape.
    #[must_use]
    pub fn without_cipher() -> Self {
        Self { cipher: None }
    }

    /// Returns whether encrypted shapes can be handled.
    #[must_use]
    pub fn has_cipher(&self) -> bool {
        self.cipher.is_some()
    }

    /// Recovers course plaintext from a container of the given shape.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if decryption or
    /// decompression fails, or if the shape is encrypted and no key is
    /// configured.
    pub fn open(&self, data: &[u8], format: ContainerFormat) -> Result<Vec<u8>> {
        debug!("Opening {} byte {format} container", data.len());

        match format {
            ContainerFormat::Bcd => self.cipher(format)?.decrypt_as(data, format),
            ContainerFormat::Zcd => {
                let cipher = self.cipher(format)?;
                let encrypted = decompress_raw(data)?;
                cipher.decrypt_as(&encrypted, format)
            }
            ContainerFormat::Zlib => decompress_zlib(data),
        }
    }

    /// Wraps course plaintext in a container of the given shape.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if encryption or
    /// compression fails, or if the shape is encrypted and no key is
    /// configured.
    pub fn seal(&self, plaintext: &[u8], format: ContainerFormat) -> Result<Vec<u8>> {
        debug!("Sealing {} bytes as {format}", plaintext.len());

        match format {
            ContainerFormat::Bcd => self.cipher(format)?.encrypt(plaintext),
            ContainerFormat::Zcd => {
                let encrypted = self.cipher(format)?.encrypt(plaintext)?;
                compress_raw(&encrypted)
            }
            ContainerFormat::Zlib => compress_zlib(plaintext),
        }
    }

    fn cipher(&self, format: ContainerFormat) -> Result<&CourseCipher> {
        self.cipher.as_ref().ok_or_else(|| {
            CourseError::container(format, "no course key configured for an encrypted container")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plaintext() -> Vec<u8> {
        (0..1024u32).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn test_open_seal_all_formats() {
        let codec = ContainerCodec::with_static_key([1; 16]);
        let data = plaintext();

        for format in ContainerFormat::ALL {
            let sealed = codec.seal(&data, format).unwrap();
            assert_ne!(sealed, data);
            assert_eq!(codec.open(&sealed, format).unwrap(), data, "{format}");
        }
    }

    #[test]
    fn test_zcd_is_deflated_bcd() {
        let codec = ContainerCodec::with_static_key([1; 16]);
        let sealed = codec.seal(&plaintext(), ContainerFormat::Zcd).unwrap();
        let bcd = decompress_raw(&sealed).unwrap();
        assert_eq!(codec.open(&bcd, ContainerFormat::Bcd).unwrap(), plaintext());
    }

    #[test]
    fn test_zlib_needs_no_key() {
        let codec = ContainerCodec::without_cipher();
        assert!(!codec.has_cipher());

        let sealed = codec.seal(&plaintext(), ContainerFormat::Zlib).unwrap();
        assert_eq!(codec.open(&sealed, ContainerFormat::Zlib).unwrap(), plaintext());
    }

    #[test]
    fn test_encrypted_shapes_need_key() {
        let codec = ContainerCodec::without_cipher();
        for format in [ContainerFormat::Bcd, ContainerFormat::Zcd] {
            let result = codec.open(&[0u8; 128], format);
            assert!(
                matches!(result, Err(CourseError::ContainerDecodeError { format: f, .. }) if f == format)
            );
            assert!(codec.seal(&plaintext(), format).is_err());
        }
    }

    #[test]
    fn test_wrong_shape_fails() {
        let codec = ContainerCodec::with_static_key([1; 16]);
        let zlib = codec.seal(&plaintext(), ContainerFormat::Zlib).unwrap();
        assert!(codec.open(&zlib, ContainerFormat::Bcd).is_err());
    }
}
