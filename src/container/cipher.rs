//! Course container encryption.
//!
//! A BCD container is laid out as:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 4 | Container version (u32 LE) |
//! | 0x04 | 4 | Flags (u32 LE, opaque) |
//! | 0x08 | 4 | CRC-32 of the plaintext (u32 LE) |
//! | 0x0C | 4 | Magic `SCDL` |
//! | 0x10 | n | AES-128-CBC ciphertext, no padding |
//! | 0x10 + n | 16 | IV |
//! | 0x20 + n | 16 | Key derivation seed |
//! | 0x30 + n | 16 | MAC (opaque, not verified) |
//!
//! The per-file key is produced from the seed by a [`KeyDerivation`]. The
//! game's own key schedule is an opaque primitive supplied by the caller;
//! [`StaticKey`] covers the common case of a single configured key.
//!
//! # Example
//!
//! ```
//! use course_codec::container::cipher::CourseCipher;
//!
//! let cipher = CourseCipher::with_static_key([0x42; 16]);
//! let plaintext = vec![0xA5u8; 64];
//! let container = cipher.encrypt(&plaintext).unwrap();
//! assert_eq!(cipher.decrypt(&container).unwrap(), plaintext);
//! ```

use std::fmt;

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use tracing::{debug, trace};

use crate::error::{CourseError, Result};
use crate::format::{
    ContainerFormat, CONTAINER_HEADER_SIZE, CONTAINER_MAGIC, CONTAINER_VERSION,
    CRYPTO_TRAILER_SIZE,
};

type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// AES block size; ciphertext length must be a multiple of it.
pub const BLOCK_SIZE: usize = 16;

/// Size of a course key.
pub const KEY_SIZE: usize = 16;

/// Size of the CBC initialization vector.
pub const IV_SIZE: usize = 16;

/// Size of the key derivation seed stored in the crypto trailer.
pub const SEED_SIZE: usize = 16;

/// Produces the AES key for one container from the seed in its trailer.
pub trait KeyDerivation: Send + Sync {
    /// Derives the 128-bit key for a container whose trailer holds `seed`.
    fn derive_key(&self, seed: &[u8; SEED_SIZE]) -> [u8; KEY_SIZE];
}

/// A single fixed key used for every container, ignoring the seed.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticKey([u8; KEY_SIZE]);

impl StaticKey {
    /// Wraps a raw 128-bit key.
    #[must_use]
    pub const fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Parses a key from 32 hexadecimal digits.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ConfigError` if the text is not valid hex or
    /// does not decode to exactly 16 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use course_codec::container::cipher::StaticKey;
    ///
    /// assert!(StaticKey::from_hex("000102030405060708090a0b0c0d0e0f").is_ok());
    /// assert!(StaticKey::from_hex("0001").is_err());
    /// ```
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim()).map_err(|e| CourseError::ConfigError {
            reason: format!("course key is not valid hex: {e}"),
        })?;
        let key: [u8; KEY_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CourseError::ConfigError {
                    reason: format!("course key must be {KEY_SIZE} bytes, got {}", bytes.len()),
                })?;
        Ok(Self(key))
    }
}

impl fmt::Debug for StaticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticKey(<redacted>)")
    }
}

impl KeyDerivation for StaticKey {
    fn derive_key(&self, _seed: &[u8; SEED_SIZE]) -> [u8; KEY_SIZE] {
        self.0
    }
}

/// Encrypts and decrypts BCD course containers.
pub struct CourseCipher {
    keys: Box<dyn KeyDerivation>,
}

impl fmt::Debug for CourseCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourseCipher").finish_non_exhaustive()
    }
}

impl CourseCipher {
    /// Creates a cipher backed by the given key derivation.
    #[must_use]
    pub fn new(keys: impl KeyDerivation + 'static) -> Self {
        Self {
            keys: Box::new(keys),
        }
    }

    /// Creates a cipher that uses one fixed key for every container.
    #[must_use]
    pub fn with_static_key(key: [u8; KEY_SIZE]) -> Self {
        Self::new(StaticKey::new(key))
    }

    /// Decrypts a BCD container into its plaintext.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if the container is too
    /// short, misaligned, has the wrong magic, or its plaintext does not
    /// match the stored CRC-32 (the usual symptom of a wrong key).
    pub fn decrypt(&self, container: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_as(container, ContainerFormat::Bcd)
    }

    /// Encrypts `plaintext` into a BCD container with a fresh random IV and seed.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if the plaintext is not a
    /// whole number of AES blocks or the OS random source is unavailable.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; IV_SIZE];
        let mut seed = [0u8; SEED_SIZE];
        getrandom::getrandom(&mut iv)
            .and_then(|()| getrandom::getrandom(&mut seed))
            .map_err(|e| {
                CourseError::container(
                    ContainerFormat::Bcd,
                    format!("OS random source unavailable: {e}"),
                )
            })?;
        self.encrypt_with(plaintext, iv, seed)
    }

    /// Encrypts `plaintext` with an explicit IV and key seed.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if the plaintext is not a
    /// whole number of AES blocks.
    pub fn encrypt_with(
        &self,
        plaintext: &[u8],
        iv: [u8; IV_SIZE],
        seed: [u8; SEED_SIZE],
    ) -> Result<Vec<u8>> {
        if plaintext.len() % BLOCK_SIZE != 0 {
            return Err(CourseError::container(
                ContainerFormat::Bcd,
                format!(
                    "plaintext length {} is not a multiple of {BLOCK_SIZE}",
                    plaintext.len()
                ),
            ));
        }

        let key = self.keys.derive_key(&seed);
        let mut body = plaintext.to_vec();
        let len = body.len();
        Aes128CbcEnc::new(&key.into(), &iv.into())
            .encrypt_padded_mut::<NoPadding>(&mut body, len)
            .map_err(|_| CourseError::container(ContainerFormat::Bcd, "block encryption failed"))?;

        let mut container =
            Vec::with_capacity(CONTAINER_HEADER_SIZE + body.len() + CRYPTO_TRAILER_SIZE);
        container.extend_from_slice(&CONTAINER_VERSION.to_le_bytes());
        container.extend_from_slice(&0u32.to_le_bytes());
        container.extend_from_slice(&crc32fast::hash(plaintext).to_le_bytes());
        container.extend_from_slice(CONTAINER_MAGIC);
        container.extend_from_slice(&body);
        container.extend_from_slice(&iv);
        container.extend_from_slice(&seed);
        container.extend_from_slice(&[0u8; CRYPTO_TRAILER_SIZE - IV_SIZE - SEED_SIZE]);

        debug!(
            "Encrypted {} bytes into {} byte container",
            plaintext.len(),
            container.len()
        );
        Ok(container)
    }

    /// Decrypts a container, reporting failures against `format`.
    pub(crate) fn decrypt_as(&self, container: &[u8], format: ContainerFormat) -> Result<Vec<u8>> {
        let overhead = CONTAINER_HEADER_SIZE + CRYPTO_TRAILER_SIZE;
        if container.len() < overhead {
            return Err(CourseError::container(
                format,
                format!(
                    "container is {} bytes, smaller than its {overhead}-byte framing",
                    container.len()
                ),
            ));
        }

        let (header, rest) = container.split_at(CONTAINER_HEADER_SIZE);
        let (body, trailer) = rest.split_at(rest.len() - CRYPTO_TRAILER_SIZE);

        if &header[0x0C..0x10] != CONTAINER_MAGIC {
            return Err(CourseError::container(
                format,
                format!(
                    "bad container magic {:02X?}, expected {:02X?}",
                    &header[0x0C..0x10],
                    CONTAINER_MAGIC
                ),
            ));
        }

        if body.len() % BLOCK_SIZE != 0 {
            return Err(CourseError::container(
                format,
                format!("ciphertext length {} is not a multiple of {BLOCK_SIZE}", body.len()),
            ));
        }

        let expected_crc = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&trailer[..IV_SIZE]);
        let mut seed = [0u8; SEED_SIZE];
        seed.copy_from_slice(&trailer[IV_SIZE..IV_SIZE + SEED_SIZE]);

        trace!("Decrypting {} byte ciphertext", body.len());

        let key = self.keys.derive_key(&seed);
        let mut plaintext = body.to_vec();
        let len = Aes128CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_mut::<NoPadding>(&mut plaintext)
            .map_err(|_| CourseError::container(format, "block decryption failed"))?
            .len();
        plaintext.truncate(len);

        let actual_crc = crc32fast::hash(&plaintext);
        if actual_crc != expected_crc {
            return Err(CourseError::container(
                format,
                format!(
                    "plaintext checksum 0x{actual_crc:08X} does not match header 0x{expected_crc:08X} (wrong key?)"
                ),
            ));
        }

        debug!("Decrypted {} byte container", container.len());
        Ok(plaintext)
    }
}
