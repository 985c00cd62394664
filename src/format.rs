//! Container shapes and fixed layout constants for course files.
//!
//! A course travels in one of three container shapes. None of them carries
//! a self-describing header that distinguishes it from the others, so the
//! shape is chosen by where the bytes came from:
//!
//! - **BCD**: `cipher(plaintext)`, a freshly downloaded course
//! - **ZCD**: `deflate_raw(cipher(plaintext))`, an archived course
//! - **Zlib**: `zlib(plaintext)`, a database-stored course
//!
//! Inside every container is the same fixed-size plaintext: a 0x200-byte
//! header followed by two 0x2DEE0-byte areas.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use course_codec::format::{ContainerFormat, PLAINTEXT_SIZE};
//!
//! assert_eq!(
//!     ContainerFormat::from_path(Path::new("course_data_000.bcd")),
//!     Some(ContainerFormat::Bcd)
//! );
//! assert_eq!("zcd".parse::<ContainerFormat>().unwrap(), ContainerFormat::Zcd);
//! assert_eq!(PLAINTEXT_SIZE, 0x5BFC0);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Size of the level header in the plaintext.
pub const HEADER_SIZE: usize = 0x200;

/// Size of one area (header, slot arrays and trailing pad) in the plaintext.
pub const AREA_SIZE: usize = 0x2DEE0;

/// Size of a complete decrypted, decompressed course buffer.
pub const PLAINTEXT_SIZE: usize = HEADER_SIZE + 2 * AREA_SIZE;

/// Size of the clear header in front of the ciphertext of a BCD container.
pub const CONTAINER_HEADER_SIZE: usize = 0x10;

/// Size of the crypto trailer (IV, key seed, MAC) behind the ciphertext.
pub const CRYPTO_TRAILER_SIZE: usize = 0x30;

/// Size of a BCD container holding a full course.
pub const ENCRYPTED_CONTAINER_SIZE: usize =
    CONTAINER_HEADER_SIZE + PLAINTEXT_SIZE + CRYPTO_TRAILER_SIZE;

/// Magic bytes at offset 0x0C of a BCD container header.
pub const CONTAINER_MAGIC: &[u8; 4] = b"SCDL";

/// Container version written by this crate.
pub const CONTAINER_VERSION: u32 = 1;

/// The three ways course plaintext is wrapped for storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    /// Encrypted only, as served by the remote API.
    Bcd,

    /// Encrypted, then compressed with raw (headerless) DEFLATE.
    Zcd,

    /// Zlib-wrapped DEFLATE with no encryption, as kept in the database.
    Zlib,
}

impl ContainerFormat {
    /// All container shapes.
    pub const ALL: [ContainerFormat; 3] = [
        ContainerFormat::Bcd,
        ContainerFormat::Zcd,
        ContainerFormat::Zlib,
    ];

    /// Returns the conventional file extension for this shape.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            ContainerFormat::Bcd => "bcd",
            ContainerFormat::Zcd => "zcd",
            ContainerFormat::Zlib => "zlib",
        }
    }

    /// Returns whether opening this shape requires the course key.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        matches!(self, ContainerFormat::Bcd | ContainerFormat::Zcd)
    }

    /// Chooses a shape from a file's extension (case-insensitive).
    ///
    /// Returns `None` for unrecognized or missing extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerFormat::Bcd => "BCD",
            ContainerFormat::Zcd => "ZCD",
            ContainerFormat::Zlib => "zlib",
        })
    }
}

impl FromStr for ContainerFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bcd" => Ok(ContainerFormat::Bcd),
            "zcd" => Ok(ContainerFormat::Zcd),
            "zlib" | "zz" => Ok(ContainerFormat::Zlib),
            other => Err(format!(
                "unknown container format '{other}' (expected bcd, zcd or zlib)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(HEADER_SIZE, 512);
        assert_eq!(AREA_SIZE, 188_128);
        assert_eq!(PLAINTEXT_SIZE, 376_768);
        assert_eq!(PLAINTEXT_SIZE % 16, 0);
        assert_eq!(ENCRYPTED_CONTAINER_SIZE, 0x5C000);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ContainerFormat::from_path(Path::new("a/b/course.BCD")),
            Some(ContainerFormat::Bcd)
        );
        assert_eq!(
            ContainerFormat::from_path(Path::new("course.zcd")),
            Some(ContainerFormat::Zcd)
        );
        assert_eq!(
            ContainerFormat::from_path(Path::new("course.zlib")),
            Some(ContainerFormat::Zlib)
        );
        assert_eq!(ContainerFormat::from_path(Path::new("course.png")), None);
        assert_eq!(ContainerFormat::from_path(Path::new("course")), None);
    }

    #[test]
    fn test_extension_round_trips_through_from_str() {
        for format in ContainerFormat::ALL {
            assert_eq!(format.extension().parse::<ContainerFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "sav".parse::<ContainerFormat>().unwrap_err();
        assert!(err.contains("sav"));
    }

    #[test]
    fn test_is_encrypted() {
        assert!(ContainerFormat::Bcd.is_encrypted());
        assert!(ContainerFormat::Zcd.is_encrypted());
        assert!(!ContainerFormat::Zlib.is_encrypted());
    }

    #[test]
    fn test_display() {
        assert_eq!(ContainerFormat::Bcd.to_string(), "BCD");
        assert_eq!(ContainerFormat::Zlib.to_string(), "zlib");
    }
}
