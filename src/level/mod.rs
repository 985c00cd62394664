//! Typed course documents and their fixed-layout binary codec.
//!
//! A decrypted, decompressed course is exactly 0x5BFC0 bytes:
//!
//! | Offset | Size | Section |
//! |--------|------|---------|
//! | 0x00000 | 0x00200 | [`LevelHeader`] |
//! | 0x00200 | 0x2DEE0 | overworld [`Area`] |
//! | 0x2E0E0 | 0x2DEE0 | subworld [`Area`] |
//!
//! [`decode`] and [`encode`] convert between that buffer and a [`Level`].
//! Decoding is strict: any short read fails the whole decode with a
//! `LevelDecodeError` naming the section, and no partial level is returned.
//!
//! # Example
//!
//! ```
//! use course_codec::enums::Theme;
//! use course_codec::format::PLAINTEXT_SIZE;
//! use course_codec::level::{self, Level};
//!
//! let mut course = Level::default();
//! course.header.name = "Castle Dash".to_string();
//! course.overworld.theme = Theme::Castle;
//!
//! let bytes = level::encode(&course);
//! assert_eq!(bytes.len(), PLAINTEXT_SIZE);
//! assert_eq!(level::decode(&bytes).unwrap(), course);
//! ```

pub mod area;
pub mod header;
pub mod nodes;
pub mod records;

pub use area::Area;
pub use header::LevelHeader;
pub use nodes::{
    ClearPipe, ClearPipeNode, ExclamationBlock, GroupKind, GroupLayout, NodeGroup, PathNode,
    PiranhaCreeper, SnakeBlock, SnakeNode, TrackBlock,
};
pub use records::{Ground, Icicle, LevelObject, Record, Slots, Sound, Track};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binary::{ByteCursor, ByteWriter};
use crate::container::ContainerCodec;
use crate::error::Result;
use crate::format::{ContainerFormat, PLAINTEXT_SIZE};

/// A complete course: header plus overworld and subworld.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Level {
    /// Course-wide metadata.
    pub header: LevelHeader,
    /// The main area.
    pub overworld: Area,
    /// The area reached through pipes and doors.
    pub subworld: Area,
}

impl Level {
    /// Decodes a plaintext course buffer. See [`decode`].
    ///
    /// # Errors
    ///
    /// Returns `CourseError::LevelDecodeError` if the buffer is too short.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode(data)
    }

    /// Encodes this course to plaintext. See [`encode`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode(self)
    }

    /// Opens a container and decodes the course inside it.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::ContainerDecodeError` if the container cannot be
    /// opened, or `CourseError::LevelDecodeError` if its plaintext is short.
    pub fn from_container(
        data: &[u8],
        format: ContainerFormat,
        codec: &ContainerCodec,
    ) -> Result<Self> {
        let plaintext = codec.open(data, format)?;
        decode(&plaintext)
    }

    /// Encodes the course and seals it in a container.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` if the header strings do not
    /// fit, or `CourseError::ContainerDecodeError` if the container cannot be
    /// sealed (for example, an encrypted shape without a key).
    pub fn to_container(&self, format: ContainerFormat, codec: &ContainerCodec) -> Result<Vec<u8>> {
        self.validate()?;
        codec.seal(&encode(self), format)
    }

    /// Checks that every field fits the fixed layout without truncation.
    ///
    /// Slot lists are capacity-checked on insertion, so only the header
    /// strings can still be too long.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` if the name or description is too long.
    pub fn validate(&self) -> Result<()> {
        self.header.validate()
    }

    /// Returns both areas with their names.
    #[must_use]
    pub fn areas(&self) -> [(&'static str, &Area); 2] {
        [("overworld", &self.overworld), ("subworld", &self.subworld)]
    }
}

/// Decodes a plaintext course buffer into a [`Level`].
///
/// Bytes beyond the fixed plaintext size are ignored with a warning.
///
/// # Errors
///
/// Returns `CourseError::LevelDecodeError` wrapping the `BufferUnderrun`
/// of whichever section ran out of data.
pub fn decode(data: &[u8]) -> Result<Level> {
    debug!("Decoding {} byte course", data.len());
    if data.len() > PLAINTEXT_SIZE {
        warn!(
            "Ignoring {} trailing bytes after course data",
            data.len() - PLAINTEXT_SIZE
        );
    }

    let mut cursor = ByteCursor::new(data);
    let header = LevelHeader::read(&mut cursor).map_err(|e| e.in_section("header"))?;
    let overworld = Area::read(&mut cursor).map_err(|e| e.in_section("overworld"))?;
    let subworld = Area::read(&mut cursor).map_err(|e| e.in_section("subworld"))?;

    debug!(
        "Decoded '{}': {} + {} objects",
        header.name,
        overworld.objects.len(),
        subworld.objects.len()
    );

    Ok(Level {
        header,
        overworld,
        subworld,
    })
}

/// Encodes a [`Level`] to exactly `PLAINTEXT_SIZE` bytes.
///
/// Unused slots and the area pads are zero-filled.
#[must_use]
pub fn encode(level: &Level) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(PLAINTEXT_SIZE);
    level.header.write(&mut writer);
    level.overworld.write(&mut writer);
    level.subworld.write(&mut writer);

    debug_assert_eq!(writer.len(), PLAINTEXT_SIZE);
    writer.into_inner()
}
