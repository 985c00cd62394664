//! The 0x200-byte level header.
//!
//! # Format
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0x00 | 1 | u8 | Start row |
//! | 0x01 | 1 | u8 | Goal row |
//! | 0x02 | 2 | i16 | Goal column |
//! | 0x04 | 2 | i16 | Timer (seconds) |
//! | 0x06 | 2 | i16 | Clear condition magnitude |
//! | 0x08 | 2 | i16 | Year |
//! | 0x0A | 4 | u8 ×4 | Month, day, hour, minute |
//! | 0x0E | 1 | u8 | Autoscroll speed |
//! | 0x0F | 1 | u8 | Clear condition category |
//! | 0x10 | 4 | u32 | Clear condition |
//! | 0x14 | 4 | u32 | Game version flags |
//! | 0x18 | 4 | u32 | Management flags |
//! | 0x1C | 4 | u32 | Clear attempts |
//! | 0x20 | 4 | u32 | Clear time (ms) |
//! | 0x24 | 4 | u32 | Creation id |
//! | 0x28 | 8 | u64 | Upload id |
//! | 0x30 | 4 | u32 | Game version |
//! | 0x34 | 189 | bytes | Reserved |
//! | 0xF1 | 2 | u16 | Game style |
//! | 0xF3 | 1 | u8 | Reserved |
//! | 0xF4 | 66 | UTF-16LE | Name |
//! | 0x136 | 202 | UTF-16LE | Description |

use serde::{Deserialize, Serialize};

use crate::binary::{ByteCursor, ByteWriter};
use crate::enums::{AutoscrollSpeed, ClearCondition, ClearConditionCategory, GameStyle, GameVersion};
use crate::error::{CourseError, Result};
use crate::format::HEADER_SIZE;

/// Size of the reserved block between the scalars and the game style.
pub const HEADER_RESERVED_SIZE: usize = 189;

/// Encoded size of the course name.
pub const NAME_SIZE: usize = 66;

/// Encoded size of the course description.
pub const DESCRIPTION_SIZE: usize = 202;

/// Longest course name, in UTF-16 code units.
pub const NAME_UNITS: usize = NAME_SIZE / 2;

/// Longest course description, in UTF-16 code units.
pub const DESCRIPTION_UNITS: usize = DESCRIPTION_SIZE / 2;

/// Fails with `CapacityExceeded` if `text` needs more than `capacity` UTF-16 code units.
fn check_units(category: &'static str, text: &str, capacity: usize) -> Result<()> {
    let attempted = text.encode_utf16().count();
    if attempted > capacity {
        return Err(CourseError::CapacityExceeded {
            category,
            capacity,
            attempted,
        });
    }
    Ok(())
}

/// Course-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelHeader {
    /// Row the player starts on.
    pub start_y: u8,
    /// Row of the goal.
    pub goal_y: u8,
    /// Column of the goal, in tenths of a tile.
    pub goal_x: i16,
    /// Time limit in seconds.
    pub timer: i16,
    /// The `(n)` of the clear condition.
    pub clear_condition_magnitude: i16,
    /// Creation year.
    pub year: i16,
    /// Creation month.
    pub month: u8,
    /// Creation day.
    pub day: u8,
    /// Creation hour.
    pub hour: u8,
    /// Creation minute.
    pub minute: u8,
    /// Autoscroll speed.
    pub autoscroll_speed: AutoscrollSpeed,
    /// Clear condition category.
    pub clear_condition_category: ClearConditionCategory,
    /// Clear condition.
    pub clear_condition: ClearCondition,
    /// Opaque, preserved.
    pub game_version_flags: u32,
    /// Opaque, preserved.
    pub management_flags: u32,
    /// Number of attempts made by the creator before upload.
    pub clear_attempts: u32,
    /// Creator's clear time in milliseconds.
    pub clear_time: u32,
    /// Creation id.
    pub creation_id: u32,
    /// Upload id.
    pub upload_id: u64,
    /// Game version that last saved the course.
    pub game_version: GameVersion,
    /// Opaque block, preserved verbatim. Serialized as hex.
    #[serde(with = "hex_block")]
    pub reserved: Vec<u8>,
    /// Game style.
    pub game_style: GameStyle,
    /// Opaque, preserved.
    pub reserved_2: u8,
    /// Course name, at most [`NAME_UNITS`] UTF-16 code units.
    #[serde(deserialize_with = "utf16_text::name")]
    pub name: String,
    /// Course description, at most [`DESCRIPTION_UNITS`] UTF-16 code units.
    #[serde(deserialize_with = "utf16_text::description")]
    pub description: String,
}

impl Default for LevelHeader {
    fn default() -> Self {
        LevelHeader {
            start_y: 0,
            goal_y: 0,
            goal_x: 0,
            timer: 300,
            clear_condition_magnitude: 0,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            autoscroll_speed: AutoscrollSpeed::default(),
            clear_condition_category: ClearConditionCategory::default(),
            clear_condition: ClearCondition::NONE,
            game_version_flags: 0,
            management_flags: 0,
            clear_attempts: 0,
            clear_time: 0,
            creation_id: 0,
            upload_id: 0,
            game_version: GameVersion::V301,
            reserved: vec![0; HEADER_RESERVED_SIZE],
            game_style: GameStyle::Smb1,
            reserved_2: 0,
            name: String::new(),
            description: String::new(),
        }
    }
}

impl LevelHeader {
    /// Reads the header scalars, strings and reserved blocks in on-disk order.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 0x200 bytes remain.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();

        let header = LevelHeader {
            start_y: cursor.read_u8()?,
            goal_y: cursor.read_u8()?,
            goal_x: cursor.read_i16()?,
            timer: cursor.read_i16()?,
            clear_condition_magnitude: cursor.read_i16()?,
            year: cursor.read_i16()?,
            month: cursor.read_u8()?,
            day: cursor.read_u8()?,
            hour: cursor.read_u8()?,
            minute: cursor.read_u8()?,
            autoscroll_speed: AutoscrollSpeed::from_code(cursor.read_u8()?),
            clear_condition_category: ClearConditionCategory::from_code(cursor.read_u8()?),
            clear_condition: ClearCondition(cursor.read_u32()?),
            game_version_flags: cursor.read_u32()?,
            management_flags: cursor.read_u32()?,
            clear_attempts: cursor.read_u32()?,
            clear_time: cursor.read_u32()?,
            creation_id: cursor.read_u32()?,
            upload_id: cursor.read_u64()?,
            game_version: GameVersion::from_code(cursor.read_u32()?),
            reserved: cursor.read_bytes(HEADER_RESERVED_SIZE)?.to_vec(),
            game_style: GameStyle::from_code(cursor.read_u16()?),
            reserved_2: cursor.read_u8()?,
            name: cursor.read_fixed_utf16(NAME_SIZE)?,
            description: cursor.read_fixed_utf16(DESCRIPTION_SIZE)?,
        };

        debug_assert_eq!(cursor.position() - start, HEADER_SIZE);
        Ok(header)
    }

    /// Writes exactly 0x200 bytes.
    ///
    /// A `reserved` block of the wrong length is truncated or zero-padded.
    /// Strings that fail [`validate`](Self::validate) are cut before the
    /// first character that does not fit.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.start_y);
        writer.write_u8(self.goal_y);
        writer.write_i16(self.goal_x);
        writer.write_i16(self.timer);
        writer.write_i16(self.clear_condition_magnitude);
        writer.write_i16(self.year);
        writer.write_u8(self.month);
        writer.write_u8(self.day);
        writer.write_u8(self.hour);
        writer.write_u8(self.minute);
        writer.write_u8(self.autoscroll_speed.code());
        writer.write_u8(self.clear_condition_category.code());
        writer.write_u32(self.clear_condition.code());
        writer.write_u32(self.game_version_flags);
        writer.write_u32(self.management_flags);
        writer.write_u32(self.clear_attempts);
        writer.write_u32(self.clear_time);
        writer.write_u32(self.creation_id);
        writer.write_u64(self.upload_id);
        writer.write_u32(self.game_version.code());

        let kept = self.reserved.len().min(HEADER_RESERVED_SIZE);
        writer.write_bytes(&self.reserved[..kept]);
        writer.zeros(HEADER_RESERVED_SIZE - kept);

        writer.write_u16(self.game_style.code());
        writer.write_u8(self.reserved_2);
        writer.write_fixed_utf16(&self.name, NAME_SIZE);
        writer.write_fixed_utf16(&self.description, DESCRIPTION_SIZE);
    }

    /// Replaces the course name.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` if the name needs more than
    /// [`NAME_UNITS`] UTF-16 code units; the header is left unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        check_units("name code units", &name, NAME_UNITS)?;
        self.name = name;
        Ok(())
    }

    /// Replaces the course description.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` if the description needs more
    /// than [`DESCRIPTION_UNITS`] UTF-16 code units; the header is left unchanged.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        let description = description.into();
        check_units("description code units", &description, DESCRIPTION_UNITS)?;
        self.description = description;
        Ok(())
    }

    /// Checks that the name and description fit their fixed-width fields.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` for the first string that is too long.
    pub fn validate(&self) -> Result<()> {
        check_units("name code units", &self.name, NAME_UNITS)?;
        check_units("description code units", &self.description, DESCRIPTION_UNITS)
    }

    /// Returns the clear condition text with its magnitude filled in.
    #[must_use]
    pub fn clear_condition_text(&self) -> String {
        self.clear_condition.describe(self.clear_condition_magnitude)
    }
}

/// Serializes a byte block as a hex string, checking its length on input.
mod hex_block {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::HEADER_RESERVED_SIZE;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(de::Error::custom)?;
        if bytes.len() != HEADER_RESERVED_SIZE {
            return Err(de::Error::invalid_length(
                bytes.len(),
                &"a 189-byte reserved block",
            ));
        }
        Ok(bytes)
    }
}

/// Deserializes header strings, rejecting any that would not fit on disk.
mod utf16_text {
    use serde::{de, Deserialize, Deserializer};

    use super::{check_units, DESCRIPTION_UNITS, NAME_UNITS};

    fn bounded<'de, D: Deserializer<'de>>(
        deserializer: D,
        category: &'static str,
        capacity: usize,
    ) -> Result<String, D::Error> {
        let text = String::deserialize(deserializer)?;
        check_units(category, &text, capacity).map_err(de::Error::custom)?;
        Ok(text)
    }

    pub fn name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        bounded(deserializer, "name code units", NAME_UNITS)
    }

    pub fn description<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        bounded(deserializer, "description code units", DESCRIPTION_UNITS)
    }
}
