//! Fixed-width course records and the slot arrays that hold them.
//!
//! Every record category in an area is stored as an array with a fixed
//! number of slots. Only the first `count` slots are meaningful; the rest are
//! reserved capacity and are skipped on decode and zero-filled on encode.
//!
//! # Format
//!
//! | Record | Size | Layout |
//! |--------|------|--------|
//! | [`LevelObject`] | 32 | x i32, y i32, reserved u16, width u8, height u8, flags u32, child flags u32, extended data u32, kind u16, child kind i16, link id i16, sound id i16 |
//! | [`Sound`] | 4 | kind u8, x u8, y u8, reserved u8 |
//! | [`Ground`] | 4 | x u8, y u8, kind u8, background kind u8 |
//! | [`Track`] | 12 | reserved u16, flags u8, x u8, y u8, kind u8, link id u16, reserved u16 ×2 |
//! | [`Icicle`] | 4 | x u8, y u8, kind u8, reserved u8 |

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::binary::{ByteCursor, ByteWriter};
use crate::enums::{IcicleKind, ObjectKind};
use crate::error::{CourseError, Result};

/// Sub-tile units per tile in object coordinates.
pub const UNITS_PER_TILE: i32 = 160;

/// A record with a fixed on-disk width.
pub trait Record: Debug + Clone + PartialEq + Eq + Serialize + DeserializeOwned {
    /// Plural category name, used in capacity errors.
    const NAME: &'static str;

    /// Exact encoded size in bytes.
    const SIZE: usize;

    /// Reads one record.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if the cursor runs out of data.
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    /// Writes exactly [`Record::SIZE`] bytes.
    fn write(&self, writer: &mut ByteWriter);
}

/// A list of records bounded by a fixed slot capacity.
///
/// A `Slots` value can never hold more than `CAPACITY` entries, so every
/// value is encodable. JSON input is checked on deserialization.
///
/// # Example
///
/// ```
/// use course_codec::level::{Icicle, Slots};
///
/// let mut icicles: Slots<Icicle, 2> = Slots::new();
/// icicles.push(Icicle::default()).unwrap();
/// icicles.push(Icicle::default()).unwrap();
/// assert!(icicles.push(Icicle::default()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots<T: Record, const CAPACITY: usize> {
    entries: Vec<T>,
}

impl<T: Record, const CAPACITY: usize> Slots<T, CAPACITY> {
    /// Number of slots on disk.
    pub const SLOT_COUNT: usize = CAPACITY;

    /// Encoded size of the whole slot array.
    pub const SIZE: usize = CAPACITY * T::SIZE;

    /// Creates an empty slot array.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::CapacityExceeded` if every slot is in use.
    pub fn push(&mut self, entry: T) -> Result<()> {
        if self.entries.len() >= CAPACITY {
            return Err(CourseError::CapacityExceeded {
                category: T::NAME,
                capacity: CAPACITY,
                attempted: self.entries.len() + 1,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Returns the number of entries in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no entries are in use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry count as stored in the area header.
    #[must_use]
    pub fn count(&self) -> u32 {
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    /// Returns the entries in use.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Returns the entries in use for in-place editing.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.entries
    }

    /// Iterates over the entries in use.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reads the full slot array, keeping the first `count` entries.
    ///
    /// All `CAPACITY` slots are consumed regardless of `count`. A count larger
    /// than the capacity is clamped.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if the array is truncated.
    pub fn read(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Self> {
        let kept = usize::try_from(count).map_or(CAPACITY, |count| count.min(CAPACITY));
        if kept < usize::try_from(count).unwrap_or(usize::MAX) {
            warn!(
                "{} count {count} exceeds capacity {CAPACITY}, clamping",
                T::NAME
            );
        }

        let mut entries = Vec::with_capacity(kept);
        for _ in 0..kept {
            entries.push(T::read(cursor)?);
        }
        cursor.skip((CAPACITY - kept) * T::SIZE)?;

        Ok(Self { entries })
    }

    /// Writes every entry, then zero-fills the unused slots.
    pub fn write(&self, writer: &mut ByteWriter) {
        for entry in &self.entries {
            entry.write(writer);
        }
        writer.zeros((CAPACITY - self.entries.len()) * T::SIZE);
    }
}

impl<T: Record, const CAPACITY: usize> Default for Slots<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record, const CAPACITY: usize> TryFrom<Vec<T>> for Slots<T, CAPACITY> {
    type Error = CourseError;

    fn try_from(entries: Vec<T>) -> Result<Self> {
        if entries.len() > CAPACITY {
            return Err(CourseError::CapacityExceeded {
                category: T::NAME,
                capacity: CAPACITY,
                attempted: entries.len(),
            });
        }
        Ok(Self { entries })
    }
}

impl<T: Record, const CAPACITY: usize> From<Slots<T, CAPACITY>> for Vec<T> {
    fn from(slots: Slots<T, CAPACITY>) -> Self {
        slots.entries
    }
}

impl<'a, T: Record, const CAPACITY: usize> IntoIterator for &'a Slots<T, CAPACITY> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: Record, const CAPACITY: usize> Serialize for Slots<T, CAPACITY> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Record, const CAPACITY: usize> Deserialize<'de> for Slots<T, CAPACITY> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Vec::<T>::deserialize(deserializer)?;
        Self::try_from(entries).map_err(serde::de::Error::custom)
    }
}

/// A placed object.
///
/// Positions are in sub-tile units: 160 per tile, measured to the object's
/// centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelObject {
    /// Horizontal position in sub-tile units.
    pub x: i32,
    /// Vertical position in sub-tile units.
    pub y: i32,
    /// Opaque, preserved.
    pub reserved: u16,
    /// Width in tiles.
    pub width: u8,
    /// Height in tiles.
    pub height: u8,
    /// Object flags (wings, direction, size, ...).
    pub flags: u32,
    /// Flags of the child object.
    pub child_flags: u32,
    /// Extra kind-specific data.
    pub extended_data: u32,
    /// Object kind.
    pub kind: ObjectKind,
    /// Raw kind code of the child object, or -1.
    pub child_kind: i16,
    /// Link to a track, pipe or other object.
    pub link_id: i16,
    /// Attached sound effect.
    pub sound_id: i16,
}

impl LevelObject {
    /// Returns the tile holding the object's lower-left corner.
    ///
    /// Positions are shifted back by half a tile before flooring, so a
    /// one-tile object at `(80, 80)` sits on tile `(0, 0)`.
    #[must_use]
    pub fn tile_origin(&self) -> (i64, i64) {
        let unit = i64::from(UNITS_PER_TILE);
        (
            (i64::from(self.x) - unit / 2).div_euclid(unit),
            (i64::from(self.y) - unit / 2).div_euclid(unit),
        )
    }
}

impl Record for LevelObject {
    const NAME: &'static str = "objects";
    const SIZE: usize = 32;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(LevelObject {
            x: cursor.read_i32()?,
            y: cursor.read_i32()?,
            reserved: cursor.read_u16()?,
            width: cursor.read_u8()?,
            height: cursor.read_u8()?,
            flags: cursor.read_u32()?,
            child_flags: cursor.read_u32()?,
            extended_data: cursor.read_u32()?,
            kind: ObjectKind::from_code(cursor.read_u16()?),
            child_kind: cursor.read_i16()?,
            link_id: cursor.read_i16()?,
            sound_id: cursor.read_i16()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.x);
        writer.write_i32(self.y);
        writer.write_u16(self.reserved);
        writer.write_u8(self.width);
        writer.write_u8(self.height);
        writer.write_u32(self.flags);
        writer.write_u32(self.child_flags);
        writer.write_u32(self.extended_data);
        writer.write_u16(self.kind.code());
        writer.write_i16(self.child_kind);
        writer.write_i16(self.link_id);
        writer.write_i16(self.sound_id);
    }
}

/// A placed sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sound {
    /// Sound effect code.
    pub kind: u8,
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
    /// Opaque, preserved.
    pub reserved: u8,
}

impl Record for Sound {
    const NAME: &'static str = "sounds";
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let [kind, x, y, reserved] = cursor.read_array()?;
        Ok(Sound { kind, x, y, reserved })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&[self.kind, self.x, self.y, self.reserved]);
    }
}

/// A ground tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ground {
    /// Column.
    pub x: u8,
    /// Row, counted from the bottom.
    pub y: u8,
    /// Tile variant.
    pub kind: u8,
    /// Background variant.
    pub background_kind: u8,
}

impl Record for Ground {
    const NAME: &'static str = "ground tiles";
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let [x, y, kind, background_kind] = cursor.read_array()?;
        Ok(Ground {
            x,
            y,
            kind,
            background_kind,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&[self.x, self.y, self.kind, self.background_kind]);
    }
}

/// A track segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    /// Opaque, preserved.
    pub reserved: u16,
    /// Track flags.
    pub flags: u8,
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
    /// Segment shape.
    pub kind: u8,
    /// Link to the object riding this track.
    pub link_id: u16,
    /// Opaque, preserved.
    pub reserved_2: u16,
    /// Opaque, preserved.
    pub reserved_3: u16,
}

impl Record for Track {
    const NAME: &'static str = "tracks";
    const SIZE: usize = 12;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Track {
            reserved: cursor.read_u16()?,
            flags: cursor.read_u8()?,
            x: cursor.read_u8()?,
            y: cursor.read_u8()?,
            kind: cursor.read_u8()?,
            link_id: cursor.read_u16()?,
            reserved_2: cursor.read_u16()?,
            reserved_3: cursor.read_u16()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.reserved);
        writer.write_u8(self.flags);
        writer.write_u8(self.x);
        writer.write_u8(self.y);
        writer.write_u8(self.kind);
        writer.write_u16(self.link_id);
        writer.write_u16(self.reserved_2);
        writer.write_u16(self.reserved_3);
    }
}

/// An icicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Icicle {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
    /// Falling or fixed.
    pub kind: IcicleKind,
    /// Opaque, preserved.
    pub reserved: u8,
}

impl Record for Icicle {
    const NAME: &'static str = "icicles";
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let [x, y, kind, reserved] = cursor.read_array()?;
        Ok(Icicle {
            x,
            y,
            kind: IcicleKind::from_code(kind),
            reserved,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&[self.x, self.y, self.kind.code(), self.reserved]);
    }
}
