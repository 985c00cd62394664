//! One playable area (overworld or subworld).
//!
//! # Format
//!
//! An area is a 72-byte header followed by ten fixed-capacity slot arrays
//! and a trailing pad, 0x2DEE0 bytes in total.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 8 | theme, autoscroll type, boundary type, orientation, liquid max height, liquid mode, liquid speed, liquid min height (u8 each) |
//! | 0x08 | 16 | boundary right, top, left, bottom (i32 each) |
//! | 0x18 | 4 | flags (u32) |
//! | 0x1C | 28 | object, sound, snake block, clear pipe, piranha creeper, exclamation block, track block counts (u32 each) |
//! | 0x38 | 4 | reserved (u32) |
//! | 0x3C | 12 | ground, track, icicle counts (u32 each) |
//! | 0x48 | | slot arrays, in the same order as the counts |

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::nodes::{ClearPipe, ExclamationBlock, PiranhaCreeper, SnakeBlock, TrackBlock};
use super::records::{Ground, Icicle, LevelObject, Record, Slots, Sound, Track};
use crate::binary::{ByteCursor, ByteWriter};
use crate::enums::{AutoscrollType, BoundaryType, LiquidMode, LiquidSpeed, Orientation, Theme};
use crate::error::Result;
use crate::format::AREA_SIZE;

/// Size of the area header.
pub const AREA_HEADER_SIZE: usize = 0x48;

/// Zero bytes after the last slot array.
pub const AREA_PAD_SIZE: usize = 3516;

/// Object slots per area.
pub const OBJECT_CAPACITY: usize = 2600;
/// Sound slots per area.
pub const SOUND_CAPACITY: usize = 300;
/// Snake block slots per area.
pub const SNAKE_BLOCK_CAPACITY: usize = 5;
/// Clear pipe slots per area.
pub const CLEAR_PIPE_CAPACITY: usize = 200;
/// Piranha creeper slots per area.
pub const PIRANHA_CREEPER_CAPACITY: usize = 10;
/// Exclamation block slots per area.
pub const EXCLAMATION_BLOCK_CAPACITY: usize = 10;
/// Track block slots per area.
pub const TRACK_BLOCK_CAPACITY: usize = 10;
/// Ground tile slots per area.
pub const GROUND_CAPACITY: usize = 4000;
/// Track slots per area.
pub const TRACK_CAPACITY: usize = 1500;
/// Icicle slots per area.
pub const ICICLE_CAPACITY: usize = 300;

/// A playable area: settings, boundaries and every placed record.
///
/// Record counts are not stored separately; each is the length of its
/// slot array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Area {
    /// Visual theme.
    pub theme: Theme,
    /// Autoscroll mode.
    pub autoscroll_type: AutoscrollType,
    /// Which side of the boundary line the area is built on.
    pub boundary_type: BoundaryType,
    /// Scrolling direction.
    pub orientation: Orientation,
    /// Highest liquid level.
    pub liquid_max_height: u8,
    /// Liquid movement.
    pub liquid_mode: LiquidMode,
    /// Liquid speed.
    pub liquid_speed: LiquidSpeed,
    /// Lowest liquid level.
    pub liquid_min_height: u8,
    /// Right edge, in pixels (16 per tile).
    pub boundary_right: i32,
    /// Top edge, in pixels (16 per tile).
    pub boundary_top: i32,
    /// Left edge, in pixels.
    pub boundary_left: i32,
    /// Bottom edge, in pixels.
    pub boundary_bottom: i32,
    /// Area flags, opaque and preserved.
    pub flags: u32,
    /// Opaque header word between the counts, preserved.
    pub reserved: u32,
    /// Placed objects.
    pub objects: Slots<LevelObject, OBJECT_CAPACITY>,
    /// Placed sound effects.
    pub sounds: Slots<Sound, SOUND_CAPACITY>,
    /// Snake blocks.
    pub snake_blocks: Slots<SnakeBlock, SNAKE_BLOCK_CAPACITY>,
    /// Clear pipes.
    pub clear_pipes: Slots<ClearPipe, CLEAR_PIPE_CAPACITY>,
    /// Piranha creepers.
    pub piranha_creepers: Slots<PiranhaCreeper, PIRANHA_CREEPER_CAPACITY>,
    /// Exclamation blocks.
    pub exclamation_blocks: Slots<ExclamationBlock, EXCLAMATION_BLOCK_CAPACITY>,
    /// Track blocks.
    pub track_blocks: Slots<TrackBlock, TRACK_BLOCK_CAPACITY>,
    /// Ground tiles.
    pub ground: Slots<Ground, GROUND_CAPACITY>,
    /// Track segments.
    pub tracks: Slots<Track, TRACK_CAPACITY>,
    /// Icicles.
    pub icicles: Slots<Icicle, ICICLE_CAPACITY>,
}

/// Record counts from an area header, in on-disk order.
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    objects: u32,
    sounds: u32,
    snake_blocks: u32,
    clear_pipes: u32,
    piranha_creepers: u32,
    exclamation_blocks: u32,
    track_blocks: u32,
    ground: u32,
    tracks: u32,
    icicles: u32,
}

impl Area {
    /// Reads one complete area, including its trailing pad.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::BufferUnderrun` if fewer than 0x2DEE0 bytes remain.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();

        let [
            theme,
            autoscroll_type,
            boundary_type,
            orientation,
            liquid_max_height,
            liquid_mode,
            liquid_speed,
            liquid_min_height,
        ] = cursor.read_array()?;
        let boundary_right = cursor.read_i32()?;
        let boundary_top = cursor.read_i32()?;
        let boundary_left = cursor.read_i32()?;
        let boundary_bottom = cursor.read_i32()?;
        let flags = cursor.read_u32()?;

        let mut counts = Counts {
            objects: cursor.read_u32()?,
            sounds: cursor.read_u32()?,
            snake_blocks: cursor.read_u32()?,
            clear_pipes: cursor.read_u32()?,
            piranha_creepers: cursor.read_u32()?,
            exclamation_blocks: cursor.read_u32()?,
            track_blocks: cursor.read_u32()?,
            ..Counts::default()
        };
        let reserved = cursor.read_u32()?;
        counts.ground = cursor.read_u32()?;
        counts.tracks = cursor.read_u32()?;
        counts.icicles = cursor.read_u32()?;
        trace!("Area counts at offset {start}: {counts:?}");

        let area = Area {
            theme: Theme::from_code(theme),
            autoscroll_type: AutoscrollType::from_code(autoscroll_type),
            boundary_type: BoundaryType::from_code(boundary_type),
            orientation: Orientation::from_code(orientation),
            liquid_max_height,
            liquid_mode: LiquidMode::from_code(liquid_mode),
            liquid_speed: LiquidSpeed::from_code(liquid_speed),
            liquid_min_height,
            boundary_right,
            boundary_top,
            boundary_left,
            boundary_bottom,
            flags,
            reserved,
            objects: Slots::read(cursor, counts.objects)?,
            sounds: Slots::read(cursor, counts.sounds)?,
            snake_blocks: Slots::read(cursor, counts.snake_blocks)?,
            clear_pipes: Slots::read(cursor, counts.clear_pipes)?,
            piranha_creepers: Slots::read(cursor, counts.piranha_creepers)?,
            exclamation_blocks: Slots::read(cursor, counts.exclamation_blocks)?,
            track_blocks: Slots::read(cursor, counts.track_blocks)?,
            ground: Slots::read(cursor, counts.ground)?,
            tracks: Slots::read(cursor, counts.tracks)?,
            icicles: Slots::read(cursor, counts.icicles)?,
        };
        cursor.skip(AREA_PAD_SIZE)?;

        debug_assert_eq!(cursor.position() - start, AREA_SIZE);
        Ok(area)
    }

    /// Writes exactly 0x2DEE0 bytes.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&[
            self.theme.code(),
            self.autoscroll_type.code(),
            self.boundary_type.code(),
            self.orientation.code(),
            self.liquid_max_height,
            self.liquid_mode.code(),
            self.liquid_speed.code(),
            self.liquid_min_height,
        ]);
        writer.write_i32(self.boundary_right);
        writer.write_i32(self.boundary_top);
        writer.write_i32(self.boundary_left);
        writer.write_i32(self.boundary_bottom);
        writer.write_u32(self.flags);

        writer.write_u32(self.objects.count());
        writer.write_u32(self.sounds.count());
        writer.write_u32(self.snake_blocks.count());
        writer.write_u32(self.clear_pipes.count());
        writer.write_u32(self.piranha_creepers.count());
        writer.write_u32(self.exclamation_blocks.count());
        writer.write_u32(self.track_blocks.count());
        writer.write_u32(self.reserved);
        writer.write_u32(self.ground.count());
        writer.write_u32(self.tracks.count());
        writer.write_u32(self.icicles.count());

        self.objects.write(writer);
        self.sounds.write(writer);
        self.snake_blocks.write(writer);
        self.clear_pipes.write(writer);
        self.piranha_creepers.write(writer);
        self.exclamation_blocks.write(writer);
        self.track_blocks.write(writer);
        self.ground.write(writer);
        self.tracks.write(writer);
        self.icicles.write(writer);
        writer.zeros(AREA_PAD_SIZE);
    }

    /// Returns the area width in tiles, or 0 for a non-positive boundary.
    #[must_use]
    pub fn width_tiles(&self) -> u32 {
        tiles(self.boundary_right)
    }

    /// Returns the area height in tiles, or 0 for a non-positive boundary.
    #[must_use]
    pub fn height_tiles(&self) -> u32 {
        tiles(self.boundary_top)
    }

    /// Returns whether the area holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
            && self.sounds.is_empty()
            && self.snake_blocks.is_empty()
            && self.clear_pipes.is_empty()
            && self.piranha_creepers.is_empty()
            && self.exclamation_blocks.is_empty()
            && self.track_blocks.is_empty()
            && self.ground.is_empty()
            && self.tracks.is_empty()
            && self.icicles.is_empty()
    }
}

/// Pixels per tile in area boundaries.
const PIXELS_PER_TILE: i32 = 16;

fn tiles(boundary: i32) -> u32 {
    u32::try_from(boundary / PIXELS_PER_TILE).unwrap_or(0)
}

/// Sum of every slot array, for layout checks.
const fn slot_arrays_size() -> usize {
    OBJECT_CAPACITY * LevelObject::SIZE
        + SOUND_CAPACITY * Sound::SIZE
        + SNAKE_BLOCK_CAPACITY * SnakeBlock::SIZE
        + CLEAR_PIPE_CAPACITY * ClearPipe::SIZE
        + PIRANHA_CREEPER_CAPACITY * PiranhaCreeper::SIZE
        + EXCLAMATION_BLOCK_CAPACITY * ExclamationBlock::SIZE
        + TRACK_BLOCK_CAPACITY * TrackBlock::SIZE
        + GROUND_CAPACITY * Ground::SIZE
        + TRACK_CAPACITY * Track::SIZE
        + ICICLE_CAPACITY * Icicle::SIZE
}

const _: () = assert!(AREA_HEADER_SIZE + slot_arrays_size() + AREA_PAD_SIZE == AREA_SIZE);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ObjectKind;
    use crate::level::nodes::SnakeNode;

    fn encode(area: &Area) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(AREA_SIZE);
        area.write(&mut writer);
        writer.into_inner()
    }

    fn sample() -> Area {
        let mut area = Area {
            theme: Theme::Castle,
            orientation: Orientation::Vertical,
            liquid_mode: LiquidMode::RisingAndFalling,
            liquid_max_height: 12,
            boundary_right: 3840,
            boundary_top: 432,
            boundary_bottom: -16,
            flags: 0x0000_0100,
            reserved: 0xCAFE,
            ..Area::default()
        };
        area.objects
            .push(LevelObject {
                x: 880,
                y: 240,
                width: 1,
                height: 1,
                kind: ObjectKind::Goomba,
                ..LevelObject::default()
            })
            .unwrap();
        area.ground
            .push(Ground {
                x: 3,
                y: 0,
                kind: 1,
                background_kind: 0,
            })
            .unwrap();
        let mut snake = SnakeBlock::new(0);
        snake
            .nodes
            .push(SnakeNode {
                index: 0,
                direction: 2,
                reserved: 0,
            })
            .unwrap();
        area.snake_blocks.push(snake).unwrap();
        area
    }

    #[test]
    fn test_encoded_size() {
        assert_eq!(encode(&Area::default()).len(), AREA_SIZE);
        assert_eq!(encode(&sample()).len(), AREA_SIZE);
    }

    #[test]
    fn test_round_trip() {
        let bytes = encode(&sample());
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(Area::read(&mut cursor).unwrap(), sample());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_header_offsets() {
        let bytes = encode(&sample());

        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[3], 1);
        assert_eq!(&bytes[0x08..0x0C], &3840i32.to_le_bytes());
        assert_eq!(&bytes[0x14..0x18], &(-16i32).to_le_bytes());
        assert_eq!(&bytes[0x1C..0x20], &1u32.to_le_bytes());
        assert_eq!(&bytes[0x24..0x28], &1u32.to_le_bytes());
        assert_eq!(&bytes[0x38..0x3C], &0xCAFEu32.to_le_bytes());
        assert_eq!(&bytes[0x3C..0x40], &1u32.to_le_bytes());
    }

    #[test]
    fn test_zero_count_still_consumes_slots() {
        let mut bytes = encode(&Area::default());
        bytes.extend_from_slice(&[0xEE; 4]);

        let mut cursor = ByteCursor::new(&bytes);
        let area = Area::read(&mut cursor).unwrap();
        assert!(area.is_empty());
        assert_eq!(cursor.position(), AREA_SIZE);
    }

    #[test]
    fn test_garbage_beyond_count_is_discarded() {
        let mut bytes = encode(&sample());
        let second_object = AREA_HEADER_SIZE + LevelObject::SIZE;
        bytes[second_object..second_object + 4].copy_from_slice(&[0xFF; 4]);

        let area = Area::read(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(area.objects.len(), 1);
    }

    #[test]
    fn test_dimensions() {
        let area = sample();
        assert_eq!(area.width_tiles(), 240);
        assert_eq!(area.height_tiles(), 27);

        let flat = Area {
            boundary_right: -32,
            ..Area::default()
        };
        assert_eq!(flat.width_tiles(), 0);
        assert_eq!(flat.height_tiles(), 0);
    }

    #[test]
    fn test_truncated_area() {
        let bytes = encode(&sample());
        let result = Area::read(&mut ByteCursor::new(&bytes[..AREA_SIZE - 1]));
        assert!(result.unwrap_err().is_underrun());
    }
}
