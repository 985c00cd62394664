//! Node-bearing records: snake blocks, clear pipes, piranha creepers,
//! exclamation blocks and track blocks.
//!
//! All five share one shape: a 4-byte group header holding the group index,
//! the node count and two reserved bytes, followed by a fixed-capacity node
//! array truncated by the node count. Only the byte order of the header
//! differs:
//!
//! | Layout | Header bytes | Used by |
//! |--------|--------------|---------|
//! | [`GroupLayout::IndexLeading`] | index, count, reserved, reserved | snake blocks, clear pipes |
//! | [`GroupLayout::ReservedLeading`] | reserved, index, count, reserved | piranha creepers, exclamation blocks, track blocks |
//!
//! [`NodeGroup`] is generic over a [`GroupKind`] marker that fixes the node
//! type, the header layout and the category name, and over the node
//! capacity.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::records::{Record, Slots};
use crate::binary::{ByteCursor, ByteWriter};
use crate::error::Result;

/// Byte order of a node group header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLayout {
    /// `[index, count, reserved, reserved]`
    IndexLeading,
    /// `[reserved, index, count, reserved]`
    ReservedLeading,
}

/// Static description of one node group category.
pub trait GroupKind: std::fmt::Debug + Clone + Copy + PartialEq + Eq + Default {
    /// Plural category name, used in capacity errors.
    const NAME: &'static str;

    /// Header byte order.
    const LAYOUT: GroupLayout;

    /// Node record type.
    type Node: Record;
}

/// A group of nodes forming one snake block path, clear pipe, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct NodeGroup<K: GroupKind, const NODES: usize> {
    /// Group index within its category.
    pub index: u8,
    /// First reserved header byte, preserved.
    pub reserved: u8,
    /// Second reserved header byte, preserved.
    pub reserved_2: u8,
    /// Nodes in use.
    pub nodes: Slots<K::Node, NODES>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: GroupKind, const NODES: usize> Default for NodeGroup<K, NODES> {
    fn default() -> Self {
        Self {
            index: 0,
            reserved: 0,
            reserved_2: 0,
            nodes: Slots::default(),
            kind: PhantomData,
        }
    }
}

impl<K: GroupKind, const NODES: usize> NodeGroup<K, NODES> {
    /// Creates an empty group with the given index.
    #[must_use]
    pub fn new(index: u8) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

impl<K: GroupKind, const NODES: usize> Record for NodeGroup<K, NODES> {
    const NAME: &'static str = K::NAME;
    const SIZE: usize = 4 + NODES * <K::Node as Record>::SIZE;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let header: [u8; 4] = cursor.read_array()?;
        let (index, count, reserved, reserved_2) = match K::LAYOUT {
            GroupLayout::IndexLeading => (header[0], header[1], header[2], header[3]),
            GroupLayout::ReservedLeading => (header[1], header[2], header[0], header[3]),
        };

        Ok(Self {
            index,
            reserved,
            reserved_2,
            nodes: Slots::read(cursor, u32::from(count))?,
            kind: PhantomData,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        // Node capacities are at most 120, so the count always fits a byte.
        let count = u8::try_from(self.nodes.len()).unwrap_or(u8::MAX);
        let header = match K::LAYOUT {
            GroupLayout::IndexLeading => [self.index, count, self.reserved, self.reserved_2],
            GroupLayout::ReservedLeading => [self.reserved, self.index, count, self.reserved_2],
        };
        writer.write_bytes(&header);
        self.nodes.write(writer);
    }
}

/// One segment of a snake block path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnakeNode {
    /// Node index.
    pub index: u16,
    /// Travel direction.
    pub direction: u16,
    /// Opaque, preserved.
    pub reserved: u32,
}

impl Record for SnakeNode {
    const NAME: &'static str = "snake block nodes";
    const SIZE: usize = 8;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(SnakeNode {
            index: cursor.read_u16()?,
            direction: cursor.read_u16()?,
            reserved: cursor.read_u32()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.index);
        writer.write_u16(self.direction);
        writer.write_u32(self.reserved);
    }
}

/// One straight section of a clear pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearPipeNode {
    /// Section kind.
    pub kind: u8,
    /// Node index.
    pub index: u8,
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
    /// Width in tiles.
    pub width: u8,
    /// Height in tiles.
    pub height: u8,
    /// Opaque, preserved.
    pub reserved: u8,
    /// Flow direction.
    pub direction: u8,
}

impl Record for ClearPipeNode {
    const NAME: &'static str = "clear pipe nodes";
    const SIZE: usize = 8;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let [kind, index, x, y, width, height, reserved, direction] = cursor.read_array()?;
        Ok(ClearPipeNode {
            kind,
            index,
            x,
            y,
            width,
            height,
            reserved,
            direction,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&[
            self.kind,
            self.index,
            self.x,
            self.y,
            self.width,
            self.height,
            self.reserved,
            self.direction,
        ]);
    }
}

/// One step of a piranha creeper, exclamation block or track block path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathNode {
    /// Opaque, preserved.
    pub reserved: u8,
    /// Step direction.
    pub direction: u8,
    /// Opaque, preserved.
    pub reserved_2: u16,
}

impl Record for PathNode {
    const NAME: &'static str = "path nodes";
    const SIZE: usize = 4;

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(PathNode {
            reserved: cursor.read_u8()?,
            direction: cursor.read_u8()?,
            reserved_2: cursor.read_u16()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.reserved);
        writer.write_u8(self.direction);
        writer.write_u16(self.reserved_2);
    }
}

macro_rules! group_kinds {
    ($($(#[$meta:meta])* $marker:ident => $name:literal, $layout:ident, $node:ty;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $marker;

            impl GroupKind for $marker {
                const NAME: &'static str = $name;
                const LAYOUT: GroupLayout = GroupLayout::$layout;
                type Node = $node;
            }
        )+
    };
}

group_kinds! {
    /// Marker for snake block groups.
    SnakeBlocks => "snake blocks", IndexLeading, SnakeNode;
    /// Marker for clear pipe groups.
    ClearPipes => "clear pipes", IndexLeading, ClearPipeNode;
    /// Marker for piranha creeper groups.
    PiranhaCreepers => "piranha creepers", ReservedLeading, PathNode;
    /// Marker for exclamation block groups.
    ExclamationBlocks => "exclamation blocks", ReservedLeading, PathNode;
    /// Marker for track block groups.
    TrackBlocks => "track blocks", ReservedLeading, PathNode;
}

/// A snake block and its path (up to 120 nodes).
pub type SnakeBlock = NodeGroup<SnakeBlocks, 120>;

/// A clear pipe and its sections (up to 36 nodes).
pub type ClearPipe = NodeGroup<ClearPipes, 36>;

/// A piranha creeper and its path (up to 20 nodes).
pub type PiranhaCreeper = NodeGroup<PiranhaCreepers, 20>;

/// An exclamation block and its path (up to 10 nodes).
pub type ExclamationBlock = NodeGroup<ExclamationBlocks, 10>;

/// A track block and its path (up to 10 nodes).
pub type TrackBlock = NodeGroup<TrackBlocks, 10>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CourseError;

    fn encode<T: Record>(record: &T) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(T::SIZE);
        record.write(&mut writer);
        writer.into_inner()
    }

    #[test]
    fn test_group_sizes() {
        assert_eq!(SnakeBlock::SIZE, 964);
        assert_eq!(ClearPipe::SIZE, 292);
        assert_eq!(PiranhaCreeper::SIZE, 84);
        assert_eq!(ExclamationBlock::SIZE, 44);
        assert_eq!(TrackBlock::SIZE, 44);
    }

    #[test]
    fn test_index_leading_header() {
        let mut pipe = ClearPipe::new(7);
        pipe.reserved = 0xAA;
        pipe.reserved_2 = 0xBB;
        pipe.nodes.push(ClearPipeNode::default()).unwrap();
        pipe.nodes.push(ClearPipeNode::default()).unwrap();

        let bytes = encode(&pipe);
        assert_eq!(bytes.len(), ClearPipe::SIZE);
        assert_eq!(&bytes[..4], &[7, 2, 0xAA, 0xBB]);
    }

    #[test]
    fn test_reserved_leading_header() {
        let mut creeper = PiranhaCreeper::new(3);
        creeper.reserved = 0xAA;
        creeper.nodes.push(PathNode::default()).unwrap();

        let bytes = encode(&creeper);
        assert_eq!(bytes.len(), PiranhaCreeper::SIZE);
        assert_eq!(&bytes[..4], &[0xAA, 3, 1, 0]);
    }

    #[test]
    fn test_read_truncates_nodes() {
        let mut bytes = vec![0u8; TrackBlock::SIZE];
        bytes[..4].copy_from_slice(&[9, 1, 3, 8]);
        bytes[4..8].copy_from_slice(&[1, 2, 3, 0]);

        let block = TrackBlock::read(&mut ByteCursor::new(&bytes)).unwrap();
        assert_eq!(block.reserved, 9);
        assert_eq!(block.index, 1);
        assert_eq!(block.reserved_2, 8);
        assert_eq!(block.nodes.len(), 3);
        assert_eq!(block.nodes.as_slice()[0].direction, 2);
        assert_eq!(block.nodes.as_slice()[0].reserved_2, 3);
        assert_eq!(encode(&block), bytes);
    }

    #[test]
    fn test_read_consumes_full_group() {
        let bytes = vec![0u8; SnakeBlock::SIZE + 2];
        let mut cursor = ByteCursor::new(&bytes);
        let snake = SnakeBlock::read(&mut cursor).unwrap();

        assert!(snake.nodes.is_empty());
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_node_capacity() {
        let mut block = ExclamationBlock::new(0);
        for _ in 0..10 {
            block.nodes.push(PathNode::default()).unwrap();
        }
        assert!(matches!(
            block.nodes.push(PathNode::default()),
            Err(CourseError::CapacityExceeded { capacity: 10, .. })
        ));
    }

    #[test]
    fn test_json_skips_marker() {
        let json = serde_json::to_value(SnakeBlock::new(2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"index": 2, "reserved": 0, "reserved_2": 0, "nodes": []})
        );
        let back: SnakeBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, SnakeBlock::new(2));
    }
}
