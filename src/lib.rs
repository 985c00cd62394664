//! # Course Codec
//!
//! Decoder, encoder and renderer for user-made course files.
//!
//! A course travels as an encrypted and/or compressed container around a
//! fixed-size plaintext. This library peels the container, decodes the
//! plaintext into a typed [`Level`], re-encodes it byte for byte, and turns
//! course data into images:
//!
//! - **Rasterizer**: one pixel per tile, ground and objects colored by kind
//! - **Palette extractor**: a screenshot reduced to an indexed grid of
//!   clustered cell colors
//!
//! ## Quick Start
//!
//! ```no_run
//! use course_codec::container::ContainerCodec;
//! use course_codec::error::Result;
//! use course_codec::format::ContainerFormat;
//! use course_codec::{raster, Level};
//!
//! fn render_course(data: &[u8], key: [u8; 16]) -> Result<()> {
//!     let codec = ContainerCodec::with_static_key(key);
//!     let level = Level::from_container(data, ContainerFormat::Bcd, &codec)?;
//!
//!     println!("Name: {}", level.header.name);
//!     println!("Style: {}", level.header.game_style);
//!     println!("Theme: {}", level.overworld.theme);
//!     println!("Objects: {}", level.overworld.objects.len());
//!
//!     let image = raster::rasterize(&level.overworld);
//!     std::fs::write("overworld.png", raster::encode_png(&image)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias
//! - [`binary`] - Little-endian cursor and writer over fixed buffers
//! - [`format`] - Container shapes and layout constants
//! - [`container`] - Container cipher and (de)compression
//! - [`enums`] - Code to name tables for every categorical field
//! - [`level`] - Typed course documents and their binary codec
//! - [`raster`] - Tile-resolution area rendering
//! - [`palette`] - Screenshot palette extraction
//! - [`config`] - Runtime configuration
//!
//! ## Format Reference
//!
//! | Section | Size |
//! |---------|------|
//! | Level header | 0x200 |
//! | Overworld area | 0x2DEE0 |
//! | Subworld area | 0x2DEE0 |
//!
//! Every area stores its records in fixed-capacity slot arrays; only the
//! first `count` slots of each array are meaningful. All multi-byte integers
//! are little-endian.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod config;
pub mod container;
pub mod enums;
pub mod error;
pub mod format;
pub mod level;
pub mod palette;
pub mod raster;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use container::{ContainerCodec, CourseCipher, KeyDerivation, StaticKey};
pub use enums::{EnumDomain, Name};
pub use error::{CourseError, Result};
pub use format::{ContainerFormat, PLAINTEXT_SIZE};
pub use level::{decode, encode, Area, Level, LevelHeader};
pub use palette::{extract_palette, IndexedTileGrid, PaletteConfig, PaletteMode, TileCells};
pub use raster::rasterize;
