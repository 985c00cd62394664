//! Tile-resolution rendering of course areas.
//!
//! [`rasterize`] turns an [`Area`] into an RGB image with one pixel per tile:
//! black background, then ground tiles, then terrain objects, then every
//! other object, each group in list order. The
//! result depends only on the area, so rendering the same area twice gives
//! identical pixels.
//!
//! # Coordinates
//!
//! | Source | Column | Row |
//! |--------|--------|-----|
//! | Ground `(x, y)` | `x` | `height - ((y + 1) mod height)` |
//! | Object `(x, y)` | `(x - 80) div 160` | `height - (y - 80) div 160` |
//!
//! Both follow the layout used by existing course renders, drawn bottom to
//! top with a one-row offset: ground at `y` and an object tile at `y + 1`
//! share an image row. A ground tile on the top row (`y + 1 == height`) and
//! an object tile on row 0 map one past the canvas and are dropped, so image
//! row 0 never receives ground. Anything outside the canvas is skipped.
//!
//! # Example
//!
//! ```
//! use course_codec::level::{Area, Ground};
//! use course_codec::raster::{rasterize, GROUND_COLOR};
//!
//! let mut area = Area::default();
//! area.boundary_right = 160;
//! area.boundary_top = 160;
//! area.ground.push(Ground { x: 2, y: 0, ..Ground::default() }).unwrap();
//!
//! let image = rasterize(&area);
//! assert_eq!(image.dimensions(), (10, 10));
//! assert_eq!(*image.get_pixel(2, 9), GROUND_COLOR);
//! ```

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use tracing::debug;

use crate::enums::ObjectKind;
use crate::error::Result;
use crate::level::Area;

/// Canvas color where nothing is drawn.
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Color of ground tiles.
pub const GROUND_COLOR: Rgb<u8> = Rgb([139, 90, 43]);

/// Renders an area at one pixel per tile.
///
/// Width is `boundary_right / 16` and height is `boundary_top / 16`; a
/// non-positive boundary gives an empty image.
#[must_use]
pub fn rasterize(area: &Area) -> RgbImage {
    let width = area.width_tiles();
    let height = area.height_tiles();
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
    if width == 0 || height == 0 {
        return image;
    }

    for tile in &area.ground {
        let column = u32::from(tile.x);
        let row = height - (u32::from(tile.y) + 1) % height;
        if column < width && row < height {
            image.put_pixel(column, row, GROUND_COLOR);
        }
    }

    // Terrain first, so entities placed inside blocks or pipes stay visible.
    let (terrain, entities): (Vec<&_>, Vec<&_>) =
        area.objects.iter().partition(|object| object.kind.is_terrain());

    let mut drawn = 0usize;
    for object in terrain.into_iter().chain(entities) {
        let Some(color) = object_color(object.kind) else {
            continue;
        };
        let (origin_x, origin_y) = object.tile_origin();

        for dy in 0..i64::from(object.height) {
            let Ok(row) = u32::try_from(i64::from(height) - (origin_y + dy)) else {
                continue;
            };
            if row >= height {
                continue;
            }
            for dx in 0..i64::from(object.width) {
                match u32::try_from(origin_x + dx) {
                    Ok(column) if column < width => image.put_pixel(column, row, color),
                    _ => {}
                }
            }
        }
        drawn += 1;
    }

    debug!(
        "Rasterized {width}x{height} area: {} ground tiles, {drawn}/{} objects",
        area.ground.len(),
        area.objects.len()
    );
    image
}

/// Returns the render color of an object kind.
///
/// Markers and invisible helpers (player start, sound effects, arrows,
/// camera and water markers, unknown kinds) return `None` and are not drawn.
#[must_use]
pub fn object_color(kind: ObjectKind) -> Option<Rgb<u8>> {
    use ObjectKind as K;

    let rgb = match kind {
        K::Block | K::StartingBrick => [184, 112, 40],
        K::QuestionBlock | K::HiddenBlock => [248, 184, 0],
        K::HardBlock | K::Stone => [120, 80, 48],
        K::NoteBlock | K::Cloud => [240, 240, 240],
        K::DonutBlock | K::Donut => [232, 192, 88],
        K::IceBlock | K::Icicle => [152, 220, 255],
        K::PBlock | K::OnOffBlock | K::DottedLineBlock | K::BlinkingBlock => [0, 120, 248],
        K::Crate => [150, 100, 50],
        K::ExclamationBlock => [240, 80, 80],
        K::TrackBlock | K::Track => [200, 200, 200],
        K::SnakeBlock => [40, 200, 40],
        K::Ground | K::GoalGround => [139, 90, 43],
        K::Pipe => [0, 168, 0],
        K::ClearPipe => [160, 230, 255],
        K::SemisolidPlatform
        | K::MushroomPlatform
        | K::Bridge
        | K::CastleBridge
        | K::Tree
        | K::SlightSlope
        | K::SteepSlope
        | K::HalfCollisionPlatform => [200, 160, 80],
        K::Coin | K::BigCoin | K::RedCoin => [255, 215, 0],
        K::SuperMushroom
        | K::FireFlower
        | K::SuperStar
        | K::OneUp
        | K::BigMushroom
        | K::Smb2Mushroom
        | K::SuperHammer => [255, 0, 255],
        K::Goomba
        | K::Koopa
        | K::PiranhaFlower
        | K::HammerBro
        | K::BobOmb
        | K::Spiny
        | K::BuzzyBeetle
        | K::Lakitu
        | K::Magikoopa
        | K::SpikeTop
        | K::Boo
        | K::DryBones
        | K::Blooper
        | K::Skipsqueak
        | K::Wiggler
        | K::CheepCheep
        | K::RockyWrench
        | K::LavaBubble
        | K::ChainChomp
        | K::Stingby
        | K::Pokey
        | K::Charvaargh
        | K::AntTrooper
        | K::MontyMole
        | K::FishBone
        | K::AngrySun
        | K::PiranhaCreeper
        | K::Mechakoopa
        | K::Porkupuffer
        | K::Bully
        | K::Thwomp
        | K::BulletBillBlaster
        | K::BanzaiBill
        | K::Cannon
        | K::Cinobio
        | K::Cinobic => [220, 30, 30],
        K::Bowser
        | K::BowserJr
        | K::BoomBoom
        | K::Lemmy
        | K::Morton
        | K::Larry
        | K::Wendy
        | K::Iggy
        | K::Roy
        | K::Ludwig => [150, 0, 0],
        K::Spikes
        | K::Muncher
        | K::Saw
        | K::FireBar
        | K::Burner
        | K::SpikeBall
        | K::Skewer
        | K::SpikeBlock => [160, 160, 160],
        K::Spring
        | K::Lift
        | K::LavaLift
        | K::Seesaw
        | K::ConveyorBelt
        | K::FastConveyorBelt
        | K::Vine
        | K::Twister
        | K::JumpingMachine
        | K::SprintPlatform
        | K::SwingingClaw
        | K::MushroomTrampoline
        | K::OnOffTrampoline
        | K::PSwitch
        | K::Pow
        | K::RedPowBox => [0, 200, 200],
        K::Goal | K::CheckpointFlag => [255, 255, 255],
        K::Door | K::WarpBox | K::Key => [128, 64, 192],
        K::ShoeGoomba
        | K::ClownCar
        | K::KoopaCar
        | K::LakituCloud
        | K::CannonBox
        | K::PropellerBox
        | K::GoombaMask
        | K::BulletBillMask => [255, 128, 192],
        _ => return None,
    };
    Some(Rgb(rgb))
}

/// Scales an image up by an integer factor with nearest-neighbour sampling.
///
/// A factor of 0 or 1 returns a copy.
#[must_use]
pub fn upscale(image: &RgbImage, factor: u32) -> RgbImage {
    if factor <= 1 {
        return image.clone();
    }
    imageops::resize(
        image,
        image.width().saturating_mul(factor),
        image.height().saturating_mul(factor),
        FilterType::Nearest,
    )
}

/// Encodes an image as PNG.
///
/// # Errors
///
/// Returns `CourseError::ImageError` if the encoder rejects the image.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(png)
}
