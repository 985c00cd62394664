//! Screenshot to indexed tile palette.
//!
//! A course screenshot is sampled into square cells, and cells whose mean
//! colors are close are merged into clusters. Each cluster becomes one
//! palette entry. The result is an [`IndexedTileGrid`] holding either the
//! cluster index per cell ([`PaletteMode::Index`]) or the cluster color per
//! cell ([`PaletteMode::Preview`]).
//!
//! # Clustering
//!
//! Two cells are linked when the Euclidean distance between their mean RGB
//! colors is at most the tolerance. Clusters are the connected components of
//! that relation, so chains of similar cells join even when their ends are
//! far apart, and a cell with no close neighbour is a cluster on its own.
//! Cluster indices follow the row-major order in which clusters first
//! appear, and a cluster's color is the mean of its member cell means.
//!
//! Candidate pairs are found by bucketing colors on a grid whose side is
//! the tolerance, so only the 27 surrounding buckets are compared.
//!
//! # Example
//!
//! ```
//! use course_codec::palette::{extract_palette, PaletteConfig, PaletteMode, TileCells};
//! use image::{Rgb, RgbImage};
//!
//! let screenshot = RgbImage::from_pixel(64, 32, Rgb([92, 148, 252]));
//! let grid = extract_palette(&screenshot, None, PaletteMode::Index, &PaletteConfig::default());
//!
//! assert_eq!((grid.width, grid.height), (4, 2));
//! assert_eq!(grid.palette, vec![[92, 148, 252]]);
//! assert_eq!(grid.cells, TileCells::Indexed(vec![0; 8]));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enums::Theme;
use crate::error::Result;
use crate::level::Level;

/// Default cell edge in screenshot pixels.
pub const DEFAULT_CELL_SIZE: u32 = 16;

/// Default clustering tolerance (Euclidean RGB distance).
pub const DEFAULT_TOLERANCE: f64 = 16.0;

/// What each grid cell stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Cluster index per cell, at the configured cell size.
    #[default]
    Index,

    /// Cluster color per cell, at half the configured cell size.
    Preview,
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaletteMode::Index => "index",
            PaletteMode::Preview => "preview",
        })
    }
}

impl FromStr for PaletteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "index" => Ok(PaletteMode::Index),
            "preview" => Ok(PaletteMode::Preview),
            other => Err(format!(
                "unknown palette mode '{other}' (expected index or preview)"
            )),
        }
    }
}

/// Sampling and clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Cell edge in pixels (halved in preview mode).
    pub cell_size: u32,
    /// Maximum RGB distance between linked cells.
    pub tolerance: f64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig {
            cell_size: DEFAULT_CELL_SIZE,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl PaletteConfig {
    /// Returns the cell edge used for `mode`, never less than 1.
    #[must_use]
    pub fn effective_cell_size(&self, mode: PaletteMode) -> u32 {
        match mode {
            PaletteMode::Index => self.cell_size.max(1),
            PaletteMode::Preview => (self.cell_size / 2).max(1),
        }
    }
}

/// Per-cell contents of a tile grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCells {
    /// Palette index of each cell.
    Indexed(Vec<u32>),
    /// Cluster color of each cell.
    Averaged(Vec<[u8; 3]>),
}

impl TileCells {
    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TileCells::Indexed(cells) => cells.len(),
            TileCells::Averaged(cells) => cells.len(),
        }
    }

    /// Returns whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A screenshot reduced to a grid of palette cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedTileGrid {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Cell edge in screenshot pixels.
    pub cell_size: u32,
    /// Cell contents.
    pub cells: TileCells,
    /// Cluster colors, indexed by cluster.
    pub palette: Vec<[u8; 3]>,
    /// Overworld theme of the course, when level data was supplied.
    pub theme: Option<Theme>,
}

impl IndexedTileGrid {
    /// Returns the color of the cell at `(x, y)`.
    #[must_use]
    pub fn color_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()?;
        match &self.cells {
            TileCells::Indexed(cells) => {
                let index = usize::try_from(*cells.get(i)?).ok()?;
                self.palette.get(index).copied()
            }
            TileCells::Averaged(cells) => cells.get(i).copied(),
        }
    }

    /// Renders the grid at one pixel per cell.
    #[must_use]
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.color_at(x, y).unwrap_or([0, 0, 0]))
        })
    }
}

/// Decodes a PNG or JPEG screenshot.
///
/// # Errors
///
/// Returns `CourseError::ImageError` if the bytes are not a decodable image.
pub fn load_screenshot(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    debug!("Loaded {}x{} screenshot", image.width(), image.height());
    Ok(image.to_rgb8())
}

/// Samples a screenshot into cells and clusters them into a palette.
///
/// When `level` is given, its overworld theme is recorded on the grid.
#[must_use]
pub fn extract_palette(
    image: &RgbImage,
    level: Option<&Level>,
    mode: PaletteMode,
    config: &PaletteConfig,
) -> IndexedTileGrid {
    let cell_size = config.effective_cell_size(mode);
    let width = image.width().div_ceil(cell_size);
    let height = image.height().div_ceil(cell_size);

    let means = cell_means(image, cell_size, width, height);
    let (assignment, palette) = cluster(&means, config.tolerance);

    debug!(
        "Palette: {width}x{height} cells of {cell_size}px, {} clusters",
        palette.len()
    );

    let cells = match mode {
        PaletteMode::Index => TileCells::Indexed(assignment),
        PaletteMode::Preview => TileCells::Averaged(
            assignment
                .iter()
                .filter_map(|&i| usize::try_from(i).ok())
                .filter_map(|i| palette.get(i).copied())
                .collect(),
        ),
    };

    IndexedTileGrid {
        width,
        height,
        cell_size,
        cells,
        palette,
        theme: level.map(|level| level.overworld.theme),
    }
}

/// Mean color of every cell, row-major. Edge cells average only the pixels
/// they cover.
#[allow(clippy::cast_precision_loss)]
fn cell_means(image: &RgbImage, cell_size: u32, width: u32, height: u32) -> Vec<[f64; 3]> {
    let mut means = Vec::with_capacity((width as usize) * (height as usize));

    for cy in 0..height {
        for cx in 0..width {
            let x_end = (cx + 1).saturating_mul(cell_size).min(image.width());
            let y_end = (cy + 1).saturating_mul(cell_size).min(image.height());

            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for y in cy * cell_size..y_end {
                for x in cx * cell_size..x_end {
                    let Rgb(pixel) = *image.get_pixel(x, y);
                    for (total, channel) in sum.iter_mut().zip(pixel) {
                        *total += u64::from(channel);
                    }
                    count += 1;
                }
            }

            let count = count.max(1) as f64;
            means.push(sum.map(|total| total as f64 / count));
        }
    }

    means
}

/// Groups cell colors into connected components and returns each cell's
/// cluster index plus the cluster colors.
fn cluster(means: &[[f64; 3]], tolerance: f64) -> (Vec<u32>, Vec<[u8; 3]>) {
    // Cells with bit-identical means always share a cluster; link only the
    // distinct colors.
    let mut distinct: Vec<[f64; 3]> = Vec::new();
    let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
    let color_of: Vec<usize> = means
        .iter()
        .map(|mean| {
            *lookup.entry(mean.map(f64::to_bits)).or_insert_with(|| {
                distinct.push(*mean);
                distinct.len() - 1
            })
        })
        .collect();

    let mut sets = DisjointSet::new(distinct.len());
    let side = tolerance.max(1.0);
    let limit = tolerance.max(0.0).powi(2);
    let mut buckets: HashMap<[i64; 3], Vec<usize>> = HashMap::new();

    for (i, color) in distinct.iter().enumerate() {
        let key = bucket(color, side);
        for neighbour in neighbours(key) {
            for &j in buckets.get(&neighbour).into_iter().flatten() {
                if distance_squared(color, &distinct[j]) <= limit {
                    sets.union(i, j);
                }
            }
        }
        buckets.entry(key).or_default().push(i);
    }

    // Number clusters by first appearance in cell order.
    let mut index_of_root: HashMap<usize, u32> = HashMap::new();
    let mut sums: Vec<([f64; 3], u64)> = Vec::new();
    let mut assignment = Vec::with_capacity(means.len());

    for (mean, &color) in means.iter().zip(&color_of) {
        let root = sets.find(color);
        let index = *index_of_root.entry(root).or_insert_with(|| {
            sums.push(([0.0; 3], 0));
            u32::try_from(sums.len() - 1).unwrap_or(u32::MAX)
        });
        let (sum, count) = &mut sums[index as usize];
        for (total, channel) in sum.iter_mut().zip(mean) {
            *total += channel;
        }
        *count += 1;
        assignment.push(index);
    }

    let palette = sums.iter().map(|(sum, count)| average(sum, *count)).collect();
    (assignment, palette)
}

#[allow(clippy::cast_possible_truncation)]
fn bucket(color: &[f64; 3], side: f64) -> [i64; 3] {
    color.map(|channel| (channel / side).floor() as i64)
}

fn neighbours(key: [i64; 3]) -> impl Iterator<Item = [i64; 3]> {
    (-1..=1).flat_map(move |dr| {
        (-1..=1).flat_map(move |dg| (-1..=1).map(move |db| [key[0] + dr, key[1] + dg, key[2] + db]))
    })
}

fn distance_squared(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn average(sum: &[f64; 3], count: u64) -> [u8; 3] {
    let count = count.max(1) as f64;
    sum.map(|total| (total / count).round().clamp(0.0, 255.0) as u8)
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, rgb: [u8; 3]) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                image.put_pixel(x, y, Rgb(rgb));
            }
        }
    }

    fn config(cell_size: u32, tolerance: f64) -> PaletteConfig {
        PaletteConfig {
            cell_size,
            tolerance,
        }
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    #[test]
    fn test_uniform_image_is_one_cluster() {
        let image = RgbImage::from_pixel(128, 96, Rgb([10, 200, 30]));
        let grid = extract_palette(&image, None, PaletteMode::Index, &PaletteConfig::default());

        assert_eq!((grid.width, grid.height), (8, 6));
        assert_eq!(grid.palette, vec![[10, 200, 30]]);
        assert_eq!(grid.cells, TileCells::Indexed(vec![0; 48]));
        assert_eq!(grid.theme, None);
    }

    #[test]
    fn test_partial_edge_cells() {
        let mut image = RgbImage::from_pixel(20, 10, Rgb([0, 0, 0]));
        fill(&mut image, 16, 0, 4, 10, [200, 0, 0]);

        let grid = extract_palette(&image, None, PaletteMode::Index, &config(16, 1.0));
        assert_eq!((grid.width, grid.height), (2, 1));
        assert_eq!(grid.color_at(1, 0), Some([200, 0, 0]));
        assert_eq!(grid.color_at(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn test_preview_halves_cell_size() {
        let image = RgbImage::from_pixel(32, 32, Rgb([1, 2, 3]));
        let grid = extract_palette(&image, None, PaletteMode::Preview, &PaletteConfig::default());

        assert_eq!(grid.cell_size, 8);
        assert_eq!((grid.width, grid.height), (4, 4));
        assert_eq!(grid.cells, TileCells::Averaged(vec![[1, 2, 3]; 16]));
    }

    #[test]
    fn test_effective_cell_size_minimum() {
        let tiny = config(1, 16.0);
        assert_eq!(tiny.effective_cell_size(PaletteMode::Preview), 1);
        assert_eq!(config(0, 16.0).effective_cell_size(PaletteMode::Index), 1);
    }

    #[test]
    fn test_empty_image() {
        let grid = extract_palette(
            &RgbImage::new(0, 0),
            None,
            PaletteMode::Index,
            &PaletteConfig::default(),
        );
        assert!(grid.cells.is_empty());
        assert!(grid.palette.is_empty());
    }

    // ========================================================================
    // Clustering
    // ========================================================================

    #[test]
    fn test_distinct_colors_form_separate_clusters() {
        let mut image = RgbImage::new(32, 32);
        fill(&mut image, 0, 0, 16, 32, [250, 0, 0]);
        fill(&mut image, 16, 0, 16, 16, [0, 0, 250]);
        fill(&mut image, 16, 16, 16, 16, [250, 0, 0]);

        let grid = extract_palette(&image, None, PaletteMode::Index, &config(16, 16.0));
        assert_eq!(grid.palette, vec![[250, 0, 0], [0, 0, 250]]);
        assert_eq!(grid.cells, TileCells::Indexed(vec![0, 1, 0, 0]));
    }

    #[test]
    fn test_tolerance_boundary() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([100, 100, 100]));
        image.put_pixel(1, 0, Rgb([110, 100, 100]));

        let linked = extract_palette(&image, None, PaletteMode::Index, &config(1, 10.0));
        assert_eq!(linked.palette, vec![[105, 100, 100]]);

        let split = extract_palette(&image, None, PaletteMode::Index, &config(1, 9.9));
        assert_eq!(split.palette.len(), 2);
    }

    #[test]
    fn test_chains_are_transitive() {
        let mut image = RgbImage::new(3, 1);
        image.put_pixel(0, 0, Rgb([0, 0, 0]));
        image.put_pixel(1, 0, Rgb([8, 0, 0]));
        image.put_pixel(2, 0, Rgb([16, 0, 0]));

        let grid = extract_palette(&image, None, PaletteMode::Index, &config(1, 8.0));
        assert_eq!(grid.palette, vec![[8, 0, 0]]);
        assert_eq!(grid.cells, TileCells::Indexed(vec![0, 0, 0]));
    }

    #[test]
    fn test_zero_tolerance_links_only_identical() {
        let mut image = RgbImage::from_pixel(3, 1, Rgb([5, 5, 5]));
        image.put_pixel(1, 0, Rgb([5, 5, 6]));

        let grid = extract_palette(&image, None, PaletteMode::Index, &config(1, 0.0));
        assert_eq!(grid.cells, TileCells::Indexed(vec![0, 1, 0]));
    }

    #[test]
    fn test_theme_from_level() {
        let mut level = Level::default();
        level.overworld.theme = Theme::Snow;

        let image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let grid = extract_palette(&image, Some(&level), PaletteMode::Index, &PaletteConfig::default());
        assert_eq!(grid.theme, Some(Theme::Snow));
    }

    // ========================================================================
    // Output
    // ========================================================================

    #[test]
    fn test_to_image_matches_cells() {
        let mut image = RgbImage::new(32, 16);
        fill(&mut image, 0, 0, 16, 16, [40, 40, 40]);
        fill(&mut image, 16, 0, 16, 16, [200, 200, 0]);

        for mode in [PaletteMode::Index, PaletteMode::Preview] {
            let grid = extract_palette(&image, None, mode, &config(16, 4.0));
            let rendered = grid.to_image();
            assert_eq!(rendered.dimensions(), (grid.width, grid.height));
            assert_eq!(*rendered.get_pixel(0, 0), Rgb([40, 40, 40]));
            assert_eq!(*rendered.get_pixel(grid.width - 1, 0), Rgb([200, 200, 0]));
        }
    }

    #[test]
    fn test_load_screenshot_rejects_garbage() {
        let err = load_screenshot(b"definitely not a jpeg").unwrap_err();
        assert!(matches!(err, crate::error::CourseError::ImageError { .. }));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Preview".parse::<PaletteMode>(), Ok(PaletteMode::Preview));
        assert!("sepia".parse::<PaletteMode>().is_err());
    }
}
