//! Layout Planner - Grid Geometry and Tile Sizing
//!
//! `cols = floor(sqrt(n))`, `rows = ceil(n / cols)`, cells are the canvas
//! divided by that grid with integer division. Tiles only ever shrink.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("No images to lay out")]
    NoImages,

    #[error("{count} images on a {width}x{height} canvas leave cells of zero size")]
    CellTooSmall { count: usize, width: u32, height: u32 },

    #[error("Cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridSpec {
    /// Grid for `count` images on a canvas of `canvas` pixels.
    pub fn for_count(count: usize, canvas: [u32; 2]) -> Result<Self, LayoutError> {
        if count == 0 {
            return Err(LayoutError::NoImages);
        }

        let cols = floor_sqrt(count);
        let rows = count.div_ceil(cols);
        let [width, height] = canvas;
        let too_small = || LayoutError::CellTooSmall { count, width, height };

        let cols = u32::try_from(cols).map_err(|_| too_small())?;
        let rows = u32::try_from(rows).map_err(|_| too_small())?;
        let cell_width = width / cols;
        let cell_height = height / rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(too_small());
        }

        Ok(Self { rows, cols, cell_width, cell_height })
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Cells with an even `row + col`
    pub fn active_cell_count(&self) -> usize {
        self.cell_count().div_ceil(2)
    }
}

fn floor_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r > 0 && r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

/// Thumbnail bounds: the largest size that fits in `max_w` x `max_h` with
/// the source aspect ratio, never larger than the source.
///
/// When the exact size is fractional the side is rounded to whichever of
/// floor or ceil keeps the aspect ratio closer, floor on ties, at least 1.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if max_w >= width && max_h >= height {
        return (width, height);
    }

    let aspect = width as f64 / height as f64;
    let (x, y) = (max_w as f64, max_h as f64);
    if x / y >= aspect {
        let w = round_aspect(y * aspect, |n| (aspect - n / y).abs());
        (w, max_h)
    } else {
        let h = round_aspect(x / aspect, |n| if n == 0.0 { 0.0 } else { (aspect - x / n).abs() });
        (max_w, h)
    }
}

fn round_aspect(value: f64, key: impl Fn(f64) -> f64) -> u32 {
    let (lo, hi) = (value.floor(), value.ceil());
    let best = if key(hi) < key(lo) { hi } else { lo };
    (best as u32).max(1)
}

/// A resized image ready to paste
#[derive(Debug, Clone)]
pub struct Tile {
    pub source: PathBuf,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: GridSpec,
    /// Shuffled placement order
    pub tiles: Vec<Tile>,
}

/// Shuffle `images`, derive the grid and shrink every image to its cell.
///
/// Everything is normalised to RGBA8 so palette and grey images paste the
/// same way as true-color ones.
pub fn plan_layout<R: Rng + ?Sized>(
    images: &[PathBuf],
    canvas: [u32; 2],
    rng: &mut R,
) -> Result<Layout, LayoutError> {
    let grid = GridSpec::for_count(images.len(), canvas)?;

    let mut order = images.to_vec();
    order.shuffle(rng);

    let mut tiles = Vec::with_capacity(order.len());
    for path in order {
        let img = image::open(&path)
            .map_err(|source| LayoutError::Decode { path: path.clone(), source })?
            .to_rgba8();

        let (w, h) = fit_within(img.width(), img.height(), grid.cell_width, grid.cell_height);
        let image = if (w, h) == img.dimensions() {
            img
        } else {
            imageops::resize(&img, w, h, FilterType::Lanczos3)
        };

        tiles.push(Tile { source: path, image });
    }

    info!(
        "Planned {}x{} grid (cols x rows) with {}x{} cells for {} images",
        grid.cols, grid.rows, grid.cell_width, grid.cell_height, tiles.len()
    );

    Ok(Layout { grid, tiles })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_formula() {
        for n in 1..=200usize {
            let g = GridSpec::for_count(n, [1920, 1080]).unwrap();
            let cols = g.cols as usize;
            assert!(cols * cols <= n && (cols + 1) * (cols + 1) > n, "n={}", n);
            assert_eq!(g.rows as usize, (n + cols - 1) / cols);
            assert!(g.cell_count() >= n);
            assert_eq!(g.cell_width, 1920 / g.cols);
            assert_eq!(g.cell_height, 1080 / g.rows);
        }
    }

    #[test]
    fn test_single_image_full_cell() {
        let g = GridSpec::for_count(1, [1920, 1080]).unwrap();
        assert_eq!(g, GridSpec { rows: 1, cols: 1, cell_width: 1920, cell_height: 1080 });
    }

    #[test]
    fn test_five_images() {
        let g = GridSpec::for_count(5, [1920, 1080]).unwrap();
        assert_eq!((g.cols, g.rows), (2, 3));
        assert_eq!((g.cell_width, g.cell_height), (960, 360));
        assert_eq!(g.active_cell_count(), 3);
    }

    #[test]
    fn test_zero_and_degenerate() {
        assert!(matches!(GridSpec::for_count(0, [1920, 1080]), Err(LayoutError::NoImages)));
        assert!(matches!(
            GridSpec::for_count(100, [4, 4]),
            Err(LayoutError::CellTooSmall { .. })
        ));
    }

    #[test]
    fn test_active_cells_count_matches_parity() {
        for rows in 1..8u32 {
            for cols in 1..8u32 {
                let g = GridSpec { rows, cols, cell_width: 1, cell_height: 1 };
                let expected = (0..rows)
                    .flat_map(|r| (0..cols).map(move |c| (r, c)))
                    .filter(|(r, c)| (r + c) % 2 == 0)
                    .count();
                assert_eq!(g.active_cell_count(), expected);
            }
        }
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(64, 64, 960, 360), (64, 64));
        assert_eq!(fit_within(960, 360, 960, 360), (960, 360));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        assert_eq!(fit_within(1000, 500, 200, 200), (200, 100));
        assert_eq!(fit_within(300, 400, 100, 100), (75, 100));
        assert_eq!(fit_within(512, 512, 960, 360), (360, 360));
        assert_eq!(fit_within(1000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn test_fit_within_bounds() {
        for (w, h) in [(37, 91), (800, 3), (5, 5), (1024, 768), (13, 1000)] {
            for (mw, mh) in [(10, 10), (100, 7), (7, 100), (960, 360)] {
                let (nw, nh) = fit_within(w, h, mw, mh);
                assert!(nw <= w && nh <= h);
                assert!(nw <= mw && nh <= mh, "{}x{} into {}x{}", w, h, mw, mh);
            }
        }
    }
}
