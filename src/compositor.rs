//! Compositor - Checkerboard Placement
//!
//! Only cells with an even `row + col` receive a tile. Tiles are taken in
//! layout order and pasted at their cell's top-left corner; once the active
//! cells run out, the remaining tiles are dropped. Alpha is discarded on
//! paste: a transparent pixel shows its stored color, not the background.

use image::{imageops, DynamicImage, Rgb, RgbImage, RgbaImage};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layout::{GridSpec, Layout};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub canvas: RgbImage,
    pub placements: Vec<Placement>,
    /// Tiles left over after every active cell was used
    pub dropped: Vec<PathBuf>,
}

/// Active cells in row-major order
pub fn active_cells(grid: &GridSpec) -> impl Iterator<Item = (u32, u32)> {
    let cols = grid.cols;
    (0..grid.rows)
        .flat_map(move |row| (0..cols).map(move |col| (row, col)))
        .filter(|(row, col)| (row + col) % 2 == 0)
}

pub fn compose(layout: &Layout, canvas_size: [u32; 2], background: [u8; 3]) -> Composition {
    let [width, height] = canvas_size;
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(background));
    let grid = &layout.grid;

    let mut placements = Vec::with_capacity(grid.active_cell_count().min(layout.tiles.len()));
    let mut tiles = layout.tiles.iter();

    for ((row, col), tile) in active_cells(grid).zip(tiles.by_ref()) {
        let x = col * grid.cell_width;
        let y = row * grid.cell_height;
        let flat = drop_alpha(&tile.image);
        imageops::replace(&mut canvas, &flat, i64::from(x), i64::from(y));

        placements.push(Placement {
            source: tile.source.clone(),
            row,
            col,
            x,
            y,
            width: flat.width(),
            height: flat.height(),
        });
    }

    let dropped: Vec<PathBuf> = tiles.map(|t| t.source.clone()).collect();
    for path in &dropped {
        warn!("No free cell for {}, dropped", path.display());
    }

    info!(
        "Composed {} of {} tiles onto {}x{} canvas",
        placements.len(),
        layout.tiles.len(),
        width,
        height
    );

    Composition { canvas, placements, dropped }
}

fn drop_alpha(tile: &RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(tile.clone()).to_rgb8()
}
