//! Renderer-facing side of the grid.
//!
//! One filled rectangle per cell, `unit_width × unit_height` pixels, in
//! row-major order from the top-left of the display area. Adjacent cells
//! touch without gaps or overlap. Any strip left over when the display size
//! is not a multiple of the unit size stays at the background color.

use crate::config::DisplayConfig;
use crate::grid::{FrameBufferGrid, BACKGROUND};
use crate::pixel::Rgb;

/// Pixel rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Rectangle for the cell at `(row, column)`.
pub fn cell_rect(row: usize, column: usize, unit_width: usize, unit_height: usize) -> CellRect {
    CellRect {
        x: column * unit_width,
        y: row * unit_height,
        width: unit_width,
        height: unit_height,
    }
}

/// Call `fill` once per cell, row-major.
pub fn for_each_cell<F>(grid: &FrameBufferGrid, unit_width: usize, unit_height: usize, mut fill: F)
where
    F: FnMut(CellRect, Rgb),
{
    let mut y = 0;
    for row in 0..grid.rows() {
        let mut x = 0;
        for column in 0..grid.columns() {
            let rect = CellRect { x, y, width: unit_width, height: unit_height };
            fill(rect, grid.get_unchecked(row, column));
            x += unit_width;
        }
        y += unit_height;
    }
}

/// Paint the grid into a `0x00RRGGBB` buffer of `width × height` pixels.
///
/// Cells that fall partly outside the buffer are clipped.
pub fn render_u32(grid: &FrameBufferGrid, unit_width: usize, unit_height: usize, out: &mut [u32], width: usize, height: usize) {
    let height = height.min(out.len() / width.max(1));
    out[..width * height].fill(BACKGROUND.to_u32());
    for_each_cell(grid, unit_width, unit_height, |rect, color| {
        let c = color.to_u32();
        let x_end = (rect.x + rect.width).min(width);
        let y_end = (rect.y + rect.height).min(height);
        for y in rect.y..y_end {
            let line = y * width;
            if rect.x < x_end {
                out[line + rect.x..line + x_end].fill(c);
            }
        }
    });
}

/// Full display area as `0x00RRGGBB`, sized from `config`.
pub fn framebuffer_u32(grid: &FrameBufferGrid, config: &DisplayConfig) -> Vec<u32> {
    let width = config.display_width.pixels();
    let height = config.display_height.pixels();
    let mut buf = vec![0u32; width * height];
    render_u32(grid, config.unit_width.pixels(), config.unit_height.pixels(), &mut buf, width, height);
    buf
}

/// Full display area as packed RGB bytes (3 per pixel), for image export.
pub fn framebuffer_rgb(grid: &FrameBufferGrid, config: &DisplayConfig) -> Vec<u8> {
    let pixels = framebuffer_u32(grid, config);
    let mut rgb = Vec::with_capacity(pixels.len() * 3);
    for px in pixels {
        let c = Rgb::from_u32(px);
        rgb.extend_from_slice(&[c.r, c.g, c.b]);
    }
    rgb
}
