//! # bitmap-core
//!
//! Memory-mapped bitmap display for simulated 32-bit programs.
//!
//! A program paints the display by storing into a reserved address window.
//! Each stored byte is a packed 3-3-2 color (`BBGGGRRR`) that is widened to
//! 24-bit RGB and written into one cell of a resizable grid. The host draws
//! the grid as a mosaic of `unit_width × unit_height` rectangles.
//!
//! ## Architecture
//!
//! - [`BitmapDisplay`] — Owns the configuration, grid, address window and
//!   write handler, and swaps them together on every configuration change
//! - [`pixel`] — 3-3-2 → RGB decoding and the transparent sentinel
//! - [`grid::FrameBufferGrid`] — Row-major cell storage
//! - [`window::AddressWindow`] — Observed address range, subscribe/unsubscribe
//! - [`handler::WriteEventHandler`] — Store → cell mapping, lane splitting
//! - [`config`] — Closed option sets and grid size derivation
//! - [`render`] — Cell rectangles and pixel buffer output
//! - [`memory::Memory`] — Simulated memory that emits store notifications
//! - [`mif`], [`png`], [`settings`], [`trace`] — File formats
//!
//! ## Address mapping
//!
//! With base address `B` and stride `s`, a store to `A` lands at word
//! offset `(A - B) * s / 4`, row `offset / columns`, column
//! `offset % columns`. Byte lane `i` of the stored value goes to column
//! `+ i` of the same row; lanes past the right edge are dropped.

pub mod config;
pub mod error;
pub mod grid;
pub mod handler;
pub mod memory;
pub mod mif;
pub mod pixel;
pub mod png;
pub mod render;
pub mod settings;
pub mod trace;
pub mod window;

pub use config::{ConfigChange, DisplayConfig};
pub use error::{DisplayError, Result};
pub use grid::FrameBufferGrid;
pub use handler::{WriteEvent, WriteEventHandler, WriteWidth};
pub use memory::Memory;
pub use pixel::Rgb;
pub use window::{AddressWindow, MemoryBus};

use std::path::Path;

/// Bytes per memory word (one grid cell per word).
pub const WORD_LENGTH_BYTES: u32 = 4;
/// Highest word-aligned 32-bit address.
pub const MAX_WORD_ADDRESS: u32 = 0xFFFF_FFFC;

/// The display: configuration plus the grid, window and handler derived
/// from it.
///
/// All four are replaced together by [`BitmapDisplay::reconfigure`]; there is
/// no way to observe a grid whose size disagrees with the subscribed window.
pub struct BitmapDisplay {
    config: DisplayConfig,
    grid: FrameBufferGrid,
    window: AddressWindow,
    handler: WriteEventHandler,
    /// Set when the host should redraw
    pub dirty: bool,
    /// Cells written since the last configuration change
    pub cells_written: u64,
}

impl BitmapDisplay {
    pub fn new(config: DisplayConfig) -> Self {
        let (rows, columns) = config.grid_dimensions();
        let base = config.base_address.address();
        BitmapDisplay {
            config,
            grid: FrameBufferGrid::new(rows, columns),
            window: AddressWindow::new(base, rows, columns),
            handler: WriteEventHandler::new(base, config.stride),
            dirty: true,
            cells_written: 0,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn grid(&self) -> &FrameBufferGrid {
        &self.grid
    }

    pub fn window(&self) -> &AddressWindow {
        &self.window
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    /// Color of one cell, `None` outside the grid.
    pub fn color_at(&self, row: usize, column: usize) -> Option<Rgb> {
        self.grid.get(row as isize, column as isize)
    }

    pub fn is_connected(&self) -> bool {
        self.window.is_subscribed()
    }

    /// Start receiving stores from `bus`.
    pub fn connect(&mut self, bus: &mut dyn MemoryBus) {
        self.window.subscribe(bus);
    }

    /// Stop receiving stores from `bus`.
    pub fn disconnect(&mut self, bus: &mut dyn MemoryBus) {
        self.window.unsubscribe(bus);
    }

    /// Apply one selector change.
    pub fn apply(&mut self, change: ConfigChange, bus: &mut dyn MemoryBus) {
        let config = self.config.with(change);
        self.reconfigure(config, bus);
    }

    /// Replace the whole configuration.
    ///
    /// Builds a fresh grid (all background) and window, moves the bus
    /// subscription over if one was active, then swaps everything in and
    /// requests a redraw.
    pub fn reconfigure(&mut self, config: DisplayConfig, bus: &mut dyn MemoryBus) {
        let mut next = BitmapDisplay::new(config);
        if self.window.is_subscribed() {
            self.window.unsubscribe(bus);
            next.window.subscribe(bus);
        }
        log::info!("display reconfigured: {}", config.summary());
        *self = next;
    }

    /// Handle one store notification. Never fails; returns cells written.
    pub fn on_write(&mut self, event: &WriteEvent) -> usize {
        let written = self.handler.handle(event, &mut self.grid);
        if written > 0 {
            self.cells_written += written as u64;
            self.dirty = true;
        }
        written
    }

    /// Clear the grid to background.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.dirty = true;
    }

    /// Returns and clears the redraw flag.
    pub fn take_dirty(&mut self) -> bool {
        let d = self.dirty || self.grid.dirty;
        self.dirty = false;
        self.grid.dirty = false;
        d
    }

    /// Display area width and height in pixels.
    pub fn area(&self) -> (usize, usize) {
        (self.config.display_width.pixels(), self.config.display_height.pixels())
    }

    /// Display area as `0x00RRGGBB` pixels (for minifb etc).
    pub fn framebuffer_u32(&self) -> Vec<u32> {
        render::framebuffer_u32(&self.grid, &self.config)
    }

    /// Display area as a PNG image.
    pub fn screenshot_png(&self) -> Vec<u8> {
        let (w, h) = self.area();
        png::encode_rgb(w as u32, h as u32, &render::framebuffer_rgb(&self.grid, &self.config))
    }

    /// Write a PNG screenshot to `path`.
    pub fn save_screenshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.screenshot_png())?;
        log::info!("screenshot written to {}", path.display());
        Ok(())
    }

    /// Word-aligned `[first, last]` of the observed window.
    fn dump_range(&self) -> (u32, u32) {
        (self.window.low(), self.window.high() & !(WORD_LENGTH_BYTES - 1))
    }

    /// MIF dump of the observed window from `memory`.
    pub fn dump_window(&self, memory: &Memory) -> String {
        let (first, last) = self.dump_range();
        mif::dump(first, last, |a| memory.load_word(a))
    }

    /// Write the MIF dump of the observed window to `path`.
    pub fn save_dump(&self, memory: &Memory, path: &Path) -> Result<()> {
        let (first, last) = self.dump_range();
        mif::save(path, first, last, |a| memory.load_word(a))
    }
}

impl Default for BitmapDisplay {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseAddress, DisplayHeight, DisplayWidth, UnitSize};
    use crate::grid::BACKGROUND;

    fn small_config() -> DisplayConfig {
        // 64x64 px with 16x32 units: 2 rows, 4 columns
        DisplayConfig::default()
            .with(ConfigChange::DisplayWidth(DisplayWidth::W64))
            .with(ConfigChange::DisplayHeight(DisplayHeight::H64))
            .with(ConfigChange::UnitWidth(UnitSize::X16))
            .with(ConfigChange::UnitHeight(UnitSize::X32))
            .with(ConfigChange::BaseAddress(BaseAddress::StaticData))
    }

    #[test]
    fn test_display_creation() {
        let display = BitmapDisplay::default();
        assert_eq!(display.rows(), 240);
        assert_eq!(display.columns(), 320);
        assert_eq!(display.window().low(), 0xFFFF_0000);
        assert_eq!(display.window().high(), MAX_WORD_ADDRESS);
        assert!(!display.is_connected());
    }

    #[test]
    fn test_end_to_end_word_store() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        assert_eq!((display.rows(), display.columns()), (2, 4));
        display.connect(&mut mem);

        let base = BaseAddress::StaticData.address();
        // Lanes 0..3 = FF, 00, C7, 07
        let ev = mem.store(base, 0x07C7_00FF, WriteWidth::Word).unwrap();
        assert_eq!(display.on_write(&ev), 3);
        assert_eq!(display.color_at(0, 0), Some(Rgb::new(254, 254, 255)));
        assert_eq!(display.color_at(0, 1), Some(Rgb::new(0, 0, 0)));
        assert_eq!(display.color_at(0, 2), Some(BACKGROUND));
        assert_eq!(display.color_at(0, 3), Some(Rgb::new(254, 0, 0)));
        assert!(display.take_dirty());
        assert!(!display.take_dirty());
    }

    #[test]
    fn test_stores_outside_window_not_delivered() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.connect(&mut mem);
        let high = display.window().high();
        assert!(mem.store(high + 4, 0xFF, WriteWidth::Word).is_none());
        assert!(mem.store(0x1000_FFFC, 0xFF, WriteWidth::Word).is_none());
    }

    #[test]
    fn test_unit_width_change_halves_columns_and_resets() {
        let mut mem = Memory::new();
        let cfg = DisplayConfig::default().with(ConfigChange::BaseAddress(BaseAddress::Heap));
        let mut display = BitmapDisplay::new(cfg);
        display.connect(&mut mem);
        assert_eq!(display.columns(), 320);

        let ev = mem.store(0x1004_0000, 0xFFFF_FFFF, WriteWidth::Word).unwrap();
        display.on_write(&ev);
        assert_eq!(display.grid().painted(), 4);

        display.apply(ConfigChange::UnitWidth(UnitSize::X2), &mut mem);
        assert_eq!(display.columns(), 160);
        assert_eq!(display.rows(), 240);
        assert_eq!(display.grid().painted(), 0);
        assert_eq!(display.cells_written, 0);
    }

    #[test]
    fn test_reconfigure_moves_subscription() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.connect(&mut mem);
        assert_eq!(mem.observed_range(), Some((0x1001_0000, 0x1001_0020)));

        display.apply(ConfigChange::BaseAddress(BaseAddress::GlobalData), &mut mem);
        assert!(display.is_connected());
        assert_eq!(mem.observed_range(), Some((0x1000_0000, 0x1000_0020)));
        assert_eq!(display.window().low(), display.config().base_address.address());

        // Old window no longer delivers
        assert!(mem.store(0x1001_0000, 0xFF, WriteWidth::Byte).is_none());
        let ev = mem.store(0x1000_0000, 0xFF, WriteWidth::Byte).unwrap();
        assert_eq!(display.on_write(&ev), 1);
    }

    #[test]
    fn test_reconfigure_while_disconnected() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.apply(ConfigChange::UnitHeight(UnitSize::X16), &mut mem);
        assert!(!display.is_connected());
        assert_eq!(mem.observed_range(), None);
        assert_eq!(display.rows(), 4);
    }

    #[test]
    fn test_disconnect() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.connect(&mut mem);
        display.disconnect(&mut mem);
        display.disconnect(&mut mem);
        assert_eq!(mem.observed_range(), None);
        assert!(mem.store(0x1001_0000, 0xFF, WriteWidth::Byte).is_none());
    }

    #[test]
    fn test_reset_and_screenshot() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.connect(&mut mem);
        let ev = mem.store(0x1001_0004, 0x38, WriteWidth::Byte).unwrap();
        display.on_write(&ev);
        let fb = display.framebuffer_u32();
        assert_eq!(fb.len(), 64 * 64);
        // Column 1 covers x 16..32 of row 0 (y 0..32)
        assert_eq!(fb[16], pixel::decode(0x38).to_u32());
        assert_eq!(fb[31 * 64 + 31], pixel::decode(0x38).to_u32());
        assert_eq!(fb[32 * 64 + 16], BACKGROUND.to_u32());

        display.reset();
        assert_eq!(display.grid().painted(), 0);
        assert_eq!(&display.screenshot_png()[1..4], b"PNG");
    }

    #[test]
    fn test_dump_window() {
        let mut mem = Memory::new();
        let mut display = BitmapDisplay::new(small_config());
        display.connect(&mut mem);
        mem.store(0x1001_0000, 0xC0, WriteWidth::Word);
        let mif = display.dump_window(&mem);
        assert!(mif.starts_with("DEPTH = 36;"));
        assert!(mif.contains("00000000 : 000000c0;"));

        let path = std::env::temp_dir().join(format!("bitmap-dump-{}.mif", std::process::id()));
        display.save_dump(&mem, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), mif);
        let _ = std::fs::remove_file(&path);
    }
}
