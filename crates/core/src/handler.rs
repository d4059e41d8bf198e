//! Store notifications → grid cells.
//!
//! A store lands on the cell at word offset `(address - base) * stride / 4`,
//! laid out row-major. Each byte of the stored value (lane 0 = least
//! significant) is decoded as one pixel and painted into consecutive columns
//! of the same row. Lanes that are transparent or fall off the right edge are
//! skipped individually; nothing here ever reports an error.

use crate::grid::FrameBufferGrid;
use crate::pixel;
use crate::WORD_LENGTH_BYTES;

/// Store access width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteWidth {
    /// `sb`
    Byte,
    /// `sh`
    Half,
    /// `sw`
    Word,
}

impl WriteWidth {
    pub fn bytes(self) -> u32 {
        match self {
            WriteWidth::Byte => 1,
            WriteWidth::Half => 2,
            WriteWidth::Word => 4,
        }
    }

    /// Mask covering the stored bytes.
    pub fn mask(self) -> u32 {
        match self {
            WriteWidth::Byte => 0xFF,
            WriteWidth::Half => 0xFFFF,
            WriteWidth::Word => 0xFFFF_FFFF,
        }
    }
}

/// One store observed inside the display window. Never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEvent {
    pub address: i32,
    pub value: u32,
    pub width: WriteWidth,
}

impl WriteEvent {
    pub fn new(address: u32, value: u32, width: WriteWidth) -> Self {
        WriteEvent {
            address: address as i32,
            value,
            width,
        }
    }
}

/// Maps write events onto a grid for a fixed base address and stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEventHandler {
    base_address: u32,
    stride: u32,
}

impl WriteEventHandler {
    /// `stride` multiplies the displacement from the base before the word
    /// division. 1 maps one word per cell; 4 maps one byte per cell.
    pub fn new(base_address: u32, stride: u32) -> Self {
        WriteEventHandler {
            base_address,
            stride: stride.max(1),
        }
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Row and first column for `address`, or `None` if it lies below the
    /// base, the scaled displacement overflows, or the grid has no columns.
    /// The row may still exceed the grid.
    pub fn cell_for(&self, address: i32, columns: usize) -> Option<(isize, isize)> {
        if columns == 0 {
            return None;
        }
        // Signed 32-bit addresses; widen so the displacement cannot wrap
        let displacement = address as i64 - self.base_address as i32 as i64;
        let offset = displacement
            .checked_mul(self.stride as i64)?
            .div_euclid(WORD_LENGTH_BYTES as i64);
        if offset < 0 {
            return None;
        }
        let columns = columns as i64;
        Some(((offset / columns) as isize, (offset % columns) as isize))
    }

    /// Paint the lanes of `event` into `grid`. Returns the number of cells
    /// written.
    pub fn handle(&self, event: &WriteEvent, grid: &mut FrameBufferGrid) -> usize {
        let (row, base_col) = match self.cell_for(event.address, grid.columns()) {
            Some(cell) => cell,
            None => {
                log::trace!("store 0x{:08X} below display base, dropped", event.address as u32);
                return 0;
            }
        };

        let mut written = 0;
        for lane in 0..event.width.bytes() {
            let packed = (event.value >> (lane * 8)) as u8;
            let color = pixel::decode(packed);
            if pixel::is_transparent(color) {
                continue;
            }
            let column = base_col + lane as isize;
            match grid.set(row, column, color) {
                Ok(()) => written += 1,
                Err(e) => log::trace!("lane {} of store 0x{:08X}: {}", lane, event.address as u32, e),
            }
        }
        written
    }
}
