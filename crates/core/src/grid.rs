//! Frame buffer grid: rows × columns of decoded colors.
//!
//! The grid never changes shape. A new configuration builds a new grid, and
//! the old one is dropped along with its contents.

use crate::error::{DisplayError, Result};
use crate::pixel::Rgb;

/// Color every cell holds after creation or [`FrameBufferGrid::reset`].
pub const BACKGROUND: Rgb = Rgb::BLACK;

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBufferGrid {
    cells: Vec<Rgb>,
    rows: usize,
    columns: usize,
    /// Set whenever a cell changes; cleared by the renderer
    pub dirty: bool,
}

impl FrameBufferGrid {
    pub fn new(rows: usize, columns: usize) -> Self {
        FrameBufferGrid {
            cells: vec![BACKGROUND; rows * columns],
            rows,
            columns,
            dirty: true,
        }
    }

    /// Create from signed dimensions, rejecting negative counts.
    pub fn try_new(rows: i64, columns: i64) -> Result<Self> {
        if rows < 0 || columns < 0 {
            return Err(DisplayError::NegativeDimension { rows, columns });
        }
        Ok(Self::new(rows as usize, columns as usize))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, row: isize, column: isize) -> Option<usize> {
        if row < 0 || column < 0 {
            return None;
        }
        let (row, column) = (row as usize, column as usize);
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }

    /// Bounds-checked read. `None` outside `[0, rows) x [0, columns)`.
    pub fn get(&self, row: isize, column: isize) -> Option<Rgb> {
        self.index(row, column).map(|i| self.cells[i])
    }

    /// Read without the signed bounds check, for the render loop.
    ///
    /// Panics if the index is past the end of the grid.
    #[inline(always)]
    pub fn get_unchecked(&self, row: usize, column: usize) -> Rgb {
        self.cells[row * self.columns + column]
    }

    /// Overwrite one cell. Columns do not wrap into the next row.
    pub fn set(&mut self, row: isize, column: isize, color: Rgb) -> Result<()> {
        match self.index(row, column) {
            Some(i) => {
                self.cells[i] = color;
                self.dirty = true;
                Ok(())
            }
            None => Err(DisplayError::OutOfBounds { row, column }),
        }
    }

    /// Set every cell back to [`BACKGROUND`].
    pub fn reset(&mut self) {
        self.cells.fill(BACKGROUND);
        self.dirty = true;
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }

    /// Number of cells that differ from the background.
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|&&c| c != BACKGROUND).count()
    }
}
