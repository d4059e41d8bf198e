//! Error type shared by the core modules.
//!
//! Nothing in the write path surfaces these to the caller: the write handler
//! swallows `OutOfBounds`, and option parsing falls back to defaults. The
//! remaining variants come from file I/O and the trace/settings formats.

use std::fmt;

/// Errors reported by the bitmap display core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// A grid was requested with a negative row or column count
    NegativeDimension { rows: i64, columns: i64 },
    /// Cell index outside `[0, rows) x [0, columns)`
    OutOfBounds { row: isize, column: isize },
    /// Malformed store trace line (1-based line number)
    Trace { line: usize, message: String },
    /// Settings file could not be decoded
    Settings(String),
    /// Filesystem error
    Io(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::NegativeDimension { rows, columns } => {
                write!(f, "negative grid dimension: {}x{}", rows, columns)
            }
            DisplayError::OutOfBounds { row, column } => {
                write!(f, "cell ({}, {}) is outside the grid", row, column)
            }
            DisplayError::Trace { line, message } => write!(f, "trace line {}: {}", line, message),
            DisplayError::Settings(msg) => write!(f, "settings: {}", msg),
            DisplayError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for DisplayError {}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::Io(e.to_string())
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, DisplayError>;
