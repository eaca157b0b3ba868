use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("layout is empty")]
    EmptyLayout,

    #[error("layout must be at least 3x3, got {rows}x{cols}")]
    LayoutTooSmall { rows: usize, cols: usize },

    #[error("layout row {row} has {actual} columns, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown layout glyph {glyph:?} at ({row}, {col})")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    #[error("border cell ({row}, {col}) is not a wall")]
    OpenBorder { row: usize, col: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
