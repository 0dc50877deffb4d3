//! Error types for rasters, the text formats, and the encoder/decoder.

use thiserror::Error;

use crate::format::Color;

/// Errors from building or addressing a [`Raster`](crate::raster::Raster).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("({x}, {y}) is outside the {width}x{height} raster")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("raster dimensions must be at least 1x1, got {height}x{width}")]
    Empty { height: usize, width: usize },

    #[error("row {row} has {found} pixels, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors from parsing the image or drawing text formats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("line {line}: bad command {text:?}: {reason}")]
    MalformedInstruction {
        line: usize,
        text: String,
        reason: &'static str,
    },

    #[error("line {line}: expected the {field}, found {found:?}")]
    Header {
        line: usize,
        field: &'static str,
        found: String,
    },

    #[error("line {line}, column {column}: invalid pixel {found:?} (expected a hex digit 0-f)")]
    Pixel {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("inconsistent line lengths: {expected} on line 1 and {found} on line {line}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("image text is empty")]
    EmptyImage,

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Errors from replaying a drawing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("instruction {index} cannot be drawn at coordinate ({x}, {y})")]
    BoundsViolation { index: usize, x: i64, y: i64 },

    #[error("invalid canvas: {0}")]
    Canvas(#[from] RasterError),
}

/// Errors from encoding a raster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("no relocation candidate for colour {color} with the cursor at ({x}, {y})")]
    StuckWithNoCandidate { color: Color, x: i64, y: i64 },

    #[error("encoder did not finish within {limit} steps")]
    IterationLimit { limit: usize },
}
