//! Defines the error types produced while rendering an expression.
//!   - [`RasterError`] : a pixel buffer could not be allocated or addressed (too large, out of bounds).
//!   - [`Error`] : everything that can make [`render`](crate::render) fail as a whole.
//!
//! Malformed expressions are *not* errors: unknown commands and missing operands are replaced
//! by a visible `[?]` placeholder so that the rest of the expression still renders.

use std::fmt;

/// Result type for the [`RasterError`]
pub type RasterResult<T> = ::std::result::Result<T, RasterError>;

/// Errors having to do with pixel buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    /// The requested raster exceeds the pixel budget.
    TooLarge {
        /// requested width in pixels
        width:  usize,
        /// requested height in pixels
        height: usize,
        /// maximal number of pixels allowed
        limit:  usize,
    },
    /// A pixel access fell outside the raster.
    OutOfBounds {
        /// row of the access
        row: isize,
        /// column of the access
        col: isize,
    },
    /// In strict mode, drawing fell outside its canvas: the count of refused pixels,
    /// or of picture elements placed partly outside.
    Clipped(usize),
}

/// A generic error type covering any error that may happen during rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Nothing left to render once the preamble was stripped.
    EmptyExpression,
    /// a raster error (allocation or addressing)
    Raster(RasterError),
}

impl From<RasterError> for Error {
    fn from(e: RasterError) -> Self {
        Error::Raster(e)
    }
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::RasterError::*;
        match *self {
            TooLarge { width, height, limit } =>
                write!(f, "raster of {}x{} pixels exceeds the limit of {} pixels", width, height, limit),
            OutOfBounds { row, col } =>
                write!(f, "pixel ({}, {}) lies outside the raster", row, col),
            Clipped(n) =>
                write!(f, "{} drawing operations fell outside the canvas", n),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::EmptyExpression =>
                write!(f, "empty expression"),
            Error::Raster(ref e) =>
                write!(f, "raster error: {}", e),
        }
    }
}

impl std::error::Error for RasterError {}
impl std::error::Error for Error {}
