//! Pixel buffers and the boxes built from them.
//!
//! A [`Raster`] is a plain rectangle of pixels, either packed one bit per pixel or one byte per pixel.
//! A [`Subraster`] is the unit of composition used by the layout engine: a raster plus a baseline,
//! the font size it was produced at, and a [`BoxKind`] tag telling later concatenations whether the
//! box may be "smashed" (kerned) against its neighbours.
//!
//! Rasters are owned: composition primitives in [`compose`] consume their inputs and return a new
//! owner, so each buffer has exactly one owner at any time.

pub mod compose;
pub mod draw;
pub mod gf;

use std::fmt;

use crate::error::{RasterError, RasterResult};
use crate::font::SymbolDef;

/// Hard ceiling on the number of pixels of a single raster.
/// [`RenderSettings`](crate::layout::RenderSettings) can impose a lower one.
pub const MAX_RASTER_PIXELS: usize = 1 << 26;

/// Number of bits used to store one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelDepth {
    /// Monochrome, one bit per pixel, packed.
    One,
    /// Grayscale or palette index, one byte per pixel.
    Eight,
}

impl PixelDepth {
    /// Bits per pixel
    pub fn bits(self) -> usize {
        match self {
            PixelDepth::One   => 1,
            PixelDepth::Eight => 8,
        }
    }

    /// Value written for a fully inked pixel.
    pub fn ink(self) -> u8 {
        match self {
            PixelDepth::One   => 1,
            PixelDepth::Eight => 255,
        }
    }
}

impl Default for PixelDepth {
    fn default() -> Self {
        PixelDepth::One
    }
}

/// A rectangular pixel buffer.
///
/// Pixels are stored row after row; with [`PixelDepth::One`] the bits are packed continuously
/// (no padding at the end of a row), least significant bit first.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width:  usize,
    height: usize,
    depth:  PixelDepth,
    pixels: Vec<u8>,
}

impl Raster {
    /// Allocates a blank raster.
    pub fn new(width: usize, height: usize, depth: PixelDepth) -> RasterResult<Self> {
        Self::with_limit(width, height, depth, MAX_RASTER_PIXELS)
    }

    /// Allocates a blank raster, refusing rasters of more than `limit` pixels.
    pub fn with_limit(width: usize, height: usize, depth: PixelDepth, limit: usize) -> RasterResult<Self> {
        let too_large = RasterError::TooLarge { width, height, limit };
        let n_pixels = width.checked_mul(height).ok_or(too_large.clone())?;
        if n_pixels > limit {
            return Err(too_large);
        }
        let n_bytes = (n_pixels * depth.bits() + 7) / 8;
        Ok(Self {
            width,
            height,
            depth,
            pixels: vec![0; n_bytes],
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel depth, fixed at creation
    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    /// Underlying storage
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Reads the pixel at `(row, col)`, `None` if outside the raster.
    pub fn get(&self, row: isize, col: isize) -> Option<u8> {
        if !self.contains(row, col) {
            return None;
        }
        let index = row as usize * self.width + col as usize;
        Some(match self.depth {
            PixelDepth::One   => (self.pixels[index / 8] >> (index % 8)) & 1,
            PixelDepth::Eight => self.pixels[index],
        })
    }

    /// Writes the pixel at `(row, col)`. Writes outside the raster are refused.
    /// With a 1-bit raster, any non-zero value sets the bit.
    pub fn set(&mut self, row: isize, col: isize, value: u8) -> RasterResult<()> {
        if !self.contains(row, col) {
            return Err(RasterError::OutOfBounds { row, col });
        }
        let index = row as usize * self.width + col as usize;
        match self.depth {
            PixelDepth::One => {
                let mask = 1 << (index % 8);
                if value != 0 {
                    self.pixels[index / 8] |= mask;
                } else {
                    self.pixels[index / 8] &= !mask;
                }
            },
            PixelDepth::Eight => self.pixels[index] = value,
        }
        Ok(())
    }

    /// Sets the pixel at `(row, col)` to full ink.
    pub fn ink(&mut self, row: isize, col: isize) -> RasterResult<()> {
        let ink = self.depth.ink();
        self.set(row, col, ink)
    }

    /// Whether the pixel at `(row, col)` carries any ink. Outside pixels are blank.
    pub fn is_set(&self, row: isize, col: isize) -> bool {
        self.get(row, col).map_or(false, |v| v != 0)
    }

    /// Pixel value seen by an image encoder, with `x` the column and `y` the row.
    /// Pixels outside the raster read as background (0).
    pub fn color_index(&self, x: usize, y: usize) -> u8 {
        self.get(y as isize, x as isize).unwrap_or(0)
    }

    /// Whether the raster carries no ink at all
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }

    /// Number of blank pixels at the start of `row`; the full width for an empty row.
    pub fn leading_blank(&self, row: usize) -> usize {
        (0 .. self.width)
            .position(|col| self.is_set(row as isize, col as isize))
            .unwrap_or(self.width)
    }

    /// Number of blank pixels at the end of `row`; the full width for an empty row.
    pub fn trailing_blank(&self, row: usize) -> usize {
        (0 .. self.width)
            .rev()
            .position(|col| self.is_set(row as isize, col as isize))
            .unwrap_or(self.width)
    }

    /// Number of blank columns on the right of the whole raster.
    pub fn trailing_blank_columns(&self) -> usize {
        (0 .. self.height)
            .map(|row| self.trailing_blank(row))
            .min()
            .unwrap_or(self.width)
    }

    /// Copies the raster into a newly allocated raster of the given depth.
    /// Ink is mapped to full ink; with 8-bit sources any non-zero value counts as ink.
    pub fn to_depth(&self, depth: PixelDepth) -> RasterResult<Raster> {
        let mut converted = Raster::new(self.width, self.height, depth)?;
        for row in 0 .. self.height as isize {
            for col in 0 .. self.width as isize {
                let value = self.get(row, col).unwrap_or(0);
                let value = match (self.depth, depth) {
                    (PixelDepth::One, PixelDepth::Eight) if value != 0 => 255,
                    _ => value,
                };
                converted.set(row, col, value)?;
            }
        }
        Ok(converted)
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Raster {}x{} ({:?})", self.width, self.height, self.depth)?;
        fmt::Display::fmt(self, f)
    }
}

/// One character per pixel: `.` for background, `*` for ink (or a gray ramp for 8-bit rasters).
impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const RAMP: &[u8] = b".:-=+*#%@";
        for row in 0 .. self.height as isize {
            for col in 0 .. self.width as isize {
                let value = self.get(row, col).unwrap_or(0);
                let c = match self.depth {
                    PixelDepth::One   => if value != 0 { '*' } else { '.' },
                    PixelDepth::Eight => RAMP[value as usize * (RAMP.len() - 1) / 255] as char,
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// What a [`Subraster`] was built from; decides whether it may be smashed against its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// A single rendered glyph
    Glyph,
    /// Anything assembled from smaller boxes
    ComposedImage,
    /// A fraction; outer layout may align on its dividing rule
    FractionImage,
    /// Plain text, never smashed
    AsciiString,
    /// Explicitly protected from smashing (spaces, struts)
    NoSmash,
}

impl BoxKind {
    /// Whether concatenation may kern this box against a neighbour.
    pub fn allows_smash(self) -> bool {
        !matches!(self, BoxKind::AsciiString | BoxKind::NoSmash)
    }
}

/// A raster with typesetting information: the unit composed by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Subraster {
    /// Pixels of the box
    pub raster:   Raster,
    /// Row aligned with the baseline of the surrounding text
    pub baseline: usize,
    /// Font size level (0 to 7) the box was produced at
    pub size:     u8,
    /// What the box was built from
    pub kind:     BoxKind,
    /// Glyph definition, for glyph boxes only
    pub symbol:   Option<SymbolDef>,
}

impl Subraster {
    /// Wraps a raster; the baseline is clamped inside the raster.
    pub fn new(raster: Raster, baseline: usize, size: u8, kind: BoxKind) -> Self {
        let baseline = baseline.min(raster.height().saturating_sub(1));
        Self { raster, baseline, size, kind, symbol: None }
    }

    /// A blank box of the given dimensions, protected from smashing.
    pub fn blank(width: usize, height: usize, baseline: usize, size: u8, depth: PixelDepth) -> RasterResult<Self> {
        let raster = Raster::new(width, height, depth)?;
        Ok(Self::new(raster, baseline, size, BoxKind::NoSmash))
    }

    /// Width of the box
    pub fn width(&self) -> usize {
        self.raster.width()
    }

    /// Height of the box
    pub fn height(&self) -> usize {
        self.raster.height()
    }

    /// Rows strictly below the baseline
    pub fn descent(&self) -> usize {
        self.height().saturating_sub(self.baseline + 1)
    }

    /// Returns the same box with another kind
    pub fn with_kind(mut self, kind: BoxKind) -> Self {
        self.kind = kind;
        self
    }

    /// Pads the box with `margin` blank pixels on every side and, for 1-bit rasters,
    /// up to a byte-aligned width, ready to be handed to an image encoder.
    pub fn into_export(self, margin: usize) -> RasterResult<Subraster> {
        let raster = draw::border_raster(&self.raster, margin, margin, margin, false, MAX_RASTER_PIXELS)?;
        Ok(Subraster {
            raster,
            baseline: self.baseline + margin,
            ..self
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_bits_are_addressed_row_major() {
        let mut raster = Raster::new(5, 3, PixelDepth::One).unwrap();
        assert_eq!(raster.pixels().len(), 2);

        raster.set(1, 2, 1).unwrap();
        raster.set(2, 4, 7).unwrap();
        assert_eq!(raster.get(1, 2), Some(1));
        assert_eq!(raster.get(2, 4), Some(1));
        assert_eq!(raster.get(0, 0), Some(0));
        // bit 7 and bit 14
        assert_eq!(raster.pixels(), &[0b1000_0000, 0b0100_0000]);

        raster.set(1, 2, 0).unwrap();
        assert_eq!(raster.get(1, 2), Some(0));
    }

    #[test]
    fn out_of_range_writes_are_refused() {
        let mut raster = Raster::new(4, 4, PixelDepth::Eight).unwrap();
        let before = raster.clone();
        assert_eq!(raster.set(4, 0, 9), Err(RasterError::OutOfBounds { row: 4, col: 0 }));
        assert_eq!(raster.set(0, -1, 9), Err(RasterError::OutOfBounds { row: 0, col: -1 }));
        assert_eq!(raster, before);
        assert_eq!(raster.get(-1, 2), None);
    }

    #[test]
    fn allocation_limit() {
        assert!(Raster::with_limit(100, 100, PixelDepth::One, 9_999).is_err());
        assert!(Raster::with_limit(100, 100, PixelDepth::One, 10_000).is_ok());
        assert!(Raster::new(usize::MAX, 2, PixelDepth::One).is_err());
    }

    #[test]
    fn depth_conversion_allocates_new_raster() {
        let mut raster = Raster::new(3, 2, PixelDepth::One).unwrap();
        raster.ink(0, 1).unwrap();
        let gray = raster.to_depth(PixelDepth::Eight).unwrap();
        assert_eq!(gray.depth(), PixelDepth::Eight);
        assert_eq!(gray.get(0, 1), Some(255));
        assert_eq!(raster.depth(), PixelDepth::One);

        let back = gray.to_depth(PixelDepth::One).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn blank_runs() {
        let mut raster = Raster::new(6, 2, PixelDepth::One).unwrap();
        raster.ink(0, 2).unwrap();
        assert_eq!(raster.leading_blank(0), 2);
        assert_eq!(raster.trailing_blank(0), 3);
        assert_eq!(raster.leading_blank(1), 6);
        assert_eq!(raster.trailing_blank_columns(), 3);
    }

    #[test]
    fn ascii_dump() {
        let mut raster = Raster::new(3, 2, PixelDepth::One).unwrap();
        raster.ink(0, 0).unwrap();
        raster.ink(1, 2).unwrap();
        assert_eq!(raster.to_string(), "*..\n..*\n");
    }

    #[test]
    fn baseline_is_clamped() {
        let raster = Raster::new(2, 3, PixelDepth::One).unwrap();
        let sp = Subraster::new(raster, 10, 3, BoxKind::Glyph);
        assert_eq!(sp.baseline, 2);
        assert_eq!(sp.descent(), 0);
    }
}
