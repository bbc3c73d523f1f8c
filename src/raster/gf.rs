//! Decoding of run-length encoded glyph pixmaps.
//!
//! The stream is a sequence of run counts painting alternately background and ink, starting with
//! background as the paint commands of GF files do. Runs wrap from one row to the next.
//! A repeat opcode followed by a count `n` duplicates the row currently being painted `n` more
//! times once it is complete.

use super::{PixelDepth, Raster};
use crate::error::RasterResult;

/// How run counts are packed in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfFormat {
    /// one count per byte, `0xFF` is the repeat opcode
    Byte,
    /// one count per nibble, high nibble first, `0xF` is the repeat opcode
    Nibble,
}

impl GfFormat {
    fn repeat_opcode(self) -> u8 {
        match self {
            GfFormat::Byte   => 0xFF,
            GfFormat::Nibble => 0x0F,
        }
    }

    fn counts<'a>(self, data: &'a [u8]) -> Box<dyn Iterator<Item = u8> + 'a> {
        match self {
            GfFormat::Byte   => Box::new(data.iter().copied()),
            GfFormat::Nibble => Box::new(data.iter().flat_map(|&b| [b >> 4, b & 0x0F])),
        }
    }
}

/// Decodes `data` into a `width`x`height` monochrome bitmap.
/// Missing runs leave the remaining pixels blank; surplus runs are ignored.
pub fn gftobitmap(data: &[u8], format: GfFormat, width: usize, height: usize) -> RasterResult<Raster> {
    let mut bitmap = Raster::new(width, height, PixelDepth::One)?;
    let total = width * height;
    if total == 0 {
        return Ok(bitmap);
    }

    let mut counts = format.counts(data);
    let mut ink = false;
    let mut pos = 0;
    let mut repeat = 0;

    while pos < total {
        let count = match counts.next() {
            Some(count) => count,
            None => break,
        };
        if count == format.repeat_opcode() {
            repeat = counts.next().unwrap_or(0) as usize;
            continue;
        }

        for _ in 0 .. count {
            if pos >= total {
                break;
            }
            if ink {
                bitmap.ink((pos / width) as isize, (pos % width) as isize)?;
            }
            pos += 1;
            if pos % width == 0 && repeat > 0 {
                pos = duplicate_row(&mut bitmap, pos / width - 1, repeat)?;
                repeat = 0;
            }
        }
        ink = !ink;
    }
    Ok(bitmap)
}

/// Copies `row` onto the `times` rows below it; returns the position right after the last copy.
fn duplicate_row(bitmap: &mut Raster, row: usize, times: usize) -> RasterResult<usize> {
    let last = (row + times).min(bitmap.height() - 1);
    for target in row + 1 ..= last {
        for col in 0 .. bitmap.width() {
            let value = bitmap.get(row as isize, col as isize).unwrap_or(0);
            bitmap.set(target as isize, col as isize, value)?;
        }
    }
    Ok((last + 1) * bitmap.width())
}
