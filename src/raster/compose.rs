//! Composition primitives: every function consumes (or borrows) its inputs and returns a newly
//! allocated owner. Horizontal concatenation aligns baselines and may "smash" the right box
//! into the blank space left by the left box.

use std::cmp::max;

use super::{BoxKind, PixelDepth, Raster, Subraster};
use crate::error::RasterResult;

/// Copies `src` into `dest` with its top-left corner at `(row, col)`.
///
/// An opaque blit overwrites `dest` with every source pixel, blank ones included;
/// otherwise ink is merged on top of what is already there.
/// Returns `false` when part of `src` falls outside `dest`; the visible part is still copied.
pub fn blit(dest: &mut Raster, src: &Raster, row: isize, col: isize, opaque: bool) -> bool {
    let mut inside = true;
    let convert = src.depth() != dest.depth();
    let ink = dest.depth().ink();

    for r in 0 .. src.height() as isize {
        for c in 0 .. src.width() as isize {
            let mut value = src.get(r, c).unwrap_or(0);
            if convert && value != 0 {
                value = ink;
            }
            let (dr, dc) = (row + r, col + c);
            let existing = match dest.get(dr, dc) {
                Some(existing) => existing,
                None => {
                    inside = false;
                    continue;
                }
            };
            let value = if opaque { value } else { max(existing, value) };
            // in range, cannot fail
            let _ = dest.set(dr, dc, value);
        }
    }
    inside
}

fn common_depth(a: &Raster, b: &Raster) -> PixelDepth {
    if a.depth() == PixelDepth::Eight || b.depth() == PixelDepth::Eight {
        PixelDepth::Eight
    } else {
        PixelDepth::One
    }
}

/// Number of columns `right` may slide into `left` so that the inks of the two boxes,
/// once their baselines are aligned, stay at least `margin` pixels apart.
///
/// Rows within `margin` of each other are compared as well, the vertical distance counting
/// towards the separation. Boxes without ink are never smashed.
pub fn smash_amount(left: &Subraster, right: &Subraster, margin: usize) -> usize {
    if left.raster.is_blank() || right.raster.is_blank() {
        return 0;
    }

    let base   = max(left.baseline, right.baseline);
    let top_l  = base - left.baseline;
    let top_r  = base - right.baseline;
    let height = max(top_l + left.height(), top_r + right.height());

    // blank pixels at the end of each row of `left`, at the start of each row of `right`
    let tails: Vec<usize> = (0 .. height)
        .map(|row| if row >= top_l && row < top_l + left.height() {
            left.raster.trailing_blank(row - top_l)
        } else {
            left.width()
        })
        .collect();
    let heads: Vec<usize> = (0 .. height)
        .map(|row| if row >= top_r && row < top_r + right.height() {
            right.raster.leading_blank(row - top_r)
        } else {
            right.width()
        })
        .collect();

    let mut smallest = usize::MAX;
    for (i, &tail) in tails.iter().enumerate() {
        if tail == left.width() {
            continue;
        }
        let from = i.saturating_sub(margin);
        let to   = (i + margin).min(height - 1);
        for j in from ..= to {
            if heads[j] == right.width() {
                continue;
            }
            let dy = if i > j { i - j } else { j - i };
            smallest = smallest.min(tail + heads[j] + dy);
        }
    }

    if smallest == usize::MAX {
        return 0;
    }
    smallest.saturating_sub(margin).min(left.width())
}

/// Concatenates two boxes side by side, baselines aligned, with `space` blank columns in between.
///
/// With `smash` set to a margin, the right box is first moved left into the blank space of the
/// left box as long as the inks stay `margin` pixels apart (see [`smash_amount`]); `space` is
/// added after smashing.
/// Fails when the result would have more than `limit` pixels.
pub fn concat_horizontal(left: Subraster, right: Subraster, space: usize, smash: Option<usize>, limit: usize) -> RasterResult<Subraster> {
    let nsmash = match smash {
        Some(margin) => smash_amount(&left, &right, margin),
        None => 0,
    };

    let base    = max(left.baseline, right.baseline);
    let descent = max(left.descent(), right.descent());
    let height  = base + 1 + descent;
    let offset  = left.width() - nsmash + space;
    let width   = max(left.width(), offset + right.width());

    let mut raster = Raster::with_limit(width, height, common_depth(&left.raster, &right.raster), limit)?;
    blit(&mut raster, &left.raster,  (base - left.baseline) as isize,  0, false);
    blit(&mut raster, &right.raster, (base - right.baseline) as isize, offset as isize, false);

    Ok(Subraster {
        raster,
        baseline: base,
        size:     max(left.size, right.size),
        kind:     BoxKind::ComposedImage,
        symbol:   None,
    })
}

/// Which input of [`concat_vertical`] provides the baseline of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackBaseline {
    /// baseline of the upper box
    Top,
    /// baseline of the lower box
    Bottom,
}

/// Stacks `top` over `bottom`, `gap` blank rows apart, optionally centering both horizontally
/// (otherwise both are left aligned).
pub fn concat_vertical(top: Subraster, bottom: Subraster, base: StackBaseline, gap: usize, center: bool, limit: usize) -> RasterResult<Subraster> {
    let width  = max(top.width(), bottom.width());
    let height = top.height() + gap + bottom.height();
    let offset = |w: usize| if center { (width - w) / 2 } else { 0 };

    let mut raster = Raster::with_limit(width, height, common_depth(&top.raster, &bottom.raster), limit)?;
    blit(&mut raster, &top.raster, 0, offset(top.width()) as isize, false);
    blit(&mut raster, &bottom.raster, (top.height() + gap) as isize, offset(bottom.width()) as isize, false);

    let baseline = match base {
        StackBaseline::Top    => top.baseline,
        StackBaseline::Bottom => top.height() + gap + bottom.baseline,
    };
    Ok(Subraster::new(raster, baseline, max(top.size, bottom.size), BoxKind::ComposedImage))
}

/// Rotates a raster by 90 degrees clockwise.
pub fn rotate90(raster: &Raster) -> RasterResult<Raster> {
    let (w, h) = (raster.width(), raster.height());
    let mut rotated = Raster::new(h, w, raster.depth())?;
    for row in 0 .. w as isize {
        for col in 0 .. h as isize {
            let value = raster.get(h as isize - 1 - col, row).unwrap_or(0);
            if value != 0 {
                rotated.set(row, col, value)?;
            }
        }
    }
    Ok(rotated)
}

/// Mirror axis for [`reflect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// left and right are swapped
    Vertical,
    /// top and bottom are swapped
    Horizontal,
}

/// Mirrors a raster about one of its axes.
pub fn reflect(raster: &Raster, axis: Axis) -> RasterResult<Raster> {
    let (w, h) = (raster.width() as isize, raster.height() as isize);
    let mut reflected = Raster::new(raster.width(), raster.height(), raster.depth())?;
    for row in 0 .. h {
        for col in 0 .. w {
            let value = match axis {
                Axis::Vertical   => raster.get(row, w - 1 - col),
                Axis::Horizontal => raster.get(h - 1 - row, col),
            }.unwrap_or(0);
            if value != 0 {
                reflected.set(row, col, value)?;
            }
        }
    }
    Ok(reflected)
}

/// Scales a raster up by an integer factor, each pixel becoming a `factor`x`factor` block.
pub fn magnify(raster: &Raster, factor: usize, limit: usize) -> RasterResult<Raster> {
    let factor = factor.max(1);
    let mut magnified = Raster::with_limit(raster.width() * factor, raster.height() * factor, raster.depth(), limit)?;
    for row in 0 .. magnified.height() {
        for col in 0 .. magnified.width() {
            let value = raster.get((row / factor) as isize, (col / factor) as isize).unwrap_or(0);
            if value != 0 {
                magnified.set(row as isize, col as isize, value)?;
            }
        }
    }
    Ok(magnified)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::MAX_RASTER_PIXELS;

    fn bar(width: usize, height: usize, baseline: usize, col: usize) -> Subraster {
        let mut raster = Raster::new(width, height, PixelDepth::One).unwrap();
        for row in 0 .. height {
            raster.ink(row as isize, col as isize).unwrap();
        }
        Subraster::new(raster, baseline, 3, BoxKind::Glyph)
    }

    #[test]
    fn horizontal_concat_aligns_baselines() {
        let left  = bar(3, 5, 4, 0);
        let right = bar(2, 8, 5, 1);
        let both  = concat_horizontal(left, right, 1, None, MAX_RASTER_PIXELS).unwrap();

        assert_eq!(both.baseline, 5);
        assert_eq!(both.height(), 8);
        assert_eq!(both.width(), 6);
        // left bar occupies rows 1..=5 of column 0
        assert!(!both.raster.is_set(0, 0));
        assert!(both.raster.is_set(1, 0));
        assert!(both.raster.is_set(5, 0));
        assert!(!both.raster.is_set(6, 0));
        // right bar sits at offset 3 + 1, column 1 inside it
        assert!(both.raster.is_set(0, 5));
        assert!(both.raster.is_set(7, 5));
        assert_eq!(both.kind, BoxKind::ComposedImage);
    }

    #[test]
    fn smash_keeps_margin_between_inks() {
        // ink in column 0 of a 6 wide box: 5 trailing blanks; ink in column 3 of right box
        let left  = bar(6, 4, 3, 0);
        let right = bar(6, 4, 3, 3);
        assert_eq!(smash_amount(&left, &right, 2), 5 + 3 - 2);

        let both = concat_horizontal(left, right, 0, Some(2), MAX_RASTER_PIXELS).unwrap();
        let inked: Vec<usize> = (0 .. both.width())
            .filter(|&c| both.raster.is_set(0, c as isize))
            .collect();
        assert_eq!(inked, vec![0, 3]);
    }

    #[test]
    fn blank_boxes_are_not_smashed() {
        let left  = Subraster::blank(5, 4, 3, 3, PixelDepth::One).unwrap();
        let right = bar(3, 4, 3, 2);
        assert_eq!(smash_amount(&left, &right, 0), 0);
    }

    #[test]
    fn vertical_stack() {
        let top    = bar(2, 3, 2, 0);
        let bottom = bar(6, 2, 1, 5);
        let stacked = concat_vertical(top, bottom, StackBaseline::Bottom, 1, true, MAX_RASTER_PIXELS).unwrap();
        assert_eq!(stacked.height(), 6);
        assert_eq!(stacked.width(), 6);
        assert_eq!(stacked.baseline, 5);
        // top centered: offset 2
        assert!(stacked.raster.is_set(0, 2));
        assert!(!stacked.raster.is_set(3, 2));
        assert!(stacked.raster.is_set(4, 5));
    }

    #[test]
    fn blit_reports_clipping() {
        let mut dest = Raster::new(4, 4, PixelDepth::One).unwrap();
        let src = bar(2, 2, 1, 1).raster;
        assert!(blit(&mut dest, &src, 0, 0, false));
        assert!(!blit(&mut dest, &src, 3, 3, false));
        assert!(dest.is_set(0, 1));
        assert!(dest.is_set(3, 3) == false);
    }

    #[test]
    fn rotation_and_reflection() {
        let mut raster = Raster::new(3, 2, PixelDepth::One).unwrap();
        raster.ink(0, 0).unwrap();
        raster.ink(0, 1).unwrap();
        raster.ink(1, 2).unwrap();
        // **.
        // ..*
        let rotated = rotate90(&raster).unwrap();
        assert_eq!(rotated.to_string(), ".*\n.*\n*.\n");

        let mirrored = reflect(&raster, Axis::Vertical).unwrap();
        assert_eq!(mirrored.to_string(), ".**\n*..\n");
        let flipped = reflect(&raster, Axis::Horizontal).unwrap();
        assert_eq!(flipped.to_string(), "..*\n**.\n");

        let four_times = (0 .. 4).try_fold(raster.clone(), |r, _| rotate90(&r)).unwrap();
        assert_eq!(four_times, raster);
    }

    #[test]
    fn magnification() {
        let mut raster = Raster::new(2, 1, PixelDepth::One).unwrap();
        raster.ink(0, 1).unwrap();
        assert_eq!(magnify(&raster, 2, MAX_RASTER_PIXELS).unwrap().to_string(), "..**\n..**\n");
        assert!(magnify(&raster, 2, 7).is_err());
    }

    #[test]
    fn concatenations_respect_the_budget() {
        // 3x5 and 2x8 side by side: 6x8
        assert!(concat_horizontal(bar(3, 5, 4, 0), bar(2, 8, 5, 1), 1, None, 47).is_err());
        assert!(concat_horizontal(bar(3, 5, 4, 0), bar(2, 8, 5, 1), 1, None, 48).is_ok());
        // 2x3 over 6x2: 6x6
        assert!(concat_vertical(bar(2, 3, 2, 0), bar(6, 2, 1, 5), StackBaseline::Top, 1, true, 35).is_err());
    }
}
