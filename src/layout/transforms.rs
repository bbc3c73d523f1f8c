//! Commands transforming the box of their argument: raising, rotating, mirroring, framing
//! and magnifying it.

use crate::error::RasterResult;
use crate::font::SymbolTable;
use crate::parser::{parse_number, Lexer};
use crate::raster::compose::{blit, magnify as scale, reflect as mirror, rotate90, Axis};
use crate::raster::draw::{backspace_raster, border_raster};
use crate::raster::{BoxKind, PixelDepth, Subraster};
use super::centered_baseline;
use super::context::RenderContext;
use super::engine::required_box;
use super::Rendered;

const FRAME_MARGIN: usize = 2;
const MAX_MAGNIFICATION: usize = 10;

/// Adds `top` blank rows above `boxed` and `bottom` below it.
fn pad<S: SymbolTable + ?Sized>(boxed: Subraster, top: usize, bottom: usize, ctx: &RenderContext<S>) -> RasterResult<Subraster> {
    if top == 0 && bottom == 0 {
        return Ok(boxed);
    }
    let mut raster = ctx.raster(boxed.width(), boxed.height() + top + bottom)?;
    blit(&mut raster, &boxed.raster, top as isize, 0, true);
    Ok(Subraster::new(raster, boxed.baseline + top, boxed.size, boxed.kind))
}

/// A numeric argument, in braces or brackets.
fn number_argument(argument: Option<&str>, command: &str) -> Option<f64> {
    let value = argument.and_then(parse_number);
    if value.is_none() {
        warn!("\\{} expects a number, got {:?}", command, argument);
    }
    value
}

/// `\raisebox{n}{expr}`: moves the box `n` pixels up, or down when `n` is negative.
pub fn raise<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let lift = number_argument(lex.argument(), "raisebox").unwrap_or(0.).round() as isize;
    let boxed = required_box(lex, ctx.size, ctx)?;

    let shift = lift.unsigned_abs();
    let raised = if lift >= 0 {
        let baseline = boxed.baseline + shift;
        let below = (baseline + 1).saturating_sub(boxed.height());
        let mut raised = pad(boxed, 0, below, ctx)?;
        raised.baseline = baseline;
        raised
    } else if shift <= boxed.baseline {
        let baseline = boxed.baseline - shift;
        Subraster { baseline, ..boxed }
    } else {
        let top = shift - boxed.baseline;
        let mut lowered = pad(boxed, top, 0, ctx)?;
        lowered.baseline = 0;
        lowered
    };
    Ok(Some(raised.with_kind(BoxKind::ComposedImage)))
}

/// `\rotatebox{degrees}{expr}`, counterclockwise, rounded to a multiple of 90 degrees.
pub fn rotate<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let degrees = number_argument(lex.argument(), "rotatebox").unwrap_or(0.);
    let boxed = required_box(lex, ctx.size, ctx)?;

    let quarters = (degrees / 90.).round() as i64;
    let clockwise = (4 - quarters.rem_euclid(4)) % 4;
    if clockwise == 0 {
        return Ok(Some(boxed));
    }

    let mut raster = boxed.raster.clone();
    for _ in 0 .. clockwise {
        raster = rotate90(&raster)?;
    }
    let em = ctx.em(ctx.size);
    let baseline = match clockwise {
        2 => boxed.baseline,
        // the old width is the new height
        _ if boxed.width() <= em => raster.height().saturating_sub(1),
        _ => centered_baseline(raster.height(), em),
    };
    Ok(Some(Subraster::new(raster, baseline, boxed.size, BoxKind::ComposedImage)))
}

/// `\reflectbox[axis]{expr}`: mirrored left to right, or top to bottom with `[2]`.
pub fn reflect<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let axis = match lex.optional_arg().map(str::trim) {
        None | Some("1") => Axis::Vertical,
        Some("2") => Axis::Horizontal,
        Some(other) => {
            warn!("unknown \\reflectbox axis {}", other);
            Axis::Vertical
        },
    };
    let boxed = required_box(lex, ctx.size, ctx)?;
    let raster = mirror(&boxed.raster, axis)?;
    Ok(Some(Subraster::new(raster, boxed.baseline, boxed.size, BoxKind::ComposedImage)))
}

/// `\fbox[margin]{expr}`: a one pixel frame, `margin` pixels out from the box.
pub fn frame_box<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let em = ctx.em(ctx.size);
    let margin = match lex.optional_arg() {
        Some(margin) => number_argument(Some(margin), "fbox")
            .map_or(FRAME_MARGIN, |margin| (margin.round().max(1.) as usize).min(em)),
        None => FRAME_MARGIN,
    };
    let boxed = required_box(lex, ctx.size, ctx)?;
    let width = boxed.width() + 2 * margin;

    let mut framed = border_raster(&boxed.raster, margin, margin, margin, true, ctx.pixel_limit())?;
    if framed.depth() == PixelDepth::One && framed.width() > width {
        framed = backspace_raster(&framed, framed.width() - width, None)?.0;
    }
    Ok(Some(Subraster::new(framed, boxed.baseline + margin, boxed.size, BoxKind::ComposedImage)))
}

/// `\magnify{n}{expr}`: every pixel becomes an `n`x`n` block.
pub fn magnify<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let factor = match lex.optional_arg() {
        Some(factor) => Some(factor),
        None => lex.argument(),
    };
    let factor = number_argument(factor, "magnify")
        .map_or(2, |factor| factor.round().max(1.) as usize)
        .min(MAX_MAGNIFICATION);
    let boxed = required_box(lex, ctx.size, ctx)?;

    let raster = scale(&boxed.raster, factor, ctx.pixel_limit())?;
    let baseline = (boxed.baseline + 1) * factor - 1;
    Ok(Some(Subraster::new(raster, baseline, boxed.size, BoxKind::ComposedImage)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;
    use crate::layout::constants::NORMALSIZE;
    use crate::layout::engine::rasterize;
    use crate::layout::RenderSettings;

    fn render(expression: &str) -> Subraster {
        let font = BuiltinFont::new();
        let mut ctx = RenderContext::new(&font, RenderSettings::default());
        rasterize(expression, NORMALSIZE, &mut ctx).unwrap().unwrap()
    }

    #[test]
    fn raised_and_lowered() {
        let x = render("x");
        let raised = render(r"\raisebox{3}{x}");
        assert_eq!(raised.baseline, x.baseline + 3);
        assert_eq!(raised.height(), x.height() + 3);

        let lowered = render(r"\raisebox{-3}{x}");
        assert_eq!(lowered.baseline, x.baseline - 3);
        assert_eq!(lowered.raster, x.raster);

        let sunk = render(r"\raisebox{-100}{x}");
        assert_eq!(sunk.baseline, 0);
        assert_eq!(sunk.height(), x.height() + 100 - x.baseline);
    }

    #[test]
    fn quarter_turns() {
        let word = render(r"\text{ab}");
        let turned = render(r"\rotatebox{90}{\text{ab}}");
        assert_eq!((turned.width(), turned.height()), (word.height(), word.width()));
        let back = render(r"\rotatebox{-90}{\rotatebox{90}{\text{ab}}}");
        assert_eq!(back.raster, word.raster);
        let full = render(r"\rotatebox{360}{\text{ab}}");
        assert_eq!(full.raster, word.raster);
        // rounded to the closest quarter turn
        let rounded = render(r"\rotatebox{80}{\text{ab}}");
        assert_eq!(rounded.raster, turned.raster);
    }

    #[test]
    fn half_turn_keeps_the_baseline() {
        let word = render(r"\text{ab}");
        let upside_down = render(r"\rotatebox{180}{\text{ab}}");
        assert_eq!(upside_down.baseline, word.baseline);
        let twice = render(r"\rotatebox{180}{\rotatebox{180}{\text{ab}}}");
        assert_eq!(twice.raster, word.raster);
    }

    #[test]
    fn reflections() {
        let word = render(r"\text{ab}");
        let mirrored = render(r"\reflectbox{\text{ab}}");
        let (w, h) = (word.width() as isize, word.height() as isize);
        for row in 0 .. h {
            for col in 0 .. w {
                assert_eq!(mirrored.raster.is_set(row, col), word.raster.is_set(row, w - 1 - col));
            }
        }
        let flipped = render(r"\reflectbox[2]{\reflectbox[2]{\text{ab}}}");
        assert_eq!(flipped.raster, word.raster);
    }

    #[test]
    fn framed_box() {
        let x = render("x");
        let framed = render(r"\fbox{x}");
        assert_eq!(framed.width(), x.width() + 4);
        assert_eq!(framed.height(), x.height() + 4);
        assert_eq!(framed.baseline, x.baseline + 2);
        let (w, h) = (framed.width() as isize, framed.height() as isize);
        for &(row, col) in &[(0, 0), (0, w - 1), (h - 1, 0), (h - 1, w - 1)] {
            assert!(framed.raster.is_set(row, col));
        }
        let wide = render(r"\fbox[4]{x}");
        assert_eq!(wide.width(), x.width() + 8);
    }

    #[test]
    fn magnified() {
        let x = render("x");
        let large = render(r"\magnify{3}{x}");
        assert_eq!(large.width(), 3 * x.width());
        assert_eq!(large.height(), 3 * x.height());
        assert_eq!(large.baseline, 3 * (x.baseline + 1) - 1);
        let capped = render(r"\magnify{50}{x}");
        assert_eq!(capped.width(), MAX_MAGNIFICATION * x.width());
    }

    #[test]
    fn magnification_within_the_budget() {
        let font = BuiltinFont::new();
        let mut settings = RenderSettings::default();
        settings.max_raster_pixels = 5000;
        let mut ctx = RenderContext::new(&font, settings);
        let boxed = rasterize(r"\magnify{10}{x}", NORMALSIZE, &mut ctx).unwrap().unwrap();
        assert_eq!(boxed.width(), render(r"\text{[?]}").width());
    }

    #[test]
    fn padding() {
        let font = BuiltinFont::new();
        let ctx = RenderContext::new(&font, RenderSettings::default());
        let x = render("x");
        let padded = pad(x.clone(), 2, 3, &ctx).unwrap();
        assert_eq!(padded.height(), x.height() + 5);
        assert_eq!(padded.baseline, x.baseline + 2);
    }
}
