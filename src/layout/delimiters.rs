//! `\left ... \middle ... \right` and the fixed-size `\big` delimiters.

use crate::error::RasterResult;
use crate::font::SymbolTable;
use crate::parser::Lexer;
use crate::raster::compose::concat_horizontal;
use crate::raster::Subraster;
use super::context::RenderContext;
use super::engine::{conform, placeholder, rasterize};
use super::Rendered;

/// A delimiter at least `height` pixels tall, `None` for the null delimiter `.`.
pub fn delimiter<S: SymbolTable + ?Sized>(name: &str, height: usize, ctx: &mut RenderContext<S>) -> Rendered {
    if name == "." || name.is_empty() {
        return Ok(None);
    }
    match ctx.symbols.sized_delimiter(name, height, ctx.size) {
        Some(delimiter) => conform(delimiter, ctx).map(Some),
        None => {
            warn!("unknown delimiter {}", name);
            placeholder(ctx.size, ctx).map(Some)
        },
    }
}

/// Moves the baseline of `delimiter` so that it is vertically centered on an interior
/// `height` rows tall whose baseline is `above` rows below its top.
fn center_on(delimiter: &mut Subraster, above: usize, height: usize) {
    let own = delimiter.height();
    let baseline = if own >= height {
        above.saturating_sub(1) + (own - height) / 2
    } else {
        above.saturating_sub(1).saturating_sub((height - own) / 2)
    };
    delimiter.baseline = baseline.min(own.saturating_sub(1));
}

/// Sizes `left`, `middles` and `right` to the tallest of `parts` and joins everything.
///
/// `parts` holds the pieces between consecutive delimiters; missing pieces are skipped.
pub fn enclose<S: SymbolTable + ?Sized>(parts: Vec<Option<Subraster>>, left: &str, middles: &[&str], right: &str, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    let em = ctx.em(ctx.size);
    let above = parts.iter().flatten().map(|part| part.baseline + 1).max().unwrap_or(em);
    let below = parts.iter().flatten().map(Subraster::descent).max().unwrap_or(0);
    let height = above + below;

    let sized = |name: &str, ctx: &mut RenderContext<S>| -> Rendered {
        let mut delimiter = delimiter(name, height, ctx)?;
        if let Some(delimiter) = delimiter.as_mut() {
            center_on(delimiter, above, height);
        }
        Ok(delimiter)
    };

    let mut pieces = Vec::with_capacity(2 * parts.len() + 1);
    pieces.push(sized(left, ctx)?);
    let mut parts = parts.into_iter();
    if let Some(first) = parts.next() {
        pieces.push(first);
    }
    for (middle, part) in middles.iter().copied().zip(parts) {
        pieces.push(sized(middle, ctx)?);
        pieces.push(part);
    }
    pieces.push(sized(right, ctx)?);

    let mut result: Option<Subraster> = None;
    for piece in pieces.into_iter().flatten() {
        result = Some(match result {
            None => piece,
            Some(left) => concat_horizontal(left, piece, 0, None, ctx.pixel_limit())?,
        });
    }
    match result {
        Some(result) => Ok(result),
        None => ctx.blank(0, em, em - 1),
    }
}

/// `\left( ... \right)`, consuming everything up to the matching `\right`.
pub fn left_right<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let construct = lex.left_right();
    if construct.right.is_none() {
        warn!("\\left{} without \\right", construct.left);
    }

    let mut parts = Vec::with_capacity(construct.segments.len());
    for segment in &construct.segments {
        parts.push(rasterize(segment, ctx.size, ctx)?);
    }
    let right = construct.right.unwrap_or(".");
    enclose(parts, construct.left, &construct.middles, right, ctx).map(Some)
}

/// `\right` or `\middle` outside of a `\left` construct: a delimiter as tall as the
/// left expression.
pub fn unbalanced<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, command: &str) -> Rendered {
    let name = lex.delimiter().unwrap_or(".");
    warn!("\\{}{} without \\left", command, name);

    let em = ctx.em(ctx.size);
    let (above, height) = match &ctx.left_expression {
        Some(left) => (left.baseline + 1, left.height()),
        None => (em, em),
    };
    let mut delimiter = delimiter(name, height, ctx)?;
    if let Some(delimiter) = delimiter.as_mut() {
        center_on(delimiter, above, height);
    }
    Ok(delimiter)
}

/// `\big(`: a delimiter half an em taller per level.
pub fn big<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, level: u8) -> Rendered {
    let name = lex.delimiter().unwrap_or(".");
    let em = ctx.em(ctx.size);
    let mut delimiter = delimiter(name, em + level as usize * em / 2, ctx)?;
    if let Some(delimiter) = delimiter.as_mut() {
        center_on(delimiter, em, em);
    }
    Ok(delimiter)
}
