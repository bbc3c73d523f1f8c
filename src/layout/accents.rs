//! Decorations drawn around a box: radicals, accents, braces, overlays, and extensible arrows.

use std::cmp::max;

use crate::error::RasterResult;
use crate::font::delim::{make_delim, DelimShape, Side};
use crate::font::SymbolTable;
use crate::parser::{parse_number, Lexer};
use crate::raster::compose::{self, blit, concat_vertical, Axis, StackBaseline};
use crate::raster::draw::{bezier_raster, line_raster, rule_raster, Point, RuleStyle};
use crate::raster::{BoxKind, Raster, Subraster};
use super::constants::*;
use super::context::RenderContext;
use super::engine::{argument_box, rasterize, required_box};
use super::{axis_height, centered_baseline, Rendered};

/// Accents placed over (or under) their argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentKind {
    /// `\bar`, `\overline`
    Bar,
    /// `\underline`
    Underline,
    /// `\dot`
    Dot,
    /// `\ddot`
    DDot,
    /// `\hat`, `\widehat`
    Hat,
    /// `\vec`
    Vec,
    /// `\tilde`, `\widetilde`
    Tilde,
    /// `\overbrace`, with an optional `^` label
    OverBrace,
    /// `\underbrace`, with an optional `_` label
    UnderBrace,
}

/// Marks drawn across their argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// a slash from the lower left to the upper right corner
    Slash,
    /// a horizontal line at mid height
    Strike,
}

/// Where the heads of an extensible arrow are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    /// right, or down
    Forward,
    /// left, or up
    Backward,
    /// both ends
    Both,
}

/// `\sqrt[index]{radicand}`
pub fn sqrt<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let index = match lex.optional_arg() {
        Some(index) => rasterize(index, ctx.size.saturating_sub(2), ctx)?,
        None => None,
    };
    let radicand = required_box(lex, ctx.size, ctx)?;

    let surd_height = radicand.height() + OVERSPACE;
    let surd_width  = (surd_height + 2) / 3 + 2;
    let tick_row    = surd_height * 2 / 3;

    // a wide index pushes the surd right, a tall one pushes everything down
    let (lead, above) = match &index {
        Some(index) => (
            index.width().saturating_sub(surd_width / 2),
            index.height().saturating_sub(tick_row.saturating_sub(1)),
        ),
        None => (0, 0),
    };

    let width  = lead + surd_width + radicand.width() + 1;
    let height = above + surd_height;
    let mut raster = ctx.raster(width, height)?;

    let (top, left) = (above as f64, lead as f64);
    let (sh, sw) = (surd_height as f64, surd_width as f64);
    let tick = top + tick_row as f64;
    let surd: [Point; 4] = [
        (tick, left),
        (tick - 1.0, left + sw / 4.0),
        (top + sh - 1.0, left + sw / 2.0),
        (top, left + sw - 1.0),
    ];
    let mut clipped = 0;
    for segment in surd.windows(2) {
        clipped += line_raster(&mut raster, segment[0], segment[1], 1);
    }
    let bar_start = lead + surd_width - 1;
    clipped += rule_raster(&mut raster, above as isize, bar_start as isize, width - bar_start, 1, RuleStyle::Solid);
    ctx.check_clipped(clipped)?;

    blit(&mut raster, &radicand.raster, (above + OVERSPACE) as isize, (lead + surd_width) as isize, false);
    if let Some(index) = &index {
        let row = (above + tick_row).saturating_sub(1 + index.height());
        let col = (lead + surd_width / 2).saturating_sub(index.width());
        blit(&mut raster, &index.raster, row as isize, col as isize, false);
    }

    let baseline = above + OVERSPACE + radicand.baseline;
    Ok(Some(Subraster::new(raster, baseline, ctx.size, BoxKind::ComposedImage)))
}

/// `\hat{x}` and the like.
pub fn accent<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: AccentKind) -> Rendered {
    let base = required_box(lex, ctx.size, ctx)?;
    let accented = match kind {
        AccentKind::OverBrace | AccentKind::UnderBrace => brace(lex, ctx, base, kind)?,
        AccentKind::Underline => {
            let mut rule = ctx.blank(base.width(), 1, 0)?;
            let clipped = rule_raster(&mut rule.raster, 0, 0, base.width(), 1, RuleStyle::Solid);
            ctx.check_clipped(clipped)?;
            concat_vertical(base, rule, StackBaseline::Top, 1, true, ctx.pixel_limit())?
        },
        _ => {
            let mark = accent_mark(kind, base.width(), ctx)?;
            concat_vertical(mark, base, StackBaseline::Bottom, 1, true, ctx.pixel_limit())?
        },
    };
    Ok(Some(accented))
}

/// Draws the mark of an accent over a base `base_width` pixels wide.
fn accent_mark<S: SymbolTable + ?Sized>(kind: AccentKind, base_width: usize, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    let em = ctx.em(ctx.size);
    let width = base_width.max(3);
    let height = match kind {
        AccentKind::Bar => 1,
        AccentKind::Dot | AccentKind::DDot => 2,
        AccentKind::Tilde => (em / 5).max(2) + 1,
        _ => (em / 4).max(3) | 1,
    };
    let mut mark = ctx.blank(width, height, height - 1)?;
    let raster = &mut mark.raster;
    let (w, h) = (width as f64, height as f64);

    let clipped = match kind {
        AccentKind::Bar => rule_raster(raster, 0, 0, width, 1, RuleStyle::Solid),
        AccentKind::Dot => rule_raster(raster, 0, (width / 2) as isize - 1, 2, 2, RuleStyle::Solid),
        AccentKind::DDot => {
            rule_raster(raster, 0, (width / 3) as isize - 1, 2, 2, RuleStyle::Solid)
                + rule_raster(raster, 0, (2 * width / 3) as isize - 1, 2, 2, RuleStyle::Solid)
        },
        AccentKind::Hat => {
            line_raster(raster, (h - 1.0, 0.0), (0.0, (w - 1.0) / 2.0), 1)
                + line_raster(raster, (0.0, (w - 1.0) / 2.0), (h - 1.0, w - 1.0), 1)
        },
        AccentKind::Vec => {
            let mid = (h - 1.0) / 2.0;
            line_raster(raster, (mid, 0.0), (mid, w - 1.0), 1)
                + line_raster(raster, (0.0, w - 1.0 - mid), (mid, w - 1.0), 1)
                + line_raster(raster, (h - 1.0, w - 1.0 - mid), (mid, w - 1.0), 1)
        },
        AccentKind::Tilde => {
            let mid = (h - 1.0) / 2.0;
            bezier_raster(raster, (h - 1.0, 0.0), (mid, w / 2.0), (0.0, w / 4.0))
                + bezier_raster(raster, (mid, w / 2.0), (0.0, w - 1.0), (h - 1.0, 3.0 * w / 4.0))
        },
        AccentKind::Underline | AccentKind::OverBrace | AccentKind::UnderBrace => 0,
    };
    ctx.check_clipped(clipped)?;
    Ok(mark.with_kind(BoxKind::ComposedImage))
}

/// `\overbrace{x}^{label}` and `\underbrace{x}_{label}`.
fn brace<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, base: Subraster, kind: AccentKind) -> RasterResult<Subraster> {
    // a left brace turned a quarter clockwise points up
    let upright = make_delim(DelimShape::Brace(Side::Left), base.width().max(3), ctx.settings.pixel_depth)?;
    let mut raster = compose::rotate90(&upright)?;
    if kind == AccentKind::UnderBrace {
        raster = compose::reflect(&raster, Axis::Horizontal)?;
    }
    let height = raster.height();
    let brace = Subraster::new(raster, height - 1, ctx.size, BoxKind::ComposedImage);

    let marker = if kind == AccentKind::OverBrace { '^' } else { '_' };
    let label = if lex.peek() == Some(marker) {
        lex.eat(marker);
        argument_box(lex, ctx.size.saturating_sub(1), ctx)?
    } else {
        None
    };

    if kind == AccentKind::OverBrace {
        let mut braced = concat_vertical(brace, base, StackBaseline::Bottom, 1, true, ctx.pixel_limit())?;
        if let Some(label) = label {
            braced = concat_vertical(label, braced, StackBaseline::Bottom, 1, true, ctx.pixel_limit())?;
        }
        Ok(braced)
    } else {
        let mut braced = concat_vertical(base, brace, StackBaseline::Top, 1, true, ctx.pixel_limit())?;
        if let Some(label) = label {
            braced = concat_vertical(braced, label, StackBaseline::Top, 1, true, ctx.pixel_limit())?;
        }
        Ok(braced)
    }
}

/// `\not{x}` and `\sout{x}`
pub fn overlay<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: OverlayKind) -> Rendered {
    let mut base = required_box(lex, ctx.size, ctx)?;
    let (w, h) = (base.width(), base.height());
    if w == 0 || h == 0 {
        return Ok(Some(base));
    }
    let clipped = match kind {
        OverlayKind::Slash => line_raster(&mut base.raster, ((h - 1) as f64, 0.0), (0.0, (w - 1) as f64), 1),
        OverlayKind::Strike => {
            let row = base.baseline.saturating_sub(ctx.em(ctx.size) / 3);
            rule_raster(&mut base.raster, row as isize, 0, w, 1, RuleStyle::Solid)
        },
    };
    ctx.check_clipped(clipped)?;
    Ok(Some(base.with_kind(BoxKind::ComposedImage)))
}

/// Consumes `^{above}` and `_{below}` labels, in either order.
fn labels<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> RasterResult<(Option<Subraster>, Option<Subraster>)> {
    let size = ctx.size.saturating_sub(1);
    let (mut above, mut below) = (None, None);
    let (mut seen_above, mut seen_below) = (false, false);
    loop {
        if !seen_above && lex.eat('^') {
            seen_above = true;
            above = argument_box(lex, size, ctx)?;
        } else if !seen_below && lex.eat('_') {
            seen_below = true;
            below = argument_box(lex, size, ctx)?;
        } else {
            return Ok((above, below));
        }
    }
}

fn requested_length(lex: &mut Lexer, default: usize) -> usize {
    match lex.optional_arg().and_then(parse_number) {
        Some(length) if length >= 1.0 => length.round() as usize,
        _ => default,
    }
}

/// `\longrightarrow[width]^{above}_{below}` and its siblings.
pub fn arrow<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: ArrowKind, double: bool) -> Rendered {
    let em = ctx.em(ctx.size);
    let requested = requested_length(lex, 2 * em);
    let (above, below) = labels(lex, ctx)?;

    let label_width = |label: &Option<Subraster>| label.as_ref().map_or(0, |label| label.width() + 2);
    let width  = max(requested, max(label_width(&above), label_width(&below)));
    let thick  = max((em / 3) | 1, 5);
    let mid    = thick / 2;
    let axis   = axis_height(em);
    let height = max(thick, mid + axis + 1);

    let mut raster = ctx.raster(width, height)?;
    let clipped = draw_arrow(&mut raster, width, thick, kind, double);
    ctx.check_clipped(clipped)?;

    let mut arrow = Subraster::new(raster, mid + axis, ctx.size, BoxKind::ComposedImage);
    if let Some(above) = above {
        arrow = concat_vertical(above, arrow, StackBaseline::Bottom, 1, true, ctx.pixel_limit())?;
    }
    if let Some(below) = below {
        arrow = concat_vertical(arrow, below, StackBaseline::Top, 1, true, ctx.pixel_limit())?;
    }
    Ok(Some(arrow))
}

/// Draws a horizontal arrow `length` long in the top `thick` rows of `raster`.
fn draw_arrow(raster: &mut Raster, length: usize, thick: usize, kind: ArrowKind, double: bool) -> usize {
    let mid = thick / 2;
    let (m, last, head) = (mid as f64, (length - 1) as f64, mid as f64);
    let mut clipped = 0;

    if double {
        clipped += rule_raster(raster, mid as isize - 1, 0, length, 1, RuleStyle::Solid);
        clipped += rule_raster(raster, mid as isize + 1, 0, length, 1, RuleStyle::Solid);
    } else {
        clipped += rule_raster(raster, mid as isize, 0, length, 1, RuleStyle::Solid);
    }
    if kind != ArrowKind::Backward {
        clipped += line_raster(raster, (m, last), (0.0, last - head), 1);
        clipped += line_raster(raster, (m, last), (2.0 * m, last - head), 1);
    }
    if kind != ArrowKind::Forward {
        clipped += line_raster(raster, (m, 0.0), (0.0, head), 1);
        clipped += line_raster(raster, (m, 0.0), (2.0 * m, head), 1);
    }
    clipped
}

/// `\longuparrow[height]` and its siblings, centered on the math axis.
pub fn vertical_arrow<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: ArrowKind, double: bool) -> Rendered {
    let em = ctx.em(ctx.size);
    let height = requested_length(lex, 2 * em);
    let thick  = max((em / 3) | 1, 5);

    // drawn lying down, then turned: a quarter clockwise brings the right end down
    let mut lying = ctx.raster(height, thick)?;
    let clipped = draw_arrow(&mut lying, height, thick, kind, double);
    ctx.check_clipped(clipped)?;
    let raster = compose::rotate90(&lying)?;

    let baseline = centered_baseline(height, em);
    Ok(Some(Subraster::new(raster, baseline, ctx.size, BoxKind::ComposedImage)))
}
