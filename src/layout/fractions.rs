//! Fractions, binomials and stacked relations.

use std::cmp::max;

use crate::error::RasterResult;
use crate::font::SymbolTable;
use crate::parser::Lexer;
use crate::raster::compose::{blit, concat_vertical, StackBaseline};
use crate::raster::draw::{rule_raster, RuleStyle};
use crate::raster::{BoxKind, Subraster};
use super::constants::*;
use super::context::RenderContext;
use super::delimiters::enclose;
use super::engine::{empty_box, rasterize, required_box};
use super::{axis_height, Rendered};

/// What separates a numerator from its denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FracKind {
    /// a rule
    Frac,
    /// nothing
    Atop,
    /// nothing, the whole wrapped in parentheses
    Choose,
}

/// Which argument of a stacking command goes in the middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// `\stackrel{above}{base}`
    Over,
    /// `\underset{below}{base}`
    Under,
}

/// `\frac{num}{den}`, arguments rendered `demote` levels smaller.
pub fn fraction<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: FracKind, demote: u8) -> Rendered {
    let size = ctx.size.saturating_sub(demote);
    let numerator = required_box(lex, size, ctx)?;
    let denominator = required_box(lex, size, ctx)?;
    build(numerator, denominator, kind, ctx).map(Some)
}

/// `num \over den`: the left expression over everything that follows.
pub fn infix<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: FracKind) -> Rendered {
    let numerator = match ctx.left_expression.take() {
        Some(numerator) => numerator,
        None => empty_box(ctx.size, ctx)?,
    };
    let rest = lex.rest();
    let denominator = match rasterize(rest, ctx.size, ctx)? {
        Some(denominator) => denominator,
        None => empty_box(ctx.size, ctx)?,
    };
    build(numerator, denominator, kind, ctx).map(Some)
}

/// Centers `numerator` over `denominator`; the rule, when there is one, lies on the math axis.
pub fn build<S: SymbolTable + ?Sized>(numerator: Subraster, denominator: Subraster, kind: FracKind, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    let em       = ctx.em(ctx.size);
    let width    = max(numerator.width(), denominator.width()) + 2;
    let rule_row = numerator.height() + FRACTION_GAP;
    let den_row  = rule_row + 1 + FRACTION_GAP;
    let height   = den_row + denominator.height();

    let mut raster = ctx.raster(width, height)?;
    blit(&mut raster, &numerator.raster, 0, ((width - numerator.width()) / 2) as isize, false);
    blit(&mut raster, &denominator.raster, den_row as isize, ((width - denominator.width()) / 2) as isize, false);
    if kind == FracKind::Frac {
        let clipped = rule_raster(&mut raster, rule_row as isize, 0, width, 1, RuleStyle::Solid);
        ctx.check_clipped(clipped)?;
    }

    let fraction = Subraster::new(raster, rule_row + axis_height(em), ctx.size, BoxKind::FractionImage);
    match kind {
        FracKind::Choose => enclose(vec![Some(fraction)], "(", &[], ")", ctx),
        _ => Ok(fraction),
    }
}

/// `\stackrel{a}{b}` and `\underset{a}{b}`; the first argument is one size smaller.
pub fn stack<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, kind: StackKind) -> Rendered {
    let script = required_box(lex, ctx.size.saturating_sub(1), ctx)?;
    let base = required_box(lex, ctx.size, ctx)?;
    let stacked = match kind {
        StackKind::Over  => concat_vertical(script, base, StackBaseline::Bottom, LIMITS_GAP, true, ctx.pixel_limit())?,
        StackKind::Under => concat_vertical(base, script, StackBaseline::Top, LIMITS_GAP, true, ctx.pixel_limit())?,
    };
    Ok(Some(stacked))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;
    use crate::layout::RenderSettings;

    fn render(expression: &str) -> Subraster {
        let font = BuiltinFont::new();
        let mut ctx = RenderContext::new(&font, RenderSettings::default());
        rasterize(expression, NORMALSIZE, &mut ctx).unwrap().unwrap()
    }

    #[test]
    fn fraction_geometry() {
        let frac = render(r"\frac{1}{2}");
        let digit = render(r"\small 1");
        assert_eq!(frac.kind, BoxKind::FractionImage);
        assert_eq!(frac.width(), digit.width() + 2);
        assert_eq!(frac.height(), 2 * digit.height() + 2 * FRACTION_GAP + 1);

        let rule_row = digit.height() + FRACTION_GAP;
        assert!((0 .. frac.width()).all(|col| frac.raster.is_set(rule_row as isize, col as isize)));
        assert!(frac.baseline > rule_row);
    }

    #[test]
    fn wider_part_sets_the_width() {
        let frac = render(r"\frac{1}{22222}");
        let den = render(r"\small 22222");
        assert_eq!(frac.width(), den.width() + 2);
    }

    #[test]
    fn over_splits_the_expression() {
        let over = render(r"1 \over 2");
        let frac = render(r"\dfrac12");
        assert_eq!(over.raster, frac.raster);
        assert_eq!(over.baseline, frac.baseline);
    }

    #[test]
    fn atop_has_no_rule() {
        let atop = render(r"1 \atop 2");
        let rule_row = render("1").height() + FRACTION_GAP;
        assert!((0 .. atop.width()).all(|col| !atop.raster.is_set(rule_row as isize, col as isize)));
    }

    #[test]
    fn binomials_are_parenthesized() {
        let binom = render(r"\binom{n}{k}");
        let atop = render(r"{\small n} \atop {\small k}");
        assert!(binom.width() > atop.width());
        assert!(binom.height() >= atop.height());
    }

    #[test]
    fn stackrel_keeps_the_base_line() {
        let stacked = render(r"\stackrel{a}{=}");
        let equals = render("=");
        assert_eq!(stacked.descent(), equals.descent());
        assert!(stacked.height() > equals.height());
    }
}
