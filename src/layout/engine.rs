//! The recursive compiler.
//!
//! [`rasterize`] walks an expression term by term: a group, a command or a symbol, followed by
//! its optional scripts. Each term is rendered into a [`Subraster`] and appended to the left
//! expression, spaced according to the atom types of the neighbours and smashed against them
//! when both allow it. Commands are free to consume as many arguments as they need, or to take
//! over the left expression (`\over`, `\\`, negative spaces).

use std::cmp::max;

use crate::error::{RasterError, RasterResult};
use crate::font::{AtomType, Family, SymbolDef, SymbolTable};
use crate::parser::{extract_preamble, Lexer, Preamble, Scripts, SizeChange, StyleFlag, Token};
use crate::raster::compose::concat_horizontal;
use crate::raster::{BoxKind, Subraster};
use super::commands::get_command;
use super::constants::*;
use super::context::{DisplayStyle, RenderContext};
use super::scripts;
use super::spacing::{atom_space, demote_binary};
use super::{centered_baseline, Rendered};

/// A rendered term and what its neighbours need to know about it.
struct Term {
    boxed:  Subraster,
    atom:   AtomType,
    limits: bool,
}

impl Term {
    fn ordinary(boxed: Subraster) -> Self {
        Term { boxed, atom: AtomType::Ordinary, limits: false }
    }
}

/// Renders `expression` at size level `size`.
///
/// The scoped fields of `ctx` are restored on return, whatever the expression changed.
/// Returns `Ok(None)` for an expression producing no box at all (empty, or only switches).
pub fn rasterize<S: SymbolTable + ?Sized>(expression: &str, size: u8, ctx: &mut RenderContext<S>) -> Rendered {
    let size = size.min(LARGESTSIZE);
    if ctx.depth >= ctx.settings.max_depth {
        warn!("expression nested more than {} levels deep", ctx.settings.max_depth);
        return placeholder(size, ctx).map(Some);
    }

    let snapshot = ctx.save();
    ctx.size = size;
    ctx.depth += 1;
    let result = compile(expression, ctx);
    ctx.depth -= 1;
    ctx.restore(snapshot);
    result
}

fn compile<S: SymbolTable + ?Sized>(expression: &str, ctx: &mut RenderContext<S>) -> Rendered {
    let mut expression = expression;
    if ctx.depth == 1 {
        let (preamble, body) = extract_preamble(expression);
        apply_preamble(preamble, ctx);
        expression = body;
    }

    let mut lex = Lexer::new(expression);
    let mut prev_atom = AtomType::Transparent;
    let mut prev_smashable = false;

    while !lex.is_empty() {
        let remaining = lex.input().len();
        let checkpoint = lex.clone();

        let term = match lex.next_token() {
            Token::Symbol('_') | Token::Symbol('^') | Token::Symbol('\'') => {
                // scripts with nothing to attach to
                lex = checkpoint;
                empty_box(ctx.size, ctx).map(|boxed| Some(Term::ordinary(boxed)))
            },
            token => next_term(token, &mut lex, ctx),
        };
        let scripts = lex.scripts();

        if lex.input().len() == remaining {
            warn!("no progress at {:?}, dropping the rest", lex.input());
            break;
        }

        let scripted = !scripts.is_empty();
        let term = match term.and_then(|term| with_scripts(term, &scripts, ctx)) {
            Ok(Some(term)) => term,
            Ok(None) => continue,
            Err(error) => Term::ordinary(stand_in(error, ctx)?),
        };

        let atom = demote_binary(prev_atom, term.atom);
        let space = atom_space(prev_atom, atom, ctx.size).to_pixels(ctx.em(ctx.size));
        let limit = ctx.pixel_limit();
        let mut smashable = term.boxed.kind.allows_smash();
        ctx.left_expression = Some(match ctx.left_expression.take() {
            None => term.boxed,
            Some(left) => {
                let boxed = if fits_beside(&left, &term.boxed, space, limit) {
                    Some(term.boxed)
                } else {
                    warn!("no room for a term of {}x{} pixels", term.boxed.width(), term.boxed.height());
                    smashable = false;
                    let boxed = placeholder(ctx.size, ctx)?;
                    Some(boxed).filter(|boxed| fits_beside(&left, boxed, space, limit))
                };
                match boxed {
                    Some(boxed) => {
                        let smash = if prev_smashable && smashable {
                            ctx.smash.effective(ctx.size)
                        } else {
                            None
                        };
                        concat_horizontal(left, boxed, space, smash, limit)?
                    },
                    None => left,
                }
            },
        });

        if atom != AtomType::Transparent {
            prev_atom = atom;
        }
        prev_smashable = smashable && !scripted;
    }

    Ok(ctx.left_expression.take().map(|expression| match expression.kind {
        BoxKind::FractionImage => expression,
        _ => expression.with_kind(BoxKind::ComposedImage),
    }))
}

/// Completes a term with its scripts, or makes an empty base for scripts without one.
fn with_scripts<S: SymbolTable + ?Sized>(term: Option<Term>, scripts: &Scripts, ctx: &mut RenderContext<S>) -> RasterResult<Option<Term>> {
    let term = match term {
        Some(term) => term,
        None if scripts.is_empty() => return Ok(None),
        None => Term::ordinary(empty_box(ctx.size, ctx)?),
    };
    ctx.left_symbol = term.boxed.symbol;
    if scripts.is_empty() {
        return Ok(Some(term));
    }

    let limits = scripts.limits.unwrap_or(term.limits && ctx.is_display());
    let script_size = ctx.size.saturating_sub(1);
    let sub = match &scripts.sub {
        Some(text) => rasterize(text, script_size, ctx)?,
        None => None,
    };
    let sup = match &scripts.sup {
        Some(text) => rasterize(text, script_size, ctx)?,
        None => None,
    };
    let boxed = scripts::attach(term.boxed, sub, sup, limits, ctx)?;
    Ok(Some(Term { boxed, ..term }))
}

/// A term over the pixel budget becomes a placeholder; any other error ends the rendering.
fn stand_in<S: SymbolTable + ?Sized>(error: RasterError, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    match error {
        RasterError::TooLarge { width, height, limit } => {
            warn!("{}x{} pixels exceed the budget of {}, term replaced", width, height, limit);
            placeholder(ctx.size, ctx)
        },
        error => Err(error),
    }
}

/// Whether `left` and `right` side by side, `space` columns apart, stay within `limit` pixels.
fn fits_beside(left: &Subraster, right: &Subraster, space: usize, limit: usize) -> bool {
    let height = max(left.baseline, right.baseline) + 1 + max(left.descent(), right.descent());
    left.width().checked_add(space)
        .and_then(|width| width.checked_add(right.width()))
        .and_then(|width| width.checked_mul(height))
        .map_or(false, |pixels| pixels <= limit)
}

fn apply_preamble<S: SymbolTable + ?Sized>(preamble: Preamble, ctx: &mut RenderContext<S>) {
    match preamble.size {
        Some(SizeChange::Absolute(size)) => ctx.size = size.min(LARGESTSIZE),
        Some(SizeChange::Relative(delta)) => {
            ctx.size = (ctx.size as i16 + delta as i16).clamp(0, LARGESTSIZE as i16) as u8;
        },
        None => (),
    }
    match preamble.style {
        Some(StyleFlag::Display) => ctx.display_style = DisplayStyle::Display,
        Some(StyleFlag::Text)    => ctx.display_style = DisplayStyle::Text,
        None => (),
    }
}

fn next_term<S: SymbolTable + ?Sized>(token: Token, lex: &mut Lexer, ctx: &mut RenderContext<S>) -> RasterResult<Option<Term>> {
    match token {
        Token::EOF => Ok(None),
        Token::Group(inner) => Ok(rasterize(inner, ctx.size, ctx)?.map(Term::ordinary)),
        Token::Command(name) => match get_command(name) {
            Some(command) => {
                let atom = command.atom_type();
                let limits = command.takes_limits();
                Ok(command.render(lex, ctx)?.map(|boxed| Term { boxed, atom, limits }))
            },
            None => symbol_term(&format!("\\{}", name), ctx).map(Some),
        },
        Token::Symbol('~') => {
            let em = ctx.em(ctx.size);
            Ok(Some(Term {
                boxed:  ctx.blank(em / 3, em, em - 1)?,
                atom:   AtomType::Transparent,
                limits: false,
            }))
        },
        Token::Symbol(c @ ('&' | '}' | '$')) => {
            debug!("ignoring stray {:?}", c);
            Ok(None)
        },
        Token::Symbol(c) => symbol_term(c.encode_utf8(&mut [0; 4]), ctx).map(Some),
    }
}

fn symbol_term<S: SymbolTable + ?Sized>(token: &str, ctx: &mut RenderContext<S>) -> RasterResult<Term> {
    let symbol = match ctx.symbols.lookup_symbol(token, ctx.family) {
        Some(symbol) => symbol,
        None => {
            warn!("unknown symbol {}", token);
            return Ok(Term::ordinary(placeholder(ctx.size, ctx)?));
        },
    };

    let large = matches!(symbol.atom_type, AtomType::Operator(_)) && ctx.is_display();
    let boxed = if large {
        let mut boxed = glyph(&symbol, (ctx.size + 1).min(LARGESTSIZE), ctx)?;
        boxed.baseline = centered_baseline(boxed.height(), ctx.em(ctx.size)).min(boxed.height() - 1);
        boxed
    } else {
        glyph(&symbol, ctx.size, ctx)?
    };
    Ok(Term { boxed, atom: symbol.atom_type, limits: symbol.takes_limits() })
}

/// Renders a resolved symbol, converted to the pixel depth of the settings.
pub fn glyph<S: SymbolTable + ?Sized>(symbol: &SymbolDef, size: u8, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    match ctx.symbols.render_glyph(symbol, size) {
        Some(glyph) => conform(glyph, ctx),
        None => {
            warn!("no glyph for {:?}", symbol.codepoint);
            placeholder(size, ctx)
        },
    }
}

/// Converts a box produced by the symbol table to the pixel depth of the settings.
pub fn conform<S: SymbolTable + ?Sized>(boxed: Subraster, ctx: &RenderContext<S>) -> RasterResult<Subraster> {
    if boxed.raster.depth() == ctx.settings.pixel_depth {
        return Ok(boxed);
    }
    let raster = boxed.raster.to_depth(ctx.settings.pixel_depth)?;
    Ok(Subraster { raster, ..boxed })
}

/// Sets `text` glyph by glyph in `family`, keeping its spaces. Never smashed.
pub fn text_box<S: SymbolTable + ?Sized>(text: &str, family: Family, size: u8, ctx: &mut RenderContext<S>) -> Rendered {
    let em = ctx.em(size);
    let mut result: Option<Subraster> = None;

    for c in text.chars() {
        let piece = if c.is_whitespace() {
            Subraster::new(ctx.raster(em / 3, em)?, em - 1, size, BoxKind::NoSmash)
        } else {
            let rendered = ctx.symbols
                .lookup_symbol(c.encode_utf8(&mut [0; 4]), family)
                .and_then(|symbol| ctx.symbols.render_glyph(&symbol, size));
            match rendered {
                Some(glyph) => conform(glyph, ctx)?,
                None => {
                    debug!("no glyph for {:?} in text", c);
                    continue;
                },
            }
        };
        result = Some(match result {
            None => piece,
            Some(left) => concat_horizontal(left, piece, 0, None, ctx.pixel_limit())?,
        });
    }
    Ok(result.map(|text| text.with_kind(BoxKind::AsciiString)))
}

/// The visible `[?]` standing in for what could not be rendered.
pub fn placeholder<S: SymbolTable + ?Sized>(size: u8, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    match text_box(PLACEHOLDER, Family::Roman, size, ctx)? {
        Some(boxed) => Ok(boxed),
        None => {
            let em = ctx.em(size);
            Ok(Subraster::new(ctx.raster(em / 2, em)?, em - 1, size, BoxKind::AsciiString))
        },
    }
}

/// A box without width, one em tall.
pub fn empty_box<S: SymbolTable + ?Sized>(size: u8, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    let em = ctx.em(size);
    Ok(Subraster::new(ctx.raster(0, em)?, em - 1, size, BoxKind::NoSmash))
}

/// Renders the next argument, if any.
pub fn argument_box<S: SymbolTable + ?Sized>(lex: &mut Lexer, size: u8, ctx: &mut RenderContext<S>) -> Rendered {
    match lex.argument() {
        Some(argument) => rasterize(argument, size, ctx),
        None => Ok(None),
    }
}

/// Renders the next argument, an empty box for an empty one and a placeholder for a missing one.
pub fn required_box<S: SymbolTable + ?Sized>(lex: &mut Lexer, size: u8, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    match lex.argument() {
        Some(argument) => match rasterize(argument, size, ctx)? {
            Some(boxed) => Ok(boxed),
            None => empty_box(size, ctx),
        },
        None => {
            warn!("missing argument at the end of the expression");
            placeholder(size, ctx)
        },
    }
}
