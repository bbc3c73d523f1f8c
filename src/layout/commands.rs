//! The table of commands and the handlers too small to deserve a module of their own.

use crate::font::{AtomType, Family, SymbolTable};
use crate::parser::{parse_number, Lexer};
use crate::raster::compose::{concat_vertical, StackBaseline};
use crate::raster::draw::backspace_raster;
use crate::raster::{BoxKind, Subraster};
use super::accents::{self, AccentKind, ArrowKind, OverlayKind};
use super::array;
use super::constants::*;
use super::context::{DisplayStyle, RenderContext, Smash};
use super::delimiters;
use super::engine::{rasterize, required_box, text_box};
use super::fractions::{self, FracKind, StackKind};
use super::picture;
use super::transforms;
use super::Rendered;

/// Everything a control sequence can stand for besides a symbol.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    /// `\frac{a}{b}`; arguments rendered that many levels smaller
    Fraction(FracKind, u8),
    /// `a \over b`, splitting the whole expression
    Infix(FracKind),
    /// `\stackrel`, `\overset`, `\underset`
    Stack(StackKind),
    /// `\sqrt[n]{x}`
    Sqrt,
    /// `\left`, up to the matching `\right`
    Left,
    /// `\right` without a `\left`
    Right,
    /// `\middle` outside of `\left ... \right`
    Middle,
    /// `\big(` and friends, by level
    BigDelim(u8),
    /// accent over or under the argument
    Accent(AccentKind),
    /// `\not`, `\cancel`, `\sout`
    Overlay(OverlayKind),
    /// `\rm`, affecting the rest of the group
    FontSwitch(Family),
    /// `\mathrm{...}`
    FontArg(Family),
    /// `\text{...}`, spaces kept
    Text,
    /// absolute size level
    Size(u8),
    /// `\displaystyle`, `\textstyle`
    Style(DisplayStyle),
    /// `\smashmargin{n}`
    SmashMargin,
    /// `\nosmash`
    NoSmash,
    /// `\unitlength{n}` of pictures
    UnitLength,
    /// horizontal space in em
    Kerning(f64),
    /// `\hspace{n}`, in pixels
    HSpace,
    /// `\hfill{n}`
    HFill,
    /// an upright operator name, `true` if it takes limits in display style
    Function(&'static str, bool),
    /// extensible horizontal arrow, `true` when double
    Arrow(ArrowKind, bool),
    /// extensible vertical arrow, `true` when double
    VArrow(ArrowKind, bool),
    /// `\array[preamble]{body}`
    Array,
    /// `\begin{env}`
    Begin,
    /// stray `\end`
    End,
    /// `\picture(w,h){...}`
    Picture,
    /// `\line(dx,dy){length}`
    Line,
    /// `\rule[lift]{width}{height}`
    Rule,
    /// `\circle(w,h)`
    Circle,
    /// `\bezier(x,y)(cx,cy)`
    Bezier,
    /// `\raisebox`
    Raise,
    /// `\rotatebox`
    Rotate,
    /// `\reflectbox`
    Reflect,
    /// `\fbox`
    FrameBox,
    /// `\magnify`
    Magnify,
    /// `\uppercase` (`true`) and `\lowercase`
    Case(bool),
    /// `\\`
    Newline,
}

#[cfg_attr(rustfmt, rustfmt_skip)]
impl Command {
    /// Renders the command, reading its arguments from `lex`.
    pub fn render<S: SymbolTable + ?Sized>(self, lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
        use self::Command::*;
        match self {
            Fraction(kind, demote) => fractions::fraction(lex, ctx, kind, demote),
            Infix(kind)            => fractions::infix(lex, ctx, kind),
            Stack(kind)            => fractions::stack(lex, ctx, kind),
            Sqrt                   => accents::sqrt(lex, ctx),
            Left                   => delimiters::left_right(lex, ctx),
            Right                  => delimiters::unbalanced(lex, ctx, "right"),
            Middle                 => delimiters::unbalanced(lex, ctx, "middle"),
            BigDelim(level)        => delimiters::big(lex, ctx, level),
            Accent(kind)           => accents::accent(lex, ctx, kind),
            Overlay(kind)          => accents::overlay(lex, ctx, kind),
            FontSwitch(family)     => font_switch(ctx, family),
            FontArg(family)        => font_arg(lex, ctx, family),
            Text                   => text(lex, ctx),
            Size(size)             => size_switch(ctx, size),
            Style(style)           => style_switch(ctx, style),
            SmashMargin            => smash_margin(lex, ctx),
            NoSmash                => no_smash(ctx),
            UnitLength             => unit_length(lex, ctx),
            Kerning(em)            => kerning(ctx, em),
            HSpace                 => hspace(lex, ctx),
            HFill                  => hfill(lex, ctx),
            Function(name, _)      => function(ctx, name),
            Arrow(kind, double)    => accents::arrow(lex, ctx, kind, double),
            VArrow(kind, double)   => accents::vertical_arrow(lex, ctx, kind, double),
            Array                  => array::array_command(lex, ctx),
            Begin                  => array::begin(lex, ctx),
            End                    => stray_end(lex),
            Picture                => picture::picture(lex, ctx),
            Line                   => picture::line(lex, ctx),
            Rule                   => picture::rule(lex, ctx),
            Circle                 => picture::circle(lex, ctx),
            Bezier                 => picture::bezier(lex, ctx),
            Raise                  => transforms::raise(lex, ctx),
            Rotate                 => transforms::rotate(lex, ctx),
            Reflect                => transforms::reflect(lex, ctx),
            FrameBox               => transforms::frame_box(lex, ctx),
            Magnify                => transforms::magnify(lex, ctx),
            Case(upper)            => case(lex, ctx, upper),
            Newline                => newline(lex, ctx),
        }
    }

    /// How the rendered command is spaced against its neighbours.
    pub fn atom_type(self) -> AtomType {
        use self::Command::*;
        match self {
            Fraction(..) | Left | Infix(_)   => AtomType::Inner,
            Stack(_) | Arrow(..) | VArrow(..) => AtomType::Relation,
            Function(_, limits)              => AtomType::Operator(limits),
            FontSwitch(_) | Size(_) | Style(_) | SmashMargin | NoSmash | UnitLength |
            Kerning(_) | HSpace | HFill | Newline | End => AtomType::Transparent,
            _ => AtomType::Ordinary,
        }
    }

    /// Whether scripts go above and below in display style.
    pub fn takes_limits(self) -> bool {
        matches!(self, Command::Function(_, true))
    }
}

/// Looks up a command by name, backslash excluded.
pub fn get_command(name: &str) -> Option<Command> {
    let command = match name {
        "frac"   => Command::Fraction(FracKind::Frac, 1),
        "dfrac"  => Command::Fraction(FracKind::Frac, 0),
        "tfrac"  => Command::Fraction(FracKind::Frac, 2),
        "binom"  => Command::Fraction(FracKind::Choose, 1),
        "dbinom" => Command::Fraction(FracKind::Choose, 0),
        "tbinom" => Command::Fraction(FracKind::Choose, 2),
        "over"   => Command::Infix(FracKind::Frac),
        "atop"   => Command::Infix(FracKind::Atop),
        "choose" => Command::Infix(FracKind::Choose),

        "stackrel" | "overset" => Command::Stack(StackKind::Over),
        "underset"             => Command::Stack(StackKind::Under),

        "sqrt"   => Command::Sqrt,
        "left"   => Command::Left,
        "right"  => Command::Right,
        "middle" => Command::Middle,
        "big"  | "bigl"  | "bigr"  | "bigm"  => Command::BigDelim(1),
        "Big"  | "Bigl"  | "Bigr"  | "Bigm"  => Command::BigDelim(2),
        "bigg" | "biggl" | "biggr" | "biggm" => Command::BigDelim(3),
        "Bigg" | "Biggl" | "Biggr" | "Biggm" => Command::BigDelim(4),

        "bar" | "overline"                      => Command::Accent(AccentKind::Bar),
        "underline"                             => Command::Accent(AccentKind::Underline),
        "dot"                                   => Command::Accent(AccentKind::Dot),
        "ddot"                                  => Command::Accent(AccentKind::DDot),
        "hat" | "widehat"                       => Command::Accent(AccentKind::Hat),
        "vec" | "overrightarrow"                => Command::Accent(AccentKind::Vec),
        "tilde" | "widetilde"                   => Command::Accent(AccentKind::Tilde),
        "overbrace"                             => Command::Accent(AccentKind::OverBrace),
        "underbrace"                            => Command::Accent(AccentKind::UnderBrace),
        "not" | "cancel"                        => Command::Overlay(OverlayKind::Slash),
        "sout"                                  => Command::Overlay(OverlayKind::Strike),

        "rm"  => Command::FontSwitch(Family::Roman),
        "bf"  => Command::FontSwitch(Family::Bold),
        "it"  => Command::FontSwitch(Family::Math),
        "cal" => Command::FontSwitch(Family::Calligraphic),
        "bb"  => Command::FontSwitch(Family::Blackboard),
        "mathrm" | "textrm" | "mbox" => Command::FontArg(Family::Roman),
        "mathbf" | "textbf"          => Command::FontArg(Family::Bold),
        "mathit" | "textit"          => Command::FontArg(Family::Math),
        "mathcal"                    => Command::FontArg(Family::Calligraphic),
        "mathbb"                     => Command::FontArg(Family::Blackboard),
        "text"                       => Command::Text,

        "tiny"         => Command::Size(0),
        "scriptsize"   => Command::Size(1),
        "footnotesize" => Command::Size(2),
        "small"        => Command::Size(2),
        "normalsize"   => Command::Size(3),
        "large"        => Command::Size(4),
        "Large"        => Command::Size(5),
        "LARGE"        => Command::Size(6),
        "huge"         => Command::Size(6),
        "Huge"         => Command::Size(7),

        "displaystyle" => Command::Style(DisplayStyle::Display),
        "textstyle"    => Command::Style(DisplayStyle::Text),
        "smashmargin"  => Command::SmashMargin,
        "nosmash"      => Command::NoSmash,
        "unitlength"   => Command::UnitLength,

        "!"     => Command::Kerning(-3.0 / 18.0),
        ","     => Command::Kerning(3.0 / 18.0),
        ":"     => Command::Kerning(4.0 / 18.0),
        ";"     => Command::Kerning(5.0 / 18.0),
        " "     => Command::Kerning(1.0 / 4.0),
        "quad"  => Command::Kerning(1.0),
        "qquad" => Command::Kerning(2.0),
        "hspace" => Command::HSpace,
        "hfill"  => Command::HFill,

        "arccos" => Command::Function("arccos", false),
        "arcsin" => Command::Function("arcsin", false),
        "arctan" => Command::Function("arctan", false),
        "arg"    => Command::Function("arg", false),
        "cos"    => Command::Function("cos", false),
        "cosh"   => Command::Function("cosh", false),
        "cot"    => Command::Function("cot", false),
        "coth"   => Command::Function("coth", false),
        "csc"    => Command::Function("csc", false),
        "deg"    => Command::Function("deg", false),
        "det"    => Command::Function("det", true),
        "dim"    => Command::Function("dim", false),
        "exp"    => Command::Function("exp", false),
        "gcd"    => Command::Function("gcd", true),
        "hom"    => Command::Function("hom", false),
        "inf"    => Command::Function("inf", true),
        "ker"    => Command::Function("ker", false),
        "lg"     => Command::Function("lg", false),
        "lim"    => Command::Function("lim", true),
        "liminf" => Command::Function("lim inf", true),
        "limsup" => Command::Function("lim sup", true),
        "ln"     => Command::Function("ln", false),
        "log"    => Command::Function("log", false),
        "max"    => Command::Function("max", true),
        "min"    => Command::Function("min", true),
        "Pr"     => Command::Function("Pr", true),
        "sec"    => Command::Function("sec", false),
        "sin"    => Command::Function("sin", false),
        "sinh"   => Command::Function("sinh", false),
        "sup"    => Command::Function("sup", true),
        "tan"    => Command::Function("tan", false),
        "tanh"   => Command::Function("tanh", false),

        "longrightarrow"     => Command::Arrow(ArrowKind::Forward, false),
        "longleftarrow"      => Command::Arrow(ArrowKind::Backward, false),
        "longleftrightarrow" => Command::Arrow(ArrowKind::Both, false),
        "Longrightarrow"     => Command::Arrow(ArrowKind::Forward, true),
        "Longleftarrow"      => Command::Arrow(ArrowKind::Backward, true),
        "Longleftrightarrow" => Command::Arrow(ArrowKind::Both, true),
        "longdownarrow"      => Command::VArrow(ArrowKind::Forward, false),
        "longuparrow"        => Command::VArrow(ArrowKind::Backward, false),
        "longupdownarrow"    => Command::VArrow(ArrowKind::Both, false),
        "Longdownarrow"      => Command::VArrow(ArrowKind::Forward, true),
        "Longuparrow"        => Command::VArrow(ArrowKind::Backward, true),
        "Longupdownarrow"    => Command::VArrow(ArrowKind::Both, true),

        "array" => Command::Array,
        "begin" => Command::Begin,
        "end"   => Command::End,

        "picture" => Command::Picture,
        "line"    => Command::Line,
        "rule"    => Command::Rule,
        "circle"  => Command::Circle,
        "bezier"  => Command::Bezier,

        "raisebox" => Command::Raise,
        "rotatebox" => Command::Rotate,
        "reflectbox" => Command::Reflect,
        "fbox"      => Command::FrameBox,
        "magnify"   => Command::Magnify,
        "uppercase" => Command::Case(true),
        "lowercase" => Command::Case(false),
        "\\"        => Command::Newline,

        _ => return None,
    };
    Some(command)
}

fn font_switch<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, family: Family) -> Rendered {
    ctx.family = family;
    Ok(None)
}

fn font_arg<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, family: Family) -> Rendered {
    let outer = ctx.family;
    ctx.family = family;
    let boxed = required_box(lex, ctx.size, ctx);
    ctx.family = outer;
    boxed.map(Some)
}

fn text<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    match lex.argument() {
        Some(text) => text_box(text, Family::Roman, ctx.size, ctx),
        None => Ok(None),
    }
}

fn size_switch<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, size: u8) -> Rendered {
    ctx.size = size.min(LARGESTSIZE);
    Ok(None)
}

fn style_switch<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, style: DisplayStyle) -> Rendered {
    ctx.display_style = style;
    Ok(None)
}

/// `\smashmargin{n}` sets a fixed margin, `\smashmargin{+n}` one growing with the size.
fn smash_margin<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let argument = lex.argument().unwrap_or("").trim();
    match parse_number(argument) {
        Some(margin) => {
            ctx.smash = Smash {
                margin:   margin.round() as i32,
                is_delta: argument.starts_with('+'),
            };
        },
        None => warn!("invalid smash margin {:?}", argument),
    }
    Ok(None)
}

fn no_smash<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>) -> Rendered {
    ctx.smash.margin = -1;
    Ok(None)
}

fn unit_length<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    match lex.argument().and_then(parse_number) {
        Some(unit) if unit > 0.0 => ctx.unit_length = unit,
        _ => warn!("invalid unit length"),
    }
    Ok(None)
}

fn kerning<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, em: f64) -> Rendered {
    let width = (em * ctx.em(ctx.size) as f64).round() as isize;
    if width < 0 {
        // thin negative spaces never eat into ink
        backspace(ctx, width.unsigned_abs(), Some(0))
    } else {
        space(ctx, width as usize)
    }
}

fn hspace<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let argument = lex.argument().unwrap_or("");
    let width = match parse_number(argument) {
        Some(width) => width.round() as isize,
        None => {
            warn!("invalid space {:?}", argument);
            return Ok(None);
        },
    };
    if width < 0 {
        backspace(ctx, width.unsigned_abs(), None)
    } else {
        space(ctx, width as usize)
    }
}

fn space<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, width: usize) -> Rendered {
    let em = ctx.em(ctx.size);
    ctx.blank(width, em, em - 1).map(Some)
}

/// Removes up to `width` columns from the right of the left expression.
fn backspace<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, width: usize, minspace: Option<usize>) -> Rendered {
    if let Some(left) = ctx.left_expression.take() {
        let (raster, dropped) = backspace_raster(&left.raster, width, minspace)?;
        trace!("backspaced {} of {} columns", dropped, width);
        ctx.left_expression = Some(Subraster { raster, ..left });
    }
    space(ctx, 0)
}

/// `\hfill{n}` pads the left expression to `n` columns.
fn hfill<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let target = match lex.argument().and_then(parse_number) {
        Some(target) if target > 0.0 => target.round() as usize,
        _ => {
            warn!("invalid fill width");
            return Ok(None);
        },
    };
    let current = ctx.left_expression.as_ref().map_or(0, Subraster::width);
    space(ctx, target.saturating_sub(current))
}

fn function<S: SymbolTable + ?Sized>(ctx: &mut RenderContext<S>, name: &str) -> Rendered {
    Ok(text_box(name, Family::Roman, ctx.size, ctx)?.map(|name| name.with_kind(BoxKind::ComposedImage)))
}

fn stray_end(lex: &mut Lexer) -> Rendered {
    let name = lex.group().unwrap_or("");
    warn!("\\end{{{}}} without \\begin", name);
    Ok(None)
}

/// Changes the case of `text`, leaving command names alone.
fn change_case(text: &str, upper: bool) -> String {
    let mut changed = String::with_capacity(text.len());
    let mut in_command = false;
    for c in text.chars() {
        if c == '\\' {
            in_command = true;
            changed.push(c);
            continue;
        }
        if in_command && c.is_ascii_alphabetic() {
            changed.push(c);
            continue;
        }
        in_command = false;
        if upper {
            changed.extend(c.to_uppercase());
        } else {
            changed.extend(c.to_lowercase());
        }
    }
    changed
}

fn case<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>, upper: bool) -> Rendered {
    match lex.argument() {
        Some(text) => rasterize(&change_case(text, upper), ctx.size, ctx),
        None => Ok(None),
    }
}

/// `\\[gap]` stacks the left expression over everything that follows, left aligned.
fn newline<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let extra = lex.optional_arg()
        .and_then(parse_number)
        .map_or(0, |gap| gap.max(0.0).round() as usize);
    let above = ctx.left_expression.take();
    let rest = lex.rest();
    let below = rasterize(rest, ctx.size, ctx)?;

    match (above, below) {
        (Some(above), Some(below)) => {
            concat_vertical(above, below, StackBaseline::Top, LINE_GAP + extra, false, ctx.pixel_limit()).map(Some)
        },
        (above, below) => Ok(above.or(below)),
    }
}
