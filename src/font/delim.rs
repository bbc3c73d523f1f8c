//! Delimiters of arbitrary height, drawn with the vector primitives.

use crate::error::RasterResult;
use crate::raster::compose::{self, Axis};
use crate::raster::draw::{self, Arc, RuleStyle};
use crate::raster::{PixelDepth, Raster};

/// Which way a delimiter opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// opening delimiter
    Left,
    /// closing delimiter
    Right,
}

/// Delimiters that can be drawn at any height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimShape {
    /// `(` and `)`
    Paren(Side),
    /// `[` and `]`
    Bracket(Side),
    /// `\lfloor` and `\rfloor`
    Floor(Side),
    /// `\lceil` and `\rceil`
    Ceil(Side),
    /// `\{` and `\}`
    Brace(Side),
    /// `<`, `>`, `\langle` and `\rangle`
    Angle(Side),
    /// `|`
    Bar,
    /// `\|`
    DoubleBar,
    /// `/`
    Slash,
    /// `\backslash`
    Backslash,
    /// `\uparrow`
    UpArrow,
    /// `\downarrow`
    DownArrow,
    /// `\updownarrow`
    UpDownArrow,
    /// `.`, an invisible delimiter
    Null,
}

impl DelimShape {
    /// Parses a delimiter as written after `\left`, `\middle` or `\right`.
    pub fn from_name(name: &str) -> Option<Self> {
        use self::DelimShape::*;
        use self::Side::*;
        let shape = match name.trim() {
            "("                                   => Paren(Left),
            ")"                                   => Paren(Right),
            "[" | r"\lbrack"                      => Bracket(Left),
            "]" | r"\rbrack"                      => Bracket(Right),
            r"\lfloor"                            => Floor(Left),
            r"\rfloor"                            => Floor(Right),
            r"\lceil"                             => Ceil(Left),
            r"\rceil"                             => Ceil(Right),
            "{" | r"\{" | r"\lbrace"              => Brace(Left),
            "}" | r"\}" | r"\rbrace"              => Brace(Right),
            "<" | r"\langle"                      => Angle(Left),
            ">" | r"\rangle"                      => Angle(Right),
            "|" | r"\vert" | r"\mid"              => Bar,
            r"\|" | r"\Vert"                      => DoubleBar,
            "/"                                   => Slash,
            r"\backslash"                         => Backslash,
            r"\uparrow"                           => UpArrow,
            r"\downarrow"                         => DownArrow,
            r"\updownarrow"                       => UpDownArrow,
            "." | ""                              => Null,
            _ => return None,
        };
        Some(shape)
    }

    /// Character of the ordinary-sized glyph, if the delimiter has one.
    pub fn codepoint(self) -> Option<char> {
        use self::DelimShape::*;
        use self::Side::*;
        let c = match self {
            Paren(Left)    => '(',
            Paren(Right)   => ')',
            Bracket(Left)  => '[',
            Bracket(Right) => ']',
            Brace(Left)    => '{',
            Brace(Right)   => '}',
            Angle(Left)    => '<',
            Angle(Right)   => '>',
            Bar            => '|',
            Slash          => '/',
            Backslash      => '\\',
            _ => return None,
        };
        Some(c)
    }

    fn width(self, height: usize) -> usize {
        use self::DelimShape::*;
        match self {
            Null => 1,
            Bar => 3,
            DoubleBar => 5,
            Slash | Backslash => (height / 3).max(3),
            UpArrow | DownArrow | UpDownArrow => (height / 4).clamp(5, 9) | 1,
            _ => (height / 5 + 2).clamp(3, 12),
        }
    }
}

/// Draws a delimiter `height` pixels tall.
pub fn make_delim(shape: DelimShape, height: usize, depth: PixelDepth) -> RasterResult<Raster> {
    use self::DelimShape::*;

    let height = height.max(1);
    let width  = shape.width(height);
    let thick  = 1 + height / 24;

    // closing shapes are mirrored opening ones
    let side = match shape {
        Paren(side) | Bracket(side) | Floor(side) | Ceil(side) | Brace(side) | Angle(side) => Some(side),
        _ => None,
    };
    if side == Some(Side::Right) {
        let opening = match shape {
            Paren(_)   => Paren(Side::Left),
            Bracket(_) => Bracket(Side::Left),
            Floor(_)   => Floor(Side::Left),
            Ceil(_)    => Ceil(Side::Left),
            Brace(_)   => Brace(Side::Left),
            _          => Angle(Side::Left),
        };
        return compose::reflect(&make_delim(opening, height, depth)?, Axis::Vertical);
    }

    let mut raster = Raster::new(width, height, depth)?;
    let (h, w) = (height as isize, width as isize);
    let (last_row, last_col) = ((h - 1) as f64, (w - 1) as f64);

    match shape {
        Paren(_) => {
            draw::circle_raster(&mut raster, 0, 0, h - 1, 2 * (w - 1), thick, Arc::parse("23").unwrap_or(Arc::FULL));
        },
        Bracket(_) | Floor(_) | Ceil(_) => {
            draw::rule_raster(&mut raster, 0, 0, thick, height, RuleStyle::Solid);
            if !matches!(shape, Floor(_)) {
                draw::rule_raster(&mut raster, 0, 0, width, thick, RuleStyle::Solid);
            }
            if !matches!(shape, Ceil(_)) {
                draw::rule_raster(&mut raster, h - thick as isize, 0, width, thick, RuleStyle::Solid);
            }
        },
        Brace(_) => {
            let mid = (w / 2) as f64;
            let (quarter, half, three_quarters) = (last_row / 4., last_row / 2., 3. * last_row / 4.);
            for k in 0 .. thick {
                let dc = -(k as f64);
                draw::bezier_raster(&mut raster, (0., last_col), (quarter, mid + dc), (0., mid + dc));
                draw::bezier_raster(&mut raster, (quarter, mid + dc), (half, 0.), (half, mid + dc));
                draw::bezier_raster(&mut raster, (half, 0.), (three_quarters, mid + dc), (half, mid + dc));
                draw::bezier_raster(&mut raster, (three_quarters, mid + dc), (last_row, last_col), (last_row, mid + dc));
            }
        },
        Angle(_) => {
            let tip = (last_row / 2., 0.);
            draw::line_raster(&mut raster, (0., last_col), tip, thick);
            draw::line_raster(&mut raster, tip, (last_row, last_col), thick);
        },
        Bar => {
            draw::rule_raster(&mut raster, 0, w / 2, thick, height, RuleStyle::Solid);
        },
        DoubleBar => {
            draw::rule_raster(&mut raster, 0, 1, 1, height, RuleStyle::Solid);
            draw::rule_raster(&mut raster, 0, w - 2, 1, height, RuleStyle::Solid);
        },
        Slash => {
            draw::line_raster(&mut raster, (last_row, 0.), (0., last_col), thick);
        },
        Backslash => {
            draw::line_raster(&mut raster, (0., 0.), (last_row, last_col), thick);
        },
        UpArrow | DownArrow | UpDownArrow => {
            let mid = (w / 2) as f64;
            draw::line_raster(&mut raster, (0., mid), (last_row, mid), 1);
            if shape != DownArrow {
                draw::line_raster(&mut raster, (0., mid), (mid, 0.), 1);
                draw::line_raster(&mut raster, (0., mid), (mid, last_col), 1);
            }
            if shape != UpArrow {
                draw::line_raster(&mut raster, (last_row, mid), (last_row - mid, 0.), 1);
                draw::line_raster(&mut raster, (last_row, mid), (last_row - mid, last_col), 1);
            }
        },
        Null => {},
    }
    Ok(raster)
}
