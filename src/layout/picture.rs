//! `\picture` and its drawing primitives.
//!
//! A picture is a canvas in its own coordinate system: `x` to the right and `y` upwards, both
//! multiplied by the unit length. While its body is laid out, the canvas sits in the working box
//! of the context. Each primitive reports through the working parameter which of its corners
//! lies on the `(x, y)` position it is put at; elements that report nothing are placed by their
//! baseline.

use crate::error::RasterResult;
use crate::font::SymbolTable;
use crate::parser::{parse_number, parse_pair, Lexer};
use crate::raster::compose::blit;
use crate::raster::draw::{bezier_raster, circle_raster, line_raster, rule_raster, Arc, RuleStyle};
use crate::raster::{BoxKind, Subraster};
use super::constants::MAX_REPEAT;
use super::context::{PictureOrigin, RenderContext};
use super::engine::rasterize;
use super::Rendered;

/// Where and how often an element is put.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x:        f64,
    y:        f64,
    dx:       f64,
    dy:       f64,
    count:    usize,
    centered: bool,
}

impl Placement {
    fn at((x, y): (f64, f64)) -> Self {
        Placement { x, y, dx: 0., dy: 0., count: 1, centered: false }
    }

    /// `x,y[;dx,dy[;n]]`
    fn parse(args: &str) -> Option<Self> {
        let mut parts = args.split(';');
        let mut placement = Placement::at(parse_pair(parts.next()?)?);
        if let Some(increment) = parts.next() {
            let (dx, dy) = parse_pair(increment)?;
            placement.dx = dx;
            placement.dy = dy;
        }
        if let Some(count) = parts.next() {
            placement.count = repeat(parse_number(count)?);
        }
        Some(placement)
    }
}

/// Number of copies of a repeated element, at most [`MAX_REPEAT`].
fn repeat(count: f64) -> usize {
    let count = count.round().max(0.);
    if count > MAX_REPEAT as f64 {
        warn!("element repeated {} times, only drawn {} times", count, MAX_REPEAT);
        return MAX_REPEAT;
    }
    count as usize
}

/// Saturates at `usize::MAX`; the allocation then fails on the pixel budget.
fn pixels(value: f64, unit: f64) -> usize {
    (value * unit).abs().round() as usize
}

/// Top-left corner of an element `height`x`width` whose `origin` lies on `(row, col)`.
fn anchor(origin: Option<PictureOrigin>, row: isize, col: isize, boxed: &Subraster) -> (isize, isize) {
    let height = boxed.height() as isize;
    let width  = boxed.width() as isize;
    let (up, left) = match origin {
        None                                    => (boxed.baseline as isize, 0),
        Some(PictureOrigin::LowerLeft)          => (height - 1, 0),
        Some(PictureOrigin::UpperLeft)          => (0, 0),
        Some(PictureOrigin::UpperRight)         => (0, width - 1),
        Some(PictureOrigin::LowerRight)         => (height - 1, width - 1),
        Some(PictureOrigin::Center)             => (height / 2, width / 2),
        Some(PictureOrigin::Point { row: r, col: c }) => (r as isize, c as isize),
    };
    (row.saturating_sub(up), col.saturating_sub(left))
}

/// The next directive of a picture body and its element, or `None` if the next token
/// is not a directive (it is then consumed).
fn directive<'a>(lex: &mut Lexer<'a>) -> Option<(Placement, &'a str)> {
    let mut ahead = lex.clone();
    let placement = match ahead.peek() {
        Some('\\') => match ahead.control_sequence() {
            Some("put") => ahead.paren_args().and_then(Placement::parse),
            Some("multiput") => {
                let position  = ahead.paren_args().and_then(parse_pair);
                let increment = ahead.paren_args().and_then(parse_pair);
                let count     = ahead.group().and_then(parse_number);
                match (position, increment, count) {
                    (Some(position), Some((dx, dy)), Some(count)) => Some(Placement {
                        dx, dy,
                        count: repeat(count),
                        ..Placement::at(position)
                    }),
                    _ => None,
                }
            },
            _ => None,
        },
        Some('c') => {
            ahead.eat('c');
            ahead.paren_args()
                .and_then(Placement::parse)
                .map(|placement| Placement { centered: true, ..placement })
        },
        Some('(') => ahead.paren_args().and_then(Placement::parse),
        _ => None,
    };
    let element = placement.and_then(|placement| ahead.argument().map(|element| (placement, element)));
    match element {
        Some(directive) => {
            *lex = ahead;
            Some(directive)
        },
        None => {
            let skipped = lex.next_token();
            debug!("ignoring {:?} in picture", skipped);
            None
        },
    }
}

/// Renders the elements of `body` into the working box.
fn place_elements<S: SymbolTable + ?Sized>(body: &str, height: usize, ctx: &mut RenderContext<S>) -> RasterResult<()> {
    let unit = ctx.unit_length;
    let mut lex = Lexer::new(body);
    let mut clipped = 0;

    loop {
        lex.consume_whitespace();
        if lex.is_empty() {
            break;
        }
        let (placement, element) = match directive(&mut lex) {
            Some(directive) => directive,
            None => continue,
        };

        ctx.working_param = None;
        let boxed = match rasterize(element, ctx.size, ctx)? {
            Some(boxed) => boxed,
            None => continue,
        };
        let origin = if placement.centered {
            Some(PictureOrigin::Center)
        } else {
            ctx.working_param.take()
        };

        for i in 0 .. placement.count {
            let x = placement.x + i as f64 * placement.dx;
            let y = placement.y + i as f64 * placement.dy;
            let row = (height as isize).saturating_sub((y * unit).round() as isize);
            let col = (x * unit).round() as isize;
            let (top, left) = anchor(origin, row, col, &boxed);
            trace!("picture element at ({}, {}), pixel ({}, {})", x, y, top, left);

            let canvas = match ctx.working_box.as_mut() {
                Some(canvas) => canvas,
                None => return Ok(()),
            };
            let outside = top >= canvas.height() as isize || left >= canvas.width() as isize
                || top.saturating_add(boxed.height() as isize) <= 0
                || left.saturating_add(boxed.width() as isize) <= 0;
            if outside || !blit(&mut canvas.raster, &boxed.raster, top, left, false) {
                clipped += 1;
            }
        }
    }
    ctx.check_clipped(clipped)
}

/// `\picture(w[,h]){ ... }`
pub fn picture<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let dimensions = lex.paren_args();
    let body = lex.argument().unwrap_or("");
    let (w, h) = match dimensions.and_then(|dims| parse_pair(dims).map(|(w, h)| (w, Some(h))).or_else(|| parse_number(dims).map(|w| (w, None)))) {
        Some(dims) => dims,
        None => {
            warn!("\\picture without dimensions");
            return Ok(None);
        },
    };

    let unit = ctx.unit_length;
    let width = pixels(w, unit);
    let height = h.map_or(width, |h| pixels(h, unit));
    let canvas = Subraster::new(ctx.raster(width.saturating_add(1), height.saturating_add(1))?, height, ctx.size, BoxKind::ComposedImage);
    debug!("picture of {}x{} pixels", canvas.width(), canvas.height());

    let outer = ctx.working_box.replace(canvas);
    let placed = place_elements(body, height, ctx);
    let canvas = std::mem::replace(&mut ctx.working_box, outer);
    ctx.working_param = None;
    placed?;
    Ok(canvas)
}

/// `\line(dx,dy){length}`: `length` is measured along x, or along y for vertical lines.
pub fn line<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let direction = lex.paren_args().and_then(parse_pair);
    let length = lex.argument().and_then(parse_number);
    let ((dx, dy), length) = match (direction, length) {
        (Some(direction), Some(length)) => (direction, length),
        _ => {
            warn!("malformed \\line");
            return Ok(None);
        },
    };

    let unit = ctx.unit_length;
    let (xlen, ylen) = if dx != 0. {
        let xlen = (length * unit).abs();
        (xlen, xlen * (dy / dx).abs())
    } else {
        (0., (length * unit).abs())
    };
    let (width, height) = (xlen.round() as usize, ylen.round() as usize);
    let mut raster = ctx.raster(width.saturating_add(1), height.saturating_add(1))?;

    let (bottom, right) = (height as f64, width as f64);
    let (from, to, origin) = match (dx < 0., dy < 0.) {
        (false, false) => ((bottom, 0.), (0., right), PictureOrigin::LowerLeft),
        (false, true)  => ((0., 0.), (bottom, right), PictureOrigin::UpperLeft),
        (true, false)  => ((bottom, right), (0., 0.), PictureOrigin::LowerRight),
        (true, true)   => ((0., right), (bottom, 0.), PictureOrigin::UpperRight),
    };
    let clipped = line_raster(&mut raster, from, to, 1);
    ctx.check_clipped(clipped)?;

    ctx.working_param = Some(origin);
    Ok(Some(Subraster::new(raster, height, ctx.size, BoxKind::ComposedImage)))
}

/// `\rule[lift]{width}{height}`, in pixels.
pub fn rule<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let lift = lex.optional_arg().and_then(parse_number).unwrap_or(0.).round() as isize;
    let width = lex.argument().and_then(parse_number);
    let height = lex.argument().and_then(parse_number);
    let (width, height) = match (width, height) {
        (Some(width), Some(height)) => (pixels(width, 1.), pixels(height, 1.)),
        _ => {
            warn!("malformed \\rule");
            return Ok(None);
        },
    };

    let drop = lift.unsigned_abs();
    let (total, top, baseline) = if lift >= 0 {
        let total = height.saturating_add(drop);
        (total, 0, total.saturating_sub(1))
    } else if drop < height {
        (height, 0, height - 1 - drop)
    } else {
        (drop + 1, drop + 1 - height, 0)
    };
    let mut raster = ctx.raster(width, total)?;
    let clipped = rule_raster(&mut raster, top as isize, 0, width, height, RuleStyle::Solid);
    ctx.check_clipped(clipped)?;

    ctx.working_param = Some(PictureOrigin::LowerLeft);
    Ok(Some(Subraster::new(raster, baseline, ctx.size, BoxKind::ComposedImage)))
}

/// `\circle(w[,h][;arc])`: an ellipse `w` by `h` units, or the part of it selected by `arc`.
pub fn circle<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let args = match lex.paren_args() {
        Some(args) => args,
        None => {
            warn!("\\circle without dimensions");
            return Ok(None);
        },
    };
    let (dims, arc) = match args.split_once(';') {
        Some((dims, arc)) => (dims, arc),
        None => (args, ""),
    };
    let (w, h) = match parse_pair(dims).or_else(|| parse_number(dims).map(|w| (w, w))) {
        Some(dims) => dims,
        None => {
            warn!("malformed \\circle({})", args);
            return Ok(None);
        },
    };
    let arc = Arc::parse(arc).unwrap_or_else(|| {
        warn!("malformed arc {}, drawing the full circle", arc);
        Arc::FULL
    });

    let unit = ctx.unit_length;
    let (width, height) = (pixels(w, unit), pixels(h, unit));
    let mut raster = ctx.raster(width.saturating_add(1), height.saturating_add(1))?;
    let clipped = circle_raster(&mut raster, 0, 0, height as isize, width as isize, 1, arc);
    ctx.check_clipped(clipped)?;

    ctx.working_param = Some(PictureOrigin::Center);
    Ok(Some(Subraster::new(raster, height, ctx.size, BoxKind::ComposedImage)))
}

/// `\bezier(x,y)(cx,cy)`: a curve from the current position to `(x, y)` whose tangents meet
/// at `(cx, cy)`, both relative to the current position.
pub fn bezier<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let end = lex.paren_args().and_then(parse_pair);
    let control = lex.paren_args().and_then(parse_pair);
    let (end, control) = match (end, control) {
        (Some(end), Some(control)) => (end, control),
        _ => {
            warn!("malformed \\bezier");
            return Ok(None);
        },
    };

    let unit = ctx.unit_length;
    let scale = |(x, y): (f64, f64)| ((x * unit).round(), (y * unit).round());
    let points = [(0., 0.), scale(end), scale(control)];
    let min_x = points.iter().map(|p| p.0).fold(0., f64::min);
    let max_x = points.iter().map(|p| p.0).fold(0., f64::max);
    let min_y = points.iter().map(|p| p.1).fold(0., f64::min);
    let max_y = points.iter().map(|p| p.1).fold(0., f64::max);

    let mut raster = ctx.raster(((max_x - min_x) as usize).saturating_add(1), ((max_y - min_y) as usize).saturating_add(1))?;
    let local = |(x, y): (f64, f64)| (max_y - y, x - min_x);
    let clipped = bezier_raster(&mut raster, local(points[0]), local(points[1]), local(points[2]));
    ctx.check_clipped(clipped)?;

    let (row, col) = (max_y as usize, -min_x as usize);
    ctx.working_param = Some(PictureOrigin::Point { row, col });
    Ok(Some(Subraster::new(raster, row, ctx.size, BoxKind::ComposedImage)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;
    use crate::layout::constants::NORMALSIZE;
    use crate::layout::RenderSettings;
    use crate::raster::Raster;

    fn render(expression: &str) -> Subraster {
        let font = BuiltinFont::new();
        let mut ctx = RenderContext::new(&font, RenderSettings::default());
        rasterize(expression, NORMALSIZE, &mut ctx).unwrap().unwrap()
    }

    fn ink(raster: &Raster) -> Vec<(isize, isize)> {
        let mut pixels = Vec::new();
        for row in 0 .. raster.height() as isize {
            for col in 0 .. raster.width() as isize {
                if raster.is_set(row, col) {
                    pixels.push((row, col));
                }
            }
        }
        pixels
    }

    #[test]
    fn placements() {
        assert_eq!(Placement::parse("1,2"), Some(Placement::at((1., 2.))));
        assert_eq!(Placement::parse("1,2;3,-4;5"), Some(Placement {
            x: 1., y: 2., dx: 3., dy: -4., count: 5, centered: false,
        }));
        assert_eq!(Placement::parse("1"), None);
    }

    #[test]
    fn anchors() {
        let boxed = Subraster::new(Raster::new(5, 7, crate::raster::PixelDepth::One).unwrap(), 4, 3, BoxKind::ComposedImage);
        assert_eq!(anchor(None, 20, 10, &boxed), (16, 10));
        assert_eq!(anchor(Some(PictureOrigin::LowerLeft), 20, 10, &boxed), (14, 10));
        assert_eq!(anchor(Some(PictureOrigin::UpperRight), 20, 10, &boxed), (20, 6));
        assert_eq!(anchor(Some(PictureOrigin::Center), 20, 10, &boxed), (17, 8));
        assert_eq!(anchor(Some(PictureOrigin::Point { row: 2, col: 1 }), 20, 10, &boxed), (18, 9));
    }

    #[test]
    fn diagonal_line() {
        let line = render(r"\line(1,1){10}");
        assert_eq!((line.width(), line.height()), (11, 11));
        assert_eq!(line.baseline, 10);
        assert!(line.raster.is_set(10, 0));
        assert!(line.raster.is_set(0, 10));
        assert!(line.raster.is_set(5, 5));
        assert!(!line.raster.is_set(0, 0));
    }

    #[test]
    fn line_slopes() {
        let shallow = render(r"\line(2,1){10}");
        assert_eq!((shallow.width(), shallow.height()), (11, 6));
        let vertical = render(r"\line(0,1){8}");
        assert_eq!((vertical.width(), vertical.height()), (1, 9));
        assert_eq!(ink(&vertical.raster).len(), 9);
        let falling = render(r"\line(1,-1){4}");
        assert!(falling.raster.is_set(0, 0) && falling.raster.is_set(4, 4));
    }

    #[test]
    fn rules_are_filled() {
        let rule = render(r"\rule{6}{3}");
        assert_eq!((rule.width(), rule.height(), rule.baseline), (6, 3, 2));
        assert_eq!(ink(&rule.raster).len(), 18);
        let lifted = render(r"\rule[2]{6}{3}");
        assert_eq!((lifted.height(), lifted.baseline), (5, 4));
        let sunk = render(r"\rule[-5]{6}{3}");
        assert_eq!((sunk.height(), sunk.baseline, sunk.descent()), (6, 0, 5));
    }

    #[test]
    fn circles() {
        let circle = render(r"\circle(10)");
        assert_eq!((circle.width(), circle.height()), (11, 11));
        assert!(circle.raster.is_set(0, 5));
        assert!(circle.raster.is_set(5, 10));
        assert!(!circle.raster.is_set(5, 5));
        let half = render(r"\circle(10;12)");
        assert!(half.raster.is_set(0, 5));
        assert!(!half.raster.is_set(10, 5));
    }

    #[test]
    fn beziers_start_at_their_anchor() {
        let curve = render(r"\bezier(10,0)(5,5)");
        assert_eq!((curve.width(), curve.height()), (11, 6));
        assert!(curve.raster.is_set(5, 0));
        assert!(curve.raster.is_set(5, 10));
    }

    #[test]
    fn picture_places_lines() {
        let picture = render(r"\picture(20,10){(0,0){\line(1,0){20}} (0,10){\line(1,0){20}}}");
        assert_eq!((picture.width(), picture.height()), (21, 11));
        assert_eq!(picture.baseline, 10);
        for col in 0 .. 21 {
            assert!(picture.raster.is_set(10, col), "bottom {}", col);
            assert!(picture.raster.is_set(0, col), "top {}", col);
        }
        assert!(!picture.raster.is_set(5, 5));
    }

    #[test]
    fn picture_orientations() {
        // a line going down-left from (10,10) ends at the origin
        let picture = render(r"\picture(10){(10,10){\line(-1,-1){10}}}");
        assert!(picture.raster.is_set(0, 10));
        assert!(picture.raster.is_set(10, 0));
        let centered = render(r"\picture(20){(10,10){\circle(10)}}");
        assert!(centered.raster.is_set(5, 10));
        assert!(centered.raster.is_set(15, 10));
        assert!(!centered.raster.is_set(10, 10));
    }

    #[test]
    fn repeated_elements() {
        let put = render(r"\picture(10,0){\put(0,0;5,0;3){\rule{1}{1}}}");
        assert_eq!(ink(&put.raster), vec![(0, 0), (0, 5), (0, 10)]);
        let multiput = render(r"\picture(10,0){\multiput(0,0)(5,0){3}{\rule{1}{1}}}");
        assert_eq!(put.raster, multiput.raster);
    }

    #[test]
    fn repeats_are_capped() {
        let placement = Placement::parse("0,0;1,1;1e9").unwrap();
        assert_eq!(placement.count, MAX_REPEAT);
        assert_eq!(Placement::parse("0,0;1,1;-3").unwrap().count, 0);

        let many = render(r"\picture(4){\multiput(0,0)(0,0){100000000}{\rule{1}{1}}}");
        assert_eq!(ink(&many.raster), vec![(4, 0)]);
        // copies leaving the canvas are skipped
        let away = render(r"\picture(4){\multiput(0,0)(1e15,1e15){100000000}{\rule{1}{1}}}");
        assert_eq!(ink(&away.raster), vec![(4, 0)]);
    }

    #[test]
    fn huge_dimensions_become_placeholders() {
        let placeholder = render(r"\text{[?]}");
        for huge in &[r"\line(1,0){1e20}", r"\line(1,1e300){1e10}", r"\picture(1e20){}", r"\circle(1e20)",
                      r"\rule{1e20}{2}", r"\rule[1e30]{2}{2}", r"\bezier(1e20,0)(0,0)"] {
            assert_eq!(render(huge).width(), placeholder.width(), "{}", huge);
        }
    }

    #[test]
    fn elements_far_outside_are_clipped() {
        let picture = render(r"\picture(4){(-1e300,1e300){\rule{1}{1}} (1e300,-1e300){\circle(2)}}");
        assert!(picture.raster.is_blank());
    }

    #[test]
    fn unit_length_scales() {
        let small = render(r"\picture(4){}");
        let large = render(r"\unitlength{3}\picture(4){}");
        assert_eq!(small.width(), 5);
        assert_eq!(large.width(), 13);
    }

    #[test]
    fn stray_tokens_in_pictures() {
        let picture = render(r"\picture(4){ junk \foo (0,0){\rule{1}{1}} }");
        assert_eq!(ink(&picture.raster), vec![(4, 0)]);
    }
}
