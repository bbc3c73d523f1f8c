//! Vector primitives drawing into an existing [`Raster`], and buffer editing helpers.
//!
//! Lines, elliptical arcs and quadratic bezier curves are all plotted the same way: the curve is
//! bisected recursively until both the row and column displacement of a piece fall under half a
//! pixel, and the converged point is then plotted. Pixels falling outside the raster are skipped
//! and counted; the count is returned so strict callers can treat clipping as a failure.

use super::{compose, Raster};
use crate::error::RasterResult;

/// Convergence tolerance of the recursive plotters, in pixels.
pub const TOLERANCE: f64 = 0.5;

/// Recursion is cut off at this depth whatever the geometry (e.g. on non-finite input).
const MAX_RECURSION: usize = 48;

const DASH_LEN:  usize = 3;
const DASH_SKIP: usize = 2;

/// A point in raster coordinates: `(row, col)`, fractional.
pub type Point = (f64, f64);

/// Bookkeeping of a recursive plot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Plot {
    /// number of recursive calls performed
    pub calls:     usize,
    /// deepest recursion level reached
    pub max_depth: usize,
    /// pixels that fell outside the raster
    pub clipped:   usize,
}

impl Plot {
    fn point(&mut self, raster: &mut Raster, (row, col): Point) {
        if raster.ink(row.round() as isize, col.round() as isize).is_err() {
            self.clipped += 1;
        }
    }

    fn enter(&mut self, depth: usize) {
        self.calls += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

fn converged(from: Point, to: Point) -> bool {
    (to.0 - from.0).abs() < TOLERANCE && (to.1 - from.1).abs() < TOLERANCE
}

fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2., (a.1 + b.1) / 2.)
}

/// Fill pattern of [`rule_raster`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStyle {
    /// every pixel
    Solid,
    /// dashes along the rows
    HorizontalDash,
    /// dashes along the columns
    VerticalDash,
    /// solid with its four corners cut
    Bevel,
    /// nothing is drawn; the rule only takes up room
    Strut,
}

/// Fills the `width`x`height` rectangle whose top-left corner is `(top, left)`.
/// Returns the number of pixels falling outside the raster.
pub fn rule_raster(raster: &mut Raster, top: isize, left: isize, width: usize, height: usize, style: RuleStyle) -> usize {
    if style == RuleStyle::Strut {
        return 0;
    }
    let bevel = (width.min(height) / 3).max(1);
    let mut clipped = 0;

    for dr in 0 .. height {
        for dc in 0 .. width {
            let on = match style {
                RuleStyle::Solid => true,
                RuleStyle::HorizontalDash => dc % (DASH_LEN + DASH_SKIP) < DASH_LEN,
                RuleStyle::VerticalDash   => dr % (DASH_LEN + DASH_SKIP) < DASH_LEN,
                RuleStyle::Bevel => {
                    let from_top  = dr.min(height - 1 - dr);
                    let from_side = dc.min(width - 1 - dc);
                    from_top + from_side >= bevel || width < 3 || height < 3
                },
                RuleStyle::Strut => false,
            };
            if on && raster.ink(top + dr as isize, left + dc as isize).is_err() {
                clipped += 1;
            }
        }
    }
    clipped
}

/// Draws a line `thickness` pixels thick from `from` to `to`, as parallel one-pixel lines
/// offset across the line's main direction.
pub fn line_raster(raster: &mut Raster, from: Point, to: Point, thickness: usize) -> usize {
    let thickness = thickness.max(1);
    let mostly_horizontal = (to.1 - from.1).abs() >= (to.0 - from.0).abs();
    let mut plot = Plot::default();

    for k in 0 .. thickness {
        let shift = k as f64 - ((thickness - 1) / 2) as f64;
        let (a, b) = if mostly_horizontal {
            ((from.0 + shift, from.1), (to.0 + shift, to.1))
        } else {
            ((from.0, from.1 + shift), (to.0, to.1 + shift))
        };
        plot.point(raster, a);
        line_recurse(raster, a, b, 0, &mut plot);
        plot.point(raster, b);
    }
    plot.clipped
}

/// Plots the one-pixel line from `from` to `to` by bisection.
pub fn line_recurse(raster: &mut Raster, from: Point, to: Point, depth: usize, plot: &mut Plot) {
    plot.enter(depth);
    if converged(from, to) || depth >= MAX_RECURSION {
        plot.point(raster, midpoint(from, to));
        return;
    }
    let mid = midpoint(from, to);
    line_recurse(raster, from, mid, depth + 1, plot);
    line_recurse(raster, mid, to, depth + 1, plot);
}

/// Part of an ellipse to draw with [`circle_raster`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arc {
    /// Quadrants, counterclockwise from the upper right: 1 upper right, 2 upper left,
    /// 3 lower left, 4 lower right
    Quadrants([bool; 4]),
    /// Angular range in degrees, counterclockwise from the positive horizontal axis
    Angles(f64, f64),
}

impl Arc {
    /// The whole ellipse
    pub const FULL: Arc = Arc::Quadrants([true; 4]);

    /// Parses `"1234"`-style quadrant lists, or `"θ0,θ1"` angle ranges.
    pub fn parse(spec: &str) -> Option<Arc> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Some(Arc::FULL);
        }
        if let Some((start, end)) = spec.split_once(',') {
            let start = start.trim().parse().ok()?;
            let end   = end.trim().parse().ok()?;
            return Some(Arc::Angles(start, end));
        }
        let mut quadrants = [false; 4];
        for c in spec.chars() {
            let q = c.to_digit(10).filter(|q| (1 ..= 4).contains(q))?;
            quadrants[q as usize - 1] = true;
        }
        Some(Arc::Quadrants(quadrants))
    }

    fn ranges(self) -> Vec<(f64, f64)> {
        match self {
            Arc::Quadrants(quadrants) => quadrants
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(i, _)| (90. * i as f64, 90. * (i + 1) as f64))
                .collect(),
            Arc::Angles(start, end) => {
                let end = if end < start { end + 360. } else { end };
                vec![(start, end)]
            },
        }
    }
}

/// Draws (part of) the ellipse inscribed in the rectangle with corners `(top, left)` and
/// `(bottom, right)`, `thickness` pixels thick towards the inside.
pub fn circle_raster(raster: &mut Raster, top: isize, left: isize, bottom: isize, right: isize, thickness: usize, arc: Arc) -> usize {
    let center = ((top + bottom) as f64 / 2., (left + right) as f64 / 2.);
    let a = (right - left) as f64 / 2.;
    let b = (bottom - top) as f64 / 2.;
    let mut plot = Plot::default();

    for k in 0 .. thickness.max(1) {
        let (a, b) = (a - k as f64, b - k as f64);
        if a < 0. || b < 0. {
            break;
        }
        for (start, end) in arc.ranges() {
            let (start, end) = (start.to_radians(), end.to_radians());
            let from = ellipse_point(center, a, b, start);
            let to   = ellipse_point(center, a, b, end);
            plot.point(raster, from);
            circle_recurse(raster, center, a, b, (start, end), 0, &mut plot);
            plot.point(raster, to);
        }
    }
    plot.clipped
}

/// Point of the ellipse centered at `center` with horizontal semi-axis `a` and vertical `b`,
/// at angle `theta` (radians, counterclockwise, rows growing downwards).
pub fn ellipse_point(center: Point, a: f64, b: f64, theta: f64) -> Point {
    let (sin, cos) = theta.sin_cos();
    let denominator = (b * b * cos * cos + a * a * sin * sin).sqrt();
    let r = if denominator > 0. { a * b / denominator } else { 0. };
    (center.0 - r * sin, center.1 + r * cos)
}

/// Plots the arc between the angles `theta.0` and `theta.1` by bisecting the angle.
pub fn circle_recurse(raster: &mut Raster, center: Point, a: f64, b: f64, theta: (f64, f64), depth: usize, plot: &mut Plot) {
    plot.enter(depth);
    let from = ellipse_point(center, a, b, theta.0);
    let to   = ellipse_point(center, a, b, theta.1);
    let short = (theta.1 - theta.0).abs() <= std::f64::consts::FRAC_PI_2;
    if (short && converged(from, to)) || depth >= MAX_RECURSION {
        plot.point(raster, midpoint(from, to));
        return;
    }
    let mid = (theta.0 + theta.1) / 2.;
    circle_recurse(raster, center, a, b, (theta.0, mid), depth + 1, plot);
    circle_recurse(raster, center, a, b, (mid, theta.1), depth + 1, plot);
}

/// Draws the quadratic bezier curve from `start` to `end` whose tangents meet at `control`.
pub fn bezier_raster(raster: &mut Raster, start: Point, end: Point, control: Point) -> usize {
    let mut plot = Plot::default();
    plot.point(raster, start);
    bezier_recurse(raster, start, end, control, 0, &mut plot);
    plot.point(raster, end);
    plot.clipped
}

/// Midpoint subdivision of a quadratic bezier curve.
pub fn bezier_recurse(raster: &mut Raster, start: Point, end: Point, control: Point, depth: usize, plot: &mut Plot) {
    plot.enter(depth);
    if (converged(start, end) && converged(start, control)) || depth >= MAX_RECURSION {
        plot.point(raster, midpoint(start, end));
        return;
    }
    let left  = midpoint(start, control);
    let right = midpoint(control, end);
    let mid   = midpoint(left, right);
    bezier_recurse(raster, start, mid, left, depth + 1, plot);
    bezier_recurse(raster, mid, end, right, depth + 1, plot);
}

/// Embeds `raster` in a larger one with `ntop`/`nbot` blank rows and `nside` blank columns
/// on each side, optionally framed by a one pixel line along the new edges.
///
/// The width of a 1-bit result is padded on the right up to a multiple of 8,
/// as monochrome image formats expect byte-aligned rows.
pub fn border_raster(raster: &Raster, ntop: usize, nbot: usize, nside: usize, frame: bool, limit: usize) -> RasterResult<Raster> {
    let width  = raster.width() + 2 * nside;
    let height = raster.height() + ntop + nbot;
    let padded = match raster.depth() {
        super::PixelDepth::One => (width + 7) / 8 * 8,
        super::PixelDepth::Eight => width,
    };

    let mut bordered = Raster::with_limit(padded, height, raster.depth(), limit)?;
    compose::blit(&mut bordered, raster, ntop as isize, nside as isize, true);

    if frame && width > 0 && height > 0 {
        let h = height as isize;
        let w = width as isize;
        rule_raster(&mut bordered, 0,     0,     width, 1,      RuleStyle::Solid);
        rule_raster(&mut bordered, h - 1, 0,     width, 1,      RuleStyle::Solid);
        rule_raster(&mut bordered, 0,     0,     1,     height, RuleStyle::Solid);
        rule_raster(&mut bordered, 0,     w - 1, 1,     height, RuleStyle::Solid);
    }
    Ok(bordered)
}

/// Drops up to `nback` columns from the right of `raster`.
///
/// With `minspace` set, only blank columns are dropped and at least `minspace` of them are kept,
/// so no ink is ever deleted. Returns the narrower raster and the number of columns dropped.
pub fn backspace_raster(raster: &Raster, nback: usize, minspace: Option<usize>) -> RasterResult<(Raster, usize)> {
    let removable = match minspace {
        None => raster.width(),
        Some(keep) => raster.trailing_blank_columns().saturating_sub(keep),
    };
    let pback = nback.min(removable);

    let mut narrower = Raster::new(raster.width() - pback, raster.height(), raster.depth())?;
    compose::blit(&mut narrower, raster, 0, 0, true);
    Ok((narrower, pback))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{PixelDepth, MAX_RASTER_PIXELS};

    fn canvas(width: usize, height: usize) -> Raster {
        Raster::new(width, height, PixelDepth::One).unwrap()
    }

    #[test]
    fn rules() {
        let mut raster = canvas(6, 3);
        assert_eq!(rule_raster(&mut raster, 1, 1, 4, 1, RuleStyle::Solid), 0);
        assert_eq!(raster.to_string(), "......\n.****.\n......\n");

        let mut raster = canvas(10, 1);
        rule_raster(&mut raster, 0, 0, 10, 1, RuleStyle::HorizontalDash);
        assert_eq!(raster.to_string(), "***..***..\n");

        let mut raster = canvas(4, 4);
        assert_eq!(rule_raster(&mut raster, 0, 0, 4, 4, RuleStyle::Strut), 0);
        assert!(raster.is_blank());

        let mut raster = canvas(3, 3);
        assert_eq!(rule_raster(&mut raster, 1, 1, 3, 3, RuleStyle::Solid), 5);
    }

    #[test]
    fn bevel_cuts_corners() {
        let mut raster = canvas(6, 6);
        rule_raster(&mut raster, 0, 0, 6, 6, RuleStyle::Bevel);
        assert!(!raster.is_set(0, 0));
        assert!(!raster.is_set(5, 5));
        assert!(raster.is_set(2, 2));
        assert!(raster.is_set(0, 3));
    }

    #[test]
    fn horizontal_and_diagonal_lines() {
        let mut raster = canvas(8, 3);
        line_raster(&mut raster, (1., 0.), (1., 7.), 1);
        assert_eq!(raster.to_string(), "........\n********\n........\n");

        let mut raster = canvas(5, 5);
        line_raster(&mut raster, (0., 0.), (4., 4.), 1);
        for i in 0 .. 5 {
            assert!(raster.is_set(i, i));
        }
    }

    #[test]
    fn thick_lines_are_parallel_strokes() {
        let mut raster = canvas(6, 5);
        line_raster(&mut raster, (2., 0.), (2., 5.), 3);
        assert_eq!(raster.to_string(), "......\n******\n******\n******\n......\n");
    }

    #[test]
    fn line_recursion_converges() {
        let mut raster = canvas(200, 200);
        let mut plot = Plot::default();
        line_recurse(&mut raster, (0., 0.), (150., 199.), 0, &mut plot);
        // length ~250 pixels, tolerance 0.5: about log2(500) levels
        assert!(plot.max_depth <= 10, "depth {}", plot.max_depth);
        assert_eq!(plot.clipped, 0);
        // every plotted pixel lies within a pixel of the analytic line
        for row in 0 .. 200 {
            for col in 0 .. 200 {
                if raster.is_set(row, col) {
                    let distance = (199. * row as f64 - 150. * col as f64).abs() / (199f64.hypot(150.));
                    assert!(distance <= 1., "({}, {}) is {} away", row, col, distance);
                }
            }
        }
    }

    #[test]
    fn circle_quadrants() {
        let mut raster = canvas(11, 11);
        circle_raster(&mut raster, 0, 0, 10, 10, 1, Arc::parse("1").unwrap());
        // upper right quadrant only: top point and right point
        assert!(raster.is_set(0, 5));
        assert!(raster.is_set(5, 10));
        assert!(!raster.is_set(5, 0));
        assert!(!raster.is_set(10, 5));

        let mut raster = canvas(11, 11);
        circle_raster(&mut raster, 0, 0, 10, 10, 1, Arc::FULL);
        assert!(raster.is_set(5, 0));
        assert!(raster.is_set(10, 5));
        assert!(!raster.is_set(5, 5));
    }

    #[test]
    fn arc_parsing() {
        assert_eq!(Arc::parse("14"), Some(Arc::Quadrants([true, false, false, true])));
        assert_eq!(Arc::parse("0,90"), Some(Arc::Angles(0., 90.)));
        assert_eq!(Arc::parse(""), Some(Arc::FULL));
        assert_eq!(Arc::parse("5"), None);
    }

    #[test]
    fn circle_recursion_stays_on_ellipse() {
        let mut raster = canvas(41, 21);
        let mut plot = Plot::default();
        let center = (10., 20.);
        circle_recurse(&mut raster, center, 20., 10., (0., std::f64::consts::PI), 0, &mut plot);
        assert!(plot.max_depth <= 12);
        for row in 0 .. 21 {
            for col in 0 .. 41 {
                if raster.is_set(row, col) {
                    let (y, x) = ((row as f64 - 10.) / 10., (col as f64 - 20.) / 20.);
                    let radius = (x * x + y * y).sqrt();
                    assert!((radius - 1.).abs() < 0.15, "({}, {})", row, col);
                }
            }
        }
    }

    #[test]
    fn bezier_endpoints_and_convergence() {
        let mut raster = canvas(21, 21);
        let mut plot = Plot::default();
        bezier_recurse(&mut raster, (20., 0.), (20., 20.), (0., 10.), 0, &mut plot);
        assert!(plot.max_depth <= 10);
        // apex of the curve lies halfway between the chord and the control point
        assert!(raster.is_set(10, 10));
        assert!(!raster.is_set(0, 10));
        assert_eq!(bezier_raster(&mut raster, (20., 0.), (20., 20.), (0., 10.)), 0);
        assert!(raster.is_set(20, 0));
    }

    #[test]
    fn border_pads_to_byte_width() {
        let mut raster = canvas(5, 2);
        raster.ink(0, 0).unwrap();
        let bordered = border_raster(&raster, 1, 1, 1, false, MAX_RASTER_PIXELS).unwrap();
        assert_eq!(bordered.width(), 8);
        assert_eq!(bordered.height(), 4);
        assert!(bordered.is_set(1, 1));

        let framed = border_raster(&raster, 1, 1, 1, true, MAX_RASTER_PIXELS).unwrap();
        assert!(framed.is_set(0, 0));
        assert!(framed.is_set(3, 6));
        assert!(!framed.is_set(0, 7));
    }

    #[test]
    fn border_is_idempotent_on_aligned_width() {
        let mut raster = canvas(16, 3);
        raster.ink(2, 15).unwrap();
        let bordered = border_raster(&raster, 0, 0, 0, false, MAX_RASTER_PIXELS).unwrap();
        assert_eq!(bordered.width(), 16);
        assert_eq!(bordered, raster);
    }

    #[test]
    fn backspace() {
        let mut raster = canvas(8, 2);
        raster.ink(0, 3).unwrap();

        let (narrower, pback) = backspace_raster(&raster, 2, None).unwrap();
        assert_eq!((narrower.width(), pback), (6, 2));

        // four trailing blank columns, keep one
        let (narrower, pback) = backspace_raster(&raster, 10, Some(1)).unwrap();
        assert_eq!((narrower.width(), pback), (5, 3));
        assert!(narrower.is_set(0, 3));

        let (narrower, pback) = backspace_raster(&raster, 10, None).unwrap();
        assert_eq!((narrower.width(), pback), (0, 8));
    }
}
