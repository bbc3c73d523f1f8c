//! Draw a rendered [`Subraster`] onto a `Backend`, such as a screen, a PNG image, etc.
//!
//! To do this, a `Renderer` must first be created using the `Renderer::new` function
//! and then `Renderer::render` must be called on the box and the desired backend.
//! Every horizontal run of inked pixels becomes one filled rectangle.
//!
//! ## Backends
//!
//! The [`GraphicsBackend`] trait represents all graphical operations that are needed to draw a box:
//!
//!   - setting colors: `GraphicsBackend::begin_color` and `GraphicsBackend::end_color`
//!   - drawing a filled rectangle: `GraphicsBackend::rule`
//!
//! Backends are available behind features of the crate:
//!
//!  - tiny-skia backend : `tinyskia-renderer` (render to a pixmap, png)
//!  - Raqote backend : `raqote-renderer` (render to screen, png)
//!
//! ## Coordinate system
//!
//! The origin is the top-left corner of the box, one unit per pixel, Y growing downwards.

use crate::raster::{PixelDepth, Raster, Subraster};

/// A color, as red, green, blue and alpha components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RGBA(pub u8, pub u8, pub u8, pub u8);

impl RGBA {
    /// Opaque black
    pub const BLACK: RGBA = RGBA(0, 0, 0, 0xff);

    /// The same color with its opacity scaled by `coverage` out of 255.
    pub fn with_coverage(self, coverage: u8) -> RGBA {
        let alpha = self.3 as u16 * coverage as u16 / 255;
        RGBA(self.0, self.1, self.2, alpha as u8)
    }
}

/// Position of the cursor in space, in backend units.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Cursor {
    /// x-coordinate
    pub x: f64,
    /// y-coordinate (NB: `cursor1.y` < `cursor2.y` means `cursor1` is above `cursor2` on the screen)
    pub y: f64,
}

impl Cursor {
    /// Adds `dx` and `dy` to the x- and y- coordinates resp. of the cursor
    pub fn translate(self, dx: f64, dy: f64) -> Cursor {
        Cursor {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Moves cursor by `dy` in the direction +Y
    pub fn down(self, dy: f64) -> Cursor {
        Cursor {
            x: self.x,
            y: self.y + dy,
        }
    }
}

/// The type of things outlined in debug mode (cf [`Renderer::debug`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// the bounding box
    Bounds,
    /// the baseline row
    Baseline,
}

/// A backend that can draw filled rectangles and has some support for colors.
///
/// Implementing the function [`GraphicsBackend::bbox`] is optional (if not implemented, this function does nothing).
/// This function is only used in the debug mode of [`Renderer`].
pub trait GraphicsBackend {
    /// Only called by [`Renderer`] when [`Renderer::debug`] is true (debug mode).
    /// Draws a rectangle whose top-left corner is at `_pos` with the dimensions specified by `_width` and `_height`.
    fn bbox(&mut self, _pos: Cursor, _width: f64, _height: f64, _role: Role) {}
    /// Draws a filled rectangle whose top-left corner is at `pos`.
    fn rule(&mut self, pos: Cursor, width: f64, height: f64);
    /// Makes `color` the current used color. The color previously in use is restored with [`GraphicsBackend::end_color`].
    fn begin_color(&mut self, color: RGBA);
    /// Restores the previously used color. If there were no previous color, this function should return silently and not panic.
    fn end_color(&mut self);
}

/// Horizontal runs of equal, non-blank pixels in `row`, as (first column, length, value).
pub fn ink_runs(raster: &Raster, row: usize) -> Vec<(usize, usize, u8)> {
    let mut runs: Vec<(usize, usize, u8)> = Vec::new();
    for col in 0 .. raster.width() {
        let value = raster.get(row as isize, col as isize).unwrap_or(0);
        if value == 0 {
            continue;
        }
        match runs.last_mut() {
            Some((start, len, run)) if *run == value && *start + *len == col => *len += 1,
            _ => runs.push((col, 1, value)),
        }
    }
    runs
}

/// Context used for drawing.
#[derive(Debug, Clone)]
pub struct Renderer {
    /// When set to true, the renderer additionally calls [`GraphicsBackend::bbox`] to outline
    /// the box and its baseline.
    pub debug: bool,
    /// Color of fully inked pixels
    pub color: RGBA,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    /// Creates new renderer, drawing in black.
    pub fn new() -> Self {
        Renderer {
            debug: false,
            color: RGBA::BLACK,
        }
    }

    /// Draws `boxed` onto `out` with its top-left corner at the origin.
    pub fn render(&self, boxed: &Subraster, out: &mut impl GraphicsBackend) {
        self.render_at(Cursor::default(), boxed, out)
    }

    /// Draws `boxed` onto `out` with its top-left corner at `pos`.
    pub fn render_at(&self, pos: Cursor, boxed: &Subraster, out: &mut impl GraphicsBackend) {
        let raster = &boxed.raster;
        if self.debug {
            out.bbox(pos, raster.width() as f64, raster.height() as f64, Role::Bounds);
            out.bbox(pos.down(boxed.baseline as f64), raster.width() as f64, 1., Role::Baseline);
        }

        let full = raster.depth().ink();
        out.begin_color(self.color);
        for row in 0 .. raster.height() {
            for (col, len, value) in ink_runs(raster, row) {
                let shaded = raster.depth() == PixelDepth::Eight && value != full;
                if shaded {
                    out.begin_color(self.color.with_coverage(value));
                }
                out.rule(pos.translate(col as f64, row as f64), len as f64, 1.);
                if shaded {
                    out.end_color();
                }
            }
        }
        out.end_color();
    }
}

#[cfg(feature="tinyskia-renderer")]
pub mod tinyskia;
#[cfg(feature="raqote-renderer")]
pub mod raqote;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::BoxKind;

    #[derive(Default)]
    struct Recorder {
        rules:  Vec<(f64, f64, f64, RGBA)>,
        colors: Vec<RGBA>,
        boxes:  Vec<Role>,
    }

    impl GraphicsBackend for Recorder {
        fn bbox(&mut self, _pos: Cursor, _width: f64, _height: f64, role: Role) {
            self.boxes.push(role);
        }
        fn rule(&mut self, pos: Cursor, width: f64, _height: f64) {
            let color = self.colors.last().copied().unwrap_or_default();
            self.rules.push((pos.x, pos.y, width, color));
        }
        fn begin_color(&mut self, color: RGBA) {
            self.colors.push(color);
        }
        fn end_color(&mut self) {
            self.colors.pop();
        }
    }

    #[test]
    fn runs() {
        let mut raster = Raster::new(8, 1, PixelDepth::Eight).unwrap();
        for &(col, value) in &[(0, 255), (1, 255), (3, 255), (4, 100), (5, 100)] {
            raster.set(0, col, value).unwrap();
        }
        assert_eq!(ink_runs(&raster, 0), vec![(0, 2, 255), (3, 1, 255), (4, 2, 100)]);
    }

    #[test]
    fn one_rule_per_run() {
        let mut raster = Raster::new(6, 2, PixelDepth::One).unwrap();
        for col in 1 .. 5 {
            raster.ink(0, col).unwrap();
        }
        raster.ink(1, 0).unwrap();
        raster.ink(1, 5).unwrap();
        let boxed = Subraster::new(raster, 1, 3, BoxKind::ComposedImage);

        let mut recorder = Recorder::default();
        Renderer::new().render_at(Cursor { x: 10., y: 20. }, &boxed, &mut recorder);
        assert_eq!(recorder.rules, vec![
            (11., 20., 4., RGBA::BLACK),
            (10., 21., 1., RGBA::BLACK),
            (15., 21., 1., RGBA::BLACK),
        ]);
        assert!(recorder.colors.is_empty());
        assert!(recorder.boxes.is_empty());
    }

    #[test]
    fn grey_pixels_are_translucent() {
        let mut raster = Raster::new(2, 1, PixelDepth::Eight).unwrap();
        raster.set(0, 0, 255).unwrap();
        raster.set(0, 1, 51).unwrap();
        let boxed = Subraster::new(raster, 0, 3, BoxKind::ComposedImage);

        let mut recorder = Recorder::default();
        let renderer = Renderer { debug: true, ..Renderer::new() };
        renderer.render(&boxed, &mut recorder);
        assert_eq!(recorder.rules[0].3, RGBA::BLACK);
        assert_eq!(recorder.rules[1].3, RGBA(0, 0, 0, 51));
        assert_eq!(recorder.boxes, vec![Role::Bounds, Role::Baseline]);
    }
}
