//! Provides a [`GraphicsBackend`] for tiny-skia
//!
//! This allows to render onto a canvas of RGBA pixels ([`Pixmap`]),
//! which can then be used inside a [`tiny_skia`] application,
//! or convert to a PNG image.

use super::{Cursor, GraphicsBackend, Role, RGBA};
use crate::raster::Subraster;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

/// Backend for TinySkia renderer
pub struct TinySkiaBackend {
    /// A canvas to draw onto
    pixmap: Pixmap,
    /// Transform from box pixels to pixmap pixels
    box_to_pixmap: Transform,
    current_color: Color,
    color_stack:   Vec<Color>,
}

fn color(RGBA(r, g, b, a): RGBA) -> Color {
    Color::from_rgba8(r, g, b, a)
}

impl TinySkiaBackend {
    /// New backend with a canvas `scale` times as large as `boxed`, on a white background.
    /// `None` if the canvas would be empty.
    pub fn new(boxed: &Subraster, scale: f64) -> Option<Self> {
        let width = (boxed.width() as f64 * scale).ceil() as u32;
        let height = (boxed.height() as f64 * scale).ceil() as u32;
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(Color::WHITE);

        let scale = scale as f32;
        Some(Self {
            pixmap,
            box_to_pixmap: Transform::from_scale(scale, scale),
            current_color: Color::BLACK,
            color_stack:   Vec::new(),
        })
    }

    /// Returns pixmap being drawn onto after all drawing operations are completed
    pub fn pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn fill(&mut self, pos: Cursor, width: f64, height: f64, color: Color) {
        if let Some(rect) = Rect::from_xywh(pos.x as f32, pos.y as f32, width as f32, height as f32) {
            let mut paint = Paint::default();
            paint.set_color(color);
            paint.anti_alias = false;
            self.pixmap.fill_rect(rect, &paint, self.box_to_pixmap, None);
        }
    }
}

impl GraphicsBackend for TinySkiaBackend {
    fn bbox(&mut self, pos: Cursor, width: f64, height: f64, role: Role) {
        let outline = match role {
            Role::Bounds   => RGBA(0xc1, 0x00, 0x00, 0x60),
            Role::Baseline => RGBA(0x00, 0x00, 0xc1, 0x60),
        };
        self.fill(pos, width, height, color(outline));
    }

    fn rule(&mut self, pos: Cursor, width: f64, height: f64) {
        self.fill(pos, width, height, self.current_color);
    }

    fn begin_color(&mut self, rgba: RGBA) {
        self.color_stack.push(self.current_color);
        self.current_color = color(rgba);
    }

    fn end_color(&mut self) {
        if let Some(color) = self.color_stack.pop() {
            self.current_color = color;
        }
    }
}
