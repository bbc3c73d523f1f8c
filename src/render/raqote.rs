//! Provides a [`GraphicsBackend`] drawing onto a raqote [`DrawTarget`].

use raqote::{DrawOptions, DrawTarget, PathBuilder, SolidSource, Source};

use super::{Cursor, GraphicsBackend, Role, RGBA};

/// Backend drawing onto a borrowed draw target, `scale` target pixels per box pixel.
pub struct RaqoteBackend<'a> {
    target        : &'a mut DrawTarget,
    scale         : f32,
    current_color : SolidSource,
    color_stack   : Vec<SolidSource>,
}

impl<'a> RaqoteBackend<'a> {
    pub fn new(target: &'a mut DrawTarget, scale: f64) -> Self {
        Self {
            target,
            scale:         scale as f32,
            current_color: SolidSource::from_unpremultiplied_argb(0xff, 0x00, 0x00, 0x00),
            color_stack:   Vec::new(),
        }
    }

    fn fill(&mut self, pos: Cursor, width: f64, height: f64, color: SolidSource) {
        let s = self.scale;
        let mut path_builder = PathBuilder::new();
        path_builder.rect(pos.x as f32 * s, pos.y as f32 * s, width as f32 * s, height as f32 * s);
        let path = path_builder.finish();

        self.target.fill(&path, &Source::Solid(color), &DrawOptions::default());
    }
}

fn solid(RGBA(r, g, b, a): RGBA) -> SolidSource {
    SolidSource::from_unpremultiplied_argb(a, r, g, b)
}

impl<'dt> GraphicsBackend for RaqoteBackend<'dt> {
    fn bbox(&mut self, pos: Cursor, width: f64, height: f64, role: Role) {
        let color = match role {
            Role::Bounds   => RGBA(0xc1, 0x00, 0x00, 0x60),
            Role::Baseline => RGBA(0x00, 0x00, 0xc1, 0x60),
        };
        self.fill(pos, width, height, solid(color));
    }

    fn rule(&mut self, pos: Cursor, width: f64, height: f64) {
        self.fill(pos, width, height, self.current_color);
    }

    fn begin_color(&mut self, color: RGBA) {
        self.color_stack.push(self.current_color);
        self.current_color = solid(color);
    }

    fn end_color(&mut self) {
        if let Some(color) = self.color_stack.pop() {
            self.current_color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Renderer;

    #[test]
    fn draws_the_box() {
        let boxed = crate::render("x").unwrap();
        let mut target = DrawTarget::new(boxed.width() as i32, boxed.height() as i32);
        {
            let mut backend = RaqoteBackend::new(&mut target, 1.);
            Renderer::new().render(&boxed, &mut backend);
        }
        // premultiplied ARGB: opaque pixels have a full alpha byte
        let opaque = target.get_data().iter().filter(|&&pixel| pixel >> 24 == 0xff).count();
        assert!(opaque > 0);
    }
}
