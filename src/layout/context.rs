//! Rendering options and the dynamically scoped state threaded through the compiler.

use crate::error::{RasterError, RasterResult};
use crate::font::{Family, SymbolDef, SymbolTable};
use crate::raster::{BoxKind, PixelDepth, Raster, Subraster};
use super::constants::*;

/// When scripts of large operators are stacked above and below instead of beside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayStyle {
    /// never
    Text,
    /// at sizes [`NORMALSIZE`] and above
    Conditional,
    /// always
    Display,
}

impl Default for DisplayStyle {
    fn default() -> DisplayStyle {
        DisplayStyle::Conditional
    }
}

impl DisplayStyle {
    /// Whether display layout applies at `size`
    pub fn is_display(self, size: u8) -> bool {
        match self {
            DisplayStyle::Text        => false,
            DisplayStyle::Conditional => size >= NORMALSIZE,
            DisplayStyle::Display     => true,
        }
    }
}

/// Options of a rendering, loadable with serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// initial size level, 0 to 7
    pub size:               u8,
    /// initial display style
    pub display_style:      DisplayStyle,
    /// minimal distance between the inks of smashed boxes; negative disables smashing
    pub smash_margin:       i32,
    /// whether the margin grows with the size level
    pub smash_delta:        bool,
    /// recursion cap; deeper expressions render as a placeholder
    pub max_depth:          usize,
    /// largest raster that may be allocated, in pixels
    pub max_raster_pixels:  usize,
    /// longer expressions are truncated
    pub max_expression_len: usize,
    /// size of one `\picture` unit, in pixels
    pub unit_length:        f64,
    /// depth of the produced rasters
    pub pixel_depth:        PixelDepth,
    /// drawing primitives writing outside their canvas fail instead of clipping
    pub strict_drawing:     bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size:               NORMALSIZE,
            display_style:      DisplayStyle::default(),
            smash_margin:       SMASHMARGIN,
            smash_delta:        true,
            max_depth:          MAX_DEPTH,
            max_raster_pixels:  MAX_PIXELS,
            max_expression_len: MAX_EXPRESSION_LEN,
            unit_length:        1.0,
            pixel_depth:        PixelDepth::One,
            strict_drawing:     false,
        }
    }
}

impl RenderSettings {
    /// Settings with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial size level, clamped to the available sizes
    pub fn with_size(self, size: u8) -> Self {
        RenderSettings {
            size: size.min(LARGESTSIZE),
            ..self
        }
    }

    /// Always stack the limits of large operators
    pub fn with_display(self) -> Self {
        RenderSettings {
            display_style: DisplayStyle::Display,
            ..self
        }
    }

    /// Never stack the limits of large operators
    pub fn with_text(self) -> Self {
        RenderSettings {
            display_style: DisplayStyle::Text,
            ..self
        }
    }

    /// Sets the smash margin; a negative margin disables smashing
    pub fn with_smash_margin(self, margin: i32, delta: bool) -> Self {
        RenderSettings {
            smash_margin: margin,
            smash_delta: delta,
            ..self
        }
    }

    /// Sets the recursion cap
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        RenderSettings {
            max_depth,
            ..self
        }
    }

    /// Sets the depth of produced rasters
    pub fn with_pixel_depth(self, pixel_depth: PixelDepth) -> Self {
        RenderSettings {
            pixel_depth,
            ..self
        }
    }

    /// Makes drawing primitives fail when they write outside their canvas
    pub fn with_strict_drawing(self) -> Self {
        RenderSettings {
            strict_drawing: true,
            ..self
        }
    }
}

/// Smash margin in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smash {
    /// margin in pixels; negative disables smashing
    pub margin:   i32,
    /// the margin grows with the size level
    pub is_delta: bool,
}

impl Smash {
    /// Margin to smash with at `size`, `None` when smashing is disabled.
    pub fn effective(self, size: u8) -> Option<usize> {
        if self.margin < 0 {
            return None;
        }
        let margin = if self.is_delta {
            self.margin + size as i32 - NORMALSIZE as i32
        } else {
            self.margin
        };
        Some(margin.max(0) as usize)
    }
}

/// Corner of a `\picture` element anchored at its `(x, y)` position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PictureOrigin {
    /// lower-left corner
    LowerLeft,
    /// upper-left corner (lines going down to the right)
    UpperLeft,
    /// upper-right corner (lines going down to the left)
    UpperRight,
    /// lower-right corner (lines going up to the left)
    LowerRight,
    /// center (circles)
    Center,
    /// an explicit pixel of the element, as (row, col)
    Point {
        /// row of the anchor
        row: usize,
        /// column of the anchor
        col: usize,
    },
}

/// State shared by every level of the compiler.
///
/// The fields below `symbols` and `settings` are dynamically scoped: each call of
/// [`rasterize`](super::engine::rasterize) takes a [`ContextSnapshot`] on entry and restores it
/// on return, so that `\rm`, `\tiny` or `\nosmash` only affect their enclosing group.
pub struct RenderContext<'s, S: ?Sized> {
    /// glyph source
    pub symbols:         &'s S,
    /// options of the rendering
    pub settings:        RenderSettings,
    /// current size level
    pub size:            u8,
    /// current font family
    pub family:          Family,
    /// current display style
    pub display_style:   DisplayStyle,
    /// current smash margin
    pub smash:           Smash,
    /// current recursion depth
    pub depth:           usize,
    /// everything rendered so far at the current level
    pub left_expression: Option<Subraster>,
    /// symbol of the last rendered glyph at the current level
    pub left_symbol:     Option<SymbolDef>,
    /// canvas of the `\picture` being laid out
    pub working_box:     Option<Subraster>,
    /// anchor reported by the last picture element; `None` anchors at the baseline
    pub working_param:   Option<PictureOrigin>,
    /// size of one picture unit, in pixels
    pub unit_length:     f64,
}

/// Values of the dynamically scoped fields of a [`RenderContext`].
#[derive(Debug)]
pub struct ContextSnapshot {
    size:            u8,
    family:          Family,
    display_style:   DisplayStyle,
    smash:           Smash,
    left_expression: Option<Subraster>,
    left_symbol:     Option<SymbolDef>,
    unit_length:     f64,
}

impl<'s, S: SymbolTable + ?Sized> RenderContext<'s, S> {
    /// A fresh context at the initial values of `settings`.
    pub fn new(symbols: &'s S, settings: RenderSettings) -> Self {
        Self {
            symbols,
            size:            settings.size.min(LARGESTSIZE),
            family:          Family::default(),
            display_style:   settings.display_style,
            smash:           Smash { margin: settings.smash_margin, is_delta: settings.smash_delta },
            depth:           0,
            left_expression: None,
            left_symbol:     None,
            working_box:     None,
            working_param:   None,
            unit_length:     settings.unit_length,
            settings,
        }
    }

    /// Captures the scoped fields. The left expression is moved into the snapshot,
    /// leaving the callee to start from an empty one.
    pub fn save(&mut self) -> ContextSnapshot {
        ContextSnapshot {
            size:            self.size,
            family:          self.family,
            display_style:   self.display_style,
            smash:           self.smash,
            left_expression: self.left_expression.take(),
            left_symbol:     self.left_symbol.take(),
            unit_length:     self.unit_length,
        }
    }

    /// Puts back the values captured by [`save`](Self::save).
    pub fn restore(&mut self, snapshot: ContextSnapshot) {
        self.size            = snapshot.size;
        self.family          = snapshot.family;
        self.display_style   = snapshot.display_style;
        self.smash           = snapshot.smash;
        self.left_expression = snapshot.left_expression;
        self.left_symbol     = snapshot.left_symbol;
        self.unit_length     = snapshot.unit_length;
    }

    /// Whether display layout applies at the current size
    pub fn is_display(&self) -> bool {
        self.display_style.is_display(self.size)
    }

    /// Height of an ordinary glyph at `size`
    pub fn em(&self, size: u8) -> usize {
        self.symbols.em_height(size)
    }

    /// Allocates a blank raster within the pixel budget of the settings.
    pub fn raster(&self, width: usize, height: usize) -> RasterResult<Raster> {
        Raster::with_limit(width, height, self.settings.pixel_depth, self.settings.max_raster_pixels)
    }

    /// Largest number of pixels any single raster may have.
    pub fn pixel_limit(&self) -> usize {
        self.settings.max_raster_pixels
    }

    /// A blank box within the pixel budget of the settings.
    pub fn blank(&self, width: usize, height: usize, baseline: usize) -> RasterResult<Subraster> {
        Ok(Subraster::new(self.raster(width, height)?, baseline, self.size, BoxKind::NoSmash))
    }

    /// Turns pixels refused by a drawing primitive into an error in strict mode.
    pub fn check_clipped(&self, clipped: usize) -> RasterResult<()> {
        if clipped > 0 && self.settings.strict_drawing {
            warn!("{} pixels drawn outside the canvas", clipped);
            return Err(RasterError::Clipped(clipped));
        }
        Ok(())
    }
}
